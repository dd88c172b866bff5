//! Save/load snapshot contract for room state.
//!
//! Snapshots are plain JSON. Every field that can meaningfully default
//! carries `#[serde(default)]`, so blobs written by an older schema load
//! with the gaps filled in rather than failing. Transient presentation
//! state (turn clock, one-shot markers, last event) is not persisted; it
//! re-establishes on the first action after a load.

use serde::{Deserialize, Serialize};

use super::deck::DeckSize;
use super::exchange::ExchangeState;
use super::seating::SeatingRing;
use super::state::{FinishStatus, GameState, Player, PlayerId, PlayGroup, Role, Seat};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub seat: Seat,
    #[serde(default)]
    pub hand: Vec<super::cards_types::Card>,
    #[serde(default)]
    pub skipped: bool,
    #[serde(default)]
    pub finish: FinishStatus,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_host: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    #[serde(default)]
    pub players: Vec<PlayerSnapshot>,
    #[serde(default)]
    pub pile: Vec<PlayGroup>,
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub game_over: bool,
    #[serde(default)]
    pub winner: Option<PlayerId>,
    #[serde(default)]
    pub current_seat: Seat,
    #[serde(default = "default_required_count")]
    pub required_count: usize,
    #[serde(default)]
    pub last_pile_owner: Option<Seat>,
    #[serde(default)]
    pub last_pile_len: usize,
    #[serde(default)]
    pub finishing_order: Vec<PlayerId>,
    #[serde(default)]
    pub host: Option<PlayerId>,
    #[serde(default)]
    pub deck_size: DeckSize,
    #[serde(default)]
    pub cards_dealt: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<ExchangeState>,
}

fn default_required_count() -> usize {
    1
}

impl GameSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let mut players: Vec<PlayerSnapshot> = state
            .players
            .values()
            .map(|p| PlayerSnapshot {
                id: p.id,
                name: p.name.clone(),
                seat: p.seat,
                hand: p.hand.clone(),
                skipped: p.skipped,
                finish: p.finish,
                role: p.role,
                is_host: p.is_host,
            })
            .collect();
        players.sort_by_key(|p| p.seat);

        Self {
            players,
            pile: state.pile.clone(),
            started: state.started,
            game_over: state.game_over,
            winner: state.winner,
            current_seat: state.current_seat,
            required_count: state.required_count,
            last_pile_owner: state.last_pile_owner,
            last_pile_len: state.last_pile_len,
            finishing_order: state.finishing_order.clone(),
            host: state.host,
            deck_size: state.deck_size,
            cards_dealt: state.cards_dealt,
            exchange: state.exchange.clone(),
        }
    }

    pub fn into_state(self) -> GameState {
        let mut state = GameState::new(self.deck_size);
        let mut seating = SeatingRing::new();
        for p in self.players {
            seating.seat_at(p.seat, p.id);
            state.players.insert(
                p.id,
                Player {
                    id: p.id,
                    name: p.name,
                    seat: p.seat,
                    hand: p.hand,
                    skipped: p.skipped,
                    finish: p.finish,
                    role: p.role,
                    is_host: p.is_host,
                },
            );
        }
        state.seating = seating;
        state.pile = self.pile;
        state.started = self.started;
        state.game_over = self.game_over;
        state.winner = self.winner;
        state.current_seat = self.current_seat;
        state.required_count = self.required_count;
        state.last_pile_owner = self.last_pile_owner;
        state.last_pile_len = self.last_pile_len;
        state.finishing_order = self.finishing_order;
        state.host = self.host;
        state.cards_dealt = self.cards_dealt;
        state.exchange = self.exchange;
        state
    }
}

/// Serialize room state to a snapshot blob.
pub fn save(state: &GameState) -> Result<String, DomainError> {
    serde_json::to_string(&GameSnapshot::from_state(state))
        .map_err(|e| DomainError::validation_other(format!("Snapshot encode failed: {e}")))
}

/// Restore room state from a snapshot blob.
///
/// Missing fields are default-filled so the schema can grow without breaking
/// old snapshots. A structurally unreadable blob is an error; the persistence
/// collaborator is expected to fall back to a fresh game.
pub fn load(blob: &str) -> Result<GameState, DomainError> {
    let snapshot: GameSnapshot = serde_json::from_str(blob)
        .map_err(|e| DomainError::validation_other(format!("Snapshot decode failed: {e}")))?;
    Ok(snapshot.into_state())
}
