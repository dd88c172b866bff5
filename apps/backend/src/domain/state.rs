//! Room state: players, pile, and per-round bookkeeping.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::cards_types::{Card, PlayedCard, Rank, WILDCARD_RANK};
use super::deck::DeckSize;
use super::exchange::ExchangeState;
use super::seating::SeatingRing;
use crate::errors::domain::{DomainError, NotFoundKind};

pub type Seat = u8; // 0..=11, fixed table positions

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Finish tier, by position in the finishing order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Tier {
    Gold,
    Silver,
    Bronze,
    Loser,
}

/// Whether a player is still in the round.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum FinishStatus {
    #[default]
    Active,
    Finished(Tier),
}

impl FinishStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, FinishStatus::Active)
    }
}

/// Table role carried from the previous round's finishing order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Neutral,
    President,
    VicePresident,
    ViceCulo,
    Culo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub seat: Seat,
    #[serde(default)]
    pub hand: Vec<Card>,
    #[serde(default)]
    pub skipped: bool,
    #[serde(default)]
    pub finish: FinishStatus,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_host: bool,
}

/// One play onto the pile: equal-effective-rank cards from a single hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayGroup {
    pub owner: Seat,
    pub cards: Vec<PlayedCard>,
}

impl PlayGroup {
    /// Effective rank of the whole group. Every card in a group shares one
    /// effective rank by construction.
    pub fn effective_rank(&self) -> Rank {
        self.cards
            .last()
            .map_or(WILDCARD_RANK, PlayedCard::effective_rank)
    }
}

/// Why the pile was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearReason {
    /// An ace (natural or assigned) closed the pile.
    AcePlayed,
    /// Every active player passed.
    AllSkipped,
    /// A full revolution came back to the pile owner with no new play.
    RoundReturned,
}

/// Typed table facts for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum TableEvent {
    Played {
        seat: Seat,
        count: usize,
        rank: Rank,
        raw_wildcards: bool,
    },
    TurnPassed {
        seat: Seat,
    },
    SeatBypassed {
        seat: Seat,
    },
    PileCleared {
        reason: ClearReason,
    },
    PlayerFinished {
        player: PlayerId,
        tier: Tier,
    },
    TurnForced {
        seat: Seat,
    },
}

/// Entire room state, sufficient for every engine operation.
///
/// One instance per room; the service layer guards each instance with an
/// exclusive lock for the duration of a full action.
#[derive(Debug, Clone)]
pub struct GameState {
    pub players: HashMap<PlayerId, Player>,
    pub seating: SeatingRing,
    /// Ordered plays for the current pile. Only the last group's effective
    /// rank matters for comparison, but the whole sequence is kept until the
    /// pile clears.
    pub pile: Vec<PlayGroup>,
    pub started: bool,
    pub game_over: bool,
    /// First finisher of a completed round.
    pub winner: Option<PlayerId>,
    pub current_seat: Seat,
    /// Cards per play, fixed by the first play onto an empty pile.
    pub required_count: usize,
    pub last_pile_owner: Option<Seat>,
    pub last_pile_len: usize,
    /// Insertion-ordered, duplicate-free ids of finished players.
    pub finishing_order: Vec<PlayerId>,
    pub host: Option<PlayerId>,
    pub deck_size: DeckSize,
    /// Running total of cards in play (hands + pile) for this round.
    pub cards_dealt: usize,
    pub exchange: Option<ExchangeState>,
    /// When the current seat's clock started. Transient; not persisted.
    pub turn_started_at: Option<OffsetDateTime>,
    /// One-shot marker of the seat most recently force-advanced on timeout,
    /// consumed by the next poll.
    pub forced_seat: Option<Seat>,
    pub last_event: Option<TableEvent>,
}

impl GameState {
    pub fn new(deck_size: DeckSize) -> Self {
        Self {
            players: HashMap::new(),
            seating: SeatingRing::new(),
            pile: Vec::new(),
            started: false,
            game_over: false,
            winner: None,
            current_seat: 0,
            required_count: 1,
            last_pile_owner: None,
            last_pile_len: 0,
            finishing_order: Vec::new(),
            host: None,
            deck_size,
            cards_dealt: 0,
            exchange: None,
            turn_started_at: None,
            forced_seat: None,
            last_event: None,
        }
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, DomainError> {
        self.players
            .get(&id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("Player {id}")))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, DomainError> {
        self.players
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("Player {id}")))
    }

    pub fn player_at_seat(&self, seat: Seat) -> Option<&Player> {
        self.seating
            .occupant(seat)
            .and_then(|id| self.players.get(&id))
    }

    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.values().filter(|p| p.finish.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.active_players().count()
    }

    /// Whether an exchange protocol is running and still blocks play.
    pub fn exchange_blocking(&self) -> bool {
        self.exchange.as_ref().is_some_and(|e| !e.is_complete())
    }

    /// Effective rank of the most recent play, if the pile is non-empty.
    pub fn pile_top_rank(&self) -> Option<Rank> {
        self.pile.last().map(PlayGroup::effective_rank)
    }

    /// Total cards currently on the pile.
    pub fn pile_card_count(&self) -> usize {
        self.pile.iter().map(|g| g.cards.len()).sum()
    }

    /// Total cards currently held in hands.
    pub fn hand_card_count(&self) -> usize {
        self.players.values().map(|p| p.hand.len()).sum()
    }

    /// Clear the pile for a fresh start: discard played groups, reset the
    /// per-play card requirement and every active player's skip flag.
    pub fn clear_pile(&mut self, reason: ClearReason) {
        self.cards_dealt = self.cards_dealt.saturating_sub(self.pile_card_count());
        self.pile.clear();
        self.required_count = 1;
        self.last_pile_owner = None;
        self.last_pile_len = 0;
        for p in self.players.values_mut() {
            if p.finish.is_active() {
                p.skipped = false;
            }
        }
        self.last_event = Some(TableEvent::PileCleared { reason });
    }
}
