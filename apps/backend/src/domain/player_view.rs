//! Player view of room state - what one seat sees on poll.
//!
//! Everything a client needs to render its seat: the own (sorted) hand with
//! playable indices, the table, public info for every player, exchange
//! progress, the turn clock, and the one-shot forced-advance marker.

use serde::Serialize;

use super::cards_types::Card;
use super::deck::DeckSize;
use super::exchange::ExchangePhase;
use super::ranking::tier_for_position;
use super::rules::playable_indices;
use super::state::{FinishStatus, GameState, PlayGroup, PlayerId, Role, Seat, TableEvent, Tier};
use super::timer::TimerView;
use crate::errors::domain::DomainError;

/// Public info about one player, visible to everyone at the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerPublic {
    pub id: PlayerId,
    pub name: String,
    pub seat: Seat,
    pub hand_count: usize,
    pub is_current: bool,
    pub skipped: bool,
    pub finish: FinishStatus,
    pub role: Role,
    pub is_host: bool,
}

/// One row of the finishing-order display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub player: PlayerId,
    pub name: String,
    pub tier: Tier,
    /// 1-based finishing position.
    pub position: usize,
}

/// Exchange progress as seen by the polling player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeView {
    pub phase: ExchangePhase,
    pub is_president: bool,
    pub is_culo: bool,
    pub is_vice_president: bool,
    pub is_vice_culo: bool,
    pub selected_receive: usize,
    pub selected_give: usize,
    /// The hand being selected from, shown only to the selector during a
    /// receive phase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterpart_hand: Option<Vec<Card>>,
}

/// Snapshot of the room for one polling player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerViewInfo {
    pub my_name: String,
    pub hand: Vec<Card>,
    pub playable: Vec<usize>,
    pub can_play: bool,
    pub is_my_turn: bool,
    pub is_host: bool,
    pub table: Vec<PlayGroup>,
    pub players: Vec<PlayerPublic>,
    pub current_seat: Seat,
    pub required_count: usize,
    pub rankings: Vec<RankingEntry>,
    pub deck_size: DeckSize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<ExchangeView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerView>,
    /// Seat force-advanced since the last poll, if any. One-shot: consumed
    /// by the read that returns it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_seat: Option<Seat>,
    pub started: bool,
    pub game_over: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event: Option<TableEvent>,
}

/// Build the poll view for one player.
///
/// `timer` and `forced_seat` are supplied by the caller, which owns running
/// the timeout check and consuming the one-shot marker under the room lock.
pub fn build_view(
    state: &GameState,
    viewer: PlayerId,
    timer: Option<TimerView>,
    forced_seat: Option<Seat>,
) -> Result<PlayerViewInfo, DomainError> {
    let me = state.player(viewer)?;

    let is_my_turn = state.started && me.seat == state.current_seat;
    let playable = if is_my_turn
        && me.finish.is_active()
        && !me.skipped
        && !state.exchange_blocking()
    {
        playable_indices(&me.hand, state.pile_top_rank())
    } else {
        Vec::new()
    };

    let mut players: Vec<PlayerPublic> = state
        .players
        .values()
        .map(|p| PlayerPublic {
            id: p.id,
            name: p.name.clone(),
            seat: p.seat,
            hand_count: p.hand.len(),
            is_current: state.started && p.seat == state.current_seat,
            skipped: p.skipped,
            finish: p.finish,
            role: p.role,
            is_host: p.is_host,
        })
        .collect();
    players.sort_by_key(|p| p.seat);

    let rankings = state
        .finishing_order
        .iter()
        .enumerate()
        .filter_map(|(i, id)| {
            state.players.get(id).map(|p| RankingEntry {
                player: *id,
                name: p.name.clone(),
                tier: tier_for_position(i),
                position: i + 1,
            })
        })
        .collect();

    let exchange = state.exchange.as_ref().map(|ex| {
        let counterpart_hand = match ex.phase {
            ExchangePhase::PresidentReceive if viewer == ex.president => state
                .players
                .get(&ex.culo)
                .map(|p| p.hand.clone()),
            ExchangePhase::ViceReceive if Some(viewer) == ex.vice_president => ex
                .vice_culo
                .and_then(|vc| state.players.get(&vc))
                .map(|p| p.hand.clone()),
            _ => None,
        };
        ExchangeView {
            phase: ex.phase,
            is_president: viewer == ex.president,
            is_culo: viewer == ex.culo,
            is_vice_president: Some(viewer) == ex.vice_president,
            is_vice_culo: Some(viewer) == ex.vice_culo,
            selected_receive: ex.pending_receive.len(),
            selected_give: ex.pending_give.len(),
            counterpart_hand,
        }
    });

    Ok(PlayerViewInfo {
        my_name: me.name.clone(),
        hand: me.hand.clone(),
        can_play: !playable.is_empty(),
        playable,
        is_my_turn,
        is_host: me.is_host,
        table: state.pile.clone(),
        players,
        current_seat: state.current_seat,
        required_count: state.required_count,
        rankings,
        deck_size: state.deck_size,
        exchange,
        timer,
        forced_seat,
        started: state.started,
        game_over: state.game_over,
        winner: state.winner,
        last_event: state.last_event.clone(),
    })
}
