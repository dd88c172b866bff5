//! Card exchange between ranked roles at round start.
//!
//! The president takes two cards from the culo and gives two back; when both
//! vice roles exist they swap one card the same way. Selections arrive one
//! index per call and accumulate until the phase quota fills. While the
//! protocol is active, ordinary play and skip actions are rejected.

use serde::{Deserialize, Serialize};

use super::state::{GameState, PlayerId, Role};
use crate::errors::domain::{DomainError, ValidationKind};

/// Protocol phase. Receive phases select from the counterpart's hand, give
/// phases from the selector's own hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangePhase {
    PresidentReceive,
    PresidentGive,
    ViceReceive,
    ViceGive,
    Complete,
}

/// Which swap a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeLeg {
    President,
    Vice,
}

/// Which side of a swap a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeSide {
    Receive,
    Give,
}

/// Exchange protocol state for one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeState {
    pub phase: ExchangePhase,
    pub president: PlayerId,
    pub culo: PlayerId,
    #[serde(default)]
    pub vice_president: Option<PlayerId>,
    #[serde(default)]
    pub vice_culo: Option<PlayerId>,
    /// Indices selected during the current receive phase.
    #[serde(default)]
    pub pending_receive: Vec<usize>,
    /// Indices selected during the current give phase.
    #[serde(default)]
    pub pending_give: Vec<usize>,
}

/// Progress report for one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeProgress {
    pub selected: usize,
    pub needed: usize,
    pub phase: ExchangePhase,
}

impl ExchangeState {
    /// Build the protocol for a new round, if the previous round produced
    /// both a president and a culo. Vice roles join only as a pair.
    pub fn for_round(state: &GameState) -> Option<Self> {
        let mut president = None;
        let mut culo = None;
        let mut vice_president = None;
        let mut vice_culo = None;
        for p in state.players.values() {
            match p.role {
                Role::President => president = Some(p.id),
                Role::Culo => culo = Some(p.id),
                Role::VicePresident => vice_president = Some(p.id),
                Role::ViceCulo => vice_culo = Some(p.id),
                Role::Neutral => {}
            }
        }
        let (president, culo) = (president?, culo?);
        let (vice_president, vice_culo) = match (vice_president, vice_culo) {
            (Some(vp), Some(vc)) => (Some(vp), Some(vc)),
            _ => (None, None),
        };
        Some(Self {
            phase: ExchangePhase::PresidentReceive,
            president,
            culo,
            vice_president,
            vice_culo,
            pending_receive: Vec::new(),
            pending_give: Vec::new(),
        })
    }

    pub fn is_complete(&self) -> bool {
        self.phase == ExchangePhase::Complete
    }

    /// Whether this player holds one of the protocol's roles.
    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.president == player_id
            || self.culo == player_id
            || self.vice_president == Some(player_id)
            || self.vice_culo == Some(player_id)
    }
}

/// Apply one card selection to the room's exchange protocol.
///
/// Rejections (wrong caller, wrong phase tag, bad or duplicate index) leave
/// both hands and the pending selections unchanged.
pub fn select_card(
    state: &mut GameState,
    player_id: PlayerId,
    card_index: usize,
    side: ExchangeSide,
    leg: ExchangeLeg,
) -> Result<ExchangeProgress, DomainError> {
    let Some(mut ex) = state.exchange.take() else {
        return Err(DomainError::validation(
            ValidationKind::WrongExchangePhase,
            "Card exchange is not active",
        ));
    };
    let result = select_card_inner(state, &mut ex, player_id, card_index, side, leg);
    // The protocol is discarded once it completes; errors keep it in place.
    if result.is_ok() && ex.is_complete() {
        state.exchange = None;
    } else {
        state.exchange = Some(ex);
    }
    result
}

fn select_card_inner(
    state: &mut GameState,
    ex: &mut ExchangeState,
    player_id: PlayerId,
    card_index: usize,
    side: ExchangeSide,
    leg: ExchangeLeg,
) -> Result<ExchangeProgress, DomainError> {
    let (expected_leg, expected_side, quota) = match ex.phase {
        ExchangePhase::PresidentReceive => (ExchangeLeg::President, ExchangeSide::Receive, 2),
        ExchangePhase::PresidentGive => (ExchangeLeg::President, ExchangeSide::Give, 2),
        ExchangePhase::ViceReceive => (ExchangeLeg::Vice, ExchangeSide::Receive, 1),
        ExchangePhase::ViceGive => (ExchangeLeg::Vice, ExchangeSide::Give, 1),
        ExchangePhase::Complete => {
            return Err(DomainError::validation(
                ValidationKind::WrongExchangePhase,
                "Card exchange already completed",
            ))
        }
    };
    if leg != expected_leg || side != expected_side {
        return Err(DomainError::validation(
            ValidationKind::WrongExchangePhase,
            format!("Exchange is in phase {:?}", ex.phase),
        ));
    }

    // The higher role drives both sides of its swap.
    let selector = match expected_leg {
        ExchangeLeg::President => ex.president,
        ExchangeLeg::Vice => ex.vice_president.ok_or_else(|| {
            DomainError::validation(ValidationKind::WrongExchangePhase, "No vice exchange")
        })?,
    };
    if player_id != selector {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            "Only the selecting role holder acts in this phase",
        ));
    }

    // Whose hand the index points into.
    let hand_owner = match (expected_leg, expected_side) {
        (ExchangeLeg::President, ExchangeSide::Receive) => ex.culo,
        (ExchangeLeg::President, ExchangeSide::Give) => ex.president,
        (ExchangeLeg::Vice, ExchangeSide::Receive) => ex.vice_culo.ok_or_else(|| {
            DomainError::validation(ValidationKind::WrongExchangeHand, "No vice culo")
        })?,
        (ExchangeLeg::Vice, ExchangeSide::Give) => selector,
    };
    let hand_len = state.player(hand_owner)?.hand.len();
    if card_index >= hand_len {
        return Err(DomainError::validation(
            ValidationKind::InvalidCardIndex,
            format!("Index {card_index} outside hand of {hand_len}"),
        ));
    }

    let pending = match expected_side {
        ExchangeSide::Receive => &mut ex.pending_receive,
        ExchangeSide::Give => &mut ex.pending_give,
    };
    if pending.contains(&card_index) {
        return Err(DomainError::validation(
            ValidationKind::InvalidCardIndex,
            format!("Index {card_index} already selected"),
        ));
    }
    pending.push(card_index);
    let selected = pending.len();

    if selected < quota {
        return Ok(ExchangeProgress {
            selected,
            needed: quota,
            phase: ex.phase,
        });
    }

    // Quota filled: advance the phase, performing the swap after a give.
    match ex.phase {
        ExchangePhase::PresidentReceive => ex.phase = ExchangePhase::PresidentGive,
        ExchangePhase::PresidentGive => {
            let (president, culo) = (ex.president, ex.culo);
            perform_swap(state, ex, president, culo)?;
            ex.phase = if ex.vice_president.is_some() && ex.vice_culo.is_some() {
                ExchangePhase::ViceReceive
            } else {
                ExchangePhase::Complete
            };
        }
        ExchangePhase::ViceReceive => ex.phase = ExchangePhase::ViceGive,
        ExchangePhase::ViceGive => {
            let (vp, vc) = match (ex.vice_president, ex.vice_culo) {
                (Some(vp), Some(vc)) => (vp, vc),
                _ => {
                    return Err(DomainError::validation(
                        ValidationKind::WrongExchangePhase,
                        "No vice exchange",
                    ))
                }
            };
            perform_swap(state, ex, vp, vc)?;
            ex.phase = ExchangePhase::Complete;
        }
        ExchangePhase::Complete => {}
    }

    Ok(ExchangeProgress {
        selected,
        needed: quota,
        phase: ex.phase,
    })
}

/// Move the pending selections between the two hands and re-sort both.
///
/// Removal runs by descending index so earlier removals cannot shift later
/// ones. Hands cannot change between selection and swap (play is blocked
/// while the protocol is active, and the room lock covers the whole action).
fn perform_swap(
    state: &mut GameState,
    ex: &mut ExchangeState,
    receiver: PlayerId,
    giver: PlayerId,
) -> Result<(), DomainError> {
    ex.pending_receive.sort_unstable_by(|a, b| b.cmp(a));
    ex.pending_give.sort_unstable_by(|a, b| b.cmp(a));

    let mut to_receiver = Vec::with_capacity(ex.pending_receive.len());
    {
        let giver_hand = &mut state.player_mut(giver)?.hand;
        for &idx in &ex.pending_receive {
            to_receiver.push(giver_hand.remove(idx));
        }
    }
    let mut to_giver = Vec::with_capacity(ex.pending_give.len());
    {
        let receiver_hand = &mut state.player_mut(receiver)?.hand;
        for &idx in &ex.pending_give {
            to_giver.push(receiver_hand.remove(idx));
        }
    }

    {
        let receiver_hand = &mut state.player_mut(receiver)?.hand;
        receiver_hand.extend(to_receiver);
        receiver_hand.sort();
    }
    {
        let giver_hand = &mut state.player_mut(giver)?.hand;
        giver_hand.extend(to_giver);
        giver_hand.sort();
    }

    ex.pending_receive.clear();
    ex.pending_give.clear();
    Ok(())
}
