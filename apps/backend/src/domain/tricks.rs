//! Trick engine: play and skip actions, pile resolution, turn advancement.

use time::OffsetDateTime;
use uuid::Uuid;

use super::cards_types::{Card, PlayedCard, Rank};
use super::ranking;
use super::rules;
use super::state::{
    ClearReason, GameState, PlayGroup, PlayerId, Seat, TableEvent, Tier,
};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

/// Result of playing cards, describing what state changes occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayOutcome {
    /// Tier awarded if this play emptied the hand.
    pub finished: Option<Tier>,
    /// Whether the ace effect cleared the pile.
    pub ace_cleared: bool,
    /// Seat passed over by the match-skip rule, for presentation.
    pub bypassed_seat: Option<Seat>,
    /// Pile reset detected while advancing, if any.
    pub pile_cleared: Option<ClearReason>,
    /// Whether this play completed the round (one active player left).
    pub round_complete: bool,
}

/// Result of skipping a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipOutcome {
    pub pile_cleared: Option<ClearReason>,
}

/// Preconditions shared by play and skip: the game is running, the caller
/// holds the current seat, is still in the round, has not passed on this
/// pile, and no card exchange is pending.
fn ensure_turn_action(state: &GameState, player_id: PlayerId) -> Result<(), DomainError> {
    if !state.started {
        return Err(DomainError::conflict(
            ConflictKind::GameNotStarted,
            "Game has not started",
        ));
    }
    let player = state.player(player_id)?;
    if player.seat != state.current_seat {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            "Not your turn",
        ));
    }
    if state.exchange_blocking() {
        return Err(DomainError::conflict(
            ConflictKind::ExchangeInProgress,
            "Card exchange must complete first",
        ));
    }
    if !player.finish.is_active() {
        return Err(DomainError::conflict(
            ConflictKind::AlreadyFinished,
            "Player already finished this round",
        ));
    }
    if player.skipped {
        return Err(DomainError::conflict(
            ConflictKind::AlreadySkipped,
            "Player already skipped this pile",
        ));
    }
    Ok(())
}

/// Play one or more cards from the current player's hand onto the pile.
///
/// On any validation failure the state is left untouched. On success the
/// cards move to the pile (stamped with fresh identity tokens), win and
/// pile effects resolve, and the turn advances per the rules.
pub fn play_cards(
    state: &mut GameState,
    player_id: PlayerId,
    indices: &[usize],
    wildcard_rank: Option<Rank>,
    now: OffsetDateTime,
) -> Result<PlayOutcome, DomainError> {
    ensure_turn_action(state, player_id)?;

    if indices.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::WrongCardCount,
            "No cards selected",
        ));
    }
    let mut sorted: Vec<usize> = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != indices.len() {
        return Err(DomainError::validation(
            ValidationKind::InvalidCardIndex,
            "Duplicate card index",
        ));
    }
    let hand_len = state.player(player_id)?.hand.len();
    if sorted.last().is_some_and(|&max| max >= hand_len) {
        return Err(DomainError::validation(
            ValidationKind::InvalidCardIndex,
            format!("Index outside hand of {hand_len}"),
        ));
    }
    let pile_was_empty = state.pile.is_empty();
    if !pile_was_empty && sorted.len() != state.required_count {
        return Err(DomainError::validation(
            ValidationKind::WrongCardCount,
            format!("Must play exactly {} card(s)", state.required_count),
        ));
    }

    let selected: Vec<Card> = {
        let hand = &state.player(player_id)?.hand;
        sorted.iter().map(|&i| hand[i]).collect()
    };
    let check = rules::validate_play(&selected, state.pile_top_rank(), wildcard_rank)?;

    // Validation passed: remove by descending index (so removals cannot
    // shift pending ones) and stamp each card's play identity.
    let seat = state.player(player_id)?.seat;
    let mut played: Vec<PlayedCard> = Vec::with_capacity(sorted.len());
    {
        let hand = &mut state.player_mut(player_id)?.hand;
        for &idx in sorted.iter().rev() {
            let card = hand.remove(idx);
            played.push(PlayedCard {
                assigned: if card.is_wildcard() { wildcard_rank } else { None },
                card,
                play_id: Uuid::new_v4(),
            });
        }
    }
    played.reverse();

    let prev_rank = state.pile_top_rank();
    state.pile.push(PlayGroup {
        owner: seat,
        cards: played,
    });
    if pile_was_empty {
        state.required_count = sorted.len();
    }
    state.last_pile_owner = Some(seat);
    state.last_pile_len = state.pile.len();
    state.last_event = Some(TableEvent::Played {
        seat,
        count: sorted.len(),
        rank: check.effective,
        raw_wildcards: check.raw_wildcards,
    });

    let mut outcome = PlayOutcome {
        finished: None,
        ace_cleared: false,
        bypassed_seat: None,
        pile_cleared: None,
        round_complete: false,
    };

    if state.player(player_id)?.hand.is_empty() {
        let tier = ranking::record_finish(state, player_id)?;
        outcome.finished = Some(tier);
        state.last_event = Some(TableEvent::PlayerFinished {
            player: player_id,
            tier,
        });

        // The last player standing takes the final tier automatically.
        let remaining: Vec<PlayerId> = state.active_players().map(|p| p.id).collect();
        if remaining.len() == 1 {
            ranking::record_finish(state, remaining[0])?;
            state.game_over = true;
            state.winner = state.finishing_order.first().copied();
            outcome.round_complete = true;
        }
        ranking::assign_roles(state);
    }

    // Ace effect: the pile closes and the same seat leads the fresh one,
    // unless this very play retired the seat.
    if check.effective == Rank::Ace {
        state.clear_pile(ClearReason::AcePlayed);
        outcome.ace_cleared = true;
        if state.player(player_id)?.finish.is_active() {
            state.turn_started_at = Some(now);
        } else {
            outcome.pile_cleared = advance_turn(state, now);
        }
        return Ok(outcome);
    }

    // Match-skip: equal effective rank to the group beneath bypasses a seat.
    if prev_rank == Some(check.effective) {
        let first = advance_turn(state, now);
        outcome.bypassed_seat = Some(state.current_seat);
        state.last_event = Some(TableEvent::SeatBypassed {
            seat: state.current_seat,
        });
        let second = advance_turn(state, now);
        outcome.pile_cleared = second.or(first);
        return Ok(outcome);
    }

    outcome.pile_cleared = advance_turn(state, now);
    Ok(outcome)
}

/// Pass on the current pile: the player sits out until it clears.
pub fn skip_turn(
    state: &mut GameState,
    player_id: PlayerId,
    now: OffsetDateTime,
) -> Result<SkipOutcome, DomainError> {
    ensure_turn_action(state, player_id)?;

    let seat = state.player(player_id)?.seat;
    state.player_mut(player_id)?.skipped = true;
    state.last_event = Some(TableEvent::TurnPassed { seat });

    let pile_cleared = advance_turn(state, now);
    Ok(SkipOutcome { pile_cleared })
}

fn next_eligible_seat(state: &GameState) -> Option<Seat> {
    state.seating.next_eligible(state.current_seat, |id| {
        state
            .players
            .get(&id)
            .is_some_and(|p| p.finish.is_active() && !p.skipped)
    })
}

/// Move the turn to the next eligible seat, then run pile-reset detection.
///
/// Returns the reason if the pile was cleared along the way. With at most
/// one active player left, no advance happens and the clock just restarts.
pub fn advance_turn(state: &mut GameState, now: OffsetDateTime) -> Option<ClearReason> {
    let mut cleared = None;

    // Every remaining hand has passed on this pile: fresh pile first, so the
    // advance below lands in a clean round.
    if state.active_count() > 0 && state.active_players().all(|p| p.skipped) {
        state.clear_pile(ClearReason::AllSkipped);
        cleared = Some(ClearReason::AllSkipped);
    }

    let next = match next_eligible_seat(state) {
        Some(seat) => seat,
        None => {
            // Everyone eligible is flagged; reset and scan once more.
            for p in state.players.values_mut() {
                if p.finish.is_active() {
                    p.skipped = false;
                }
            }
            match next_eligible_seat(state) {
                Some(seat) => seat,
                None => {
                    state.turn_started_at = Some(now);
                    return cleared;
                }
            }
        }
    };

    state.current_seat = next;
    state.turn_started_at = Some(now);

    // Full revolution with no new play: the pile owner starts a fresh pile
    // and keeps the turn.
    if cleared.is_none()
        && !state.pile.is_empty()
        && state.last_pile_owner == Some(next)
        && state.pile.len() == state.last_pile_len
    {
        state.clear_pile(ClearReason::RoundReturned);
        cleared = Some(ClearReason::RoundReturned);
    }

    cleared
}
