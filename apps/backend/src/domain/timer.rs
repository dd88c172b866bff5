//! Turn clock and timeout-driven forced advancement.

use rand::seq::SliceRandom;
use rand::RngCore;
use time::{Duration, OffsetDateTime};

use super::dealing::unused_cards;
use super::state::{GameState, Seat, TableEvent};
use super::tricks::advance_turn;

/// Cards granted by the penalty-card timeout policy.
pub const PENALTY_CARD_COUNT: usize = 3;

/// What happens to a seat that runs out its turn clock, before the forced
/// advance. Both observed variants ship; config picks one per deployment.
pub trait TimeoutPolicy {
    fn apply(&self, state: &mut GameState, seat: Seat, rng: &mut dyn RngCore);
}

/// Flag the seat as skipped, exactly as a voluntary pass would.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipOnTimeout;

impl TimeoutPolicy for SkipOnTimeout {
    fn apply(&self, state: &mut GameState, seat: Seat, _rng: &mut dyn RngCore) {
        if let Some(id) = state.seating.occupant(seat) {
            if let Some(p) = state.players.get_mut(&id) {
                p.skipped = true;
            }
        }
    }
}

/// Grant random cards from the unused remainder of the deck instead of
/// skipping. When fewer than `count` cards remain unused, nothing is granted.
#[derive(Debug, Clone, Copy)]
pub struct PenaltyCardsOnTimeout {
    pub count: usize,
}

impl Default for PenaltyCardsOnTimeout {
    fn default() -> Self {
        Self {
            count: PENALTY_CARD_COUNT,
        }
    }
}

impl TimeoutPolicy for PenaltyCardsOnTimeout {
    fn apply(&self, state: &mut GameState, seat: Seat, rng: &mut dyn RngCore) {
        let Some(id) = state.seating.occupant(seat) else {
            return;
        };
        let mut pool = unused_cards(state);
        if pool.len() < self.count {
            return;
        }
        pool.shuffle(rng);
        pool.truncate(self.count);

        state.cards_dealt += pool.len();
        if let Some(p) = state.players.get_mut(&id) {
            p.hand.extend(pool);
            p.hand.sort();
        }
    }
}

/// Remaining turn time, for the poll view.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct TimerView {
    pub duration_secs: f64,
    pub remaining_secs: f64,
    pub percentage: f64,
}

/// The turn clock, if one is currently running.
///
/// The clock runs while the game is live and no card exchange is pending.
pub fn remaining(state: &GameState, now: OffsetDateTime, duration: Duration) -> Option<TimerView> {
    if !state.started || state.game_over || state.exchange_blocking() {
        return None;
    }
    let start = state.turn_started_at?;
    let duration_secs = duration.as_seconds_f64();
    if duration_secs <= 0.0 {
        return None;
    }
    let elapsed = (now - start).as_seconds_f64();
    let remaining_secs = (duration_secs - elapsed).max(0.0);
    Some(TimerView {
        duration_secs,
        remaining_secs,
        percentage: remaining_secs / duration_secs * 100.0,
    })
}

/// Check the current seat's deadline; on expiry apply the timeout policy and
/// advance the turn exactly once.
///
/// Idempotent per deadline: forcing the advance re-stamps the clock, so
/// re-checking the same deadline cannot advance again. Returns the seat that
/// was forced, if any.
pub fn check_timeout(
    state: &mut GameState,
    now: OffsetDateTime,
    duration: Duration,
    policy: &dyn TimeoutPolicy,
    rng: &mut dyn RngCore,
) -> Option<Seat> {
    if !state.started || state.game_over || state.exchange_blocking() {
        return None;
    }
    let start = state.turn_started_at?;
    if now - start < duration {
        return None;
    }

    let seat = state.current_seat;
    let occupant = state.seating.occupant(seat)?;
    let still_up = state
        .players
        .get(&occupant)
        .is_some_and(|p| p.finish.is_active() && !p.skipped);
    if !still_up {
        // Nothing to force; restart the clock so the stale deadline is consumed.
        state.turn_started_at = Some(now);
        return None;
    }

    policy.apply(state, seat, rng);
    state.forced_seat = Some(seat);
    state.last_event = Some(TableEvent::TurnForced { seat });
    advance_turn(state, now);
    Some(seat)
}
