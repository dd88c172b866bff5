//! Engine configuration from environment variables.

use std::env;

use time::Duration;

use crate::domain::DeckSize;
use crate::errors::domain::DomainError;

/// Which timeout penalty a deployment applies to a seat whose clock lapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeoutPenalty {
    /// Flag the seat as skipped, exactly as a voluntary pass.
    #[default]
    Skip,
    /// Grant three random unused cards instead.
    GrantCards,
}

/// Engine tunables for one deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Per-seat turn clock.
    pub turn_timer: Duration,
    /// Deck size new rooms start with.
    pub default_deck_size: DeckSize,
    pub timeout_penalty: TimeoutPenalty,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            turn_timer: Duration::seconds(15),
            default_deck_size: DeckSize::One,
            timeout_penalty: TimeoutPenalty::Skip,
        }
    }
}

impl GameConfig {
    /// Build the configuration from environment variables, with defaults:
    ///
    /// - `TURN_TIMER_SECS` (default 15)
    /// - `DECK_SIZE` as a factor, one of 0.25/0.5/1/2/3 (default 1)
    /// - `TIMEOUT_PENALTY`, `skip` or `cards` (default skip)
    pub fn from_env() -> Result<Self, DomainError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("TURN_TIMER_SECS") {
            let secs: i64 = raw
                .parse()
                .map_err(|_| DomainError::config(format!("TURN_TIMER_SECS invalid: '{raw}'")))?;
            if secs <= 0 {
                return Err(DomainError::config(format!(
                    "TURN_TIMER_SECS must be positive, got {secs}"
                )));
            }
            config.turn_timer = Duration::seconds(secs);
        }

        if let Ok(raw) = env::var("DECK_SIZE") {
            let factor: f64 = raw
                .parse()
                .map_err(|_| DomainError::config(format!("DECK_SIZE invalid: '{raw}'")))?;
            config.default_deck_size = DeckSize::try_from_factor(factor)?;
        }

        if let Ok(raw) = env::var("TIMEOUT_PENALTY") {
            config.timeout_penalty = match raw.as_str() {
                "skip" => TimeoutPenalty::Skip,
                "cards" => TimeoutPenalty::GrantCards,
                other => {
                    return Err(DomainError::config(format!(
                        "TIMEOUT_PENALTY must be 'skip' or 'cards', got '{other}'"
                    )))
                }
            };
        }

        Ok(config)
    }

    /// A quiet configuration for tests: long clock, one deck, skip penalty.
    pub fn for_tests() -> Self {
        Self {
            turn_timer: Duration::seconds(600),
            ..Self::default()
        }
    }
}
