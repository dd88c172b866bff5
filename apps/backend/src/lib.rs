#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod errors;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use config::{GameConfig, TimeoutPenalty};
pub use domain::{Card, DeckSize, FinishStatus, GameState, PlayerId, Rank, Role, Suit, Tier};
pub use errors::{DomainError, ErrorCode};
pub use services::games::GameService;
pub use state::app_state::AppState;
pub use state::registry::{RoomId, RoomRegistry};

// Prelude for test convenience
pub mod prelude {
    pub use super::config::*;
    pub use super::errors::*;
    pub use super::services::games::*;
    pub use super::state::app_state::*;
    pub use super::state::registry::*;
}

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
