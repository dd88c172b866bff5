//! Domain layer: pure game logic types and helpers.

pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod dealing;
pub mod deck;
pub mod exchange;
pub mod player_view;
pub mod ranking;
pub mod rules;
pub mod seating;
pub mod snapshot;
pub mod state;
pub mod timer;
pub mod tricks;


#[cfg(test)]
mod tests_exchange;
#[cfg(test)]
mod tests_tricks;

// Re-exports for ergonomics
pub use cards_parsing::try_parse_cards;
pub use cards_types::{Card, PlayedCard, Rank, Suit, WILDCARD_RANK};
pub use deck::{build_deck, DeckSize};
pub use state::{FinishStatus, GameState, Player, PlayerId, Role, Seat, Tier};
