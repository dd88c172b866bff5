//! Deck construction for fractional and multi-deck games.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::cards_types::{Card, Rank, Suit};
use crate::errors::domain::DomainError;

/// How much of a standard deck (or how many of them) a room plays with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeckSize {
    /// One fixed suit only (13 cards).
    Quarter,
    /// Two fixed suits (26 cards).
    Half,
    #[default]
    One,
    Two,
    Three,
}

impl DeckSize {
    /// Parse the configuration factor. Accepts exactly 0.25, 0.5, 1, 2, 3.
    pub fn try_from_factor(factor: f64) -> Result<Self, DomainError> {
        match factor {
            f if f == 0.25 => Ok(DeckSize::Quarter),
            f if f == 0.5 => Ok(DeckSize::Half),
            f if f == 1.0 => Ok(DeckSize::One),
            f if f == 2.0 => Ok(DeckSize::Two),
            f if f == 3.0 => Ok(DeckSize::Three),
            other => Err(DomainError::config(format!(
                "Invalid deck size {other}. Valid options are 0.25, 0.5, 1, 2, 3"
            ))),
        }
    }

    pub fn as_factor(&self) -> f64 {
        match self {
            DeckSize::Quarter => 0.25,
            DeckSize::Half => 0.5,
            DeckSize::One => 1.0,
            DeckSize::Two => 2.0,
            DeckSize::Three => 3.0,
        }
    }

    pub fn card_count(&self) -> usize {
        match self {
            DeckSize::Quarter => 13,
            DeckSize::Half => 26,
            DeckSize::One => 52,
            DeckSize::Two => 104,
            DeckSize::Three => 156,
        }
    }
}

/// Build the deck for the given size, in standard order.
///
/// Fractional decks keep fixed suits (hearts, then hearts + diamonds) so the
/// composition does not depend on anything but the size parameter.
pub fn build_deck(size: DeckSize) -> Vec<Card> {
    let suits: &[Suit] = match size {
        DeckSize::Quarter => &[Suit::Hearts],
        DeckSize::Half => &[Suit::Hearts, Suit::Diamonds],
        _ => &Suit::ALL,
    };
    let copies = match size {
        DeckSize::Quarter | DeckSize::Half | DeckSize::One => 1,
        DeckSize::Two => 2,
        DeckSize::Three => 3,
    };

    let mut deck = Vec::with_capacity(size.card_count());
    for _ in 0..copies {
        for &suit in suits {
            for rank in Rank::ALL {
                deck.push(Card { suit, rank });
            }
        }
    }
    deck
}

/// Build and shuffle a deck deterministically from a seed.
pub fn shuffled_deck(size: DeckSize, seed: u64) -> Vec<Card> {
    let mut deck = build_deck(size);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    deck.shuffle(&mut rng);
    deck
}
