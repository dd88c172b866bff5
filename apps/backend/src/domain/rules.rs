//! Play legality: wildcard resolution and rank comparison.

use super::cards_types::{Card, Rank, WILDCARD_RANK};
use crate::errors::domain::{DomainError, ValidationKind};

/// Outcome of validating a selection: the rank the pile will compare against
/// and whether the play was a raw wildcard group (all wildcards, no override).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayCheck {
    pub effective: Rank,
    pub raw_wildcards: bool,
}

/// Decide legality of a proposed selection against the current pile top.
///
/// Rules, in order:
/// 1. Empty pile: always legal (the caller records the card-count requirement).
/// 2. All wildcards with no explicit rank: legal on anything, effective rank
///    stays at the wildcard's natural rank.
/// 3. Effective rank is the explicit override if given, else the single
///    natural rank shared by all non-wildcards; a selection spanning two
///    natural ranks, or an override contradicting them, is a rank mismatch.
/// 4. Non-empty pile: effective rank must be >= the pile top.
///
/// Pure: validating the same selection twice yields the same verdict.
pub fn validate_play(
    selected: &[Card],
    pile_top: Option<Rank>,
    assigned: Option<Rank>,
) -> Result<PlayCheck, DomainError> {
    if selected.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::WrongCardCount,
            "No cards selected",
        ));
    }

    let naturals: Vec<Rank> = selected
        .iter()
        .filter(|c| !c.is_wildcard())
        .map(|c| c.rank)
        .collect();

    if naturals.is_empty() && assigned.is_none() {
        return Ok(PlayCheck {
            effective: WILDCARD_RANK,
            raw_wildcards: true,
        });
    }

    if let Some((&first, rest)) = naturals.split_first() {
        if rest.iter().any(|&r| r != first) {
            return Err(DomainError::validation(
                ValidationKind::RankMismatch,
                "Selected cards must share one rank (wildcards adopt it)",
            ));
        }
        if assigned.is_some_and(|rank| rank != first) {
            return Err(DomainError::validation(
                ValidationKind::RankMismatch,
                "Assigned wildcard rank contradicts the selected cards",
            ));
        }
    }

    let effective = match assigned {
        Some(rank) => rank,
        None => naturals[0],
    };

    if let Some(top) = pile_top {
        if effective < top {
            return Err(DomainError::validation(
                ValidationKind::RankTooLow,
                "Must play equal or higher than the pile top",
            ));
        }
    }

    Ok(PlayCheck {
        effective,
        raw_wildcards: false,
    })
}

/// Hand indices a player could lead or follow with, one card at a time.
/// Used by the poll view; multi-card plays combine cards of one such rank.
pub fn playable_indices(hand: &[Card], pile_top: Option<Rank>) -> Vec<usize> {
    match pile_top {
        None => (0..hand.len()).collect(),
        Some(top) => hand
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_wildcard() || c.rank >= top)
            .map(|(i, _)| i)
            .collect(),
    }
}
