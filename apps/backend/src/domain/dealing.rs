//! Dealing and mid-round hand redistribution.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use super::cards_types::Card;
use super::deck::{build_deck, shuffled_deck, DeckSize};
use super::state::{GameState, Seat};
use crate::errors::domain::{DomainError, ValidationKind};

/// Minimum hand handed to a player joining a round in progress.
const MIN_JOINER_HAND: usize = 5;

/// Deal the entire deck evenly across the given seats, in the order given.
///
/// The last seat absorbs the remainder, so every card is dealt. Hands come
/// back sorted.
pub fn deal_hands(
    deck_size: DeckSize,
    seats: &[Seat],
    seed: u64,
) -> Result<Vec<(Seat, Vec<Card>)>, DomainError> {
    if seats.len() < 2 {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            "Need at least 2 players to deal",
        ));
    }

    let deck = shuffled_deck(deck_size, seed);
    let per_player = deck.len() / seats.len();

    let mut hands = Vec::with_capacity(seats.len());
    for (i, &seat) in seats.iter().enumerate() {
        let start = i * per_player;
        let end = if i == seats.len() - 1 {
            deck.len()
        } else {
            start + per_player
        };
        let mut hand = deck[start..end].to_vec();
        hand.sort();
        hands.push((seat, hand));
    }
    Ok(hands)
}

/// Cards of the room's deck not currently held or on the pile.
///
/// Multiset-aware: with multiple decks a card is only exhausted once every
/// copy is in play. Wildcard overrides do not change identity here.
pub fn unused_cards(state: &GameState) -> Vec<Card> {
    let mut counts: HashMap<Card, usize> = HashMap::new();
    for card in build_deck(state.deck_size) {
        *counts.entry(card).or_insert(0) += 1;
    }
    let in_play = state
        .players
        .values()
        .flat_map(|p| p.hand.iter().copied())
        .chain(state.pile.iter().flat_map(|g| g.cards.iter().map(|c| c.card)));
    for card in in_play {
        if let Some(n) = counts.get_mut(&card) {
            *n = n.saturating_sub(1);
        }
    }

    let mut unused = Vec::new();
    for (card, n) in counts {
        for _ in 0..n {
            unused.push(card);
        }
    }
    unused
}

/// Hand size for a player dealt into a round in progress: the average active
/// hand, floored at [`MIN_JOINER_HAND`].
fn joiner_hand_size(state: &GameState) -> usize {
    let mut total = 0usize;
    let mut holders = 0usize;
    for p in state.active_players() {
        if !p.hand.is_empty() {
            total += p.hand.len();
            holders += 1;
        }
    }
    if holders == 0 {
        return MIN_JOINER_HAND;
    }
    (total / holders).max(MIN_JOINER_HAND)
}

/// Deal a hand to any active, empty-handed player who has not finished
/// (a mid-round joiner, typically). Cards come from the unused remainder of
/// the room's deck so the card-conservation total stays meaningful.
///
/// Returns the player who received cards, if any.
pub fn redistribute<R: Rng + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
) -> Option<super::state::PlayerId> {
    let joiner = state
        .active_players()
        .find(|p| p.hand.is_empty() && !state.finishing_order.contains(&p.id))
        .map(|p| p.id)?;

    let wanted = joiner_hand_size(state);
    let mut pool = unused_cards(state);
    pool.shuffle(rng);
    pool.truncate(wanted);

    state.cards_dealt += pool.len();
    if let Some(p) = state.players.get_mut(&joiner) {
        p.hand = pool;
        p.hand.sort();
    }
    Some(joiner)
}
