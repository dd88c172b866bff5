//! Seat ring: the fixed clockwise ordering of table positions.
//!
//! Seat numbers are screen positions, so the clockwise turn order is a fixed
//! permutation of them, independent of join order. All turn advancement and
//! dealing iterates seats through [`CANONICAL_ORDER`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::state::{PlayerId, Seat};

pub const MAX_SEATS: usize = 12;

/// Clockwise traversal of the twelve table positions, starting at the bottom
/// seat. Positions 0-3 are the cardinal spots, 4-7 the diagonals, 8-11 the
/// overflow ring.
pub const CANONICAL_ORDER: [Seat; MAX_SEATS] = [0, 2, 3, 1, 4, 6, 7, 5, 8, 9, 10, 11];

/// Seat occupancy for one room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatingRing {
    occupancy: HashMap<Seat, PlayerId>,
}

impl SeatingRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.occupancy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.occupancy.len() >= MAX_SEATS
    }

    pub fn occupant(&self, seat: Seat) -> Option<PlayerId> {
        self.occupancy.get(&seat).copied()
    }

    /// Claim the first free seat in canonical order.
    pub fn claim_seat(&mut self, player: PlayerId) -> Option<Seat> {
        let seat = CANONICAL_ORDER
            .into_iter()
            .find(|s| !self.occupancy.contains_key(s))?;
        self.occupancy.insert(seat, player);
        Some(seat)
    }

    /// Seat a player at an explicit position (snapshot restore).
    pub fn seat_at(&mut self, seat: Seat, player: PlayerId) {
        self.occupancy.insert(seat, player);
    }

    pub fn release(&mut self, seat: Seat) -> Option<PlayerId> {
        self.occupancy.remove(&seat)
    }

    /// Occupied seats in canonical clockwise order.
    pub fn occupied_in_order(&self) -> Vec<Seat> {
        CANONICAL_ORDER
            .into_iter()
            .filter(|s| self.occupancy.contains_key(s))
            .collect()
    }

    /// The seat that opens a round: first occupied position in canonical order.
    pub fn first_occupied(&self) -> Option<Seat> {
        CANONICAL_ORDER
            .into_iter()
            .find(|s| self.occupancy.contains_key(s))
    }

    /// Scan forward from `from` in canonical order, wrapping, for the first
    /// occupied seat whose occupant satisfies `eligible`. The scan covers a
    /// full revolution, so `from` itself is the last candidate considered.
    ///
    /// Returns None when no occupant qualifies; the caller decides whether to
    /// reset eligibility (clear skip flags) and retry.
    pub fn next_eligible<F>(&self, from: Seat, eligible: F) -> Option<Seat>
    where
        F: Fn(PlayerId) -> bool,
    {
        let start = CANONICAL_ORDER.iter().position(|&s| s == from)?;
        for step in 1..=MAX_SEATS {
            let seat = CANONICAL_ORDER[(start + step) % MAX_SEATS];
            if let Some(player) = self.occupant(seat) {
                if eligible(player) {
                    return Some(seat);
                }
            }
        }
        None
    }
}
