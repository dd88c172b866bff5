//! Keyed room registry: one shared game aggregate per room id, each behind
//! its own lock.
//!
//! Every action acquires its room's write lock for the duration of the full
//! read-modify-write cycle, including any pile-reset and role-recompute side
//! effects it triggers. Polls also take the write lock: a poll may fire the
//! turn-timeout check and consumes the one-shot forced-advance marker.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::domain::{DeckSize, GameState};
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::utils::room_code::generate_room_code;

/// Opaque room identifier (a Crockford-Base32 code).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

pub type RoomHandle = Arc<RwLock<GameState>>;

/// Registry of live rooms.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomId, RoomHandle>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh room and return its id.
    pub fn create(&self, deck_size: DeckSize) -> RoomId {
        let id = RoomId(generate_room_code());
        self.rooms
            .insert(id.clone(), Arc::new(RwLock::new(GameState::new(deck_size))));
        id
    }

    /// Register a restored room under a known id (snapshot load path).
    pub fn insert(&self, id: RoomId, state: GameState) -> RoomHandle {
        let handle = Arc::new(RwLock::new(state));
        self.rooms.insert(id, handle.clone());
        handle
    }

    /// Handle to a room's aggregate. Lock scope is up to the caller.
    pub fn room(&self, id: &RoomId) -> Result<RoomHandle, DomainError> {
        self.rooms
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Room, format!("Room {id}")))
    }

    pub fn remove(&self, id: &RoomId) -> bool {
        self.rooms.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
