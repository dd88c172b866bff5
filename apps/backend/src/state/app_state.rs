use std::sync::Arc;

use crate::config::GameConfig;
use crate::state::registry::RoomRegistry;

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Live rooms, one lock per game instance.
    pub registry: Arc<RoomRegistry>,
    /// Engine tunables for this deployment.
    pub config: GameConfig,
}

impl AppState {
    pub fn new(config: GameConfig) -> Self {
        Self {
            registry: Arc::new(RoomRegistry::new()),
            config,
        }
    }

    /// Test state with a long turn clock so polls never force advances.
    pub fn for_tests() -> Self {
        Self::new(GameConfig::for_tests())
    }
}
