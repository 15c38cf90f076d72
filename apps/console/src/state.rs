//! Application state.

use crate::db::SqliteStore;
use matchroom_core::{BoardRng, GameConfig, GameSession, ProgressStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Mutex;

/// Global application state.
///
/// Commands that need both locks take `session` before `progress`.
pub struct AppState {
    pub progress: Mutex<ProgressStore<SqliteStore>>,
    pub session: Mutex<Option<GameSession>>,
    pub config: GameConfig,
    rng_seed: Option<u64>,
}

impl AppState {
    pub fn new(store: SqliteStore, config: GameConfig) -> Self {
        Self {
            progress: Mutex::new(ProgressStore::load(store)),
            session: Mutex::new(None),
            config,
            rng_seed: None,
        }
    }

    /// Make every generated level reproducible.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Random source for a new board.
    pub fn board_rng(&self) -> BoardRng {
        match self.rng_seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_os_rng()),
        }
    }
}
