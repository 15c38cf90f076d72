//! Commands exposed to the front end.

pub mod game;
pub mod progress;

use matchroom_core::{GameError, RejectReason};
use std::sync::{Mutex, MutexGuard};

pub use game::{
    back_to_theme_select, clear_board, continue_to_next_level, get_game_state,
    get_match_history, pair_cards, place_card, refresh_pools, start_level, withdraw_card,
};
pub use progress::{get_progress, get_theme, list_themes};

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CommandError {
    pub message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<crate::db::DbError> for CommandError {
    fn from(e: crate::db::DbError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<GameError> for CommandError {
    fn from(e: GameError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<RejectReason> for CommandError {
    fn from(reason: RejectReason) -> Self {
        let message = match reason {
            RejectReason::FixedPool => "pools cannot be regenerated in fixed mode",
            RejectReason::UnknownRow => "no such row",
            RejectReason::UnknownCard => "no such card",
            RejectReason::SideMismatch => "card belongs to the other side",
            RejectReason::SlotOccupied => "slot already holds a card",
            RejectReason::NotInPool => "card is not in its pool",
        };
        Self::new(message)
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, CommandError> {
    mutex
        .lock()
        .map_err(|_| CommandError::new("application state is poisoned"))
}
