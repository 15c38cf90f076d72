//! Database error types.

use matchroom_core::GameError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DbError> for GameError {
    fn from(e: DbError) -> Self {
        GameError::Storage(e.to_string())
    }
}
