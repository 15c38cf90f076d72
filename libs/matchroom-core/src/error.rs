//! Error types for matchroom-core.

use thiserror::Error;

/// Result type alias using GameError.
pub type Result<T> = std::result::Result<T, GameError>;

/// Errors raised by generation, catalog lookups and progress persistence.
///
/// Board actions never return these: invalid placements are reported as
/// rejected outcomes instead.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    #[error("unknown level {level} in theme {theme}")]
    UnknownLevel { theme: String, level: u32 },

    #[error("target {target} outside representable range 0..={bound}")]
    TargetOutOfRange { target: i64, bound: i64 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
