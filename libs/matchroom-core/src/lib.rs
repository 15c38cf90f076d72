//! Level generation and matching engine for the arithmetic matching game.
//!
//! Provides:
//! - Expression generation constrained to a target result
//! - Level generation of value-matched left/right card pools
//! - Pair validation (same value AND same color)
//! - Combo and color-bucketed scoring with per-color tasks
//! - Card pools and slot rows with per-mode replenishment
//! - Persisted per-theme level progress and unlocking

pub mod board;
pub mod catalog;
pub mod error;
pub mod expression;
pub mod generator;
pub mod matching;
pub mod progress;
pub mod scoring;
pub mod session;
pub mod tasks;
pub mod types;

pub use board::{Board, BoardRng, CardLocation, PlaceOutcome, RejectReason, ResolvedMatch, SlotRow};
pub use catalog::{create_themes, find_theme, Level, Theme};
pub use error::{GameError, Result};
pub use expression::{evaluate_label, Expression, Operator};
pub use generator::{
    generate_level, generate_new_card, generate_value_label, CardIdGenerator, GeneratedLevel,
    LevelRules, OperatorSet,
};
pub use matching::{evaluate_match, MatchVerdict};
pub use progress::{GameProgress, KeyValueStore, MemoryStore, ProgressRecorder, ProgressStore};
pub use scoring::{ComboUpdate, MatchRecord, ScoreBuckets, ScoreTracker};
pub use session::{ActionReport, GameSession, NavigationIntent, SessionSnapshot};
pub use tasks::{default_tasks, Task, TaskId, TaskProgress};
pub use types::{Card, CardColor, CardId, Difficulty, GameConfig, GameMode, Side};
