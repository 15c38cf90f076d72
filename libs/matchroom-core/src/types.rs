//! Core types for the matching game.

use crate::error::{GameError, Result};
use crate::tasks::{default_tasks, Task};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Session-unique card identifier.
pub type CardId = u64;

/// Which pool a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "left" | "l" => Some(Self::Left),
            "right" | "r" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Canonical card colors. Every color is also a scoring bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardColor {
    Red,
    Yellow,
    Green,
}

impl CardColor {
    /// The full palette the generator draws from.
    pub const ALL: [CardColor; 3] = [Self::Red, Self::Yellow, Self::Green];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
        }
    }
}

/// A matchable card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub side: Side,
    pub color: CardColor,
    /// Expression text shown to the player, e.g. `3 + 4`.
    pub label: String,
    /// Cached evaluation of `label`.
    pub value: i64,
}

/// Pool replenishment policy of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Pools never regrow; every match shrinks both sides by one.
    Fixed,
    /// Each consumed card is replaced by a freshly generated one.
    Refresh,
    /// Same pool mechanics as `Refresh`, without a completion target.
    Infinite,
}

impl Default for GameMode {
    fn default() -> Self {
        Self::Fixed
    }
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Refresh => "refresh",
            Self::Infinite => "infinite",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "fixed" => Some(Self::Fixed),
            "refresh" => Some(Self::Refresh),
            "infinite" => Some(Self::Infinite),
            _ => None,
        }
    }

    /// Player-facing mode name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Fixed => "固定模式",
            Self::Refresh => "循环模式",
            Self::Infinite => "无限模式",
        }
    }

    /// Whether consumed cards are replaced.
    pub fn replenishes(&self) -> bool {
        !matches!(self, Self::Fixed)
    }
}

/// Difficulty tier of a level. Controls operand bounds and result ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    /// Tier for a 1-based level id.
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=3 => Self::Easy,
            4..=6 => Self::Medium,
            7..=8 => Self::Hard,
            _ => Self::Expert,
        }
    }

    /// Largest operand (and result) an expression may use.
    pub fn operand_bound(&self) -> i64 {
        match self {
            Self::Easy => 10,
            Self::Medium => 20,
            Self::Hard => 50,
            Self::Expert => 100,
        }
    }

    /// Smallest result a generated pair may evaluate to.
    pub fn min_result(&self) -> i64 {
        match self {
            Self::Easy => 0,
            Self::Medium => 5,
            Self::Hard => 10,
            Self::Expert => 20,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Easy => "简单",
            Self::Medium => "中等",
            Self::Hard => "困难",
            Self::Expert => "专家",
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Pairs generated at level start and on pool regeneration.
    pub pair_count: usize,
    /// Number of slot rows on the matching surface.
    pub row_count: usize,
    /// Maximum gap between two matches for the combo to continue.
    pub combo_window_ms: i64,
    /// Cosmetic loading delay after (re)generation.
    pub loading_delay_ms: i64,
    /// First card id handed out in a session.
    pub id_seed: u64,
    /// Color goals tracked alongside the score.
    pub tasks: Vec<Task>,
}

/// Largest accepted `pair_count`.
pub const MAX_PAIR_COUNT: usize = 100;
/// Largest accepted `row_count`.
pub const MAX_ROW_COUNT: usize = 20;
/// Upper bound for `combo_window_ms` and `loading_delay_ms`.
pub const MAX_DELAY_MS: i64 = 60_000;

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pair_count: 12,
            row_count: 5,
            combo_window_ms: 3000,
            loading_delay_ms: 500,
            id_seed: 2000,
            tasks: default_tasks(),
        }
    }
}

impl GameConfig {
    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(GameError::InvalidConfig(reason));

        if !(1..=MAX_PAIR_COUNT).contains(&self.pair_count) {
            return invalid(format!("pair_count must be in 1..={MAX_PAIR_COUNT}, got {}", self.pair_count));
        }
        if !(1..=MAX_ROW_COUNT).contains(&self.row_count) {
            return invalid(format!("row_count must be in 1..={MAX_ROW_COUNT}, got {}", self.row_count));
        }
        if !(0..=MAX_DELAY_MS).contains(&self.combo_window_ms) {
            return invalid(format!(
                "combo_window_ms must be in 0..={MAX_DELAY_MS}, got {}",
                self.combo_window_ms
            ));
        }
        if !(0..=MAX_DELAY_MS).contains(&self.loading_delay_ms) {
            return invalid(format!(
                "loading_delay_ms must be in 0..={MAX_DELAY_MS}, got {}",
                self.loading_delay_ms
            ));
        }

        let mut ids = HashSet::new();
        for task in &self.tasks {
            if !ids.insert(task.id) {
                return invalid(format!("duplicate task id {}", task.id));
            }
            if task.target == 0 {
                return invalid(format!("task {} needs a target of at least 1", task.id));
            }
        }
        Ok(())
    }
}
