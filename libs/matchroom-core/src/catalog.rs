//! Built-in themes and their levels.

use crate::error::{GameError, Result};
use crate::generator::{LevelRules, OperatorSet};
use crate::progress::{is_completed, is_unlocked, GameProgress};
use crate::types::{Difficulty, GameMode};
use serde::{Deserialize, Serialize};

/// Levels per theme.
pub const LEVELS_PER_THEME: u32 = 10;

/// Target score of level `n` at index `n - 1`, used when a level has none.
pub const LEVEL_TARGETS: [u32; 10] = [8, 10, 12, 15, 18, 20, 25, 30, 35, 40];

const DEFAULT_TARGET: u32 = 8;

struct ThemeDef {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    color: &'static str,
    operators: OperatorSet,
}

const THEMES: [ThemeDef; 3] = [
    ThemeDef {
        id: "addition_subtraction",
        name: "加减法",
        description: "用加法和减法凑出相同的结果",
        icon: "➕",
        color: "#ff6b6b",
        operators: OperatorSet::AdditionSubtraction,
    },
    ThemeDef {
        id: "multiplication_division",
        name: "乘除法",
        description: "用乘法和整除凑出相同的结果",
        icon: "✖️",
        color: "#feca57",
        operators: OperatorSet::MultiplicationDivision,
    },
    ThemeDef {
        id: "mixed_operations",
        name: "四则运算",
        description: "加减乘除混合练习",
        icon: "🧮",
        color: "#1dd1a1",
        operators: OperatorSet::Mixed,
    },
];

/// A level as shown on the level-select screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub unlocked: bool,
    pub completed: bool,
    pub rules: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_score: Option<u32>,
    pub mode: GameMode,
}

impl Level {
    /// The level's own target, or the fallback table entry.
    pub fn effective_target(&self) -> u32 {
        self.target_score.unwrap_or_else(|| fallback_target(self.id))
    }
}

/// A theme with its levels resolved against saved progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub operators: OperatorSet,
    pub levels: Vec<Level>,
    pub total_levels: usize,
    pub completed_levels: usize,
}

impl Theme {
    pub fn level(&self, level_id: u32) -> Result<&Level> {
        self.levels
            .iter()
            .find(|level| level.id == level_id)
            .ok_or_else(|| GameError::UnknownLevel {
                theme: self.id.clone(),
                level: level_id,
            })
    }

    /// Numeric rules for generating a level of this theme.
    pub fn level_rules(&self, level_id: u32) -> LevelRules {
        LevelRules::for_level(level_id, self.operators)
    }

    pub fn has_level(&self, level_id: u32) -> bool {
        self.levels.iter().any(|level| level.id == level_id)
    }
}

/// Target score for a level id from the fallback table.
pub fn fallback_target(level_id: u32) -> u32 {
    level_id
        .checked_sub(1)
        .and_then(|index| LEVEL_TARGETS.get(index as usize))
        .copied()
        .unwrap_or(DEFAULT_TARGET)
}

/// Play mode a level uses unless the caller overrides it.
pub fn default_mode(level_id: u32) -> GameMode {
    match level_id {
        0..=3 => GameMode::Fixed,
        LEVELS_PER_THEME => GameMode::Infinite,
        _ => GameMode::Refresh,
    }
}

/// All themes with unlock and completion flags taken from `progress`.
pub fn create_themes(progress: &GameProgress) -> Vec<Theme> {
    THEMES.iter().map(|def| build_theme(def, progress)).collect()
}

/// One theme by id.
pub fn find_theme(theme_id: &str, progress: &GameProgress) -> Result<Theme> {
    THEMES
        .iter()
        .find(|def| def.id == theme_id)
        .map(|def| build_theme(def, progress))
        .ok_or_else(|| GameError::UnknownTheme(theme_id.to_string()))
}

fn build_theme(def: &ThemeDef, progress: &GameProgress) -> Theme {
    let flags = progress.get(def.id).map(Vec::as_slice).unwrap_or_default();
    let levels: Vec<Level> = (1..=LEVELS_PER_THEME)
        .map(|id| build_level(def, id, flags))
        .collect();
    let completed_levels = levels.iter().filter(|level| level.completed).count();

    Theme {
        id: def.id.to_string(),
        name: def.name.to_string(),
        description: def.description.to_string(),
        icon: def.icon.to_string(),
        color: def.color.to_string(),
        operators: def.operators,
        total_levels: levels.len(),
        completed_levels,
        levels,
    }
}

fn build_level(def: &ThemeDef, id: u32, flags: &[bool]) -> Level {
    let difficulty = Difficulty::for_level(id);
    let bound = difficulty.operand_bound();
    let mode = default_mode(id);

    let mut rules = vec![
        format!("所有算式的数字都在 {bound} 以内"),
        "计算结果相同且颜色相同才算配对成功".to_string(),
        "连续快速配对可以获得连击".to_string(),
    ];
    rules.push(match mode {
        GameMode::Fixed => "卡池不会补充，请珍惜每一张卡片".to_string(),
        GameMode::Refresh => "每次配对成功后卡池会补充新卡片".to_string(),
        GameMode::Infinite => "卡池无限补充，没有目标分数".to_string(),
    });

    Level {
        id,
        title: format!("{bound}以内{}", def.name),
        description: format!(
            "左右两侧均为{bound}以内的{}算式，只有同色且结果相同的配对才算成功。",
            def.name
        ),
        difficulty,
        unlocked: is_unlocked(flags, id),
        completed: is_completed(flags, id),
        rules,
        target_score: match mode {
            GameMode::Infinite => None,
            _ => Some(fallback_target(id)),
        },
        mode,
    }
}
