//! A single play-through of one level.

use crate::board::{Board, BoardRng, PlaceOutcome, RejectReason, SlotRow};
use crate::catalog::{Level, Theme};
use crate::error::Result;
use crate::progress::ProgressRecorder;
use crate::scoring::{MatchRecord, ScoreBuckets};
use crate::tasks::{TaskId, TaskProgress};
use crate::types::{Card, CardId, GameConfig, GameMode, Side};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Where the player should be taken next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum NavigationIntent {
    /// Start another level. `mode` is only set when the player overrode it.
    Level {
        theme_id: String,
        level_id: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        mode: Option<GameMode>,
    },
    ThemeSelect { theme_id: String },
}

/// Outcome of a player action together with completion state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionReport {
    pub outcome: PlaceOutcome,
    /// True only for the action that reached the target score.
    pub completed_level: bool,
}

/// Read-only view of a session for front ends.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub theme_id: String,
    pub level_id: u32,
    pub mode: GameMode,
    pub mode_display: String,
    pub left_pool: Vec<Card>,
    pub right_pool: Vec<Card>,
    pub rows: Vec<SlotRow>,
    pub scores: ScoreBuckets,
    pub total_matches: u32,
    pub target_score: Option<u32>,
    pub progress_percent: f64,
    pub combo: u32,
    pub max_combo: u32,
    pub combo_effect: bool,
    pub history_len: usize,
    pub tasks: Vec<TaskProgress>,
    pub completed_tasks: Vec<TaskId>,
    pub level_completed: bool,
    pub is_loading: bool,
}

/// Fresh deals tried before a fixed board with no possible pair is accepted.
const FIXED_DEAL_ATTEMPTS: usize = 16;

/// Board, scoring and completion tracking for one (theme, level) selection.
pub struct GameSession {
    theme: Theme,
    level: Level,
    mode: GameMode,
    mode_override: Option<GameMode>,
    target_score: Option<u32>,
    board: Board,
    loading_delay: Duration,
    loading_until: DateTime<Utc>,
    level_completed: bool,
}

impl GameSession {
    /// Generate pools for a level. `mode` overrides the level's own mode.
    pub fn start(
        theme: &Theme,
        level_id: u32,
        mode: Option<GameMode>,
        config: &GameConfig,
        rng: BoardRng,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        config.validate()?;
        let level = theme.level(level_id)?;
        let effective_mode = mode.unwrap_or(level.mode);
        let mut board = Board::new(theme.level_rules(level_id), effective_mode, config, rng);

        if effective_mode == GameMode::Fixed {
            let mut attempts = 1;
            while board.best_pairing().is_empty() && attempts < FIXED_DEAL_ATTEMPTS {
                board.deal();
                attempts += 1;
            }
        }

        tracing::info!(
            theme_id = %theme.id,
            level_id,
            mode = effective_mode.as_str(),
            pair_count = config.pair_count,
            "level started"
        );

        Self::with_board(theme, level_id, mode, board, config, now)
    }

    /// Wrap an already built board. The board's mode is authoritative.
    ///
    /// A fixed board never regrows, so its target is capped at the number of
    /// pairs its pools can form (at least 1).
    pub fn with_board(
        theme: &Theme,
        level_id: u32,
        mode_override: Option<GameMode>,
        board: Board,
        config: &GameConfig,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        config.validate()?;
        let level = theme.level(level_id)?.clone();
        let target_score = match board.mode() {
            GameMode::Infinite => None,
            GameMode::Refresh => Some(level.effective_target()),
            GameMode::Fixed => {
                let reachable = u32::try_from(board.best_pairing().len()).unwrap_or(u32::MAX);
                Some(level.effective_target().min(reachable.max(1)))
            }
        };
        let loading_delay = Duration::try_milliseconds(config.loading_delay_ms).unwrap_or_else(Duration::zero);
        Ok(Self {
            theme: theme.clone(),
            level,
            mode: board.mode(),
            mode_override,
            target_score,
            board,
            loading_delay,
            loading_until: delay_end(now, loading_delay),
            level_completed: false,
        })
    }

    /// Drop a card into a sub-slot.
    pub fn place(
        &mut self,
        card_id: CardId,
        row: usize,
        side: Side,
        now: DateTime<Utc>,
        progress: &mut dyn ProgressRecorder,
    ) -> ActionReport {
        let outcome = self.board.place(card_id, row, side, now);
        self.report(outcome, progress)
    }

    /// Drop a left pool card directly on a right pool card.
    pub fn pair_directly(
        &mut self,
        left_id: CardId,
        right_id: CardId,
        now: DateTime<Utc>,
        progress: &mut dyn ProgressRecorder,
    ) -> ActionReport {
        let outcome = self.board.pair_directly(left_id, right_id, now);
        self.report(outcome, progress)
    }

    pub fn withdraw(&mut self, row: usize, side: Side) -> Option<CardId> {
        self.board.withdraw(row, side)
    }

    /// Empty the rows and reset combo state and match history.
    pub fn clear(&mut self) {
        self.board.clear();
    }

    /// Regenerate both pools and restart the loading delay.
    pub fn regenerate_pools(&mut self, now: DateTime<Utc>) -> std::result::Result<(), RejectReason> {
        self.board.regenerate()?;
        self.loading_until = delay_end(now, self.loading_delay);
        Ok(())
    }

    fn report(&mut self, outcome: PlaceOutcome, progress: &mut dyn ProgressRecorder) -> ActionReport {
        let completed_level = outcome.is_match() && self.check_completion(progress);
        ActionReport {
            outcome,
            completed_level,
        }
    }

    /// Mark the level complete the first time the target is reached.
    fn check_completion(&mut self, progress: &mut dyn ProgressRecorder) -> bool {
        let Some(target) = self.target_score() else {
            return false;
        };
        if self.level_completed || self.total_matches() < target {
            return false;
        }

        self.level_completed = true;
        tracing::info!(
            theme_id = %self.theme.id,
            level_id = self.level.id,
            total = self.total_matches(),
            max_combo = self.board.tracker().max_combo(),
            "level completed"
        );

        let level_index = (self.level.id - 1) as usize;
        if let Err(err) = progress.update_progress(&self.theme.id, level_index, true) {
            tracing::warn!(%err, "failed to save progress");
        }
        true
    }

    /// Intent for the "next level" button. Past the last level of the theme
    /// this leads back to theme selection.
    pub fn continue_to_next_level(&self) -> NavigationIntent {
        let next = self.level.id + 1;
        if self.theme.has_level(next) {
            NavigationIntent::Level {
                theme_id: self.theme.id.clone(),
                level_id: next,
                mode: self.mode_override,
            }
        } else {
            self.back_to_theme_select()
        }
    }

    pub fn back_to_theme_select(&self) -> NavigationIntent {
        NavigationIntent::ThemeSelect {
            theme_id: self.theme.id.clone(),
        }
    }

    pub fn total_matches(&self) -> u32 {
        self.board.tracker().total()
    }

    /// Score that completes the level; `None` in infinite mode.
    pub fn target_score(&self) -> Option<u32> {
        self.target_score
    }

    pub fn progress_percent(&self) -> f64 {
        match self.target_score() {
            Some(target) if target > 0 => {
                (f64::from(self.total_matches()) / f64::from(target) * 100.0).min(100.0)
            }
            Some(_) => 100.0,
            None => 0.0,
        }
    }

    pub fn level_completed(&self) -> bool {
        self.level_completed
    }

    pub fn is_loading(&self, now: DateTime<Utc>) -> bool {
        now < self.loading_until
    }

    pub fn history(&self) -> &[MatchRecord] {
        self.board.tracker().history()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot {
        let tracker = self.board.tracker();
        SessionSnapshot {
            theme_id: self.theme.id.clone(),
            level_id: self.level.id,
            mode: self.mode,
            mode_display: self.mode.display_name().to_string(),
            left_pool: self.board.left_pool().to_vec(),
            right_pool: self.board.right_pool().to_vec(),
            rows: self.board.rows().to_vec(),
            scores: tracker.scores(),
            total_matches: tracker.total(),
            target_score: self.target_score(),
            progress_percent: self.progress_percent(),
            combo: tracker.combo(),
            max_combo: tracker.max_combo(),
            combo_effect: tracker.combo_effect(),
            history_len: tracker.history().len(),
            tasks: tracker.task_progress(),
            completed_tasks: tracker.completed_tasks().to_vec(),
            level_completed: self.level_completed,
            is_loading: self.is_loading(now),
        }
    }
}

fn delay_end(now: DateTime<Utc>, delay: Duration) -> DateTime<Utc> {
    now.checked_add_signed(delay).unwrap_or(DateTime::<Utc>::MAX_UTC)
}
