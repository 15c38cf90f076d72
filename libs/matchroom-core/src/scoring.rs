//! Color-bucketed scores, combo tracking, task completion and match history.

use crate::tasks::{Task, TaskId, TaskProgress};
use crate::types::{Card, CardColor};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One counter per scoring color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBuckets {
    pub red: u32,
    pub yellow: u32,
    pub green: u32,
}

impl ScoreBuckets {
    pub fn get(&self, color: CardColor) -> u32 {
        match color {
            CardColor::Red => self.red,
            CardColor::Yellow => self.yellow,
            CardColor::Green => self.green,
        }
    }

    fn increment(&mut self, color: CardColor) {
        match color {
            CardColor::Red => self.red += 1,
            CardColor::Yellow => self.yellow += 1,
            CardColor::Green => self.green += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.red + self.yellow + self.green
    }
}

/// A consumed pair, in the order it was matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub left: Card,
    pub right: Card,
    pub color: CardColor,
    pub matched_at: DateTime<Utc>,
}

/// Combo counters after a successful match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboUpdate {
    pub combo: u32,
    pub max_combo: u32,
}

/// Running score state of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTracker {
    scores: ScoreBuckets,
    combo: u32,
    max_combo: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_match_time: Option<DateTime<Utc>>,
    combo_effect: bool,
    history: Vec<MatchRecord>,
    combo_window_ms: i64,
    tasks: Vec<Task>,
    completed_tasks: Vec<TaskId>,
}

impl ScoreTracker {
    /// A negative window is treated as zero.
    pub fn new(combo_window_ms: i64) -> Self {
        Self {
            scores: ScoreBuckets::default(),
            combo: 0,
            max_combo: 0,
            last_match_time: None,
            combo_effect: false,
            history: Vec::new(),
            combo_window_ms: combo_window_ms.max(0),
            tasks: Vec::new(),
            completed_tasks: Vec::new(),
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    fn combo_window(&self) -> Duration {
        Duration::try_milliseconds(self.combo_window_ms).unwrap_or(Duration::MAX)
    }

    /// Credit a validated pair.
    ///
    /// The combo continues when the previous match happened within the window,
    /// otherwise it restarts at 1. Failed pairings are never reported here.
    pub fn record_successful_match(
        &mut self,
        left: Card,
        right: Card,
        color: CardColor,
        now: DateTime<Utc>,
    ) -> ComboUpdate {
        let within_window = self
            .last_match_time
            .map(|last| now.signed_duration_since(last) <= self.combo_window())
            .unwrap_or(false);

        self.combo = if self.combo > 0 && within_window {
            self.combo + 1
        } else {
            1
        };
        self.max_combo = self.max_combo.max(self.combo);
        self.combo_effect = self.combo > 1;
        self.last_match_time = Some(now);

        self.scores.increment(color);
        self.history.push(MatchRecord {
            left,
            right,
            color,
            matched_at: now,
        });
        self.update_tasks();

        tracing::debug!(
            combo = self.combo,
            max_combo = self.max_combo,
            color = color.as_str(),
            "match recorded"
        );

        ComboUpdate {
            combo: self.combo,
            max_combo: self.max_combo,
        }
    }

    fn update_tasks(&mut self) {
        for task in &self.tasks {
            if task.is_reached(&self.scores) && !self.completed_tasks.contains(&task.id) {
                tracing::info!(task_id = task.id, color = task.score_key.as_str(), "task completed");
                self.completed_tasks.push(task.id);
            }
        }
    }

    /// Return combo state to zero. Scores are kept.
    pub fn reset_combo(&mut self) {
        self.combo = 0;
        self.max_combo = 0;
        self.combo_effect = false;
        self.last_match_time = None;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Forget finished tasks. Tasks whose bucket is still at target finish
    /// again on the next match.
    pub fn clear_completed_tasks(&mut self) {
        self.completed_tasks.clear();
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Ids of finished tasks in completion order.
    pub fn completed_tasks(&self) -> &[TaskId] {
        &self.completed_tasks
    }

    pub fn task_progress(&self) -> Vec<TaskProgress> {
        self.tasks
            .iter()
            .map(|task| TaskProgress {
                id: task.id,
                requirement: task.requirement.clone(),
                score_key: task.score_key,
                target: task.target,
                current: task.current(&self.scores),
                completed: self.completed_tasks.contains(&task.id),
            })
            .collect()
    }

    pub fn scores(&self) -> ScoreBuckets {
        self.scores
    }

    pub fn total(&self) -> u32 {
        self.scores.total()
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn combo_effect(&self) -> bool {
        self.combo_effect
    }

    pub fn last_match_time(&self) -> Option<DateTime<Utc>> {
        self.last_match_time
    }

    pub fn history(&self) -> &[MatchRecord] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn card(id: u64, side: Side) -> Card {
        Card {
            id,
            side,
            color: CardColor::Red,
            label: "7".to_string(),
            value: 7,
        }
    }

    fn record(tracker: &mut ScoreTracker, color: CardColor, at: DateTime<Utc>) -> ComboUpdate {
        tracker.record_successful_match(card(1, Side::Left), card(2, Side::Right), color, at)
    }

    #[test]
    fn first_match_starts_combo_at_one() {
        let mut tracker = ScoreTracker::new(3000);
        let update = record(&mut tracker, CardColor::Red, t0());
        assert_eq!(update, ComboUpdate { combo: 1, max_combo: 1 });
        assert!(!tracker.combo_effect());
    }

    #[test]
    fn match_within_window_extends_combo() {
        let mut tracker = ScoreTracker::new(3000);
        record(&mut tracker, CardColor::Red, t0());
        let update = record(&mut tracker, CardColor::Green, t0() + Duration::milliseconds(3000));
        assert_eq!(update, ComboUpdate { combo: 2, max_combo: 2 });
        assert!(tracker.combo_effect());
    }

    #[test]
    fn match_after_window_resets_combo_but_keeps_max() {
        let mut tracker = ScoreTracker::new(3000);
        record(&mut tracker, CardColor::Red, t0());
        record(&mut tracker, CardColor::Red, t0() + Duration::seconds(1));
        let update = record(&mut tracker, CardColor::Red, t0() + Duration::seconds(10));
        assert_eq!(update, ComboUpdate { combo: 1, max_combo: 2 });
    }

    #[test]
    fn each_match_adds_exactly_one_point() {
        let mut tracker = ScoreTracker::new(3000);
        record(&mut tracker, CardColor::Red, t0());
        record(&mut tracker, CardColor::Yellow, t0());
        record(&mut tracker, CardColor::Yellow, t0());
        assert_eq!(
            tracker.scores(),
            ScoreBuckets {
                red: 1,
                yellow: 2,
                green: 0
            }
        );
        assert_eq!(tracker.total(), 3);
        assert_eq!(tracker.history().len(), 3);
    }

    #[test]
    fn reset_combo_keeps_scores() {
        let mut tracker = ScoreTracker::new(3000);
        record(&mut tracker, CardColor::Red, t0());
        record(&mut tracker, CardColor::Red, t0());
        tracker.reset_combo();
        assert_eq!(tracker.combo(), 0);
        assert_eq!(tracker.max_combo(), 0);
        assert_eq!(tracker.last_match_time(), None);
        assert_eq!(tracker.scores().red, 2);

        let update = record(&mut tracker, CardColor::Red, t0());
        assert_eq!(update.combo, 1);
    }

    #[test]
    fn max_combo_never_below_combo() {
        let mut tracker = ScoreTracker::new(500);
        let offsets = [0, 100, 200, 2000, 2100, 9000, 9100, 9200, 9300];
        let mut previous_max = 0;
        for ms in offsets {
            let update = record(&mut tracker, CardColor::Green, t0() + Duration::milliseconds(ms));
            assert!(update.max_combo >= update.combo);
            assert!(update.max_combo >= previous_max);
            previous_max = update.max_combo;
        }
        assert_eq!(previous_max, 4);
    }

    #[test]
    fn tasks_complete_when_bucket_reaches_target() {
        let mut tracker = ScoreTracker::new(3000).with_tasks(vec![
            Task::new(1, "red", CardColor::Red, 2),
            Task::new(2, "green", CardColor::Green, 1),
        ]);
        record(&mut tracker, CardColor::Red, t0());
        assert!(tracker.completed_tasks().is_empty());

        record(&mut tracker, CardColor::Green, t0());
        record(&mut tracker, CardColor::Red, t0());
        record(&mut tracker, CardColor::Red, t0());
        assert_eq!(tracker.completed_tasks(), &[2, 1]);

        let progress = tracker.task_progress();
        assert_eq!(progress[0].current, 2);
        assert!(progress[0].completed);
        assert_eq!(progress[1].current, 1);
    }

    #[test]
    fn cleared_tasks_finish_again_on_next_match() {
        let mut tracker =
            ScoreTracker::new(3000).with_tasks(vec![Task::new(7, "yellow", CardColor::Yellow, 1)]);
        record(&mut tracker, CardColor::Yellow, t0());
        assert_eq!(tracker.completed_tasks(), &[7]);

        tracker.clear_completed_tasks();
        assert!(tracker.completed_tasks().is_empty());
        assert!(!tracker.task_progress()[0].completed);
        assert_eq!(tracker.task_progress()[0].current, 1);

        record(&mut tracker, CardColor::Red, t0());
        assert_eq!(tracker.completed_tasks(), &[7]);
    }

    #[test]
    fn extreme_windows_do_not_panic() {
        let mut tracker = ScoreTracker::new(i64::MIN);
        record(&mut tracker, CardColor::Red, t0());
        let update = record(&mut tracker, CardColor::Red, t0());
        assert_eq!(update.combo, 2);
        let update = record(&mut tracker, CardColor::Red, t0() + Duration::milliseconds(1));
        assert_eq!(update.combo, 1);

        let mut tracker = ScoreTracker::new(i64::MAX);
        record(&mut tracker, CardColor::Red, t0());
        let update = record(&mut tracker, CardColor::Red, t0() + Duration::days(3650));
        assert_eq!(update.combo, 2);
    }
}
