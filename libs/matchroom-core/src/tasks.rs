//! Per-color task targets shown next to the board.
//!
//! A task is finished once its color bucket reaches the target. Finished task
//! ids are kept in completion order until the board is cleared.

use crate::scoring::ScoreBuckets;
use crate::types::CardColor;
use serde::{Deserialize, Serialize};

pub type TaskId = u32;

/// A score goal on one color bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub requirement: String,
    pub score_key: CardColor,
    pub target: u32,
}

impl Task {
    pub fn new(id: TaskId, requirement: impl Into<String>, score_key: CardColor, target: u32) -> Self {
        Self {
            id,
            requirement: requirement.into(),
            score_key,
            target,
        }
    }

    /// Bucket value counted toward this task, capped at the target.
    pub fn current(&self, scores: &ScoreBuckets) -> u32 {
        scores.get(self.score_key).min(self.target)
    }

    pub fn is_reached(&self, scores: &ScoreBuckets) -> bool {
        scores.get(self.score_key) >= self.target
    }
}

/// A task together with its state, for front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskProgress {
    pub id: TaskId,
    pub requirement: String,
    pub score_key: CardColor,
    pub target: u32,
    pub current: u32,
    pub completed: bool,
}

/// One task per scoring color.
pub fn default_tasks() -> Vec<Task> {
    vec![
        Task::new(1, "匹配红色卡片", CardColor::Red, 3),
        Task::new(2, "匹配黄色卡片", CardColor::Yellow, 3),
        Task::new(3, "匹配绿色卡片", CardColor::Green, 3),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn current_is_capped_at_target() {
        let task = Task::new(1, "red", CardColor::Red, 3);
        let scores = ScoreBuckets {
            red: 5,
            yellow: 0,
            green: 1,
        };
        assert_eq!(task.current(&scores), 3);
        assert!(task.is_reached(&scores));

        let green = Task::new(2, "green", CardColor::Green, 3);
        assert_eq!(green.current(&scores), 1);
        assert!(!green.is_reached(&scores));
    }

    #[test]
    fn default_tasks_cover_every_color() {
        let keys: Vec<CardColor> = default_tasks().iter().map(|task| task.score_key).collect();
        assert_eq!(keys, CardColor::ALL.to_vec());
    }
}
