//! Per-theme level completion, persisted through a key-value store.
//!
//! The whole record lives under one key as JSON:
//! ```json
//! {"addition_subtraction": [true, true, false]}
//! ```
//! Index `n` holds the completion flag of level `n + 1`. Sparse arrays written
//! by older clients contain `null` holes; those read back as `false`.

use crate::error::{GameError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Storage key of the progress record.
pub const PROGRESS_KEY: &str = "matchingGameProgress";

/// Theme id to completion flags indexed by `level id - 1`.
pub type GameProgress = BTreeMap<String, Vec<bool>>;

/// Minimal string key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Receives level completion writes.
pub trait ProgressRecorder {
    fn update_progress(&mut self, theme_id: &str, level_index: usize, completed: bool) -> Result<()>;
}

/// In-process store, used by tests and hosts without persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(transparent)]
struct StoredProgress(BTreeMap<String, Vec<Option<bool>>>);

/// Progress record backed by a key-value store.
#[derive(Debug)]
pub struct ProgressStore<S> {
    store: S,
    progress: GameProgress,
}

impl<S: KeyValueStore> ProgressStore<S> {
    /// Load the record. Missing, unreadable or malformed data yields an empty
    /// record.
    pub fn load(store: S) -> Self {
        let progress = match store.get(PROGRESS_KEY) {
            Ok(Some(raw)) => parse_progress(&raw),
            Ok(None) => GameProgress::new(),
            Err(err) => {
                tracing::warn!(%err, "failed to read progress, starting fresh");
                GameProgress::new()
            }
        };
        Self { store, progress }
    }

    /// Completion flags of a theme; empty when the theme was never played.
    pub fn get_progress(&self, theme_id: &str) -> &[bool] {
        self.progress
            .get(theme_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn progress(&self) -> &GameProgress {
        &self.progress
    }

    pub fn is_level_completed(&self, theme_id: &str, level_id: u32) -> bool {
        is_completed(self.get_progress(theme_id), level_id)
    }

    pub fn is_level_unlocked(&self, theme_id: &str, level_id: u32) -> bool {
        is_unlocked(self.get_progress(theme_id), level_id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) -> Result<()> {
        let raw = serde_json::to_string(&self.progress)?;
        self.store.set(PROGRESS_KEY, &raw)
    }
}

impl<S: KeyValueStore> ProgressRecorder for ProgressStore<S> {
    /// Overwrite one flag, padding the theme's sequence with `false`, then
    /// persist. The in-memory record is updated even when the write fails.
    fn update_progress(&mut self, theme_id: &str, level_index: usize, completed: bool) -> Result<()> {
        let flags = self.progress.entry(theme_id.to_string()).or_default();
        if flags.len() <= level_index {
            flags.resize(level_index + 1, false);
        }
        flags[level_index] = completed;

        tracing::info!(theme_id, level_index, completed, "progress updated");
        self.persist()
    }
}

/// Level `n` is completed iff flag `n - 1` is set.
pub fn is_completed(flags: &[bool], level_id: u32) -> bool {
    level_id
        .checked_sub(1)
        .and_then(|index| flags.get(index as usize))
        .copied()
        .unwrap_or(false)
}

/// Level 1 is always unlocked; level `n` needs level `n - 1` completed.
pub fn is_unlocked(flags: &[bool], level_id: u32) -> bool {
    level_id <= 1 || is_completed(flags, level_id - 1)
}

fn parse_progress(raw: &str) -> GameProgress {
    match serde_json::from_str::<StoredProgress>(raw) {
        Ok(StoredProgress(stored)) => stored
            .into_iter()
            .map(|(theme, flags)| (theme, flags.into_iter().map(|f| f.unwrap_or(false)).collect()))
            .collect(),
        Err(err) => {
            tracing::warn!(error = %GameError::from(err), "malformed progress record ignored");
            GameProgress::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(GameError::Storage("disk unavailable".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(GameError::Storage("disk unavailable".to_string()))
        }
    }

    fn store_with(raw: &str) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.set(PROGRESS_KEY, raw).unwrap();
        store
    }

    #[test]
    fn missing_record_is_empty() {
        let progress = ProgressStore::load(MemoryStore::new());
        assert!(progress.get_progress("addition_subtraction").is_empty());
        assert!(progress.is_level_unlocked("addition_subtraction", 1));
        assert!(!progress.is_level_unlocked("addition_subtraction", 2));
    }

    #[test]
    fn malformed_record_falls_back_to_default() {
        let progress = ProgressStore::load(store_with("{not json"));
        assert!(progress.progress().is_empty());

        let progress = ProgressStore::load(store_with(r#"{"a": "yes"}"#));
        assert!(progress.progress().is_empty());
    }

    #[test]
    fn null_holes_read_as_false() {
        let progress = ProgressStore::load(store_with(r#"{"mixed_operations": [null, null, true]}"#));
        assert_eq!(progress.get_progress("mixed_operations"), &[false, false, true]);
        assert!(progress.is_level_unlocked("mixed_operations", 4));
        assert!(!progress.is_level_unlocked("mixed_operations", 3));
    }

    #[test]
    fn update_pads_and_persists() {
        let mut progress = ProgressStore::load(MemoryStore::new());
        progress.update_progress("addition_subtraction", 2, true).unwrap();
        assert_eq!(
            progress.get_progress("addition_subtraction"),
            &[false, false, true]
        );

        let raw = progress.store().get(PROGRESS_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"{"addition_subtraction":[false,false,true]}"#);

        let reloaded = ProgressStore::load(store_with(&raw));
        assert_eq!(reloaded.progress(), progress.progress());
    }

    #[test]
    fn update_is_idempotent() {
        let mut progress = ProgressStore::load(MemoryStore::new());
        progress.update_progress("t", 0, true).unwrap();
        progress.update_progress("t", 0, true).unwrap();
        assert_eq!(progress.get_progress("t"), &[true]);
    }

    #[test]
    fn unlock_follows_previous_level() {
        let mut progress = ProgressStore::load(MemoryStore::new());
        assert!(!progress.is_level_unlocked("t", 2));
        progress.update_progress("t", 0, true).unwrap();
        assert!(progress.is_level_unlocked("t", 2));
        assert!(!progress.is_level_unlocked("t", 3));
        assert!(progress.is_level_completed("t", 1));
        assert!(!progress.is_level_completed("t", 0));
    }

    #[test]
    fn failing_store_keeps_in_memory_record() {
        let mut progress = ProgressStore::load(FailingStore);
        assert!(progress.progress().is_empty());
        assert!(progress.update_progress("t", 0, true).is_err());
        assert!(progress.is_level_completed("t", 1));
    }
}
