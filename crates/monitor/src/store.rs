//! Durable alert state persistence.
//!
//! One small JSON record at a fixed path. Absence is not an error —
//! the first run simply starts from defaults — and an unreadable or
//! corrupt record is logged and treated the same way, never allowed to
//! take a cycle down. A lost write only risks a duplicate alert on the
//! next cycle, so write failures are surfaced to the caller but are not
//! fatal either.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rangewatch_core::AlertState;

/// Error type for state persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to write state file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to serialize alert state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed store for the single [`AlertState`] record.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state, falling back to the all-clear default
    /// when no record exists or the record cannot be parsed.
    pub fn load(&self) -> AlertState {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No state file yet, starting from defaults");
                return AlertState::default();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "State file unreadable, starting from defaults");
                return AlertState::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "State file corrupt, starting from defaults");
                AlertState::default()
            }
        }
    }

    /// Persist the state record, creating the parent directory on
    /// demand. The record is overwritten in place.
    pub fn save(&self, state: &AlertState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn load_returns_default_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        assert_eq!(store.load(), AlertState::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));

        let state = AlertState {
            low_alert_sent: true,
            critical_alert_sent: false,
            last_range: 38.0,
            last_checked_at: Some(Utc::now()),
        };
        store.save(&state).unwrap();
        assert_eq!(store.load(), state);
    }

    #[test]
    fn save_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("nested/deeper/state.json"));
        store.save(&AlertState::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn corrupt_file_loads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json at all").unwrap();

        let store = StateStore::new(&path);
        assert_eq!(store.load(), AlertState::default());
    }

    #[test]
    fn save_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));

        let mut state = AlertState::default();
        store.save(&state).unwrap();

        state.critical_alert_sent = true;
        state.last_range = 9.0;
        store.save(&state).unwrap();

        assert_eq!(store.load(), state);
    }
}
