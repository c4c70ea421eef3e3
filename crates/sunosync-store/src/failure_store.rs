//! Persisted per-clip failure counters.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use sunosync_core::FailureState;
use tracing::warn;

use crate::atomic::write_atomic;
use crate::error::{StoreError, StoreResult};

#[derive(Serialize)]
struct StateFile<'a> {
    updated_at: String,
    failed_attempts: &'a BTreeMap<String, u32>,
}

/// JSON file holding `{"updated_at": ..., "failed_attempts": {id: count}}`.
#[derive(Debug, Clone)]
pub struct FailureStore {
    path: PathBuf,
}

impl FailureStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// State file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load counters. A missing or malformed file yields an empty state and
    /// counters that are not non-negative integers are dropped.
    pub fn load(&self) -> FailureState {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return FailureState::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unreadable failure state, starting empty");
                return FailureState::new();
            }
        };

        let value: Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Malformed failure state, starting empty");
                return FailureState::new();
            }
        };

        let attempts = value
            .get("failed_attempts")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(id, count)| {
                        let count = u32::try_from(count.as_u64()?).ok()?;
                        Some((id.clone(), count))
                    })
                    .collect()
            })
            .unwrap_or_default();

        FailureState::from_attempts(attempts)
    }

    /// Replace the file with the current counters.
    pub fn save(&self, state: &FailureState) -> StoreResult<()> {
        let file = StateFile {
            updated_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            failed_attempts: state.attempts(),
        };
        let bytes =
            serde_json::to_vec_pretty(&file).map_err(|e| StoreError::json(&self.path, e))?;
        write_atomic(&self.path, &bytes)
    }
}
