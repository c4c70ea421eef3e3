//! Diff report artifacts and the run summary.

use std::fs;
use std::path::Path;

use serde_json::Value;
use sunosync_core::{Diff, RunSummary};

use crate::atomic::write_atomic;
use crate::error::{StoreError, StoreResult};

fn write_lines(path: &Path, lines: impl Iterator<Item = String>) -> StoreResult<()> {
    let mut text = String::new();
    for line in lines {
        text.push_str(&line);
        text.push('\n');
    }
    write_atomic(path, text.as_bytes())
}

/// Write `base<TAB>need=<N><TAB>have=<M>` rows.
pub fn write_missing_report(path: &Path, diff: &Diff) -> StoreResult<()> {
    write_lines(path, diff.missing_lines())
}

/// Write `base<TAB>have=<N><TAB>expected=<M>` rows.
pub fn write_extra_report(path: &Path, diff: &Diff) -> StoreResult<()> {
    write_lines(path, diff.extra_lines())
}

/// Write the run summary as pretty JSON.
pub fn write_summary(path: &Path, summary: &RunSummary) -> StoreResult<()> {
    let bytes = serde_json::to_vec_pretty(summary).map_err(|e| StoreError::json(path, e))?;
    write_atomic(path, &bytes)
}

/// Bases named in a missing report, in file order. Missing file: no hints.
pub fn load_missing_hints(path: &Path) -> Vec<String> {
    let Ok(text) = fs::read_to_string(path) else {
        return Vec::new();
    };
    text.lines()
        .filter_map(|line| line.split('\t').next())
        .map(str::trim)
        .filter(|base| !base.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether the last summary reports a scan that reached the end of the feed.
pub fn summary_reports_complete(path: &Path) -> bool {
    fs::read(path)
        .ok()
        .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok())
        .and_then(|value| value.get("complete_api_fetch").and_then(Value::as_bool))
        .unwrap_or(false)
}
