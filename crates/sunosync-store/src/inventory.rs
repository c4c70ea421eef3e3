//! Local inventory scan.

use std::fs;
use std::path::Path;

use sunosync_core::domain::strip_version_suffix;
use sunosync_core::{BaseCounts, MEDIA_EXTENSION};

use crate::error::{StoreError, StoreResult};

/// Count audio files per base name in `dir` (not recursive).
///
/// `X.mp3`, `X v2.mp3` and `X v3.mp3` all count towards `X`. Temporary
/// download files do not carry the media extension and are ignored. A missing
/// directory is an empty inventory.
pub fn scan_inventory(dir: &Path) -> StoreResult<BaseCounts> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BaseCounts::new()),
        Err(e) => return Err(StoreError::io(dir, e)),
    };

    let mut counts = BaseCounts::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(dir, e))?;
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != MEDIA_EXTENSION) {
            continue;
        }
        if !entry.file_type().is_ok_and(|t| t.is_file()) {
            continue;
        }
        if let Some(stem) = path.file_stem() {
            counts.add(strip_version_suffix(&stem.to_string_lossy()));
        }
    }
    Ok(counts)
}
