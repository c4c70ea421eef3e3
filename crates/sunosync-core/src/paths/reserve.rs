//! Collision-free media paths.

use std::path::{Path, PathBuf};

/// Extension of mirrored audio files.
pub const MEDIA_EXTENSION: &str = "mp3";

/// Reserve the first unused `<base>.<ext>`, `<base> v2.<ext>`, `<base> v3.<ext>` path.
///
/// Existing files are never overwritten. The probe is not atomic; concurrent
/// runs against one output directory are unsupported.
pub fn reserve_unique_path(dir: &Path, base: &str, ext: &str) -> PathBuf {
    let primary = dir.join(format!("{base}.{ext}"));
    if !primary.exists() {
        return primary;
    }

    (2_u32..)
        .map(|n| dir.join(format!("{base} v{n}.{ext}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(primary)
}
