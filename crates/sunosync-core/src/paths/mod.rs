//! Output directory layout and collision-free media paths.
//!
//! Everything the engine persists lives under one output directory:
//! the page cache, the failure-state file, diff reports, run logs and the
//! mirrored audio files themselves.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O
//! - Environment lookups are isolated so resolution stays testable

mod ensure;
mod error;
mod layout;
mod reserve;

pub use ensure::{ensure_directory, verify_writable};
pub use error::PathError;
pub use layout::{
    CACHE_DIR_NAME, DEFAULT_OUT_DIR, EXTRA_FILE_NAME, MISSING_FILE_NAME, OUT_DIR_ENV,
    OutDirResolution, OutDirSource, OutputLayout, STATE_FILE_NAME, SUMMARY_FILE_NAME,
    normalize_user_path, resolve_out_dir, resolve_out_dir_from,
};
pub use reserve::{MEDIA_EXTENSION, reserve_unique_path};
