//! Storage error types.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from reading or writing flat files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Serialization error.
    #[error("JSON error on {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}
