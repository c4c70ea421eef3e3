//! Errors raised while resolving and preparing the output directory.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Output directory resolution or preparation failed.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Output directory path is empty")]
    EmptyPath,

    #[error("Cannot expand '~': home directory is unknown")]
    NoHomeDir,

    #[error("Cannot resolve a relative output directory: {0}")]
    CurrentDir(#[source] io::Error),

    #[error("{} exists but is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to create output directory {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Output directory {} is not writable: {source}", path.display())]
    NotWritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
