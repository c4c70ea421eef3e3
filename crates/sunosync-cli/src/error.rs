//! CLI-specific error types and the exit-code policy.

use std::path::PathBuf;

use sunosync_core::{PathError, RunOutcome, SettingsError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// No token flag, no environment variable and no token file.
    #[error("token file not found at {}", path.display())]
    TokenFileMissing {
        /// Token file that was looked up.
        path: PathBuf,
    },

    /// The token file exists but holds nothing usable.
    #[error("token file {} is empty", path.display())]
    TokenEmpty {
        /// Token file that was read.
        path: PathBuf,
    },

    /// The token file could not be read.
    #[error("failed to read token file {}: {source}", path.display())]
    TokenRead {
        /// Token file that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Output paths could not be resolved or created.
    #[error(transparent)]
    Path(#[from] PathError),

    /// Flags describe an impossible configuration.
    #[error("Configuration error: {0}")]
    Settings(#[from] SettingsError),
}

/// Which soft failures turn into a non-zero exit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExitPolicy {
    /// Partial scans exit with 2.
    pub fail_on_partial: bool,
    /// Failed downloads exit with 3.
    pub fail_on_download_errors: bool,
}

impl ExitPolicy {
    /// Map a run outcome and its failed download count to the process exit code.
    ///
    /// Exit codes, first match wins:
    /// - 1: Authorization failure (any other error also exits 1)
    /// - 2: Partial scan with `fail_on_partial`
    /// - 3: At least one failed download with `fail_on_download_errors`
    /// - 0: Everything else
    pub const fn exit_code(&self, outcome: RunOutcome, failed_downloads: usize) -> u8 {
        match outcome {
            RunOutcome::AuthFailure => 1,
            RunOutcome::Partial if self.fail_on_partial => 2,
            _ if self.fail_on_download_errors && failed_downloads > 0 => 3,
            _ => 0,
        }
    }
}
