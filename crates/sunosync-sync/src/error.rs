//! Orchestration errors.

use sunosync_core::FetchError;
use sunosync_store::StoreError;
use thiserror::Error;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that abort a scan or recovery run.
///
/// Fetch failures during the paginated scan are not errors: they end the
/// scan with a stop reason. Only head sync, which has no partial result to
/// report, surfaces them here.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The live head could not be probed.
    #[error("Head sync failed: {0}")]
    HeadSync(#[source] FetchError),

    /// A flat file could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SyncError {
    /// Whether the credential was rejected.
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::HeadSync(FetchError::Auth { .. }))
    }
}
