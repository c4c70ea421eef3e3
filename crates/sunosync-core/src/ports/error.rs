//! Terminal fetch conditions surfaced by the ports.

use thiserror::Error;

/// Terminal outcome of a retried remote operation.
///
/// Rate limits, server errors and transport failures are retried inside the
/// port and never appear here directly. When the retry budget runs out they
/// surface as [`FetchError::RetryExceeded`] carrying the last underlying error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The credential was rejected (401/403). Aborts the whole run.
    #[error("authorization failed (HTTP {status})")]
    Auth {
        /// HTTP status returned.
        status: u16,
    },

    /// A client error other than auth. Aborts the in-progress scan only.
    #[error("HTTP {status} for {target}")]
    NonRetryable {
        /// HTTP status returned (0 when no request could be formed).
        status: u16,
        /// What was being fetched (page index or clip id).
        target: String,
    },

    /// The retry budget ran out.
    #[error("{target} failed after {attempts} attempts: {last_error}")]
    RetryExceeded {
        /// What was being fetched.
        target: String,
        /// Attempts made, the first one included.
        attempts: u32,
        /// Last underlying error.
        last_error: String,
    },
}

impl FetchError {
    /// Create a non-retryable error.
    pub fn non_retryable(status: u16, target: impl Into<String>) -> Self {
        Self::NonRetryable {
            status,
            target: target.into(),
        }
    }

    /// Create a retry-exhaustion error.
    pub fn retry_exceeded(
        target: impl Into<String>,
        attempts: u32,
        last_error: impl Into<String>,
    ) -> Self {
        Self::RetryExceeded {
            target: target.into(),
            attempts,
            last_error: last_error.into(),
        }
    }

    /// Whether the credential was rejected.
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

/// Result type alias for port operations.
pub type FetchResult<T> = Result<T, FetchError>;
