//! Internal error types for feed and media requests.
//!
//! These never cross the port boundary: the retrying operation either
//! retries them or folds the last one into `FetchError::RetryExceeded`.

use std::error::Error as _;

use thiserror::Error;

/// Result type alias for client operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors raised while talking to the remote service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a retryable status (429 or 5xx).
    #[error("retryable status {status} from {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The body parsed as JSON but did not contain a clip list.
    #[error("Malformed feed response: {message}")]
    Malformed {
        /// Description of what was missing
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Local filesystem error while streaming a body.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Whether the failure looks like name resolution, usually a network,
    /// VPN or DNS misconfiguration on the user's side.
    pub fn is_dns(&self) -> bool {
        const MARKERS: [&str; 5] = [
            "dns",
            "failed to lookup address",
            "name or service not known",
            "nodename nor servname",
            "temporary failure in name resolution",
        ];

        let mut messages = vec![self.to_string()];
        let mut source = self.source();
        while let Some(err) = source {
            messages.push(err.to_string());
            source = err.source();
        }

        messages.iter().any(|message| {
            let lower = message.to_lowercase();
            MARKERS.iter().any(|marker| lower.contains(marker))
        })
    }
}
