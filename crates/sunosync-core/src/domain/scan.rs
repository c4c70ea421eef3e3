//! Scan results, run outcomes and the JSON run summary.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Why a paginated scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// An empty page marked the end of the feed.
    EndOfFeed {
        /// Index of the empty page.
        page: u32,
    },
    /// The configured page limit was reached first.
    MaxPages {
        /// The configured limit.
        limit: u32,
    },
    /// The credential was rejected.
    AuthFailed {
        /// HTTP status (401 or 403).
        status: u16,
    },
    /// A non-retryable client error.
    Http {
        /// HTTP status.
        status: u16,
        /// Page that failed.
        page: u32,
    },
    /// The retry budget ran out.
    RetryExceeded {
        /// Page that failed.
        page: u32,
    },
}

impl StopReason {
    /// Only reaching the end of the feed makes a scan complete.
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::EndOfFeed { .. })
    }

    /// Whether the scan was stopped by an authorization failure.
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthFailed { .. })
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfFeed { page } => write!(f, "end_of_feed_page:{page}"),
            Self::MaxPages { limit } => write!(f, "max_pages_reached:{limit}"),
            Self::AuthFailed { status } => write!(f, "auth_failed:{status}"),
            Self::Http { status, page } => write!(f, "http_{status}_page:{page}"),
            Self::RetryExceeded { page } => write!(f, "max_retries_exceeded_page:{page}"),
        }
    }
}

/// Outcome of reconciling the cache head against the live feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadSyncStatus {
    /// Head probing disabled (`head_sync_pages == 0`).
    DisabledByFlag,
    /// No cache pages on disk, nothing to reconcile.
    Skipped,
    /// A forced refresh bypasses head probing.
    SkippedRefreshMode,
    /// Cache pages exist but hold no clips.
    EmptyCache,
    /// The live feed is empty; the cache was cleared.
    FeedEmpty,
    /// No overlap within the probe window; a full refresh is required.
    NoOverlapRefresh,
    /// New clips were inserted at the front of the cache.
    Shifted {
        /// Number of newly inserted leading clips.
        clips: usize,
    },
    /// The cache head already matches the live head.
    UpToDate,
}

impl HeadSyncStatus {
    /// Stable identifier written to the run summary.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DisabledByFlag => "disabled_by_flag",
            Self::Skipped => "skipped",
            Self::SkippedRefreshMode => "skipped_refresh_mode",
            Self::EmptyCache => "empty_cache",
            Self::FeedEmpty => "feed_empty",
            Self::NoOverlapRefresh => "no_overlap_refresh",
            Self::Shifted { .. } => "shifted",
            Self::UpToDate => "up_to_date",
        }
    }

    /// Number of clips inserted at the head.
    pub const fn shifted_clips(&self) -> usize {
        match self {
            Self::Shifted { clips } => *clips,
            _ => 0,
        }
    }
}

impl fmt::Display for HeadSyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three outcomes exposed to the caller; exit codes are caller policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Everything requested finished.
    Success,
    /// The scan did not reach the end of the feed.
    Partial,
    /// The credential was rejected.
    AuthFailure,
}

impl RunOutcome {
    /// Combine two outcomes, keeping the most severe.
    #[must_use]
    pub const fn worst(self, other: Self) -> Self {
        match (self, other) {
            (Self::AuthFailure, _) | (_, Self::AuthFailure) => Self::AuthFailure,
            (Self::Partial, _) | (_, Self::Partial) => Self::Partial,
            _ => Self::Success,
        }
    }
}

/// JSON summary written after every full scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Clips returned by the feed, repeats included.
    pub api_clips_raw: usize,
    /// Clips after deduplication by id.
    pub api_clips_unique: usize,
    /// Distinct expected base names.
    pub unique_titles: usize,
    /// Audio files found locally.
    pub local_mp3_files: usize,
    /// Bases with a deficit.
    pub missing_titles: usize,
    /// Bases with a surplus.
    pub extra_titles: usize,
    /// Whether the scan reached the end of the feed.
    pub complete_api_fetch: bool,
    /// Why the scan stopped.
    pub stop_reason: String,
    /// Next page index the scan would have read.
    pub last_page_reached: u32,
    /// Output directory.
    pub output_dir: PathBuf,
    /// Log file of the run.
    pub log_file: PathBuf,
    /// Missing-bases report.
    pub missing_file: PathBuf,
    /// Extra-bases report.
    pub extra_file: PathBuf,
    /// Page cache directory.
    pub cache_dir: PathBuf,
    /// Head-sync outcome.
    pub cache_head_sync: String,
    /// Clips inserted at the cache head.
    pub cache_head_shifted_clips: usize,
    /// Configured head probe window.
    pub cache_head_pages_checked: u32,
}
