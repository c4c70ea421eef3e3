//! Sequential execution of a download plan.

use std::path::Path;
use std::time::Duration;

use sunosync_core::{CatalogEntry, FailureState, FetchError, MediaPort, MediaRequest};
use tracing::{error, info, warn};

/// Counters of one executed plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleResult {
    /// Files written.
    pub downloaded: usize,
    /// Item-level failures (counted against the clip).
    pub failed: usize,
    /// Status of a rejected credential; execution stops at the first one.
    pub auth_failure: Option<u16>,
}

impl CycleResult {
    /// Whether the cycle made no progress.
    pub const fn is_idle(&self) -> bool {
        self.downloaded == 0
    }
}

/// Download every planned clip in order.
///
/// A success clears the clip's failure counter and any item-level failure
/// increments it. An auth failure is systemic: the counter is left alone and
/// the rest of the plan is abandoned.
pub async fn execute_plan(
    media: &dyn MediaPort,
    plan: &[CatalogEntry],
    out_dir: &Path,
    failures: &mut FailureState,
    delay: Duration,
) -> CycleResult {
    let mut result = CycleResult::default();

    for entry in plan {
        let request = MediaRequest {
            clip_id: &entry.id,
            url: &entry.audio_url,
            out_dir,
            base: &entry.base,
        };

        match media.download(&request).await {
            Ok(path) => {
                failures.clear(&entry.id);
                result.downloaded += 1;
                info!(clip_id = %entry.id, path = %path.display(), "Downloaded clip");
            }
            Err(FetchError::Auth { status }) => {
                error!(clip_id = %entry.id, status, "Authorization failed, stopping downloads");
                result.auth_failure = Some(status);
                break;
            }
            Err(e) => {
                let attempts = failures.record_failure(&entry.id);
                result.failed += 1;
                warn!(
                    clip_id = %entry.id,
                    title = %entry.title,
                    failures = attempts,
                    error = %e,
                    "Failed clip"
                );
            }
        }

        tokio::time::sleep(delay).await;
    }

    result
}
