//! Sync command handler: check, then drain.

use std::path::PathBuf;

use anyhow::Result;
use sunosync_core::{RecoverySettings, RunOutcome, ScanSettings};
use tracing::warn;

use crate::bootstrap::CliContext;
use crate::handlers::{check, update};

/// Combined result of a check and the drain that followed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Worst outcome of both phases.
    pub outcome: RunOutcome,
    /// Downloads that failed during the drain.
    pub failed_downloads: usize,
}

/// Execute the sync command and return the combined outcome.
///
/// Downloads still run after a partial scan: the cache holds everything
/// fetched so far. They are skipped after an authorization failure.
pub async fn execute(
    ctx: &CliContext,
    scan: ScanSettings,
    recovery: RecoverySettings,
    log_file: PathBuf,
) -> Result<SyncOutcome> {
    let report = check::execute(ctx, scan, log_file).await?;
    let outcome = report.outcome();
    if outcome == RunOutcome::AuthFailure {
        warn!("Skipping downloads after authorization failure");
        return Ok(SyncOutcome {
            outcome,
            failed_downloads: 0,
        });
    }

    let recovered = update::execute(ctx, recovery).await?;
    Ok(SyncOutcome {
        outcome: outcome.worst(recovered.outcome()),
        failed_downloads: recovered.failed,
    })
}
