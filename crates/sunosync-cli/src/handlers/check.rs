//! Check command handler: full scan and diff reports.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use sunosync_core::{FeedPort, ScanSettings};
use sunosync_sync::{FullScan, ScanConfig, ScanReport};
use tracing::{error, info};

use crate::bootstrap::CliContext;

/// Execute the check command.
pub async fn execute(
    ctx: &CliContext,
    settings: ScanSettings,
    log_file: PathBuf,
) -> Result<ScanReport> {
    let feed: Arc<dyn FeedPort> = ctx.client.clone();
    let config = ScanConfig {
        settings,
        layout: ctx.layout.clone(),
        log_file,
        naming: ctx.naming.clone(),
    };

    let report = FullScan::new(feed, ctx.open_cache()?, config).run().await?;

    if report.stop_reason.is_auth_failure() {
        error!(stop_reason = %report.stop_reason, "Authorization failed during scan");
    } else if !report.summary.complete_api_fetch {
        info!(stop_reason = %report.stop_reason, "Scan incomplete");
    }
    info!(
        missing_file = %ctx.layout.missing_file.display(),
        summary_file = %ctx.layout.summary_file.display(),
        "Reports written"
    );
    Ok(report)
}
