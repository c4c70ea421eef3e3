//! Update command handler: targeted recovery of missing files.

use std::sync::Arc;

use anyhow::Result;
use sunosync_core::{MediaPort, RecoverySettings, validate_recovery};
use sunosync_sync::{RecoveryLoop, RecoveryReport};
use tracing::info;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Execute the update command.
pub async fn execute(ctx: &CliContext, settings: RecoverySettings) -> Result<RecoveryReport> {
    validate_recovery(&settings).map_err(CliError::from)?;

    let media: Arc<dyn MediaPort> = ctx.client.clone();
    let recovery = RecoveryLoop::new(
        media,
        ctx.open_cache()?,
        ctx.layout.clone(),
        ctx.naming.clone(),
        settings,
    );
    let report = recovery.run().await?;

    info!(
        cycles = report.cycles,
        downloaded = report.downloaded,
        failed = report.failed,
        remaining = report.remaining,
        exit = ?report.exit,
        "Targeted update finished"
    );
    Ok(report)
}
