//! Full scan: head sync, paginated fetch, diff reports and run summary.

use std::path::PathBuf;
use std::sync::Arc;

use sunosync_core::{
    Clip, Diff, FeedPort, FetchError, HeadSyncStatus, NamingRules, OutputLayout, RunOutcome,
    RunSummary, ScanSettings, StopReason, dedupe_by_id,
};
use sunosync_store::{
    PageCache, PageRead, write_extra_report, write_missing_report, write_summary,
};
use tracing::{error, info, warn};

use crate::error::SyncResult;
use crate::head_sync::sync_cache_head;
use crate::snapshot::Snapshot;

/// Inputs of a full scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Pagination, head probing and refresh.
    pub settings: ScanSettings,
    /// Where reports, summary and cache live.
    pub layout: OutputLayout,
    /// Log file recorded in the summary.
    pub log_file: PathBuf,
    /// Base-name derivation.
    pub naming: NamingRules,
}

/// Result of a full scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Summary as written to disk.
    pub summary: RunSummary,
    /// Missing and extra bases.
    pub diff: Diff,
    /// Why pagination stopped.
    pub stop_reason: StopReason,
    /// Head-sync outcome.
    pub head_sync: HeadSyncStatus,
}

impl ScanReport {
    /// Three-way outcome of the scan.
    pub const fn outcome(&self) -> RunOutcome {
        if self.stop_reason.is_auth_failure() {
            RunOutcome::AuthFailure
        } else if self.stop_reason.is_complete() {
            RunOutcome::Success
        } else {
            RunOutcome::Partial
        }
    }
}

struct PageScan {
    clips: Vec<Clip>,
    stop_reason: StopReason,
    next_page: u32,
}

/// Paginated scan preferring cached pages.
pub struct FullScan {
    feed: Arc<dyn FeedPort>,
    cache: PageCache,
    config: ScanConfig,
}

impl FullScan {
    pub fn new(feed: Arc<dyn FeedPort>, cache: PageCache, config: ScanConfig) -> Self {
        Self {
            feed,
            cache,
            config,
        }
    }

    /// Page cache used by the scan.
    pub const fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Run head sync, scan every page and write the reports.
    ///
    /// Fetch failures end pagination with a stop reason instead of an error,
    /// so a partial scan still produces reports. Only a failed head probe
    /// aborts the run.
    pub async fn run(&self) -> SyncResult<ScanReport> {
        let settings = &self.config.settings;
        let layout = &self.config.layout;

        info!("Starting API fetch");
        let head_sync = sync_cache_head(self.feed.as_ref(), &self.cache, settings).await?;

        let mut refresh = settings.refresh;
        if head_sync == HeadSyncStatus::NoOverlapRefresh {
            warn!(
                pages = settings.head_sync_pages,
                "Falling back to full refresh"
            );
            self.cache.clear()?;
            refresh = true;
        }

        let scan = self.scan_pages(refresh).await?;
        let unique = dedupe_by_id(scan.clips.iter().cloned()).len();
        let snapshot = Snapshot::from_clips(&scan.clips, &layout.out_dir, &self.config.naming)?;

        write_missing_report(&layout.missing_file, &snapshot.diff)?;
        write_extra_report(&layout.extra_file, &snapshot.diff)?;

        let summary = RunSummary {
            api_clips_raw: scan.clips.len(),
            api_clips_unique: unique,
            unique_titles: snapshot.expected.len(),
            local_mp3_files: snapshot.actual.total(),
            missing_titles: snapshot.diff.missing.len(),
            extra_titles: snapshot.diff.extra.len(),
            complete_api_fetch: scan.stop_reason.is_complete(),
            stop_reason: scan.stop_reason.to_string(),
            last_page_reached: scan.next_page,
            output_dir: layout.out_dir.clone(),
            log_file: self.config.log_file.clone(),
            missing_file: layout.missing_file.clone(),
            extra_file: layout.extra_file.clone(),
            cache_dir: self.cache.dir().to_path_buf(),
            cache_head_sync: head_sync.to_string(),
            cache_head_shifted_clips: head_sync.shifted_clips(),
            cache_head_pages_checked: settings.head_sync_pages,
        };
        write_summary(&layout.summary_file, &summary)?;

        info!(
            raw = summary.api_clips_raw,
            unique = summary.api_clips_unique,
            titles = summary.unique_titles,
            local = summary.local_mp3_files,
            missing = summary.missing_titles,
            extra = summary.extra_titles,
            stop_reason = %summary.stop_reason,
            "Scan summary"
        );

        Ok(ScanReport {
            summary,
            diff: snapshot.diff,
            stop_reason: scan.stop_reason,
            head_sync,
        })
    }

    async fn scan_pages(&self, refresh: bool) -> SyncResult<PageScan> {
        let settings = &self.config.settings;
        let mut clips = Vec::new();
        let mut page = 0;

        let stop_reason = loop {
            if settings.max_pages > 0 && page >= settings.max_pages {
                info!(limit = settings.max_pages, "Reached max-pages limit");
                break StopReason::MaxPages {
                    limit: settings.max_pages,
                };
            }

            if !refresh {
                match self.cache.read_page(page) {
                    PageRead::Clips(batch) => {
                        clips.extend(batch);
                        info!(page, total = clips.len(), "Loaded page from cache");
                        page += 1;
                        continue;
                    }
                    PageRead::End => {
                        info!(page, "No more clips");
                        break StopReason::EndOfFeed { page };
                    }
                    PageRead::Unreadable(reason) => {
                        warn!(page, %reason, "Failed to read cached page, refetching");
                    }
                    PageRead::Missing => {}
                }
            }

            match self.feed.fetch_page(page).await {
                Ok(batch) => {
                    self.cache.write_page(page, &batch.clips)?;
                    if batch.is_end() {
                        info!(page, "No more clips");
                        break StopReason::EndOfFeed { page };
                    }
                    let fetched = batch.clips.len();
                    clips.extend(batch.clips);
                    info!(page, fetched, total = clips.len(), "Fetched page");
                    page += 1;
                    tokio::time::sleep(settings.page_delay).await;
                }
                Err(e) => {
                    error!(page, error = %e, "Scan stopped");
                    break stop_reason_for(&e, page);
                }
            }
        };

        Ok(PageScan {
            clips,
            stop_reason,
            next_page: page,
        })
    }
}

const fn stop_reason_for(error: &FetchError, page: u32) -> StopReason {
    match error {
        FetchError::Auth { status } => StopReason::AuthFailed { status: *status },
        FetchError::NonRetryable { status, .. } => StopReason::Http {
            status: *status,
            page,
        },
        FetchError::RetryExceeded { .. } => StopReason::RetryExceeded { page },
    }
}
