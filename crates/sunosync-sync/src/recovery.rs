//! Targeted recovery loop.
//!
//! Each cycle is a small state machine:
//!
//! 1. **scan** - rebuild expected and local counts from the cache and the
//!    output directory
//! 2. **plan** - pick candidates for the missing bases
//! 3. **execute** - download them one at a time
//! 4. **persist** - write the failure counters
//! 5. **decide** - continue, or exit on drain/idle/clean conditions
//!
//! Nothing is carried between cycles except the failure counters, so a
//! killed run resumes from the files on disk.

use std::sync::Arc;

use sunosync_core::{
    MediaPort, NamingRules, OutputLayout, RecoveryMode, RecoverySettings, RunOutcome,
};
use sunosync_store::{FailureStore, PageCache, load_missing_hints, summary_reports_complete};
use tracing::{info, warn};

use crate::error::SyncResult;
use crate::executor::{CycleResult, execute_plan};
use crate::planner::build_plan;
use crate::snapshot::Snapshot;

/// Why the recovery loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryExit {
    /// Drain mode: no missing files remain.
    Clean,
    /// Drain mode: missing files remain but no clip is eligible.
    NothingPlannable,
    /// Drain mode dry run: the plan was logged once.
    DryRun,
    /// Watch mode: clean mirror and the last full scan was complete.
    StoppedWhenClean,
    /// Watch mode: too many consecutive cycles without a download.
    IdleLimit,
    /// The credential was rejected.
    AuthFailure {
        /// HTTP status returned.
        status: u16,
    },
}

/// Totals over all cycles of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Cycles run.
    pub cycles: u32,
    /// Files written.
    pub downloaded: usize,
    /// Item-level failures.
    pub failed: usize,
    /// Missing files after the last cycle.
    pub remaining: usize,
    /// Exit condition.
    pub exit: RecoveryExit,
}

impl RecoveryReport {
    /// Three-way outcome of the run.
    pub const fn outcome(&self) -> RunOutcome {
        match self.exit {
            RecoveryExit::AuthFailure { .. } => RunOutcome::AuthFailure,
            _ => RunOutcome::Success,
        }
    }
}

/// Scan/plan/execute loop draining the local deficit.
pub struct RecoveryLoop {
    media: Arc<dyn MediaPort>,
    cache: PageCache,
    failures: FailureStore,
    layout: OutputLayout,
    naming: NamingRules,
    settings: RecoverySettings,
}

impl RecoveryLoop {
    pub fn new(
        media: Arc<dyn MediaPort>,
        cache: PageCache,
        layout: OutputLayout,
        naming: NamingRules,
        settings: RecoverySettings,
    ) -> Self {
        Self {
            media,
            cache,
            failures: FailureStore::new(&layout.state_file),
            layout,
            naming,
            settings,
        }
    }

    /// Run cycles until an exit condition holds.
    pub async fn run(&self) -> SyncResult<RecoveryReport> {
        let settings = &self.settings;
        let out_dir = &self.layout.out_dir;
        let mut state = self.failures.load();
        let mut cycles = 0_u32;
        let mut idle_cycles = 0_u32;
        let mut downloaded = 0;
        let mut failed = 0;

        info!(mode = ?settings.mode, dry_run = settings.dry_run, "Starting targeted update");

        loop {
            cycles += 1;
            let snapshot = Snapshot::from_cache(&self.cache, out_dir, &self.naming)?;
            let hints = load_missing_hints(&self.layout.missing_file);
            let deficit = snapshot.deficit();
            info!(
                cycle = cycles,
                cache_pages = snapshot.cache_pages,
                unreadable_pages = snapshot.unreadable_pages,
                expected_files = snapshot.expected.total(),
                local_files = snapshot.actual.total(),
                missing_titles = snapshot.diff.missing.len(),
                missing_files = deficit,
                "Cycle"
            );

            let plan = build_plan(
                &snapshot.diff,
                &snapshot.catalog,
                &state,
                &hints,
                settings.cycle_cap(deficit),
                settings.max_item_failures,
            );
            if plan.is_empty() {
                info!("No eligible clip downloads in this cycle");
            } else {
                info!(planned = plan.len(), "Planned clip downloads this cycle");
            }

            let result = if settings.dry_run {
                for entry in &plan {
                    info!(clip_id = %entry.id, title = %entry.title, "Dry run: would download");
                }
                CycleResult::default()
            } else {
                let result = execute_plan(
                    self.media.as_ref(),
                    &plan,
                    out_dir,
                    &mut state,
                    settings.download_delay,
                )
                .await;
                self.failures.save(&state)?;
                result
            };
            downloaded += result.downloaded;
            failed += result.failed;

            let report = |remaining, exit| RecoveryReport {
                cycles,
                downloaded,
                failed,
                remaining,
                exit,
            };

            if let Some(status) = result.auth_failure {
                return Ok(report(deficit, RecoveryExit::AuthFailure { status }));
            }

            idle_cycles = if result.is_idle() { idle_cycles + 1 } else { 0 };
            let remaining = Snapshot::from_cache(&self.cache, out_dir, &self.naming)?.deficit();

            match settings.mode {
                RecoveryMode::Drain => {
                    if remaining == 0 {
                        info!("Drain run finished: no missing files remain");
                        return Ok(report(remaining, RecoveryExit::Clean));
                    }
                    if plan.is_empty() {
                        warn!(remaining, "Drain run finished: no eligible clips remain");
                        return Ok(report(remaining, RecoveryExit::NothingPlannable));
                    }
                    if settings.dry_run {
                        return Ok(report(remaining, RecoveryExit::DryRun));
                    }
                    info!(remaining, "Drain run continuing");
                }
                RecoveryMode::Watch => {
                    if settings.stop_when_clean
                        && remaining == 0
                        && summary_reports_complete(&self.layout.summary_file)
                    {
                        info!("No missing files and the last scan was complete");
                        return Ok(report(remaining, RecoveryExit::StoppedWhenClean));
                    }
                    if settings.idle_limit_reached(idle_cycles) {
                        info!(idle_cycles, "Reached max idle cycles");
                        return Ok(report(remaining, RecoveryExit::IdleLimit));
                    }
                    tokio::time::sleep(settings.poll_interval).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeMedia, clip};
    use std::path::Path;
    use std::time::Duration;
    use sunosync_core::{Clip, FailureCeiling, FetchError};
    use tempfile::tempdir;

    fn drain() -> RecoverySettings {
        RecoverySettings {
            download_delay: Duration::ZERO,
            ..RecoverySettings::default()
        }
    }

    fn recovery(
        out_dir: &Path,
        clips: &[Clip],
        media: Arc<dyn MediaPort>,
        settings: RecoverySettings,
    ) -> RecoveryLoop {
        let layout = OutputLayout::new(out_dir);
        let cache = PageCache::open(&layout.cache_dir).unwrap();
        cache.rewrite(clips).unwrap();
        RecoveryLoop::new(media, cache, layout, NamingRules::default(), settings)
    }

    fn mp3_count(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|x| x == "mp3"))
            .count()
    }

    #[tokio::test]
    async fn test_drain_downloads_whole_deficit() {
        let tmp = tempdir().unwrap();
        let clips = [
            clip("a", "A", "1"),
            clip("b", "B", "1"),
            clip("b2", "B", "2"),
        ];
        let media = Arc::new(FakeMedia::default());

        let report = recovery(tmp.path(), &clips, media, drain()).run().await.unwrap();

        assert_eq!(report.exit, RecoveryExit::Clean);
        assert_eq!(report.cycles, 1);
        assert_eq!(report.downloaded, 3);
        assert_eq!(mp3_count(tmp.path()), 3);
    }

    #[tokio::test]
    async fn test_version_like_title_is_downloaded_once() {
        let tmp = tempdir().unwrap();
        let clips = [clip("a", "Song v2", "1")];
        let media = Arc::new(FakeMedia::default());

        let report = recovery(tmp.path(), &clips, media.clone(), drain())
            .run()
            .await
            .unwrap();
        let again = recovery(tmp.path(), &clips, media.clone(), drain())
            .run()
            .await
            .unwrap();

        assert_eq!(report.exit, RecoveryExit::Clean);
        assert_eq!(again.downloaded, 0);
        assert_eq!(media.calls(), vec!["a"]);
        assert!(tmp.path().join("Song_v2.mp3").exists());
        assert_eq!(mp3_count(tmp.path()), 1);
    }

    #[tokio::test]
    async fn test_drain_with_cap_takes_several_cycles() {
        let tmp = tempdir().unwrap();
        let clips = [clip("a", "A", "1"), clip("b", "B", "1")];
        let settings = RecoverySettings {
            max_downloads: 1,
            ..drain()
        };

        let report = recovery(tmp.path(), &clips, Arc::new(FakeMedia::default()), settings)
            .run()
            .await
            .unwrap();

        assert_eq!(report.exit, RecoveryExit::Clean);
        assert_eq!(report.cycles, 2);
        assert_eq!(report.remaining, 0);
    }

    #[tokio::test]
    async fn test_failing_clip_is_retired_after_ceiling() {
        let tmp = tempdir().unwrap();
        let clips = [clip("bad", "Song", "1")];
        let media =
            Arc::new(FakeMedia::default().failing("bad", FetchError::non_retryable(404, "bad")));
        let settings = RecoverySettings {
            max_item_failures: FailureCeiling::Limited(2),
            ..drain()
        };

        let run = recovery(tmp.path(), &clips, media.clone(), settings);
        let report = run.run().await.unwrap();

        assert_eq!(report.exit, RecoveryExit::NothingPlannable);
        assert_eq!(report.cycles, 3);
        assert_eq!(report.failed, 2);
        assert_eq!(report.remaining, 1);
        assert_eq!(media.calls().len(), 2);

        let state = FailureStore::new(tmp.path().join("targeted_update_state.json")).load();
        assert_eq!(state.count("bad"), 2);
    }

    #[tokio::test]
    async fn test_dry_run_touches_nothing() {
        let tmp = tempdir().unwrap();
        let clips = [clip("a", "A", "1")];
        let media = Arc::new(FakeMedia::default());
        let settings = RecoverySettings {
            dry_run: true,
            ..drain()
        };

        let report = recovery(tmp.path(), &clips, media.clone(), settings)
            .run()
            .await
            .unwrap();

        assert_eq!(report.exit, RecoveryExit::DryRun);
        assert!(media.calls().is_empty());
        assert!(!tmp.path().join("targeted_update_state.json").exists());
        assert_eq!(mp3_count(tmp.path()), 0);
    }

    #[tokio::test]
    async fn test_auth_failure_ends_run() {
        let tmp = tempdir().unwrap();
        let clips = [clip("a", "A", "1")];
        let media = Arc::new(FakeMedia::default().failing("a", FetchError::Auth { status: 403 }));

        let report = recovery(tmp.path(), &clips, media, drain()).run().await.unwrap();

        assert_eq!(report.exit, RecoveryExit::AuthFailure { status: 403 });
        assert_eq!(report.outcome(), RunOutcome::AuthFailure);
        let state = FailureStore::new(tmp.path().join("targeted_update_state.json")).load();
        assert!(state.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_exits_on_idle_limit() {
        let tmp = tempdir().unwrap();
        let settings = RecoverySettings {
            mode: RecoveryMode::Watch,
            max_idle_cycles: 2,
            ..drain()
        };

        let report = recovery(tmp.path(), &[], Arc::new(FakeMedia::default()), settings)
            .run()
            .await
            .unwrap();

        assert_eq!(report.exit, RecoveryExit::IdleLimit);
        assert_eq!(report.cycles, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_stops_when_clean_and_complete() {
        let tmp = tempdir().unwrap();
        std::fs::write(
            tmp.path().join("progress_summary.json"),
            br#"{"complete_api_fetch": true}"#,
        )
        .unwrap();
        let settings = RecoverySettings {
            mode: RecoveryMode::Watch,
            stop_when_clean: true,
            ..drain()
        };
        let clips = [clip("a", "A", "1")];

        let report = recovery(tmp.path(), &clips, Arc::new(FakeMedia::default()), settings)
            .run()
            .await
            .unwrap();

        assert_eq!(report.exit, RecoveryExit::StoppedWhenClean);
        assert_eq!(report.downloaded, 1);
    }
}
