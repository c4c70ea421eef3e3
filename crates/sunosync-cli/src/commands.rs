//! Subcommands and their argument groups.
//!
//! Feed options (`--timeout`, `--max-retries`, ...) and download options
//! (`--download-timeout`, `--download-retries`, ...) use distinct names so
//! `sync` can accept both.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use sunosync_api::DEFAULT_FEED_URL;
use sunosync_core::{
    FailureCeiling, RecoveryMode, RecoverySettings, RetryBudget, RetrySettings, ScanSettings,
};

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Scan the feed (cache first), diff against local files and write reports
    Check {
        #[command(flatten)]
        connection: ConnectionArgs,
        #[command(flatten)]
        layout: LayoutArgs,
        #[command(flatten)]
        scan: ScanArgs,
        /// Exit with code 2 if the scan did not reach the end of the feed
        #[arg(long)]
        fail_on_partial: bool,
    },

    /// Download only the currently missing files, once or continuously
    Update {
        #[command(flatten)]
        connection: ConnectionArgs,
        #[command(flatten)]
        layout: LayoutArgs,
        #[command(flatten)]
        download: DownloadArgs,
        #[command(flatten)]
        watch: WatchArgs,
    },

    /// Check, then drain every missing file
    Sync {
        #[command(flatten)]
        connection: ConnectionArgs,
        #[command(flatten)]
        layout: LayoutArgs,
        #[command(flatten)]
        scan: ScanArgs,
        #[command(flatten)]
        download: DownloadArgs,
        /// Exit with code 2 if the scan did not reach the end of the feed
        #[arg(long)]
        fail_on_partial: bool,
    },

    /// Show resolved output paths
    Paths {
        #[command(flatten)]
        layout: LayoutArgs,
    },
}

impl Commands {
    /// Name used for the default log file.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Check { .. } => "check",
            Self::Update { .. } => "update",
            Self::Sync { .. } => "sync",
            Self::Paths { .. } => "paths",
        }
    }
}

/// Credential and endpoint.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Bearer token (falls back to --token-file)
    #[arg(long, env = "SUNOSYNC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// File holding the bearer token
    #[arg(long = "token-file", default_value = "token.txt")]
    pub token_file: PathBuf,

    /// Feed URL; the page index is appended as a query parameter
    #[arg(long = "feed-url", default_value = DEFAULT_FEED_URL)]
    pub feed_url: String,

    /// Proxies with protocol, comma-separated; one is picked per request
    #[arg(long, value_delimiter = ',')]
    pub proxy: Vec<String>,
}

/// Overrides for files under the output directory.
#[derive(Args, Debug, Clone, Default)]
pub struct LayoutArgs {
    /// Page cache directory (defaults to <out-dir>/api_cache)
    #[arg(long = "cache-dir")]
    pub cache_dir: Option<PathBuf>,

    /// Failure-state file (defaults to <out-dir>/targeted_update_state.json)
    #[arg(long = "state-file")]
    pub state_file: Option<PathBuf>,
}

/// Pagination and feed retry options.
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Ignore cached pages and refetch everything
    #[arg(long)]
    pub refresh: bool,

    /// Seconds to wait after each live page; also the backoff unit
    #[arg(long, default_value = "1.0", value_parser = parse_seconds)]
    pub sleep: Duration,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "20.0", value_parser = parse_seconds)]
    pub timeout: Duration,

    /// Stop after this many pages (0 = no limit)
    #[arg(long = "max-pages", default_value_t = 0)]
    pub max_pages: u32,

    /// Retries per page (0 = infinite)
    #[arg(long = "max-retries", default_value_t = 12)]
    pub max_retries: u32,

    /// Maximum backoff in seconds
    #[arg(long = "max-backoff", default_value = "120.0", value_parser = parse_seconds)]
    pub max_backoff: Duration,

    /// Random jitter added to each backoff, in seconds
    #[arg(long, default_value = "0.5", value_parser = parse_seconds)]
    pub jitter: Duration,

    /// Live head pages probed to shift the cache forward (0 disables)
    #[arg(long = "head-sync-pages", default_value_t = 5)]
    pub head_sync_pages: u32,
}

impl ScanArgs {
    pub const fn scan_settings(&self) -> ScanSettings {
        ScanSettings {
            max_pages: self.max_pages,
            head_sync_pages: self.head_sync_pages,
            page_delay: self.sleep,
            refresh: self.refresh,
        }
    }

    pub const fn feed_retry(&self) -> RetrySettings {
        RetrySettings {
            max_retries: self.max_retries,
            budget: RetryBudget::Retries,
            base_delay: self.sleep,
            max_backoff: self.max_backoff,
            jitter: self.jitter,
            timeout: self.timeout,
        }
    }
}

/// Download planning and media retry options.
#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Max downloads per cycle (0 = all currently missing files)
    #[arg(long = "max-downloads", default_value_t = 0)]
    pub max_downloads: usize,

    /// Backoff unit for download retries, in seconds
    #[arg(long = "download-sleep", default_value = "0.2", value_parser = parse_seconds)]
    pub download_sleep: Duration,

    /// HTTP timeout for downloads in seconds
    #[arg(long = "download-timeout", default_value = "30.0", value_parser = parse_seconds)]
    pub download_timeout: Duration,

    /// Attempts per download, first one included; also the per-clip failure ceiling (0 = infinite)
    #[arg(long = "download-retries", default_value_t = 8)]
    pub download_retries: u32,

    /// Maximum download backoff in seconds
    #[arg(long = "download-max-backoff", default_value = "60.0", value_parser = parse_seconds)]
    pub download_max_backoff: Duration,

    /// Random jitter added to each download backoff, in seconds
    #[arg(long = "download-jitter", default_value = "0.3", value_parser = parse_seconds)]
    pub download_jitter: Duration,

    /// Log the plan but do not download
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Exit with code 3 if any download failed
    #[arg(long = "fail-on-download-errors")]
    pub fail_on_download_errors: bool,
}

impl DownloadArgs {
    pub const fn media_retry(&self) -> RetrySettings {
        RetrySettings {
            max_retries: self.download_retries,
            budget: RetryBudget::Attempts,
            base_delay: self.download_sleep,
            max_backoff: self.download_max_backoff,
            jitter: self.download_jitter,
            timeout: self.download_timeout,
        }
    }

    /// Drain-mode settings.
    pub fn recovery_settings(&self) -> RecoverySettings {
        RecoverySettings {
            mode: RecoveryMode::Drain,
            max_downloads: self.max_downloads,
            max_item_failures: FailureCeiling::from_max_retries(self.download_retries),
            dry_run: self.dry_run,
            ..RecoverySettings::default()
        }
    }
}

/// Watch-mode options.
#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    /// Drain immediately until nothing is missing or nothing is eligible, then exit
    #[arg(long)]
    pub once: bool,

    /// Seconds between watch cycles
    #[arg(long = "poll-interval", default_value = "5.0", value_parser = parse_seconds)]
    pub poll_interval: Duration,

    /// Stop after N cycles without a download (0 = never)
    #[arg(long = "max-idle-cycles", default_value_t = 0)]
    pub max_idle_cycles: u32,

    /// Exit once nothing is missing and the last check reached the end of the feed
    #[arg(long = "stop-when-clean")]
    pub stop_when_clean: bool,
}

impl WatchArgs {
    /// Apply the mode and watch options on top of drain settings.
    pub const fn apply(&self, settings: RecoverySettings) -> RecoverySettings {
        RecoverySettings {
            mode: if self.once {
                RecoveryMode::Drain
            } else {
                RecoveryMode::Watch
            },
            poll_interval: self.poll_interval,
            max_idle_cycles: self.max_idle_cycles,
            stop_when_clean: self.stop_when_clean,
            ..settings
        }
    }
}

/// Parse a non-negative number of seconds.
pub fn parse_seconds(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number of seconds"))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("'{raw}' must be a non-negative duration"))
}
