//! Settings domain types and validation.
//!
//! Plain values injected into each component. Nothing here reads the
//! environment or holds process-wide state; the CLI builds these from flags.

use std::time::Duration;

/// Default retry budget for feed pages.
pub const DEFAULT_FEED_MAX_RETRIES: u32 = 12;

/// Default retry budget for media downloads.
pub const DEFAULT_MEDIA_MAX_RETRIES: u32 = 8;

/// Default number of live head pages probed before a scan.
pub const DEFAULT_HEAD_SYNC_PAGES: u32 = 5;

/// What [`RetrySettings::max_retries`] counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryBudget {
    /// Retries after the first attempt: `N` allows `N + 1` attempts.
    #[default]
    Retries,
    /// Attempts, the first one included: `N` allows `N` attempts.
    Attempts,
}

/// Backoff policy for a retried remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    /// Retry budget (0 = unlimited), interpreted per `budget`.
    pub max_retries: u32,
    /// What `max_retries` counts.
    pub budget: RetryBudget,
    /// Delay before the first retry; doubled on each further retry.
    pub base_delay: Duration,
    /// Upper bound on the exponential part of the delay.
    pub max_backoff: Duration,
    /// Upper bound of the uniform random delay added on top.
    pub jitter: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl RetrySettings {
    /// Defaults for paginated feed requests.
    pub const fn for_feed() -> Self {
        Self {
            max_retries: DEFAULT_FEED_MAX_RETRIES,
            budget: RetryBudget::Retries,
            base_delay: Duration::from_secs(1),
            max_backoff: Duration::from_secs(120),
            jitter: Duration::from_millis(500),
            timeout: Duration::from_secs(20),
        }
    }

    /// Defaults for media downloads.
    pub const fn for_media() -> Self {
        Self {
            max_retries: DEFAULT_MEDIA_MAX_RETRIES,
            budget: RetryBudget::Attempts,
            base_delay: Duration::from_millis(200),
            max_backoff: Duration::from_secs(60),
            jitter: Duration::from_millis(300),
            timeout: Duration::from_secs(30),
        }
    }

    /// Whether the retry budget is unbounded.
    pub const fn is_unlimited(&self) -> bool {
        self.max_retries == 0
    }

    /// Whether `retry` (1-based) is still within budget.
    pub const fn allows_retry(&self, retry: u32) -> bool {
        if self.is_unlimited() {
            return true;
        }
        match self.budget {
            RetryBudget::Retries => retry <= self.max_retries,
            RetryBudget::Attempts => retry < self.max_retries,
        }
    }

    /// `min(max_backoff, base_delay * 2^(retry - 1))`, jitter excluded.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2_u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_backoff)
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self::for_feed()
    }
}

/// Full-scan and head-sync parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSettings {
    /// Stop after this many pages (0 = no limit). Makes the scan partial.
    pub max_pages: u32,
    /// Live head pages probed for an anchor (0 disables head sync).
    pub head_sync_pages: u32,
    /// Pause after each live page.
    pub page_delay: Duration,
    /// Ignore the cache and refetch every page.
    pub refresh: bool,
}

impl ScanSettings {
    /// Whether head sync should run before the scan.
    pub const fn head_sync_enabled(&self) -> bool {
        self.head_sync_pages > 0 && !self.refresh
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_pages: 0,
            head_sync_pages: DEFAULT_HEAD_SYNC_PAGES,
            page_delay: Duration::from_secs(1),
            refresh: false,
        }
    }
}

/// Consecutive-failure budget per clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCeiling {
    /// Clips with this many consecutive failures are no longer planned.
    Limited(u32),
    /// Never give up on a clip.
    Unlimited,
}

impl FailureCeiling {
    /// Derive the per-clip ceiling from a retry budget (0 = unlimited).
    pub const fn from_max_retries(max_retries: u32) -> Self {
        if max_retries == 0 {
            Self::Unlimited
        } else {
            Self::Limited(max_retries)
        }
    }

    /// Whether `failures` consecutive failures exhaust the budget.
    pub const fn is_reached(&self, failures: u32) -> bool {
        match self {
            Self::Limited(limit) => failures >= *limit,
            Self::Unlimited => false,
        }
    }
}

/// How the recovery loop decides to continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryMode {
    /// Repeat cycles immediately until the deficit is zero or nothing is plannable.
    #[default]
    Drain,
    /// Sleep between cycles and exit on idleness or a clean, complete mirror.
    Watch,
}

/// Download planner and recovery loop parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverySettings {
    /// Drain or watch.
    pub mode: RecoveryMode,
    /// Per-cycle download cap (0 = the whole current deficit).
    pub max_downloads: usize,
    /// Consecutive-failure budget per clip.
    pub max_item_failures: FailureCeiling,
    /// Pause between watch cycles.
    pub poll_interval: Duration,
    /// Exit after this many consecutive cycles without a download (0 = never).
    pub max_idle_cycles: u32,
    /// In watch mode, exit once the deficit is zero and the last scan was complete.
    pub stop_when_clean: bool,
    /// Log the plan without downloading or touching the failure state.
    pub dry_run: bool,
    /// Pause between two downloads of one cycle.
    pub download_delay: Duration,
}

impl RecoverySettings {
    /// Number of downloads allowed this cycle.
    pub fn cycle_cap(&self, deficit: usize) -> usize {
        if self.max_downloads > 0 {
            self.max_downloads
        } else {
            deficit.max(1)
        }
    }

    /// Whether `idle_cycles` consecutive idle cycles end a watch run.
    pub const fn idle_limit_reached(&self, idle_cycles: u32) -> bool {
        self.max_idle_cycles > 0 && idle_cycles >= self.max_idle_cycles
    }
}

impl Default for RecoverySettings {
    fn default() -> Self {
        Self {
            mode: RecoveryMode::Drain,
            max_downloads: 0,
            max_item_failures: FailureCeiling::from_max_retries(DEFAULT_MEDIA_MAX_RETRIES),
            poll_interval: Duration::from_secs(5),
            max_idle_cycles: 0,
            stop_when_clean: false,
            dry_run: false,
            download_delay: Duration::from_millis(50),
        }
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Max backoff ({max_backoff:?}) must not be below the base delay ({base_delay:?})")]
    BackoffBelowBase {
        base_delay: Duration,
        max_backoff: Duration,
    },

    #[error("Poll interval must be greater than zero in watch mode")]
    ZeroPollInterval,

    #[error("Per-clip failure ceiling must be at least 1")]
    ZeroFailureCeiling,
}

/// Validate a retry policy.
pub fn validate_retry(settings: &RetrySettings) -> Result<(), SettingsError> {
    if settings.timeout.is_zero() {
        return Err(SettingsError::ZeroTimeout);
    }

    if settings.max_backoff < settings.base_delay {
        return Err(SettingsError::BackoffBelowBase {
            base_delay: settings.base_delay,
            max_backoff: settings.max_backoff,
        });
    }

    Ok(())
}

/// Validate recovery loop settings.
pub fn validate_recovery(settings: &RecoverySettings) -> Result<(), SettingsError> {
    if settings.mode == RecoveryMode::Watch && settings.poll_interval.is_zero() {
        return Err(SettingsError::ZeroPollInterval);
    }

    if settings.max_item_failures == FailureCeiling::Limited(0) {
        return Err(SettingsError::ZeroFailureCeiling);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let retry = RetrySettings {
            base_delay: Duration::from_secs(1),
            max_backoff: Duration::from_secs(5),
            ..RetrySettings::for_feed()
        };
        assert_eq!(retry.backoff(1), Duration::from_secs(1));
        assert_eq!(retry.backoff(2), Duration::from_secs(2));
        assert_eq!(retry.backoff(3), Duration::from_secs(4));
        assert_eq!(retry.backoff(4), Duration::from_secs(5));
        assert_eq!(retry.backoff(64), Duration::from_secs(5));
    }

    #[test]
    fn test_retry_budget() {
        let limited = RetrySettings {
            max_retries: 2,
            ..RetrySettings::default()
        };
        assert!(limited.allows_retry(2));
        assert!(!limited.allows_retry(3));

        let unlimited = RetrySettings {
            max_retries: 0,
            ..RetrySettings::default()
        };
        assert!(unlimited.allows_retry(10_000));
    }

    #[test]
    fn test_attempt_budget_counts_first_attempt() {
        let media = RetrySettings {
            max_retries: 2,
            ..RetrySettings::for_media()
        };
        assert!(media.allows_retry(1));
        assert!(!media.allows_retry(2));

        let single = RetrySettings {
            max_retries: 1,
            ..RetrySettings::for_media()
        };
        assert!(!single.allows_retry(1));

        let unlimited = RetrySettings {
            max_retries: 0,
            ..RetrySettings::for_media()
        };
        assert!(unlimited.allows_retry(10_000));
    }

    #[test]
    fn test_failure_ceiling() {
        assert_eq!(FailureCeiling::from_max_retries(0), FailureCeiling::Unlimited);
        assert!(FailureCeiling::Limited(3).is_reached(3));
        assert!(!FailureCeiling::Limited(3).is_reached(2));
        assert!(!FailureCeiling::Unlimited.is_reached(u32::MAX));
    }

    #[test]
    fn test_cycle_cap() {
        let mut settings = RecoverySettings::default();
        assert_eq!(settings.cycle_cap(7), 7);
        assert_eq!(settings.cycle_cap(0), 1);

        settings.max_downloads = 2;
        assert_eq!(settings.cycle_cap(7), 2);
    }

    #[test]
    fn test_head_sync_enabled() {
        let mut scan = ScanSettings::default();
        assert!(scan.head_sync_enabled());
        scan.refresh = true;
        assert!(!scan.head_sync_enabled());
        scan.refresh = false;
        scan.head_sync_pages = 0;
        assert!(!scan.head_sync_enabled());
    }

    #[test]
    fn test_validate_defaults() {
        assert!(validate_retry(&RetrySettings::for_feed()).is_ok());
        assert!(validate_retry(&RetrySettings::for_media()).is_ok());
        assert!(validate_recovery(&RecoverySettings::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_impossible_values() {
        let retry = RetrySettings {
            timeout: Duration::ZERO,
            ..RetrySettings::default()
        };
        assert_eq!(validate_retry(&retry), Err(SettingsError::ZeroTimeout));

        let retry = RetrySettings {
            base_delay: Duration::from_secs(10),
            max_backoff: Duration::from_secs(1),
            ..RetrySettings::default()
        };
        assert!(matches!(
            validate_retry(&retry),
            Err(SettingsError::BackoffBelowBase { .. })
        ));

        let recovery = RecoverySettings {
            mode: RecoveryMode::Watch,
            poll_interval: Duration::ZERO,
            ..RecoverySettings::default()
        };
        assert_eq!(
            validate_recovery(&recovery),
            Err(SettingsError::ZeroPollInterval)
        );
    }
}
