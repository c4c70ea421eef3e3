//! Core domain types and port definitions for sunosync.
//!
//! This crate owns everything that does not touch the network:
//!
//! - `domain` - clips, canonical base names, the expected-state catalog,
//!   per-base counts, the diff engine and per-clip failure bookkeeping
//! - `ports` - traits implemented by `sunosync-api` (feed pages, media bodies)
//!   and the closed fetch error taxonomy
//! - `paths` - output directory layout and collision-free media paths
//! - `settings` - plain configuration values injected into each component

#![deny(unsafe_code)]

pub mod domain;
pub mod paths;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    BaseCounts, Catalog, CatalogEntry, Clip, Diff, FailureState, HeadSyncStatus, NamingRules,
    RunOutcome, RunSummary, Shortfall, StopReason, Surplus, dedupe_by_id,
};
pub use paths::{
    DEFAULT_OUT_DIR, MEDIA_EXTENSION, OutDirResolution, OutDirSource, OutputLayout, PathError,
    ensure_directory, reserve_unique_path, resolve_out_dir,
};
pub use ports::{FeedPage, FeedPort, FetchError, FetchResult, MediaPort, MediaRequest};
pub use settings::{
    FailureCeiling, RecoveryMode, RecoverySettings, RetryBudget, RetrySettings, ScanSettings,
    SettingsError, validate_recovery, validate_retry,
};
