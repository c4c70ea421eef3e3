//! Domain model for mirroring a remote clip feed onto local storage.
//!
//! Everything here is pure: no I/O, no clocks, no global state. Components
//! receive their configuration (naming rules, ceilings) as values.

mod catalog;
mod clip;
mod counts;
mod diff;
mod failure;
mod naming;
mod scan;

pub use catalog::{Catalog, CatalogEntry};
pub use clip::{Clip, dedupe_by_id};
pub use counts::BaseCounts;
pub use diff::{Diff, Shortfall, Surplus};
pub use failure::FailureState;
pub use naming::{
    DEFAULT_LIKED_PREFIX, DEFAULT_MAX_NAME_LEN, DEFAULT_UNTITLED_PREFIX, NamingRules,
    strip_version_suffix,
};
pub use scan::{HeadSyncStatus, RunOutcome, RunSummary, StopReason};
