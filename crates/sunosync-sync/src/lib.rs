//! Synchronization and targeted recovery.
//!
//! Orchestrates the ports from `sunosync-core` and the flat files from
//! `sunosync-store`:
//!
//! - [`FullScan`] - head-drift sync, then a paginated scan that prefers cached
//!   pages, then the diff reports and run summary
//! - [`sync_cache_head`] - reconcile a stale cache with the live feed head
//! - [`build_plan`] / [`execute_plan`] - bounded, failure-aware downloads
//! - [`RecoveryLoop`] - scan, plan, execute, persist, decide; in drain or
//!   watch mode
//!
//! Everything runs on one logical thread of control: pages and downloads are
//! fetched sequentially.

#![deny(unsafe_code)]

mod error;
mod executor;
mod head_sync;
mod planner;
mod recovery;
mod scan;
mod snapshot;

#[cfg(test)]
mod testing;

pub use error::{SyncError, SyncResult};
pub use executor::{CycleResult, execute_plan};
pub use head_sync::sync_cache_head;
pub use planner::build_plan;
pub use recovery::{RecoveryExit, RecoveryLoop, RecoveryReport};
pub use scan::{FullScan, ScanConfig, ScanReport};
pub use snapshot::Snapshot;
