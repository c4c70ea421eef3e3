//! Flat-file persistence for the mirror.
//!
//! There is no database: the page cache, the failure-state file and the diff
//! reports are plain files under the output directory, and the local
//! inventory is re-derived from the audio files on every pass. Every file is
//! replaced wholesale through a temporary name so an interrupted run never
//! leaves a half-written artifact behind.

#![deny(unsafe_code)]

mod atomic;
mod cache;
mod error;
mod failure_store;
mod inventory;
mod reports;

pub use atomic::write_atomic;
pub use cache::{CACHE_PAGE_SIZE, CacheLoad, PageCache, PageRead};
pub use error::{StoreError, StoreResult};
pub use failure_store::FailureStore;
pub use inventory::scan_inventory;
pub use reports::{
    load_missing_hints, summary_reports_complete, write_extra_report, write_missing_report,
    write_summary,
};
