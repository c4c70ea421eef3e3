//! Expected-vs-local state taken at one point in time.

use std::path::Path;

use sunosync_core::{BaseCounts, Catalog, Clip, Diff, NamingRules};
use sunosync_store::{CacheLoad, PageCache, scan_inventory};

use crate::error::SyncResult;

/// Expected counts, local counts and their diff.
///
/// Both sides are recomputed together so one diff never mixes a stale
/// inventory with a fresh catalog.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Downloadable clips grouped by base name.
    pub catalog: Catalog,
    /// Distinct clips expected per base.
    pub expected: BaseCounts,
    /// Local files per base.
    pub actual: BaseCounts,
    /// Missing and extra bases.
    pub diff: Diff,
    /// Cache pages parsed (only set by [`Snapshot::from_cache`]).
    pub cache_pages: u32,
    /// Unreadable cache pages met (only set by [`Snapshot::from_cache`]).
    pub unreadable_pages: u32,
}

impl Snapshot {
    /// Build from clips already in memory.
    pub fn from_clips(clips: &[Clip], out_dir: &Path, rules: &NamingRules) -> SyncResult<Self> {
        let catalog = Catalog::build(clips, rules);
        let expected = catalog.expected_counts();
        let actual = scan_inventory(out_dir)?;
        let diff = Diff::compute(&expected, &actual);
        Ok(Self {
            catalog,
            expected,
            actual,
            diff,
            cache_pages: 0,
            unreadable_pages: 0,
        })
    }

    /// Build from the page cache.
    pub fn from_cache(cache: &PageCache, out_dir: &Path, rules: &NamingRules) -> SyncResult<Self> {
        let CacheLoad {
            clips,
            pages_parsed,
            unreadable_pages,
            ..
        } = cache.load();
        let mut snapshot = Self::from_clips(&clips, out_dir, rules)?;
        snapshot.cache_pages = pages_parsed;
        snapshot.unreadable_pages = unreadable_pages;
        Ok(snapshot)
    }

    /// Files still to download.
    pub fn deficit(&self) -> usize {
        self.diff.deficit()
    }
}
