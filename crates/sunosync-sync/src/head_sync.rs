//! Head-drift synchronization.
//!
//! The feed is newest-first and new clips appear at page 0 between runs,
//! which shifts every page-indexed cache entry. Instead of refetching the
//! whole feed, probe a few live head pages until one of them reaches a clip
//! the cache already holds (the anchor), then prepend everything before it.

use std::collections::HashSet;

use sunosync_core::{Clip, FeedPort, HeadSyncStatus, ScanSettings, dedupe_by_id};
use sunosync_store::PageCache;
use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};

/// Reconcile the cached head with the live feed.
///
/// A forced refresh, a zero probe window or an empty cache directory skip
/// probing entirely. [`HeadSyncStatus::NoOverlapRefresh`] leaves the cache
/// untouched; the caller is expected to fall back to a full refresh.
pub async fn sync_cache_head(
    feed: &dyn FeedPort,
    cache: &PageCache,
    settings: &ScanSettings,
) -> SyncResult<HeadSyncStatus> {
    if settings.refresh {
        return Ok(HeadSyncStatus::SkippedRefreshMode);
    }
    if !settings.head_sync_enabled() {
        return Ok(HeadSyncStatus::DisabledByFlag);
    }
    if !cache.has_pages()? {
        return Ok(HeadSyncStatus::Skipped);
    }

    let cached = cache.load();
    if cached.clips.is_empty() {
        return Ok(HeadSyncStatus::EmptyCache);
    }

    let cached_ids: HashSet<&str> = cached.clips.iter().filter_map(Clip::id).collect();
    let mut live_prefix = Vec::new();
    let mut anchor_found = false;

    for page in 0..settings.head_sync_pages {
        let batch = feed
            .fetch_page(page)
            .await
            .map_err(SyncError::HeadSync)?;

        if batch.is_end() {
            warn!(page, cached = cached.clips.len(), "Live feed is empty, clearing cache");
            cache.rewrite(&[])?;
            return Ok(HeadSyncStatus::FeedEmpty);
        }

        for clip in batch.clips {
            if clip.id().is_some_and(|id| cached_ids.contains(id)) {
                anchor_found = true;
                break;
            }
            live_prefix.push(clip);
        }
        if anchor_found {
            debug!(page, prefix = live_prefix.len(), "Found cache anchor");
            break;
        }
    }

    if !anchor_found {
        warn!(
            pages = settings.head_sync_pages,
            "No cache overlap in live head pages"
        );
        return Ok(HeadSyncStatus::NoOverlapRefresh);
    }

    let original = cached.clips.len();
    let merged = dedupe_by_id(live_prefix.into_iter().chain(cached.clips));
    let shifted = merged.len().saturating_sub(original);
    if shifted == 0 {
        return Ok(HeadSyncStatus::UpToDate);
    }

    if cached.reached_end {
        cache.rewrite(&merged)?;
    } else {
        cache.rewrite_open(&merged)?;
    }
    info!(clips = shifted, "Cache head sync inserted new clips at the front");
    Ok(HeadSyncStatus::Shifted { clips: shifted })
}
