//! On-disk page cache.
//!
//! Pages live in one directory as `page_0000.json`, `page_0001.json`, ...
//! each holding `{"clips": [...]}`. An empty batch is the end-of-feed
//! marker. Only a contiguous prefix is meaningful: loading stops at the first
//! missing or unreadable page and live fetching resumes from there.
//!
//! A full rewrite stages the new pages in a hidden `.rewrite` subdirectory,
//! marks the stage ready, then moves the pages over the live ones. Only
//! `page_*.json` files are touched, so the cache may share its directory
//! with other files. [`PageCache::open`] finishes a ready stage left behind
//! by a crash and discards an unfinished one.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use sunosync_core::{Clip, dedupe_by_id};
use tracing::{debug, info, warn};

use crate::atomic::write_atomic;
use crate::error::{StoreError, StoreResult};

/// Clips per page written by [`PageCache::rewrite`].
pub const CACHE_PAGE_SIZE: usize = 20;

const STAGING_DIR: &str = ".rewrite";
const READY_FILE: &str = "READY";

/// Result of reading one cache page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageRead {
    /// A non-empty batch.
    Clips(Vec<Clip>),
    /// The end-of-feed marker.
    End,
    /// No file for this index.
    Missing,
    /// The file exists but could not be parsed.
    Unreadable(String),
}

/// Contiguous cache prefix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheLoad {
    /// Clips deduplicated by id, first occurrence kept.
    pub clips: Vec<Clip>,
    /// Pages parsed, end marker included.
    pub pages_parsed: u32,
    /// Unreadable pages met (loading stops at the first one).
    pub unreadable_pages: u32,
    /// First page index not covered by the prefix.
    pub next_page: u32,
    /// Whether the prefix ends with the end marker.
    pub reached_end: bool,
}

#[derive(Serialize)]
struct PageFile<'a> {
    clips: &'a [Clip],
}

/// Page cache rooted at one directory.
#[derive(Debug, Clone)]
pub struct PageCache {
    dir: PathBuf,
    page_size: usize,
}

impl PageCache {
    /// Open the cache, creating the directory and recovering an interrupted rewrite.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let cache = Self {
            dir: dir.into(),
            page_size: CACHE_PAGE_SIZE,
        };
        fs::create_dir_all(&cache.dir).map_err(|e| StoreError::io(&cache.dir, e))?;
        cache.recover_rewrite()?;
        Ok(cache)
    }

    /// Override the rewrite batch size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File for a page index.
    pub fn page_path(&self, index: u32) -> PathBuf {
        page_path_in(&self.dir, index)
    }

    /// Whether any page file exists.
    pub fn has_pages(&self) -> StoreResult<bool> {
        Ok(!self.page_files()?.is_empty())
    }

    /// Read one page.
    pub fn read_page(&self, index: u32) -> PageRead {
        let path = self.page_path(index);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return PageRead::Missing,
            Err(e) => return PageRead::Unreadable(e.to_string()),
        };

        match parse_page(&bytes) {
            Ok(clips) if clips.is_empty() => PageRead::End,
            Ok(clips) => PageRead::Clips(clips),
            Err(reason) => PageRead::Unreadable(reason),
        }
    }

    /// Persist one page as fetched.
    pub fn write_page(&self, index: u32, clips: &[Clip]) -> StoreResult<()> {
        let path = self.page_path(index);
        let bytes =
            serde_json::to_vec(&PageFile { clips }).map_err(|e| StoreError::json(&path, e))?;
        write_atomic(&path, &bytes)
    }

    /// Load the contiguous prefix.
    pub fn load(&self) -> CacheLoad {
        let mut load = CacheLoad::default();
        let mut clips = Vec::new();

        loop {
            match self.read_page(load.next_page) {
                PageRead::Clips(batch) => {
                    clips.extend(batch);
                    load.pages_parsed += 1;
                    load.next_page += 1;
                }
                PageRead::End => {
                    load.pages_parsed += 1;
                    load.reached_end = true;
                    break;
                }
                PageRead::Missing => break,
                PageRead::Unreadable(reason) => {
                    warn!(page = load.next_page, %reason, "Unreadable cache page");
                    load.unreadable_pages += 1;
                    break;
                }
            }
        }

        load.clips = dedupe_by_id(clips);
        debug!(
            pages = load.pages_parsed,
            clips = load.clips.len(),
            reached_end = load.reached_end,
            "Loaded page cache"
        );
        load
    }

    /// Replace the whole cache with `clips` in fixed-size pages plus an end marker.
    pub fn rewrite(&self, clips: &[Clip]) -> StoreResult<()> {
        self.rewrite_pages(clips, true)
    }

    /// Replace the whole cache without an end marker.
    ///
    /// Used when the clips are only a known prefix of the feed, so the next
    /// scan resumes live fetching after the last page.
    pub fn rewrite_open(&self, clips: &[Clip]) -> StoreResult<()> {
        self.rewrite_pages(clips, false)
    }

    fn rewrite_pages(&self, clips: &[Clip], with_end: bool) -> StoreResult<()> {
        let staging = self.staging_dir();
        remove_dir_if_exists(&staging)?;
        fs::create_dir_all(&staging).map_err(|e| StoreError::io(&staging, e))?;

        let mut pages = 0;
        for chunk in clips.chunks(self.page_size) {
            write_page_file(&staging, pages, chunk)?;
            pages += 1;
        }
        if with_end {
            write_page_file(&staging, pages, &[])?;
            pages += 1;
        }
        write_atomic(&staging.join(READY_FILE), pages.to_string().as_bytes())?;

        self.install_staged(pages)?;
        info!(clips = clips.len(), pages, with_end, "Rewrote page cache");
        Ok(())
    }

    /// Replace the live pages with a ready stage of `pages` pages.
    ///
    /// Safe to repeat after a crash: staged pages already moved are simply
    /// no longer in the stage.
    fn install_staged(&self, pages: u32) -> StoreResult<()> {
        let staging = self.staging_dir();

        for path in self.page_files()? {
            if page_index(&path).is_none_or(|index| index >= pages) {
                fs::remove_file(&path).map_err(|e| StoreError::io(&path, e))?;
            }
        }
        for index in 0..pages {
            let staged = page_path_in(&staging, index);
            if staged.exists() {
                let live = self.page_path(index);
                fs::rename(&staged, &live).map_err(|e| StoreError::io(&live, e))?;
            }
        }

        remove_dir_if_exists(&staging)
    }

    /// Delete every page file.
    pub fn clear(&self) -> StoreResult<()> {
        for path in self.page_files()? {
            fs::remove_file(&path).map_err(|e| StoreError::io(&path, e))?;
        }
        Ok(())
    }

    fn page_files(&self) -> StoreResult<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.dir, e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.dir, e))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with("page_") && name.ends_with(".json") {
                files.push(entry.path());
            }
        }
        Ok(files)
    }

    fn staging_dir(&self) -> PathBuf {
        self.dir.join(STAGING_DIR)
    }

    /// Finish a ready stage left by a crash, or drop an unfinished one.
    fn recover_rewrite(&self) -> StoreResult<()> {
        let staging = self.staging_dir();
        if !staging.exists() {
            return Ok(());
        }

        let ready = fs::read_to_string(staging.join(READY_FILE))
            .ok()
            .and_then(|text| text.trim().parse::<u32>().ok());
        match ready {
            Some(pages) => {
                warn!(dir = %self.dir.display(), pages, "Completing interrupted cache rewrite");
                self.install_staged(pages)
            }
            None => {
                warn!(dir = %self.dir.display(), "Discarding unfinished cache rewrite");
                remove_dir_if_exists(&staging)
            }
        }
    }
}

fn page_path_in(dir: &Path, index: u32) -> PathBuf {
    dir.join(format!("page_{index:04}.json"))
}

fn page_index(path: &Path) -> Option<u32> {
    path.file_name()?
        .to_str()?
        .strip_prefix("page_")?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

fn write_page_file(dir: &Path, index: u32, clips: &[Clip]) -> StoreResult<()> {
    let path = page_path_in(dir, index);
    let bytes = serde_json::to_vec(&PageFile { clips }).map_err(|e| StoreError::json(&path, e))?;
    fs::write(&path, bytes).map_err(|e| StoreError::io(&path, e))
}

fn remove_dir_if_exists(path: &Path) -> StoreResult<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(StoreError::io(path, e)),
        _ => Ok(()),
    }
}

/// Accept `{"clips": [...]}` or a bare array.
fn parse_page(bytes: &[u8]) -> Result<Vec<Clip>, String> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    let list = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("clips") {
            Some(Value::Array(items)) => items,
            _ => return Err("object without a clip list".to_string()),
        },
        _ => return Err("unexpected JSON type".to_string()),
    };
    list.into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| e.to_string()))
        .collect()
}
