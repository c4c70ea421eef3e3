//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use sunosync_core::{
    Clip, FeedPage, FeedPort, FetchError, FetchResult, MEDIA_EXTENSION, MediaPort, MediaRequest,
    RecoverySettings, ScanSettings, reserve_unique_path,
};

pub fn clip(id: &str, title: &str, created_at: &str) -> Clip {
    Clip::new(id, title)
        .with_audio_url(format!("https://cdn.example/{id}.mp3"))
        .with_created_at(created_at)
}

pub fn scan_settings() -> ScanSettings {
    ScanSettings {
        page_delay: Duration::ZERO,
        ..ScanSettings::default()
    }
}

pub fn drain_settings() -> RecoverySettings {
    RecoverySettings {
        download_delay: Duration::ZERO,
        ..RecoverySettings::default()
    }
}

/// Feed whose pages can be replaced between runs.
#[derive(Default)]
pub struct ScriptedFeed {
    pages: Mutex<Vec<Vec<Clip>>>,
    requested: Mutex<Vec<u32>>,
}

impl ScriptedFeed {
    pub fn new(pages: Vec<Vec<Clip>>) -> Self {
        Self {
            pages: Mutex::new(pages),
            requested: Mutex::default(),
        }
    }

    pub fn set_pages(&self, pages: Vec<Vec<Clip>>) {
        *self.pages.lock().unwrap() = pages;
        self.requested.lock().unwrap().clear();
    }

    pub fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedPort for ScriptedFeed {
    async fn fetch_page(&self, page: u32) -> FetchResult<FeedPage> {
        self.requested.lock().unwrap().push(page);
        let clips = self
            .pages
            .lock()
            .unwrap()
            .get(page as usize)
            .cloned()
            .unwrap_or_default();
        Ok(FeedPage::new(page, clips))
    }
}

/// Media port writing the clip id as the body.
#[derive(Default)]
pub struct DiskMedia {
    failures: HashMap<String, FetchError>,
    calls: Mutex<Vec<String>>,
}

impl DiskMedia {
    pub fn failing(mut self, clip_id: &str, error: FetchError) -> Self {
        self.failures.insert(clip_id.to_string(), error);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaPort for DiskMedia {
    async fn download(&self, request: &MediaRequest<'_>) -> FetchResult<PathBuf> {
        self.calls.lock().unwrap().push(request.clip_id.to_string());
        if let Some(error) = self.failures.get(request.clip_id) {
            return Err(error.clone());
        }
        let path = reserve_unique_path(request.out_dir, request.base, MEDIA_EXTENSION);
        std::fs::write(&path, request.clip_id).unwrap();
        Ok(path)
    }
}
