//! In-memory ports for unit tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use sunosync_core::{
    Clip, FeedPage, FeedPort, FetchError, FetchResult, MEDIA_EXTENSION, MediaPort, MediaRequest,
    reserve_unique_path,
};

/// Clip with a media URL and creation timestamp.
pub fn clip(id: &str, title: &str, created_at: &str) -> Clip {
    Clip::new(id, title)
        .with_audio_url(format!("https://cdn.example/{id}.mp3"))
        .with_created_at(created_at)
}

/// Feed serving canned pages; pages past the end are empty.
#[derive(Default)]
pub struct FakeFeed {
    pages: Vec<FetchResult<Vec<Clip>>>,
    requested: Mutex<Vec<u32>>,
}

impl FakeFeed {
    pub fn with_pages(pages: Vec<Vec<Clip>>) -> Self {
        Self {
            pages: pages.into_iter().map(Ok).collect(),
            requested: Mutex::default(),
        }
    }

    /// Fail at `page` with `error`, after the pages already configured.
    pub fn failing_at(mut self, page: usize, error: FetchError) -> Self {
        while self.pages.len() <= page {
            self.pages.push(Ok(Vec::new()));
        }
        self.pages[page] = Err(error);
        self
    }

    pub fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedPort for FakeFeed {
    async fn fetch_page(&self, page: u32) -> FetchResult<FeedPage> {
        self.requested.lock().unwrap().push(page);
        match self.pages.get(page as usize) {
            Some(Ok(clips)) => Ok(FeedPage::new(page, clips.clone())),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(FeedPage::new(page, Vec::new())),
        }
    }
}

/// Media port writing a small file, or failing for configured clip ids.
#[derive(Default)]
pub struct FakeMedia {
    failures: HashMap<String, FetchError>,
    calls: Mutex<Vec<String>>,
}

impl FakeMedia {
    pub fn failing(mut self, clip_id: &str, error: FetchError) -> Self {
        self.failures.insert(clip_id.to_string(), error);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaPort for FakeMedia {
    async fn download(&self, request: &MediaRequest<'_>) -> FetchResult<PathBuf> {
        self.calls.lock().unwrap().push(request.clip_id.to_string());
        if let Some(error) = self.failures.get(request.clip_id) {
            return Err(error.clone());
        }
        let path = reserve_unique_path(request.out_dir, request.base, MEDIA_EXTENSION);
        std::fs::write(&path, request.clip_id)
            .map_err(|e| FetchError::retry_exceeded(request.clip_id, 1, e.to_string()))?;
        Ok(path)
    }
}
