//! Paginated feed port.

use async_trait::async_trait;

use super::error::FetchResult;
use crate::domain::Clip;

/// One page of the remote feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedPage {
    /// Zero-based page index.
    pub index: u32,
    /// Clips in feed order. Unknown remote fields are retained on each clip.
    pub clips: Vec<Clip>,
}

impl FeedPage {
    /// Create a page.
    pub const fn new(index: u32, clips: Vec<Clip>) -> Self {
        Self { index, clips }
    }

    /// An empty page marks the end of the feed.
    pub fn is_end(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Port trait for reading the remote feed, newest first.
#[async_trait]
pub trait FeedPort: Send + Sync {
    /// Fetch one page, retrying transient failures internally.
    async fn fetch_page(&self, page: u32) -> FetchResult<FeedPage>;
}
