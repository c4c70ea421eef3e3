//! Port trait implementations for `SunoClient`.

use std::path::PathBuf;

use async_trait::async_trait;
use sunosync_core::{FeedPage, FeedPort, FetchResult, MediaPort, MediaRequest};

use crate::client::SunoClient;
use crate::http::HttpBackend;

#[async_trait]
impl<B: HttpBackend> FeedPort for SunoClient<B> {
    async fn fetch_page(&self, page: u32) -> FetchResult<FeedPage> {
        let clips = self.fetch_clips(page).await?;
        Ok(FeedPage::new(page, clips))
    }
}

#[async_trait]
impl<B: HttpBackend> MediaPort for SunoClient<B> {
    async fn download(&self, request: &MediaRequest<'_>) -> FetchResult<PathBuf> {
        self.download_media(request).await
    }
}
