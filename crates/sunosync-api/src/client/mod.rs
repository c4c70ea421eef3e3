//! Feed client.
//!
//! Generic over an HTTP backend so tests can replay canned responses.
//! Use [`DefaultSunoClient`] in production and interact with it through the
//! `FeedPort` / `MediaPort` traits.

mod feed;
mod media;

use sunosync_core::RetrySettings;
use url::Url;

use crate::config::ApiClientConfig;
use crate::error::ApiResult;
use crate::http::{HttpBackend, ReqwestBackend};

/// Default client using the reqwest HTTP backend.
pub type DefaultSunoClient = SunoClient<ReqwestBackend>;

/// Client for the remote clip feed and its media bodies.
pub struct SunoClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) feed_url: Url,
    pub(crate) feed_retry: RetrySettings,
    pub(crate) media_retry: RetrySettings,
}

impl DefaultSunoClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &ApiClientConfig) -> ApiResult<Self> {
        let backend = ReqwestBackend::new(config)?;
        SunoClient::with_backend(config, backend)
    }
}

impl<B: HttpBackend> SunoClient<B> {
    /// Create a client with a custom backend.
    pub(crate) fn with_backend(config: &ApiClientConfig, backend: B) -> ApiResult<Self> {
        Ok(Self {
            backend,
            feed_url: Url::parse(&config.feed_url)?,
            feed_retry: config.feed_retry,
            media_retry: config.media_retry,
        })
    }

    /// Feed URL for a page index.
    pub(crate) fn page_url(&self, page: u32) -> Url {
        let mut url = self.feed_url.clone();
        url.query_pairs_mut()
            .append_pair("page", &page.to_string());
        url
    }
}
