//! Public configuration for the feed client.

use sunosync_core::RetrySettings;

/// Feed endpoint; the page index is appended as the `page` query parameter.
pub const DEFAULT_FEED_URL: &str = "https://studio-api.prod.suno.com/api/feed/v2?hide_disliked=true&hide_gen_stems=true&hide_studio_clips=true";

/// Configuration for the feed client.
///
/// # Example
///
/// ```
/// use sunosync_api::ApiClientConfig;
///
/// let config = ApiClientConfig::new()
///     .with_token("secret")
///     .with_user_agent("my-mirror/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Feed URL without the page parameter.
    pub(crate) feed_url: String,
    /// User agent string for HTTP requests.
    pub(crate) user_agent: String,
    /// Bearer credential.
    pub(crate) token: Option<String>,
    /// Retry policy for feed pages.
    pub(crate) feed_retry: RetrySettings,
    /// Retry policy for media bodies.
    pub(crate) media_retry: RetrySettings,
    /// Proxy URLs; one is picked at random for every request.
    pub(crate) proxies: Vec<String>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            user_agent: concat!("sunosync/", env!("CARGO_PKG_VERSION")).to_string(),
            token: None,
            feed_retry: RetrySettings::for_feed(),
            media_retry: RetrySettings::for_media(),
            proxies: Vec::new(),
        }
    }
}

impl ApiClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the feed URL.
    #[must_use]
    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.feed_url = url.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the bearer credential.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set an optional bearer credential.
    #[must_use]
    pub fn with_optional_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Set the retry policy for feed pages.
    #[must_use]
    pub const fn with_feed_retry(mut self, retry: RetrySettings) -> Self {
        self.feed_retry = retry;
        self
    }

    /// Set the retry policy for media downloads.
    #[must_use]
    pub const fn with_media_retry(mut self, retry: RetrySettings) -> Self {
        self.media_retry = retry;
        self
    }

    /// Route requests through these proxies (`scheme://host:port`).
    ///
    /// Blank entries are ignored; an empty list means a direct connection.
    #[must_use]
    pub fn with_proxies<I, S>(mut self, proxies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.proxies = proxies
            .into_iter()
            .map(|proxy| {
                let proxy: String = proxy.into();
                proxy.trim().to_string()
            })
            .filter(|proxy| !proxy.is_empty())
            .collect();
        self
    }
}
