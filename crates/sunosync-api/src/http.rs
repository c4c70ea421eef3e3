//! HTTP backend abstraction for the feed client.
//!
//! A trait-based backend allows dependency injection and easy testing. The
//! production implementation uses reqwest; retries live one level up in
//! [`crate::retry`], so backends perform exactly one request per call.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use rand::Rng;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::config::ApiClientConfig;
use crate::error::ApiResult;

// ============================================================================
// Status classification
// ============================================================================

/// How a response status is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx: use the body.
    Success,
    /// 401/403: credential rejected.
    Auth,
    /// 429, 5xx or anything unexpected: back off and retry.
    Retryable,
    /// Any other 4xx.
    NonRetryable,
}

/// Classify a status code, auth first.
pub const fn classify_status(status: u16) -> StatusClass {
    match status {
        401 | 403 => StatusClass::Auth,
        429 | 500..=599 => StatusClass::Retryable,
        400..=499 => StatusClass::NonRetryable,
        200..=299 => StatusClass::Success,
        _ => StatusClass::Retryable,
    }
}

/// Status and body of a buffered response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends.
///
/// This is an implementation detail - external code should use the port traits.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// GET a URL and buffer the whole body.
    async fn get(&self, url: &Url, timeout: Duration) -> ApiResult<RawResponse>;

    /// GET a URL and stream a successful body into `dest`.
    ///
    /// Returns the status. Nothing is written for a non-2xx status.
    async fn get_to_file(&self, url: &Url, dest: &Path, timeout: Duration) -> ApiResult<u16>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
///
/// Holds one client per configured proxy (or a single direct client) and
/// picks one at random for every request.
pub struct ReqwestBackend {
    clients: Vec<reqwest::Client>,
    auth_token: Option<String>,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &ApiClientConfig) -> ApiResult<Self> {
        let builder = || reqwest::Client::builder().user_agent(config.user_agent.clone());

        let clients = if config.proxies.is_empty() {
            vec![builder().build()?]
        } else {
            config
                .proxies
                .iter()
                .map(|proxy| -> ApiResult<reqwest::Client> {
                    let proxy = reqwest::Proxy::all(proxy.as_str())?;
                    Ok(builder().proxy(proxy).build()?)
                })
                .collect::<ApiResult<Vec<_>>>()?
        };

        Ok(Self {
            clients,
            auth_token: config.token.clone(),
        })
    }

    fn pick_client(&self) -> &reqwest::Client {
        let index = match self.clients.len() {
            0 | 1 => 0,
            len => rand::thread_rng().gen_range(0..len),
        };
        &self.clients[index]
    }

    /// Build a request with optional authentication.
    fn build_request(&self, url: &Url, timeout: Duration) -> reqwest::RequestBuilder {
        let mut request = self.pick_client().get(url.as_str()).timeout(timeout);
        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }
        request
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get(&self, url: &Url, timeout: Duration) -> ApiResult<RawResponse> {
        let response = self.build_request(url, timeout).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(RawResponse { status, body })
    }

    async fn get_to_file(&self, url: &Url, dest: &Path, timeout: Duration) -> ApiResult<u16> {
        let response = self.build_request(url, timeout).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Ok(status.as_u16());
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;
        file.sync_all().await?;

        Ok(status.as_u16())
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::error::ApiError;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::Mutex;

    /// Canned response for the fake backend.
    #[derive(Debug, Clone)]
    pub enum Canned {
        /// A status with a JSON body.
        Json(u16, serde_json::Value),
        /// A status with a raw body.
        Body(u16, Vec<u8>),
        /// A transport failure with the given message.
        Transport(String),
    }

    /// A fake HTTP backend that replays canned responses per URL pattern.
    ///
    /// Each pattern holds a queue; the last response of a queue repeats.
    #[derive(Default)]
    pub struct FakeBackend {
        routes: Mutex<Vec<(String, VecDeque<Canned>)>>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        /// Create a new fake backend.
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue responses for URLs containing `url_contains`.
        pub fn with_responses(self, url_contains: &str, responses: Vec<Canned>) -> Self {
            self.routes
                .lock()
                .unwrap()
                .push((url_contains.to_string(), responses.into()));
            self
        }

        /// URLs requested so far.
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        fn next(&self, url: &Url) -> Canned {
            self.requests.lock().unwrap().push(url.to_string());
            let mut routes = self.routes.lock().unwrap();
            let queue = routes
                .iter_mut()
                .find(|(pattern, _)| url.as_str().contains(pattern.as_str()))
                .map(|(_, queue)| queue);

            match queue {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
                Some(queue) => queue
                    .front()
                    .cloned()
                    .unwrap_or_else(|| Canned::Body(404, Vec::new())),
                None => Canned::Body(404, Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn get(&self, url: &Url, _timeout: Duration) -> ApiResult<RawResponse> {
            match self.next(url) {
                Canned::Json(status, json) => Ok(RawResponse {
                    status,
                    body: serde_json::to_vec(&json)?,
                }),
                Canned::Body(status, body) => Ok(RawResponse { status, body }),
                Canned::Transport(message) => Err(ApiError::Io(io::Error::other(message))),
            }
        }

        async fn get_to_file(&self, url: &Url, dest: &Path, _timeout: Duration) -> ApiResult<u16> {
            let (status, body) = match self.next(url) {
                Canned::Json(status, json) => (status, serde_json::to_vec(&json)?),
                Canned::Body(status, body) => (status, body),
                Canned::Transport(message) => return Err(ApiError::Io(io::Error::other(message))),
            };
            if (200..300).contains(&status) {
                tokio::fs::write(dest, body).await?;
            }
            Ok(status)
        }
    }
}
