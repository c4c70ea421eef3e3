//! Paginated feed requests.

use sunosync_core::{Clip, FetchError, FetchResult};
use tracing::debug;

use super::SunoClient;
use crate::error::ApiError;
use crate::http::{HttpBackend, StatusClass, classify_status};
use crate::parsing::parse_feed_body;
use crate::retry::{Attempt, run_with_retry};

impl<B: HttpBackend> SunoClient<B> {
    /// Fetch one feed page with retries.
    pub(crate) async fn fetch_clips(&self, page: u32) -> FetchResult<Vec<Clip>> {
        let target = format!("page {page}");
        let clips = run_with_retry(&self.feed_retry, &target, || self.fetch_page_once(page)).await?;
        debug!(page, clips = clips.len(), "Fetched feed page");
        Ok(clips)
    }

    async fn fetch_page_once(&self, page: u32) -> Attempt<Vec<Clip>> {
        let url = self.page_url(page);
        let response = match self.backend.get(&url, self.feed_retry.timeout).await {
            Ok(response) => response,
            Err(error) => return Attempt::Retry(error),
        };

        match classify_status(response.status) {
            StatusClass::Auth => Attempt::Fail(FetchError::Auth {
                status: response.status,
            }),
            StatusClass::NonRetryable => {
                Attempt::Fail(FetchError::non_retryable(response.status, format!("page {page}")))
            }
            StatusClass::Retryable => Attempt::Retry(ApiError::Status {
                status: response.status,
                url: url.to_string(),
            }),
            StatusClass::Success => match parse_feed_body(&response.body) {
                Ok(clips) => Attempt::Done(clips),
                Err(error) => Attempt::Retry(error),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::test_config;
    use super::*;
    use crate::http::testing::{Canned, FakeBackend};
    use serde_json::json;

    fn client(backend: FakeBackend) -> SunoClient<FakeBackend> {
        SunoClient::with_backend(&test_config(), backend).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_page_parses_clips() {
        let backend = FakeBackend::new().with_responses(
            "page=0",
            vec![Canned::Json(200, json!({"clips": [{"id": "a"}, {"id": "b"}]}))],
        );
        let clips = client(backend).fetch_clips(0).await.unwrap();
        assert_eq!(clips.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retryable_status_then_success() {
        let backend = FakeBackend::new().with_responses(
            "page=1",
            vec![
                Canned::Body(429, Vec::new()),
                Canned::Body(200, b"not json".to_vec()),
                Canned::Json(200, json!([])),
            ],
        );
        let client = client(backend);
        let clips = client.fetch_clips(1).await.unwrap();
        assert!(clips.is_empty());
        assert_eq!(client.backend.requests().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auth_is_terminal() {
        let backend =
            FakeBackend::new().with_responses("page=0", vec![Canned::Body(401, Vec::new())]);
        let client = client(backend);
        assert_eq!(
            client.fetch_clips(0).await,
            Err(FetchError::Auth { status: 401 })
        );
        assert_eq!(client.backend.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_is_non_retryable() {
        let backend =
            FakeBackend::new().with_responses("page=5", vec![Canned::Body(404, Vec::new())]);
        let err = client(backend).fetch_clips(5).await.unwrap_err();
        assert_eq!(err, FetchError::non_retryable(404, "page 5"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failures_exhaust_budget() {
        let backend = FakeBackend::new().with_responses(
            "page=2",
            vec![Canned::Transport(
                "failed to lookup address information".to_string(),
            )],
        );
        let client = client(backend);
        let err = client.fetch_clips(2).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::RetryExceeded { attempts: 3, .. }
        ));
        assert_eq!(client.backend.requests().len(), 3);
    }
}
