//! Media body downloads.

use std::path::{Path, PathBuf};

use sunosync_core::{
    FetchError, FetchResult, MEDIA_EXTENSION, MediaRequest, NamingRules, reserve_unique_path,
};
use tracing::debug;
use url::Url;

use super::SunoClient;
use crate::error::ApiError;
use crate::http::{HttpBackend, StatusClass, classify_status};
use crate::retry::{Attempt, run_with_retry};

/// Hidden temporary name; its extension keeps it out of the inventory scan.
///
/// The remote id is sanitized so the file always lands directly in `out_dir`.
fn part_path(out_dir: &Path, clip_id: &str) -> PathBuf {
    let safe = NamingRules::default().sanitize(clip_id);
    let stem = if safe.is_empty() { "clip" } else { safe.as_str() };
    out_dir.join(format!(".{stem}.{MEDIA_EXTENSION}.part"))
}

impl<B: HttpBackend> SunoClient<B> {
    /// Download a media body and move it to a freshly reserved path.
    pub(crate) async fn download_media(&self, request: &MediaRequest<'_>) -> FetchResult<PathBuf> {
        let target = format!("clip {}", request.clip_id);
        let url = Url::parse(request.url).map_err(|_| FetchError::non_retryable(0, &target))?;
        let part = part_path(request.out_dir, request.clip_id);

        let result = run_with_retry(&self.media_retry, &target, || {
            self.download_once(&url, request, &part)
        })
        .await;

        if result.is_err() {
            let _ = tokio::fs::remove_file(&part).await;
        }
        result
    }

    async fn download_once(
        &self,
        url: &Url,
        request: &MediaRequest<'_>,
        part: &Path,
    ) -> Attempt<PathBuf> {
        let status = match self
            .backend
            .get_to_file(url, part, self.media_retry.timeout)
            .await
        {
            Ok(status) => status,
            Err(error) => {
                let _ = tokio::fs::remove_file(part).await;
                return Attempt::Retry(error);
            }
        };

        match classify_status(status) {
            StatusClass::Auth => Attempt::Fail(FetchError::Auth { status }),
            StatusClass::NonRetryable => Attempt::Fail(FetchError::non_retryable(
                status,
                format!("clip {}", request.clip_id),
            )),
            StatusClass::Retryable => Attempt::Retry(ApiError::Status {
                status,
                url: url.to_string(),
            }),
            StatusClass::Success => {
                let dest = reserve_unique_path(request.out_dir, request.base, MEDIA_EXTENSION);
                match tokio::fs::rename(part, &dest).await {
                    Ok(()) => {
                        debug!(clip_id = request.clip_id, path = %dest.display(), "Saved media");
                        Attempt::Done(dest)
                    }
                    Err(error) => Attempt::Retry(ApiError::Io(error)),
                }
            }
        }
    }
}
