//! Media body retrieval port.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::error::FetchResult;

/// A single media body to mirror.
#[derive(Debug, Clone, Copy)]
pub struct MediaRequest<'a> {
    /// Remote clip id, used for logs and the temporary file name.
    pub clip_id: &'a str,
    /// URL of the audio body.
    pub url: &'a str,
    /// Directory receiving the finished file.
    pub out_dir: &'a Path,
    /// Canonical base name of the clip.
    pub base: &'a str,
}

/// Port trait for downloading media bodies.
///
/// Implementations stream to a temporary name and only expose the file under
/// a freshly reserved `<base>.mp3` / `<base> vN.mp3` path once complete, so an
/// interrupted download never shows up in the local inventory.
#[async_trait]
pub trait MediaPort: Send + Sync {
    /// Download the body and return the final path.
    async fn download(&self, request: &MediaRequest<'_>) -> FetchResult<PathBuf>;
}
