//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Output layout (flag, environment, default) and its directories
//! - Bearer credential (flag, environment, token file)
//! - The reqwest-backed feed and media client
//!
//! Command handlers receive the composed [`CliContext`] and delegate to
//! `sunosync-sync`.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use sunosync_api::{ApiClientConfig, DefaultSunoClient};
use sunosync_core::{
    NamingRules, OutputLayout, RetrySettings, ensure_directory, resolve_out_dir, validate_retry,
};
use sunosync_store::PageCache;
use tracing::debug;

use crate::commands::{ConnectionArgs, LayoutArgs};
use crate::error::CliError;

/// Fully composed context for commands that talk to the feed.
pub struct CliContext {
    /// Resolved output layout.
    pub layout: OutputLayout,
    /// Feed and media client.
    pub client: Arc<DefaultSunoClient>,
    /// Base-name derivation.
    pub naming: NamingRules,
}

impl CliContext {
    /// Open the page cache of this layout.
    pub fn open_cache(&self) -> Result<PageCache> {
        Ok(PageCache::open(&self.layout.cache_dir)?)
    }
}

/// Resolve the output layout and create the output directory.
pub fn resolve_layout(
    out_dir: Option<&str>,
    overrides: &LayoutArgs,
) -> Result<OutputLayout, CliError> {
    let resolution = resolve_out_dir(out_dir)?;
    debug!(
        path = %resolution.path.display(),
        source = ?resolution.source,
        "Resolved output directory"
    );
    ensure_directory(&resolution.path)?;

    let mut layout = OutputLayout::new(resolution.path);
    if let Some(cache_dir) = &overrides.cache_dir {
        layout = layout.with_cache_dir(cache_dir);
    }
    if let Some(state_file) = &overrides.state_file {
        layout = layout.with_state_file(state_file);
    }
    Ok(layout)
}

/// Resolve the bearer credential: explicit value first, then the token file.
pub fn resolve_token(explicit: Option<&str>, token_file: &Path) -> Result<String, CliError> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    let text = match std::fs::read_to_string(token_file) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CliError::TokenFileMissing {
                path: token_file.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(CliError::TokenRead {
                path: token_file.to_path_buf(),
                source,
            });
        }
    };

    let token = text.trim();
    if token.is_empty() {
        return Err(CliError::TokenEmpty {
            path: token_file.to_path_buf(),
        });
    }
    Ok(token.to_string())
}

/// Bootstrap the CLI context.
///
/// Validates both retry policies before anything touches the network.
pub fn bootstrap(
    layout: OutputLayout,
    connection: &ConnectionArgs,
    feed_retry: RetrySettings,
    media_retry: RetrySettings,
) -> Result<CliContext> {
    validate_retry(&feed_retry).map_err(CliError::from)?;
    validate_retry(&media_retry).map_err(CliError::from)?;

    let token = resolve_token(connection.token.as_deref(), &connection.token_file)?;
    let config = ApiClientConfig::new()
        .with_feed_url(&connection.feed_url)
        .with_token(token)
        .with_feed_retry(feed_retry)
        .with_media_retry(media_retry)
        .with_proxies(&connection.proxy);
    let client = Arc::new(DefaultSunoClient::new(&config)?);

    Ok(CliContext {
        layout,
        client,
        naming: NamingRules::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_explicit_token_wins() {
        let token = resolve_token(Some("  abc  "), Path::new("/nonexistent/token.txt")).unwrap();
        assert_eq!(token, "abc");
    }

    #[test]
    fn test_token_file_is_trimmed() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("token.txt");
        std::fs::write(&path, "secret\n").unwrap();

        assert_eq!(resolve_token(None, &path).unwrap(), "secret");
        assert_eq!(resolve_token(Some(""), &path).unwrap(), "secret");
    }

    #[test]
    fn test_missing_or_empty_token_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("token.txt");
        assert!(matches!(
            resolve_token(None, &path),
            Err(CliError::TokenFileMissing { .. })
        ));

        std::fs::write(&path, "  \n").unwrap();
        assert!(matches!(
            resolve_token(None, &path),
            Err(CliError::TokenEmpty { .. })
        ));
    }

    #[test]
    fn test_resolve_layout_applies_overrides() {
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("music");
        let overrides = LayoutArgs {
            cache_dir: Some(tmp.path().join("pages")),
            state_file: None,
        };

        let layout = resolve_layout(out.to_str(), &overrides).unwrap();

        assert!(out.is_dir());
        assert_eq!(layout.cache_dir, tmp.path().join("pages"));
        assert_eq!(layout.state_file, layout.out_dir.join("targeted_update_state.json"));
    }

    #[test]
    fn test_bootstrap_wires_proxies() {
        let tmp = tempdir().unwrap();
        let layout = OutputLayout::new(tmp.path());
        let connection = ConnectionArgs {
            token: Some("secret".to_string()),
            token_file: tmp.path().join("token.txt"),
            feed_url: sunosync_api::DEFAULT_FEED_URL.to_string(),
            proxy: vec!["http://127.0.0.1:8080".to_string()],
        };
        let feed = RetrySettings::for_feed();
        let media = RetrySettings::for_media();

        assert!(bootstrap(layout.clone(), &connection, feed, media).is_ok());

        let broken = ConnectionArgs {
            proxy: vec!["http://exa mple.com:8080".to_string()],
            ..connection
        };
        assert!(bootstrap(layout, &broken, feed, media).is_err());
    }
}
