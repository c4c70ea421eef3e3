//! Output directory resolution and the files kept inside it.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUT_DIR: &str = "out";

/// Environment variable overriding the output directory.
pub const OUT_DIR_ENV: &str = "SUNOSYNC_OUT_DIR";

/// Page cache directory name inside the output directory.
pub const CACHE_DIR_NAME: &str = "api_cache";

/// Failure-state file name.
pub const STATE_FILE_NAME: &str = "targeted_update_state.json";

/// Missing-bases report name.
pub const MISSING_FILE_NAME: &str = "progress_missing.txt";

/// Extra-bases report name.
pub const EXTRA_FILE_NAME: &str = "progress_extra.txt";

/// Run summary name.
pub const SUMMARY_FILE_NAME: &str = "progress_summary.json";

/// How the output directory was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutDirSource {
    /// The user passed `--out-dir`.
    Explicit,
    /// The path came from `SUNOSYNC_OUT_DIR` / `.env`.
    EnvVar,
    /// Fallback default (`./out`).
    Default,
}

/// Resolution result for the output directory.
#[derive(Debug, Clone)]
pub struct OutDirResolution {
    /// The resolved, absolute output directory.
    pub path: PathBuf,
    /// How the path was determined.
    pub source: OutDirSource,
}

/// Expand `~` and make a user-supplied path absolute.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed == "~" {
        dirs::home_dir().ok_or(PathError::NoHomeDir)?
    } else if let Some(rest) = trimmed.strip_prefix("~/") {
        dirs::home_dir().ok_or(PathError::NoHomeDir)?.join(rest)
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(PathError::CurrentDir)
    }
}

/// Resolve the output directory from an explicit override, env var, or default.
///
/// Resolution order:
/// 1. Explicit path provided by caller (highest priority)
/// 2. `SUNOSYNC_OUT_DIR` environment variable
/// 3. `./out`
pub fn resolve_out_dir(explicit: Option<&str>) -> Result<OutDirResolution, PathError> {
    let env_value = env::var(OUT_DIR_ENV).ok();
    resolve_out_dir_from(explicit, env_value.as_deref())
}

/// Same as [`resolve_out_dir`] with the environment value passed in.
pub fn resolve_out_dir_from(
    explicit: Option<&str>,
    env_value: Option<&str>,
) -> Result<OutDirResolution, PathError> {
    if let Some(path_str) = explicit {
        return Ok(OutDirResolution {
            path: normalize_user_path(path_str)?,
            source: OutDirSource::Explicit,
        });
    }

    if let Some(env_path) = env_value.filter(|v| !v.trim().is_empty()) {
        return Ok(OutDirResolution {
            path: normalize_user_path(env_path)?,
            source: OutDirSource::EnvVar,
        });
    }

    Ok(OutDirResolution {
        path: normalize_user_path(DEFAULT_OUT_DIR)?,
        source: OutDirSource::Default,
    })
}

/// Every file and directory the engine reads or writes for one output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Directory holding mirrored audio files and all artifacts.
    pub out_dir: PathBuf,
    /// Page cache directory.
    pub cache_dir: PathBuf,
    /// Failure-state file.
    pub state_file: PathBuf,
    /// Missing-bases report.
    pub missing_file: PathBuf,
    /// Extra-bases report.
    pub extra_file: PathBuf,
    /// Run summary.
    pub summary_file: PathBuf,
}

impl OutputLayout {
    /// Default layout rooted at `out_dir`.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        let out_dir = out_dir.into();
        Self {
            cache_dir: out_dir.join(CACHE_DIR_NAME),
            state_file: out_dir.join(STATE_FILE_NAME),
            missing_file: out_dir.join(MISSING_FILE_NAME),
            extra_file: out_dir.join(EXTRA_FILE_NAME),
            summary_file: out_dir.join(SUMMARY_FILE_NAME),
            out_dir,
        }
    }

    /// Override the page cache directory.
    #[must_use]
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    /// Override the failure-state file.
    #[must_use]
    pub fn with_state_file(mut self, state_file: impl Into<PathBuf>) -> Self {
        self.state_file = state_file.into();
        self
    }

    /// Log file for a command (`check.log`, `update.log`, ...).
    pub fn log_file(&self, command: &str) -> PathBuf {
        self.out_dir.join(format!("{command}.log"))
    }

    /// Output directory.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

impl fmt::Display for OutputLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "out_dir = {}", self.out_dir.display())?;
        writeln!(f, "cache_dir = {}", self.cache_dir.display())?;
        writeln!(f, "state_file = {}", self.state_file.display())?;
        writeln!(f, "missing_file = {}", self.missing_file.display())?;
        writeln!(f, "extra_file = {}", self.extra_file.display())?;
        write!(f, "summary_file = {}", self.summary_file.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_explicit() {
        let resolved = resolve_out_dir_from(Some("/tmp/explicit"), Some("/tmp/env")).unwrap();
        assert_eq!(resolved.source, OutDirSource::Explicit);
        assert_eq!(resolved.path, PathBuf::from("/tmp/explicit"));
    }

    #[test]
    fn test_resolve_env_value() {
        let resolved = resolve_out_dir_from(None, Some("/tmp/from-env")).unwrap();
        assert_eq!(resolved.source, OutDirSource::EnvVar);
        assert!(resolved.path.ends_with("from-env"));
    }

    #[test]
    fn test_blank_env_falls_back_to_default() {
        let resolved = resolve_out_dir_from(None, Some("  ")).unwrap();
        assert_eq!(resolved.source, OutDirSource::Default);
        assert!(resolved.path.is_absolute());
        assert!(resolved.path.ends_with(DEFAULT_OUT_DIR));
    }

    #[test]
    fn test_empty_explicit_is_rejected() {
        let err = resolve_out_dir_from(Some(" "), None).unwrap_err();
        assert!(matches!(err, PathError::EmptyPath));
    }

    #[test]
    fn test_layout_defaults_and_overrides() {
        let layout = OutputLayout::new("/data/out").with_cache_dir("/cache");
        assert_eq!(layout.cache_dir, PathBuf::from("/cache"));
        assert_eq!(
            layout.state_file,
            PathBuf::from("/data/out/targeted_update_state.json")
        );
        assert_eq!(layout.log_file("check"), PathBuf::from("/data/out/check.log"));

        let text = layout.to_string();
        assert!(text.contains("out_dir = /data/out"));
        assert!(text.contains("cache_dir = /cache"));
    }
}
