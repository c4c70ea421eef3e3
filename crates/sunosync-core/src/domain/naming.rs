//! Canonical base names for clips.
//!
//! Local files carry no remote id, so the mirror reconciles by name: every
//! clip maps to a deterministic, filesystem-safe base name, and files on disk
//! are `<base>.mp3`, `<base> v2.mp3`, `<base> v3.mp3`, ...
//!
//! A base never ends in ` v<N>` itself: `"Song v2"` becomes `"Song_v2"` so its
//! file is not counted as a second copy of `"Song"`.

use super::clip::Clip;

/// Prefix marking liked clips.
pub const DEFAULT_LIKED_PREFIX: &str = "(Liked) ";

/// Prefix for clips without a usable title.
pub const DEFAULT_UNTITLED_PREFIX: &str = "Untitled";

/// Maximum length (in characters) of a base name.
pub const DEFAULT_MAX_NAME_LEN: usize = 200;

/// Naming configuration.
///
/// The same rules must be used for every run against a given output
/// directory, otherwise previously downloaded files stop matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingRules {
    /// Prefix applied once to liked clips.
    pub liked_prefix: String,
    /// Prefix for the untitled fallback name.
    pub untitled_prefix: String,
    /// Character cap applied after sanitization.
    pub max_len: usize,
}

impl Default for NamingRules {
    fn default() -> Self {
        Self {
            liked_prefix: DEFAULT_LIKED_PREFIX.to_string(),
            untitled_prefix: DEFAULT_UNTITLED_PREFIX.to_string(),
            max_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

impl NamingRules {
    /// Replace filesystem-unsafe characters with `_`, strip leading and
    /// trailing spaces and dots, then cap the length.
    pub fn sanitize(&self, name: &str) -> String {
        let replaced: String = name
            .chars()
            .map(|c| if is_unsafe_char(c) { '_' } else { c })
            .collect();
        replaced
            .trim_matches(|c| c == ' ' || c == '.')
            .chars()
            .take(self.max_len)
            .collect()
    }

    /// Canonical base name for a clip.
    pub fn canonical_base(&self, clip: &Clip) -> String {
        let title = clip.trimmed_title();
        let sanitized = self.sanitize(title);
        let base = if sanitized.is_empty() {
            self.untitled_base(clip)
        } else {
            sanitized
        };
        escape_version_suffix(self.apply_liked_prefix(base, clip.is_liked(), true))
    }

    /// Human readable title for logs: liked prefix applied, no sanitization.
    pub fn display_title(&self, clip: &Clip) -> String {
        let title = clip.trimmed_title();
        if title.is_empty() {
            return self.canonical_base(clip);
        }
        self.apply_liked_prefix(title.to_string(), clip.is_liked(), false)
    }

    fn untitled_base(&self, clip: &Clip) -> String {
        let id_prefix: String = clip.id().unwrap_or("unknown").chars().take(8).collect();
        let created_at = clip.created_at();
        let date_part = if created_at.chars().count() >= 10 {
            created_at.chars().take(10).collect()
        } else {
            "unknown-date".to_string()
        };
        self.sanitize(&format!("{} {date_part} {id_prefix}", self.untitled_prefix))
    }

    fn apply_liked_prefix(&self, name: String, liked: bool, sanitize: bool) -> String {
        if !liked || name.starts_with(&self.liked_prefix) {
            return name;
        }
        let prefixed = format!("{}{name}", self.liked_prefix);
        if sanitize {
            self.sanitize(&prefixed)
        } else {
            prefixed
        }
    }
}

/// Characters that are not allowed in file names on common filesystems.
const fn is_unsafe_char(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' | '\x00'..='\x1f')
}

/// Turn a trailing ` v<N>` into `_v<N>`.
fn escape_version_suffix(name: String) -> String {
    let stem_len = strip_version_suffix(&name).len();
    if stem_len == name.len() {
        return name;
    }
    format!("{}_{}", &name[..stem_len], &name[stem_len + 1..])
}

/// Strip a trailing ` v<N>` version suffix from a file stem.
///
/// `"Song v3"` becomes `"Song"`, `"Song"` and `"Song v"` are returned as-is.
pub fn strip_version_suffix(stem: &str) -> &str {
    if let Some((base, version)) = stem.rsplit_once(" v") {
        if !version.is_empty() && version.bytes().all(|b| b.is_ascii_digit()) {
            return base;
        }
    }
    stem
}
