//! Remote clip records as returned by the feed.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One remote media record.
///
/// Only the fields the mirror needs are typed; everything else the API sends
/// is kept in `extra` so cache pages round-trip without losing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Globally unique remote identifier.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    /// User-visible title (may be missing or blank).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Creation timestamp, ISO-ish (`2024-05-01T12:00:00Z`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// URL of the audio body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,

    /// URL of the cover image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Whether the owner liked this clip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,

    /// Display name of the clip owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Untyped remainder of the remote record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Clip {
    /// Create a minimal clip, mostly useful for tests and fixtures.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: Some(title.into()),
            created_at: None,
            audio_url: None,
            image_url: None,
            is_liked: None,
            display_name: None,
            extra: Map::new(),
        }
    }

    /// Set the audio URL.
    #[must_use]
    pub fn with_audio_url(mut self, url: impl Into<String>) -> Self {
        self.audio_url = Some(url.into());
        self
    }

    /// Set the creation timestamp.
    #[must_use]
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    /// Set the liked flag.
    #[must_use]
    pub const fn with_liked(mut self, liked: bool) -> Self {
        self.is_liked = Some(liked);
        self
    }

    /// Non-empty identifier, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Title with surrounding whitespace removed; empty when missing.
    pub fn trimmed_title(&self) -> &str {
        self.title.as_deref().map_or("", str::trim)
    }

    /// Creation timestamp, empty when missing.
    pub fn created_at(&self) -> &str {
        self.created_at.as_deref().unwrap_or("")
    }

    /// Non-empty audio URL, if any.
    pub fn audio_url(&self) -> Option<&str> {
        self.audio_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Whether the clip is liked.
    pub fn is_liked(&self) -> bool {
        self.is_liked.unwrap_or(false)
    }

    /// A clip can only be mirrored when it has both an id and a media URL.
    pub fn is_downloadable(&self) -> bool {
        self.id().is_some() && self.audio_url().is_some()
    }
}

/// Drop repeated clips, keeping the first occurrence of every id.
///
/// Clips without an id are never considered duplicates and are kept in place.
/// Applying this to an already deduplicated sequence returns it unchanged.
pub fn dedupe_by_id<I>(clips: I) -> Vec<Clip>
where
    I: IntoIterator<Item = Clip>,
{
    let mut seen = HashSet::new();
    clips
        .into_iter()
        .filter(|clip| clip.id().is_none_or(|id| seen.insert(id.to_string())))
        .collect()
}

/// Accept ids encoded as strings or numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(clips: &[Clip]) -> Vec<Option<&str>> {
        clips.iter().map(Clip::id).collect()
    }

    #[test]
    fn test_deserialize_keeps_unknown_fields() {
        let clip: Clip = serde_json::from_value(json!({
            "id": "abc",
            "title": "Song",
            "audio_url": "https://cdn.example/abc.mp3",
            "metadata": {"tags": "lofi"}
        }))
        .unwrap();

        assert_eq!(clip.id(), Some("abc"));
        assert_eq!(clip.extra["metadata"]["tags"], "lofi");

        let back = serde_json::to_value(&clip).unwrap();
        assert_eq!(back["metadata"]["tags"], "lofi");
        assert!(back.get("image_url").is_none());
    }

    #[test]
    fn test_numeric_id_is_accepted() {
        let clip: Clip = serde_json::from_value(json!({"id": 42})).unwrap();
        assert_eq!(clip.id(), Some("42"));
    }

    #[test]
    fn test_null_fields_are_tolerated() {
        let clip: Clip =
            serde_json::from_value(json!({"id": null, "title": null, "is_liked": null})).unwrap();
        assert_eq!(clip.id(), None);
        assert_eq!(clip.trimmed_title(), "");
        assert!(!clip.is_liked());
    }

    #[test]
    fn test_downloadable_requires_id_and_url() {
        assert!(!Clip::new("a", "t").is_downloadable());
        assert!(Clip::new("a", "t").with_audio_url("u").is_downloadable());
        assert!(!Clip::new("", "t").with_audio_url("u").is_downloadable());
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let clips = vec![
            Clip::new("a", "first"),
            Clip::new("b", "b"),
            Clip::new("a", "second"),
        ];
        let deduped = dedupe_by_id(clips);
        assert_eq!(ids(&deduped), vec![Some("a"), Some("b")]);
        assert_eq!(deduped[0].trimmed_title(), "first");
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let mut anonymous = Clip::new("x", "anon");
        anonymous.id = None;
        let clips = vec![
            Clip::new("a", "a"),
            anonymous.clone(),
            Clip::new("a", "a"),
            anonymous,
            Clip::new("b", "b"),
        ];
        let once = dedupe_by_id(clips);
        let twice = dedupe_by_id(once.clone());
        assert_eq!(once, twice);
        assert_eq!(ids(&once), vec![Some("a"), None, None, Some("b")]);
    }
}
