//! Expected remote state derived from cached clips.

use std::collections::{BTreeMap, HashSet};

use super::clip::Clip;
use super::counts::BaseCounts;
use super::naming::NamingRules;

/// A downloadable clip resolved to its canonical base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Remote clip id.
    pub id: String,
    /// Title for logs (liked prefix applied, not sanitized).
    pub title: String,
    /// Canonical base name.
    pub base: String,
    /// URL of the audio body.
    pub audio_url: String,
    /// Creation timestamp, empty when unknown.
    pub created_at: String,
}

/// Expected remote state: distinct downloadable clips grouped by base name.
///
/// Rebuilt from the cache on every reconciliation pass, never persisted.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    by_base: BTreeMap<String, Vec<CatalogEntry>>,
    skipped: usize,
}

impl Catalog {
    /// Build the catalog from clips in feed order.
    ///
    /// Clips are deduplicated by id (first occurrence wins). Clips without an
    /// id or media URL cannot be mirrored and are counted as skipped. Within a
    /// base, candidates are ordered by `(created_at, id)`.
    pub fn build(clips: &[Clip], rules: &NamingRules) -> Self {
        let mut seen = HashSet::new();
        let mut by_base: BTreeMap<String, Vec<CatalogEntry>> = BTreeMap::new();
        let mut skipped = 0;

        for clip in clips {
            let (Some(id), Some(audio_url)) = (clip.id(), clip.audio_url()) else {
                skipped += 1;
                continue;
            };
            if !seen.insert(id) {
                continue;
            }

            let base = rules.canonical_base(clip);
            by_base.entry(base.clone()).or_default().push(CatalogEntry {
                id: id.to_string(),
                title: rules.display_title(clip),
                base,
                audio_url: audio_url.to_string(),
                created_at: clip.created_at().to_string(),
            });
        }

        for entries in by_base.values_mut() {
            entries.sort_by(|a, b| (&a.created_at, &a.id).cmp(&(&b.created_at, &b.id)));
        }

        Self { by_base, skipped }
    }

    /// Number of distinct clips expected for each base.
    pub fn expected_counts(&self) -> BaseCounts {
        self.by_base
            .iter()
            .map(|(base, entries)| (base.as_str(), entries.len()))
            .collect()
    }

    /// Candidate clips for a base, oldest first.
    pub fn candidates(&self, base: &str) -> &[CatalogEntry] {
        self.by_base.get(base).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of expected clips.
    pub fn len(&self) -> usize {
        self.by_base.values().map(Vec::len).sum()
    }

    /// Whether the catalog holds no clips.
    pub fn is_empty(&self) -> bool {
        self.by_base.is_empty()
    }

    /// Clips dropped because they had no id or media URL.
    pub const fn skipped(&self) -> usize {
        self.skipped
    }
}
