//! Per-base-name counters.

use std::collections::BTreeMap;

/// Number of items per canonical base name.
///
/// Used both for expected remote state (distinct clips per base) and for
/// the local inventory (files on disk per base).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseCounts(BTreeMap<String, usize>);

impl BaseCounts {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the counter for `base`.
    pub fn add(&mut self, base: impl Into<String>) {
        *self.0.entry(base.into()).or_insert(0) += 1;
    }

    /// Count for `base` (zero when absent).
    pub fn get(&self, base: &str) -> usize {
        self.0.get(base).copied().unwrap_or(0)
    }

    /// Sum over all bases.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Number of distinct bases.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no base has been counted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate bases in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(base, count)| (base.as_str(), *count))
    }
}

impl FromIterator<String> for BaseCounts {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let mut counts = Self::new();
        for base in iter {
            counts.add(base);
        }
        counts
    }
}

impl<'a> FromIterator<&'a str> for BaseCounts {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

impl<'a> FromIterator<(&'a str, usize)> for BaseCounts {
    fn from_iter<T: IntoIterator<Item = (&'a str, usize)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}
