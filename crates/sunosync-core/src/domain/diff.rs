//! Expected-vs-local comparison per base name.

use std::collections::BTreeMap;

use super::counts::BaseCounts;

/// A base with fewer local files than expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    /// Distinct remote clips with this base.
    pub expected: usize,
    /// Local files with this base.
    pub have: usize,
}

impl Shortfall {
    /// Number of files still to download.
    pub const fn need(&self) -> usize {
        self.expected.saturating_sub(self.have)
    }
}

/// A base with more local files than expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surplus {
    /// Local files with this base.
    pub have: usize,
    /// Distinct remote clips with this base.
    pub expected: usize,
}

impl Surplus {
    /// Number of unexpected local files.
    pub const fn excess(&self) -> usize {
        self.have.saturating_sub(self.expected)
    }
}

/// Missing and extra bases.
///
/// A base lands in at most one of the two maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// Bases with a deficit.
    pub missing: BTreeMap<String, Shortfall>,
    /// Bases with a surplus.
    pub extra: BTreeMap<String, Surplus>,
}

impl Diff {
    /// Compare expected counts against the local inventory.
    ///
    /// Both inputs must come from the same snapshot: recompute them right
    /// before calling this.
    pub fn compute(expected: &BaseCounts, actual: &BaseCounts) -> Self {
        let missing = expected
            .iter()
            .filter(|&(base, want)| actual.get(base) < want)
            .map(|(base, want)| {
                (
                    base.to_string(),
                    Shortfall {
                        expected: want,
                        have: actual.get(base),
                    },
                )
            })
            .collect();

        let extra = actual
            .iter()
            .filter(|&(base, have)| have > expected.get(base))
            .map(|(base, have)| {
                (
                    base.to_string(),
                    Surplus {
                        have,
                        expected: expected.get(base),
                    },
                )
            })
            .collect();

        Self { missing, extra }
    }

    /// Total number of files still to download.
    pub fn deficit(&self) -> usize {
        self.missing.values().map(Shortfall::need).sum()
    }

    /// Deficit for one base.
    pub fn need(&self, base: &str) -> usize {
        self.missing.get(base).map_or(0, Shortfall::need)
    }

    /// `base<TAB>need=<N><TAB>have=<M>` rows, sorted by base.
    pub fn missing_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.missing
            .iter()
            .map(|(base, s)| format!("{base}\tneed={}\thave={}", s.expected, s.have))
    }

    /// `base<TAB>have=<N><TAB>expected=<M>` rows, sorted by base.
    pub fn extra_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.extra
            .iter()
            .map(|(base, s)| format!("{base}\thave={}\texpected={}", s.have, s.expected))
    }
}
