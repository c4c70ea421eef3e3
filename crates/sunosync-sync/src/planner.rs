//! Bounded, failure-aware download planning.

use std::collections::HashSet;

use sunosync_core::{Catalog, CatalogEntry, Diff, FailureCeiling, FailureState};

/// Select the clips to download this cycle.
///
/// Bases named in `hints` come first, then the remaining missing bases;
/// both groups are visited in lexicographic order. Within a base, candidates
/// are taken oldest first and clips that exhausted their failure budget are
/// skipped. A base contributes at most its deficit, and the whole plan at
/// most `cap` entries.
pub fn build_plan(
    diff: &Diff,
    catalog: &Catalog,
    failures: &FailureState,
    hints: &[String],
    cap: usize,
    ceiling: FailureCeiling,
) -> Vec<CatalogEntry> {
    let hinted: HashSet<&str> = hints.iter().map(String::as_str).collect();
    let (first, rest): (Vec<&str>, Vec<&str>) = diff
        .missing
        .keys()
        .map(String::as_str)
        .partition(|base| hinted.contains(base));

    let mut plan = Vec::new();
    for base in first.into_iter().chain(rest) {
        if plan.len() >= cap {
            break;
        }

        let need = diff.need(base);
        let picks = catalog
            .candidates(base)
            .iter()
            .filter(|entry| !failures.is_exhausted(&entry.id, ceiling))
            .take(need.min(cap - plan.len()))
            .cloned();
        plan.extend(picks);
    }
    plan
}
