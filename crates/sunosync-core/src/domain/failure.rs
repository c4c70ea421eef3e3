//! Consecutive download failures per clip.

use std::collections::BTreeMap;

use crate::settings::FailureCeiling;

/// Consecutive failure counters keyed by clip id.
///
/// Counters are never expired automatically. A clip whose counter reaches
/// the configured ceiling is excluded from plans until the ceiling changes
/// or the state file is reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureState {
    attempts: BTreeMap<String, u32>,
}

impl FailureState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a state from persisted counters.
    pub const fn from_attempts(attempts: BTreeMap<String, u32>) -> Self {
        Self { attempts }
    }

    /// Persisted counters.
    pub const fn attempts(&self) -> &BTreeMap<String, u32> {
        &self.attempts
    }

    /// Consecutive failures for a clip.
    pub fn count(&self, clip_id: &str) -> u32 {
        self.attempts.get(clip_id).copied().unwrap_or(0)
    }

    /// Record one more failure.
    pub fn record_failure(&mut self, clip_id: &str) -> u32 {
        let count = self.attempts.entry(clip_id.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Forget failures after a successful download.
    pub fn clear(&mut self, clip_id: &str) {
        self.attempts.remove(clip_id);
    }

    /// Whether the clip has used up its failure budget.
    pub fn is_exhausted(&self, clip_id: &str, ceiling: FailureCeiling) -> bool {
        ceiling.is_reached(self.count(clip_id))
    }

    /// Number of clips with at least one recorded failure.
    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    /// Whether no failures are recorded.
    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_clear() {
        let mut state = FailureState::new();
        assert_eq!(state.record_failure("a"), 1);
        assert_eq!(state.record_failure("a"), 2);
        assert_eq!(state.count("a"), 2);

        state.clear("a");
        assert_eq!(state.count("a"), 0);
        assert!(state.is_empty());
    }

    #[test]
    fn test_exhaustion_respects_ceiling() {
        let mut state = FailureState::new();
        state.record_failure("a");
        state.record_failure("a");

        assert!(state.is_exhausted("a", FailureCeiling::Limited(2)));
        assert!(!state.is_exhausted("a", FailureCeiling::Limited(3)));
        assert!(!state.is_exhausted("a", FailureCeiling::Unlimited));
        assert!(!state.is_exhausted("b", FailureCeiling::Limited(1)));
    }
}
