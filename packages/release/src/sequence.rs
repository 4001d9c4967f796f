//! Notice-scoped id sequences.

use std::collections::HashMap;

/// Sequential id generator for producers that mint their own ids.
///
/// One sequence is created per notice and per producer invocation, so ids
/// restart at `1` for every notice and never leak between notices. Each
/// scope (usually the target collection) counts independently.
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    counters: HashMap<String, u64>,
}

impl IdSequence {
    /// Create a fresh sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the next id in a scope.
    ///
    /// # Examples
    /// ```
    /// use ted_ocds_release::IdSequence;
    ///
    /// let mut ids = IdSequence::new();
    /// assert_eq!(ids.next_id("statistics"), "1");
    /// assert_eq!(ids.next_id("statistics"), "2");
    /// assert_eq!(ids.next_id("items"), "1");
    /// ```
    pub fn next_id(&mut self, scope: &str) -> String {
        let counter = self.counters.entry(scope.to_string()).or_insert(0);
        *counter += 1;
        counter.to_string()
    }

    /// Number of ids handed out in a scope.
    #[must_use]
    pub fn count(&self, scope: &str) -> u64 {
        self.counters.get(scope).copied().unwrap_or(0)
    }
}
