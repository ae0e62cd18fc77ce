//! Run-wide set of accepted train names.

use std::collections::HashSet;

/// Train names accepted so far in this run.
///
/// Keyed by name alone: two departures named "ICE 100" on different
/// stations count as the same train, and whichever station is crawled
/// first keeps it. Entries are never removed.
#[derive(Debug, Clone, Default)]
pub struct DedupRegistry {
    names: HashSet<String>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` has already been accepted.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Record `name`. Returns `false` if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
