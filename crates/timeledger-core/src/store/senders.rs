//! Normalized sender address sets.

use std::collections::BTreeSet;

/// Trims and lowercases a sender string.
///
/// Returns `None` when nothing is left, so blank input never enters a set.
#[must_use]
pub fn normalize_sender(raw: &str) -> Option<String> {
    let normalized = raw.trim().to_lowercase();
    (!normalized.is_empty()).then_some(normalized)
}

/// A set of normalized sender addresses (the marked or excluded list).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderSet {
    senders: BTreeSet<String>,
}

impl SenderSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sender after normalizing it. Returns true if it was new.
    pub fn insert(&mut self, raw: &str) -> bool {
        normalize_sender(raw).is_some_and(|sender| self.senders.insert(sender))
    }

    /// Removes a sender after normalizing it. Returns true if it was present.
    pub fn remove(&mut self, raw: &str) -> bool {
        normalize_sender(raw).is_some_and(|sender| self.senders.remove(&sender))
    }

    /// Case-insensitive, whitespace-trimmed exact membership test.
    #[must_use]
    pub fn contains(&self, raw: &str) -> bool {
        normalize_sender(raw).is_some_and(|sender| self.senders.contains(&sender))
    }

    /// Iterates over the normalized senders in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.senders.iter().map(String::as_str)
    }

    /// Number of senders in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.senders.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}
