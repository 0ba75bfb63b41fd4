//! Seen-message tracking.
//!
//! Remembers which message ids have already produced side effects so a
//! full-state push does not replay them. The set only grows; eviction, if
//! any, belongs to whoever persists it.

use std::collections::HashSet;

use gregor_types::MsgId;

/// Set of message ids already processed, keyed by encoded form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenMessages {
    seen: HashSet<String>,
}

impl SeenMessages {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a tracker from persisted encoded ids.
    pub fn from_encoded<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seen: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `id` has been marked.
    pub fn is_seen(&self, id: &MsgId) -> bool {
        self.seen.contains(&id.encoded())
    }

    /// Mark every id in `ids`. Returns how many were not already marked.
    pub fn mark_seen<'a, I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = &'a MsgId>,
    {
        ids.into_iter()
            .filter(|id| self.seen.insert(id.encoded()))
            .count()
    }

    /// Number of marked ids.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been marked.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Encoded ids, sorted, for handing to the persistence layer.
    pub fn export(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.seen.iter().cloned().collect();
        ids.sort();
        ids
    }
}
