//! Reachability state.
//!
//! Holds the single current value. Pushed changes are trusted only for an
//! authenticated session; probe results are always applied.

use gregor_types::Reachability;

use crate::{Intent, Session};

/// Current reachability, overwritten on every accepted update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReachabilityMonitor {
    current: Option<Reachability>,
}

impl ReachabilityMonitor {
    /// Create a monitor with no value yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest accepted value, `Unknown` before the first one.
    pub fn current(&self) -> Reachability {
        self.current.unwrap_or_default()
    }

    /// Whether any value has been accepted.
    pub fn is_seeded(&self) -> bool {
        self.current.is_some()
    }

    /// Apply a change pushed by the service.
    ///
    /// Returns `None` when logged out: the service keeps sending these
    /// after logout and they are stale.
    pub fn on_pushed(&mut self, reachability: Reachability, session: &Session) -> Option<Intent> {
        if !session.logged_in {
            tracing::debug!("Discarding reachability push while logged out");
            return None;
        }
        Some(self.apply(reachability))
    }

    /// Apply the result of an active probe.
    pub fn on_probe(&mut self, reachability: Reachability) -> Intent {
        self.apply(reachability)
    }

    fn apply(&mut self, reachability: Reachability) -> Intent {
        self.current = Some(reachability);
        Intent::UpdateReachability { reachability }
    }
}
