//! Service reachability values.

use serde::{Deserialize, Serialize};

/// Whether the synchronization service can be reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reachable {
    /// Not yet determined.
    #[default]
    Unknown,
    /// Reachable.
    Yes,
    /// Unreachable.
    No,
}

/// A reachability report from the service or from a probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reachability {
    /// Current value.
    pub reachable: Reachable,
}

impl Reachability {
    /// Wrap a [`Reachable`] value.
    pub fn new(reachable: Reachable) -> Self {
        Self { reachable }
    }

    /// Service is reachable.
    pub fn yes() -> Self {
        Self::new(Reachable::Yes)
    }

    /// Service is unreachable.
    pub fn no() -> Self {
        Self::new(Reachable::No)
    }

    /// Whether the value is a definite "yes".
    pub fn is_reachable(&self) -> bool {
        self.reachable == Reachable::Yes
    }
}
