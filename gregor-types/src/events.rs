//! Events delivered to the router by the transport.

use serde::{Deserialize, Serialize};

use crate::{GregorError, OutOfBandMessage, Reachability, State};

/// Why the service pushed a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushReason {
    /// No particular reason given.
    #[default]
    None,
    /// Pushed because the connection was re-established.
    Reconnected,
    /// Pushed because the state changed.
    NewData,
}

/// Everything the transport can hand to the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IncomingEvent {
    /// Full-state snapshot.
    PushState {
        /// Why the service pushed.
        #[serde(default)]
        reason: PushReason,
        /// The snapshot.
        state: State,
    },
    /// Batch of out-of-band messages.
    PushOutOfBand {
        /// The messages, possibly containing empty entries.
        #[serde(default)]
        messages: Vec<OutOfBandMessage>,
    },
    /// The service reports a reachability change.
    ReachabilityChanged {
        /// New value.
        reachability: Reachability,
    },
    /// Connection to the service was established or re-established.
    Connected,
    /// Connection to the service was lost.
    Disconnected,
}

impl IncomingEvent {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PushState { .. } => "push_state",
            Self::PushOutOfBand { .. } => "push_out_of_band",
            Self::ReachabilityChanged { .. } => "reachability_changed",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }

    /// Parse a list of recorded events from JSON.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, GregorError> {
        Ok(serde_json::from_str(json)?)
    }
}
