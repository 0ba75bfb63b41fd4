//! Connection lifecycle state machine.
//!
//! A pure, side-effect-free state machine: it takes connection events and
//! returns the new state plus the actions the router must perform. The
//! actual RPCs are issued by `gregor-router`.
//!
//! Every (re)connection yields exactly one firehose registration and one
//! reachability bootstrap. Neither is retried here; the next connection
//! event re-triggers both.

/// OOBM systems the firehose is filtered down to.
///
/// Widening this list is the only way to receive more OOBM systems.
pub const DEFAULT_FIREHOSE_SYSTEMS: &[&str] = &["git", "kbfs.favorites"];

/// Connection lifecycle - NO I/O, just state transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection event seen yet.
    #[default]
    Idle,
    /// Connected to the service.
    Connected {
        /// Number of connections established so far, this one included.
        generation: u64,
    },
    /// Connection lost; waiting for the transport to reconnect.
    Disconnected {
        /// Generation of the connection that was lost.
        generation: u64,
    },
}

impl ConnectionState {
    /// Create a new state machine in the Idle state.
    pub fn new() -> Self {
        Self::Idle
    }

    /// Process an event and return the new state plus actions to execute.
    pub fn on_event(self, event: Event) -> (Self, Vec<Action>) {
        match (self, event) {
            // Honoured from any state: a reconnect after a missed
            // disconnect must still re-register.
            (state, Event::Connected) => (
                Self::Connected {
                    generation: state.generation().saturating_add(1),
                },
                vec![Action::RegisterFirehose, Action::BootstrapReachability],
            ),
            (Self::Connected { generation }, Event::Disconnected) => {
                (Self::Disconnected { generation }, vec![])
            }
            (state, Event::Disconnected) => (state, vec![]),
        }
    }

    /// Check if currently connected.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    /// Number of connections established so far.
    pub fn generation(&self) -> u64 {
        match self {
            Self::Idle => 0,
            Self::Connected { generation } | Self::Disconnected { generation } => *generation,
        }
    }
}

/// Lifecycle events reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Connection established or re-established.
    Connected,
    /// Connection lost.
    Disconnected,
}

/// Actions the router must perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Register for the filtered OOBM firehose.
    RegisterFirehose,
    /// Start reachability monitoring and seed the current value.
    BootstrapReachability,
}
