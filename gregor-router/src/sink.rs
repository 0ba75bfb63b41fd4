//! Intent sinks.
//!
//! Downstream subsystems receive intents fire-and-forget: the router never
//! waits for, or hears back about, what they do with them.

use std::sync::{Arc, Mutex};

use gregor_core::Intent;
use tokio::sync::mpsc;

/// Receiver of routed intents.
pub trait IntentSink: Send + Sync {
    /// Hand one intent downstream. Must not block.
    fn emit(&self, intent: Intent);
}

/// Sink that forwards intents over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Intent>,
}

impl ChannelSink {
    /// Create a sink and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Intent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl IntentSink for ChannelSink {
    fn emit(&self, intent: Intent) {
        if let Err(e) = self.tx.send(intent) {
            tracing::debug!("Dropping {} intent: receiver gone", e.0.kind());
        }
    }
}

/// Sink that keeps every intent in memory (for testing).
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    intents: Arc<Mutex<Vec<Intent>>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All intents received so far.
    pub fn intents(&self) -> Vec<Intent> {
        self.intents.lock().unwrap().clone()
    }

    /// Remove and return all intents received so far.
    pub fn take(&self) -> Vec<Intent> {
        std::mem::take(&mut *self.intents.lock().unwrap())
    }

    /// Intents of one kind (see [`Intent::kind`]).
    pub fn of_kind(&self, kind: &str) -> Vec<Intent> {
        self.intents
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.kind() == kind)
            .cloned()
            .collect()
    }
}

impl IntentSink for RecordingSink {
    fn emit(&self, intent: Intent) {
        self.intents.lock().unwrap().push(intent);
    }
}
