//! GregorRouter - the event dispatcher.
//!
//! This module provides [`GregorRouter`], which binds incoming pushes and
//! connection lifecycle events to the pure routing logic of gregor-core and
//! performs the resulting I/O through an [`Engine`] and an [`IntentSink`].
//!
//! # Architecture
//!
//! ```text
//! Engine pushes → Delivery → GregorRouter → IntentSink → subsystems
//!                                 ↓    ↑
//!                     gregor-core (pure routing)
//!                                 ↓
//!                   Engine calls (firehose, reachability)
//! ```
//!
//! Each delivery is processed to completion before the next one starts when
//! driven by [`GregorRouter::run`]. Overlapping callers of
//! [`GregorRouter::handle_push_state`] are serialized on the seen-message
//! mutex, which is held from routing through emission, so each snapshot's
//! intents reach the sink as one contiguous run.
//!
//! # Example
//!
//! ```ignore
//! use gregor_router::{GregorRouter, MockEngine, RecordingSink, RouterConfig};
//! use gregor_core::Session;
//!
//! let router = GregorRouter::new(
//!     RouterConfig::default(),
//!     MockEngine::new(),
//!     RecordingSink::new(),
//!     Session::logged_in("alice"),
//! );
//! router.on_connected().await;
//! router.handle(delivery).await;
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use gregor_core::{
    normalize, route_items, route_out_of_band, Action, ConnectionState, Event, HandlerContext,
    Intent, ReachabilityMonitor, SeenMessages,
};
use gregor_types::{
    IncomingEvent, MsgId, OutOfBandMessage, PushReason, Reachability, State, TimeOrOffset,
};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::config::RouterConfig;
use crate::engine::{Engine, EngineError};
use crate::session::SessionSource;
use crate::sink::IntentSink;

/// Router errors, returned only from caller-triggered calls.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Engine call failed.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

/// An incoming event plus the transport's acknowledgement channel.
#[derive(Debug)]
pub struct Delivery {
    /// What arrived.
    pub event: IncomingEvent,
    /// Signalled as soon as the router takes the event, before processing.
    pub ack: Option<oneshot::Sender<()>>,
}

impl Delivery {
    /// A delivery whose receipt the transport waits on.
    pub fn new(event: IncomingEvent) -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                event,
                ack: Some(tx),
            },
            rx,
        )
    }

    /// A delivery nobody waits on.
    pub fn unacked(event: IncomingEvent) -> Self {
        Self { event, ack: None }
    }
}

/// Diagnostics for one processed snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushSummary {
    /// Why the service pushed.
    pub reason: PushReason,
    /// Raw records in the snapshot.
    pub raw: usize,
    /// Records kept by normalization.
    pub kept: usize,
    /// TLF ids seen for the first time.
    pub new_tlf: usize,
    /// Intents emitted.
    pub intents: usize,
}

impl PushSummary {
    /// Records dropped by normalization.
    pub fn dropped(&self) -> usize {
        self.raw.saturating_sub(self.kept)
    }
}

/// The gregor event router.
pub struct GregorRouter<E: Engine, S: IntentSink, P: SessionSource> {
    config: RouterConfig,
    engine: E,
    sink: S,
    session: P,
    seen: Mutex<SeenMessages>,
    reachability: Mutex<ReachabilityMonitor>,
    lifecycle: Mutex<ConnectionState>,
}

impl<E: Engine, S: IntentSink, P: SessionSource> GregorRouter<E, S, P> {
    /// Create a new router with an empty seen-message map.
    pub fn new(config: RouterConfig, engine: E, sink: S, session: P) -> Self {
        Self {
            config,
            engine,
            sink,
            session,
            seen: Mutex::new(SeenMessages::new()),
            reachability: Mutex::new(ReachabilityMonitor::new()),
            lifecycle: Mutex::new(ConnectionState::new()),
        }
    }

    /// Start from a previously persisted seen-message map.
    pub fn with_seen(mut self, seen: SeenMessages) -> Self {
        self.seen = Mutex::new(seen);
        self
    }

    /// Process deliveries until the channel closes.
    pub async fn run(&self, mut deliveries: mpsc::Receiver<Delivery>) {
        tracing::info!("Gregor router started");
        while let Some(delivery) = deliveries.recv().await {
            self.handle(delivery).await;
        }
        tracing::info!("Gregor router stopped: delivery channel closed");
    }

    /// Acknowledge and process one delivery.
    pub async fn handle(&self, delivery: Delivery) {
        let Delivery { event, ack } = delivery;
        if let Some(ack) = ack {
            // The transport may have stopped waiting; that is its business.
            let _ = ack.send(());
        }
        tracing::debug!("Handling {} event", event.kind());

        match event {
            IncomingEvent::PushState { reason, state } => {
                self.handle_push_state(reason, state).await;
            }
            IncomingEvent::PushOutOfBand { messages } => {
                self.handle_out_of_band(messages).await;
            }
            IncomingEvent::ReachabilityChanged { reachability } => {
                self.handle_reachability_changed(reachability).await;
            }
            IncomingEvent::Connected => self.on_connected().await,
            IncomingEvent::Disconnected => self.on_disconnected().await,
        }
    }

    /// Route a full-state snapshot, using the current wall-clock time.
    pub async fn handle_push_state(&self, reason: PushReason, state: State) -> PushSummary {
        self.handle_push_state_at(reason, state, now_ms()).await
    }

    /// Route a full-state snapshot as if it arrived at `now_ms`.
    pub async fn handle_push_state_at(
        &self,
        reason: PushReason,
        state: State,
        now_ms: i64,
    ) -> PushSummary {
        let normalized = normalize(state);

        // Held until every intent is emitted so an older snapshot can never
        // overwrite the replacement values of a newer one.
        let mut seen = self.seen.lock().await;
        let mut ctx = HandlerContext {
            seen: &mut *seen,
            platform: self.config.platform,
            now_ms,
            new_exploding_threshold_ms: self.config.exploding_new_threshold_ms,
            new_tlf: 0,
        };
        let intents = route_items(&normalized.items, &mut ctx);

        let summary = PushSummary {
            reason,
            raw: normalized.raw,
            kept: normalized.items.len(),
            new_tlf: ctx.new_tlf,
            intents: intents.len(),
        };
        tracing::debug!(
            "Gregor push state ({:?}): {} items, {} kept, {} new tlf, {} intents",
            reason,
            summary.raw,
            summary.kept,
            summary.new_tlf,
            summary.intents
        );
        self.emit_all(intents);
        summary
    }

    /// Route one batch of out-of-band messages. Returns the intents emitted.
    pub async fn handle_out_of_band(&self, messages: Vec<OutOfBandMessage>) -> usize {
        let messages: Vec<OutOfBandMessage> = messages
            .into_iter()
            .filter(|m| !m.system.is_empty())
            .collect();
        if messages.is_empty() {
            tracing::debug!("Ignoring empty oobm push");
            return 0;
        }

        let session = self.session.current();
        let intents = route_out_of_band(&messages, &session);
        let count = intents.len();
        self.emit_all(intents);
        count
    }

    /// Apply a reachability change pushed by the service.
    ///
    /// Returns whether it was accepted (only when logged in).
    pub async fn handle_reachability_changed(&self, reachability: Reachability) -> bool {
        let session = self.session.current();
        let intent = self
            .reachability
            .lock()
            .await
            .on_pushed(reachability, &session);
        match intent {
            Some(intent) => {
                self.sink.emit(intent);
                true
            }
            None => false,
        }
    }

    /// Probe reachability now and apply the result.
    pub async fn check_reachability(&self) -> Result<Reachability, RouterError> {
        match self.engine.check_reachability().await {
            Ok(reachability) => {
                self.apply_probe(reachability).await;
                Ok(reachability)
            }
            Err(e) => {
                tracing::warn!("Error checking reachability: {}", e);
                Err(e.into())
            }
        }
    }

    /// Connection (re)established: register the firehose and seed reachability.
    pub async fn on_connected(&self) {
        let actions = self.transition(Event::Connected).await;
        for action in actions {
            match action {
                Action::RegisterFirehose => self.register_firehose().await,
                Action::BootstrapReachability => self.bootstrap_reachability().await,
            }
        }
    }

    /// Connection lost.
    pub async fn on_disconnected(&self) {
        self.transition(Event::Disconnected).await;
    }

    /// Push an item of our own. A missing expiry means "never".
    pub async fn update_category(
        &self,
        category: &str,
        body: &[u8],
        dtime: Option<TimeOrOffset>,
    ) -> Result<MsgId, RouterError> {
        let dtime = dtime.unwrap_or_default();
        self.engine
            .update_category(category, body, dtime)
            .await
            .map_err(|e| {
                tracing::warn!("Error updating gregor category {}: {}", category, e);
                RouterError::from(e)
            })
    }

    /// Copy of the seen-message map, for persistence.
    pub async fn seen_messages(&self) -> SeenMessages {
        self.seen.lock().await.clone()
    }

    /// Current reachability value.
    pub async fn reachability(&self) -> Reachability {
        self.reachability.lock().await.current()
    }

    /// Current connection lifecycle state.
    pub async fn connection_state(&self) -> ConnectionState {
        *self.lifecycle.lock().await
    }

    /// Get the router configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Get a reference to the underlying engine (for testing).
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Get a reference to the intent sink (for testing).
    pub fn sink(&self) -> &S {
        &self.sink
    }

    async fn transition(&self, event: Event) -> Vec<Action> {
        let mut state = self.lifecycle.lock().await;
        let (new_state, actions) = (*state).on_event(event);
        *state = new_state;
        actions
    }

    async fn register_firehose(&self) {
        // Filtered down to the systems we handle; add a system here to
        // receive its OOBMs.
        match self
            .engine
            .register_firehose_filtered(&self.config.firehose_systems)
            .await
        {
            Ok(()) => tracing::info!("Registered gregor listener"),
            Err(e) => tracing::warn!("Error in registering gregor listener: {}", e),
        }
    }

    async fn bootstrap_reachability(&self) {
        match self.engine.start_reachability().await {
            Ok(reachability) => self.apply_probe(reachability).await,
            Err(e) => tracing::warn!("Error bootstrapping reachability: {}", e),
        }
    }

    async fn apply_probe(&self, reachability: Reachability) {
        let intent = self.reachability.lock().await.on_probe(reachability);
        self.sink.emit(intent);
    }

    fn emit_all(&self, intents: Vec<Intent>) {
        for intent in intents {
            self.sink.emit(intent);
        }
    }
}

/// Wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
