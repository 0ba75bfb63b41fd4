//! # gregor-router
//!
//! Event dispatcher for the gregor synchronization service.
//!
//! This is the library a client embeds to react to gregor pushes.
//!
//! ## Features
//!
//! - **Snapshot Routing**: Full-state pushes are deduplicated against seen
//!   message ids and fanned out to the category handler catalog
//! - **OOBM Routing**: Out-of-band messages are partitioned by system
//! - **Connection Lifecycle**: Every (re)connection re-registers the
//!   filtered firehose and re-seeds reachability
//! - **Engine Abstraction**: Pluggable RPC layer (real engine, mock)
//! - **Pure Core**: Uses gregor-core for side-effect-free routing logic
//!
//! ## Example
//!
//! ```ignore
//! use gregor_router::{ChannelSink, Delivery, GregorRouter, MockEngine, RouterConfig, SharedSession};
//!
//! let (sink, mut intents) = ChannelSink::new();
//! let router = GregorRouter::new(RouterConfig::default(), MockEngine::new(), sink, SharedSession::default());
//!
//! let (tx, rx) = tokio::sync::mpsc::channel(64);
//! tokio::spawn(async move { router.run(rx).await });
//! tx.send(Delivery::unacked(IncomingEvent::Connected)).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod engine;
pub mod router;
pub mod session;
pub mod sink;

pub use config::{Config, ConfigError, RouterConfig};
pub use engine::{CategoryUpdate, Engine, EngineError, MockEngine};
pub use router::{now_ms, Delivery, GregorRouter, PushSummary, RouterError};
pub use session::{SessionSource, SharedSession};
pub use sink::{ChannelSink, IntentSink, RecordingSink};
