//! Engine abstraction for gregor.
//!
//! The engine is the RPC collaborator that delivers pushes and answers
//! requests. This module covers the outbound half: the calls the router
//! makes. Inbound pushes arrive as [`crate::Delivery`] values.
//!
//! # Design
//!
//! The trait is async and request/response shaped:
//! - `register_firehose_filtered()` subscribes to OOBMs of the given systems
//! - `start_reachability()` starts monitoring and returns the current value
//! - `check_reachability()` probes on demand
//! - `update_category()` pushes an item of our own
//!
//! # Example
//!
//! ```ignore
//! let engine = MockEngine::new();
//! engine.register_firehose_filtered(&["git".into()]).await?;
//! let reachability = engine.check_reachability().await?;
//! ```

mod mock;

pub use mock::{CategoryUpdate, MockEngine};

use async_trait::async_trait;
use gregor_types::{MsgId, Reachability, TimeOrOffset};
use thiserror::Error;

/// Engine call errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The service rejected or failed the call.
    #[error("{method} failed: {reason}")]
    CallFailed {
        /// RPC method name.
        method: &'static str,
        /// Failure reported by the service.
        reason: String,
    },
}

/// Outbound RPC calls made by the router.
///
/// Implementations wrap the real transport or, in tests, [`MockEngine`].
#[async_trait]
pub trait Engine: Send + Sync {
    /// Ask the service to forward OOBMs for `systems` only.
    async fn register_firehose_filtered(&self, systems: &[String]) -> Result<(), EngineError>;

    /// Start reachability monitoring and return the current value.
    async fn start_reachability(&self) -> Result<Reachability, EngineError>;

    /// Probe reachability now.
    async fn check_reachability(&self) -> Result<Reachability, EngineError>;

    /// Push a synchronized item of our own. Returns the assigned id.
    async fn update_category(
        &self,
        category: &str,
        body: &[u8],
        dtime: TimeOrOffset,
    ) -> Result<MsgId, EngineError>;
}
