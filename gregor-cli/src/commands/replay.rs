//! Replay command - feed a recorded event log through the router.
//!
//! The engine is mocked: registrations and probes succeed, and probes
//! answer with the `--reachable` value. Emitted intents go to stdout as
//! JSON lines; logs go to stderr.

use anyhow::{Context, Result};
use clap::ValueEnum;
use gregor_core::Session;
use gregor_router::{now_ms, ChannelSink, Delivery, GregorRouter, MockEngine, RouterConfig};
use gregor_types::{IncomingEvent, Reachability, Reachable};
use std::path::PathBuf;

use crate::config::{load_seen, save_seen};

/// Reachability answered by the mock engine.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReachableArg {
    /// Service reachable.
    Yes,
    /// Service unreachable.
    No,
    /// Not determined.
    Unknown,
}

impl From<ReachableArg> for Reachability {
    fn from(value: ReachableArg) -> Self {
        match value {
            ReachableArg::Yes => Reachability::new(Reachable::Yes),
            ReachableArg::No => Reachability::new(Reachable::No),
            ReachableArg::Unknown => Reachability::new(Reachable::Unknown),
        }
    }
}

/// Replay options.
#[derive(Debug)]
pub struct Options {
    /// Event log path.
    pub events: PathBuf,
    /// Logged-in username.
    pub user: Option<String>,
    /// Seen-message file.
    pub seen: Option<PathBuf>,
    /// Mock reachability.
    pub reachable: ReachableArg,
    /// Fixed clock.
    pub now_ms: Option<i64>,
}

/// Run the replay command.
pub async fn run(config: RouterConfig, options: Options) -> Result<()> {
    let contents = tokio::fs::read_to_string(&options.events)
        .await
        .context("Failed to read event log")?;
    let events = IncomingEvent::list_from_json(&contents).context("Invalid event log")?;

    let session = match options.user.as_deref() {
        Some(user) => Session::logged_in(user),
        None => Session::logged_out(),
    };
    let engine = MockEngine::new();
    engine.set_reachability(options.reachable.into());
    let (sink, mut intents) = ChannelSink::new();

    let mut router = GregorRouter::new(config, engine, sink, session);
    if let Some(path) = &options.seen {
        router = router.with_seen(load_seen(path).await?);
    }

    let now = options.now_ms.unwrap_or_else(now_ms);
    let total = events.len();
    for event in events {
        match event {
            IncomingEvent::PushState { reason, state } => {
                router.handle_push_state_at(reason, state, now).await;
            }
            other => router.handle(Delivery::unacked(other)).await,
        }
    }

    let mut emitted = 0;
    while let Ok(intent) = intents.try_recv() {
        println!("{}", serde_json::to_string(&intent)?);
        emitted += 1;
    }

    if let Some(path) = &options.seen {
        save_seen(path, &router.seen_messages().await).await?;
    }

    tracing::info!("Replayed {} events, emitted {} intents", total, emitted);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reachable_arg_maps_to_reachability() {
        assert!(Reachability::from(ReachableArg::Yes).is_reachable());
        assert_eq!(Reachability::from(ReachableArg::No), Reachability::no());
        assert_eq!(
            Reachability::from(ReachableArg::Unknown).reachable,
            Reachable::Unknown
        );
    }
}
