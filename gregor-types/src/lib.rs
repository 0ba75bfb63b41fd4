//! # gregor-types
//!
//! Data model for the gregor synchronization event router.
//!
//! This crate provides the foundational types used across all gregor crates:
//! - [`MsgId`] - Opaque message identifier with a stable encoded form
//! - [`Item`], [`Metadata`], [`RawRecord`], [`State`] - Pushed snapshot contents
//! - [`GregorItem`] - A record that carries both metadata and an item
//! - [`OutOfBandMessage`] - One-shot notifications tagged by owning system
//! - [`Reachability`] - Service reachability value
//! - [`IncomingEvent`] - Everything the transport delivers to the router
//! - [`GregorError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod events;
mod ids;
mod item;
mod reachability;

pub use error::GregorError;
pub use events::{IncomingEvent, PushReason};
pub use ids::MsgId;
pub use item::{GregorItem, Item, Metadata, OutOfBandMessage, RawRecord, State, TimeOrOffset};
pub use reachability::{Reachability, Reachable};
