//! # gregor-core
//!
//! Pure routing logic for gregor pushes (no I/O, instant tests).
//!
//! This crate turns pushed snapshots and out-of-band messages into
//! [`Intent`]s for downstream subsystems, without performing any network
//! or disk I/O itself.
//!
//! ## Design Philosophy
//!
//! Every module takes input and produces output:
//! - [`normalize`] flattens a raw snapshot into actionable items
//! - [`handlers`] runs the category handler catalog over those items
//! - [`oobm`] partitions out-of-band messages by system
//! - [`lifecycle`] maps connection events to the actions to perform
//!
//! The only mutable state is owned explicitly by the caller
//! ([`SeenMessages`], [`ReachabilityMonitor`], [`ConnectionState`]).
//! The actual I/O is performed by `gregor-router`, which interprets the
//! intents and actions produced here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod folder;
pub mod handlers;
pub mod intent;
pub mod lifecycle;
pub mod normalize;
pub mod oobm;
pub mod reachability;
pub mod rules;
pub mod seen;
pub mod session;

pub use error::ParseError;
pub use folder::{FolderRef, Visibility};
pub use handlers::{
    route_items, Handler, HandlerContext, CATALOG, DEFAULT_NEW_EXPLODING_THRESHOLD_MS,
};
pub use intent::{BannerKind, ExplodingMode, Intent};
pub use lifecycle::{Action, ConnectionState, Event, DEFAULT_FIREHOSE_SYSTEMS};
pub use normalize::{normalize, Normalized};
pub use oobm::{route_out_of_band, FavoriteNotice};
pub use reachability::ReachabilityMonitor;
pub use rules::MatchRule;
pub use seen::SeenMessages;
pub use session::{Platform, Session};
