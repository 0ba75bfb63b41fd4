//! Synchronized items and the snapshots that carry them.
//!
//! A [`State`] is the *full* set of non-expired items at push time, not a
//! delta. Records inside it may be partial; only a [`GregorItem`] (metadata
//! and item both present) is actionable.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{GregorError, MsgId};

/// A point in time, or an offset from when the item was created.
///
/// Both fields are milliseconds. `{time: 0, offset: 0}` means "never".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeOrOffset {
    /// Absolute epoch time in milliseconds.
    #[serde(default)]
    pub time: i64,
    /// Offset in milliseconds.
    #[serde(default)]
    pub offset: i64,
}

impl TimeOrOffset {
    /// The "no expiry" value.
    pub fn never() -> Self {
        Self::default()
    }

    /// An absolute time in epoch milliseconds.
    pub fn at(time: i64) -> Self {
        Self { time, offset: 0 }
    }

    /// Whether this is the "no expiry" value.
    pub fn is_never(&self) -> bool {
        self.time == 0 && self.offset == 0
    }
}

/// Metadata attached to every gregor message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Service-assigned message id.
    pub msg_id: MsgId,
    /// Creation time.
    #[serde(default)]
    pub ctime: TimeOrOffset,
    /// Owning user id, if the service sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Originating device id, if the service sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

impl Metadata {
    /// Metadata with the given id and no other fields.
    pub fn new(msg_id: MsgId) -> Self {
        Self {
            msg_id,
            ctime: TimeOrOffset::never(),
            uid: None,
            device_id: None,
        }
    }
}

/// A synchronized key/value item.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Routing key.
    pub category: String,
    /// Opaque payload.
    #[serde(with = "body_text", default)]
    pub body: Vec<u8>,
    /// Dismissal time, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtime: Option<TimeOrOffset>,
}

impl Item {
    /// Create an item with a text body and no dismissal time.
    pub fn new(category: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            category: category.to_string(),
            body: body.into(),
            dtime: None,
        }
    }

    /// The body as UTF-8 text, if it is valid UTF-8.
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("category", &self.category)
            .field("body", &format!("[{} bytes]", self.body.len()))
            .field("dtime", &self.dtime)
            .finish()
    }
}

/// One entry of a pushed snapshot, as delivered. Either half may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Message metadata.
    #[serde(default)]
    pub md: Option<Metadata>,
    /// Item payload.
    #[serde(default)]
    pub item: Option<Item>,
}

impl RawRecord {
    /// A complete record.
    pub fn complete(md: Metadata, item: Item) -> Self {
        Self {
            md: Some(md),
            item: Some(item),
        }
    }
}

/// A record with both halves present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GregorItem {
    /// Message metadata.
    pub md: Metadata,
    /// Item payload.
    pub item: Item,
}

impl GregorItem {
    /// Build an item with a fresh random id. Handy in tests and replays.
    pub fn new(category: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            md: Metadata::new(MsgId::random()),
            item: Item::new(category, body),
        }
    }

    /// The routing key of the item.
    pub fn category(&self) -> &str {
        &self.item.category
    }
}

impl From<GregorItem> for RawRecord {
    fn from(value: GregorItem) -> Self {
        Self::complete(value.md, value.item)
    }
}

/// Full synchronized state at push time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Records in service order.
    #[serde(default)]
    pub items: Vec<RawRecord>,
}

impl State {
    /// A snapshot made of complete items.
    pub fn from_items(items: impl IntoIterator<Item = GregorItem>) -> Self {
        Self {
            items: items.into_iter().map(RawRecord::from).collect(),
        }
    }

    /// Parse a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, GregorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of raw records, complete or not.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the snapshot has no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A one-shot notification delivered outside the snapshot channel.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutOfBandMessage {
    /// Owning subsystem tag, e.g. `git` or `kbfs.favorites`.
    pub system: String,
    /// Opaque payload.
    #[serde(with = "body_text", default)]
    pub body: Vec<u8>,
    /// Target user id, if the service sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl OutOfBandMessage {
    /// Create a message for the given system.
    pub fn new(system: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            system: system.to_string(),
            body: body.into(),
            uid: None,
        }
    }
}

impl fmt::Debug for OutOfBandMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutOfBandMessage")
            .field("system", &self.system)
            .field("body", &format!("[{} bytes]", self.body.len()))
            .field("uid", &self.uid)
            .finish()
    }
}

/// Bodies are bytes in memory and text on the JSON wire.
mod body_text {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        Ok(String::deserialize(deserializer)?.into_bytes())
    }
}
