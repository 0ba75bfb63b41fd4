//! Identity types for gregor.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::GregorError;

/// An opaque identifier for a gregor message.
///
/// The service assigns these; the router only compares them. The encoded
/// form (standard base64, padded) is what the seen-message map is keyed by.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MsgId(Vec<u8>);

impl MsgId {
    /// Create a MsgId from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Create a new random 16-byte MsgId (for testing and local items).
    pub fn random() -> Self {
        let mut bytes = [0u8; 16];
        getrandom::getrandom(&mut bytes).expect("getrandom failed");
        Self(bytes.to_vec())
    }

    /// Decode a MsgId from its encoded form.
    pub fn from_encoded(encoded: &str) -> Result<Self, GregorError> {
        STANDARD
            .decode(encoded)
            .map(Self)
            .map_err(GregorError::InvalidMsgId)
    }

    /// Get the raw bytes of this MsgId.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The encoded form used as the seen-message key.
    pub fn encoded(&self) -> String {
        STANDARD.encode(&self.0)
    }
}

impl fmt::Display for MsgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encoded())
    }
}

impl fmt::Debug for MsgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MsgId({})", self.encoded())
    }
}

impl Serialize for MsgId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encoded())
    }
}

impl<'de> Deserialize<'de> for MsgId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_encoded(&encoded).map_err(serde::de::Error::custom)
    }
}
