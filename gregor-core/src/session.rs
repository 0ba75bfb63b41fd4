//! Session and runtime facts the router reads fresh for every push.

use serde::{Deserialize, Serialize};

/// Which kind of client runtime the router serves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Desktop client with a folder menu widget.
    #[default]
    Desktop,
    /// Constrained mobile runtime without a folder list surface.
    Mobile,
}

impl Platform {
    /// Whether the runtime shows a favorites list that needs refreshing.
    pub fn has_favorites_surface(&self) -> bool {
        matches!(self, Self::Desktop)
    }
}

/// A point-in-time view of the local session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Whether the session is authenticated.
    pub logged_in: bool,
    /// Username of the current identity, if known.
    pub username: Option<String>,
}

impl Session {
    /// An authenticated session for `username`.
    pub fn logged_in(username: &str) -> Self {
        Self {
            logged_in: true,
            username: Some(username.to_string()),
        }
    }

    /// No session.
    pub fn logged_out() -> Self {
        Self::default()
    }

    /// The current identity, if one is available.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|name| !name.is_empty())
    }
}
