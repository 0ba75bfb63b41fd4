//! Session lookup.
//!
//! Several handlers depend on who is logged in. The router asks its
//! [`SessionSource`] afresh for every push because the session can change
//! between pushes.

use std::sync::{Arc, RwLock};

use gregor_core::Session;

/// Supplies the current session on demand.
pub trait SessionSource: Send + Sync {
    /// Snapshot of the session right now.
    fn current(&self) -> Session;
}

/// A fixed session.
impl SessionSource for Session {
    fn current(&self) -> Session {
        self.clone()
    }
}

/// Session cell shared between the router and whoever manages login.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<RwLock<Session>>,
}

impl SharedSession {
    /// Create a cell holding `session`.
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    /// Replace the session.
    pub fn set(&self, session: Session) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = session;
    }

    /// Log in as `username`.
    pub fn log_in(&self, username: &str) {
        self.set(Session::logged_in(username));
    }

    /// Log out.
    pub fn log_out(&self) {
        self.set(Session::logged_out());
    }
}

impl SessionSource for SharedSession {
    fn current(&self) -> Session {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
