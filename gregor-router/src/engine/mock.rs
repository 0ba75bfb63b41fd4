//! Mock engine for testing.
//!
//! Records every call and allows forcing the next call of each kind to fail.

use super::{Engine, EngineError};
use async_trait::async_trait;
use gregor_types::{MsgId, Reachability, TimeOrOffset};
use std::sync::{Arc, Mutex};

/// A recorded `update_category` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryUpdate {
    /// Category written.
    pub category: String,
    /// Body written.
    pub body: Vec<u8>,
    /// Expiry sent.
    pub dtime: TimeOrOffset,
}

/// Mock engine for testing.
///
/// Clones share state, so a test can keep a handle after moving one into
/// the router.
#[derive(Debug, Default)]
pub struct MockEngine {
    inner: Arc<Mutex<MockEngineInner>>,
}

#[derive(Debug, Default)]
struct MockEngineInner {
    registrations: Vec<Vec<String>>,
    start_reachability_calls: usize,
    check_reachability_calls: usize,
    category_updates: Vec<CategoryUpdate>,
    reachability: Reachability,
    fail_next_register: Option<String>,
    fail_next_reachability: Option<String>,
    fail_next_update: Option<String>,
}

impl MockEngine {
    /// Create a new mock engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value returned by the reachability calls.
    pub fn set_reachability(&self, reachability: Reachability) {
        let mut inner = self.inner.lock().unwrap();
        inner.reachability = reachability;
    }

    /// Every firehose registration, in call order.
    pub fn registrations(&self) -> Vec<Vec<String>> {
        let inner = self.inner.lock().unwrap();
        inner.registrations.clone()
    }

    /// Number of `start_reachability` calls.
    pub fn start_reachability_calls(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.start_reachability_calls
    }

    /// Number of `check_reachability` calls.
    pub fn check_reachability_calls(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.check_reachability_calls
    }

    /// Every `update_category` call, in call order.
    pub fn category_updates(&self) -> Vec<CategoryUpdate> {
        let inner = self.inner.lock().unwrap();
        inner.category_updates.clone()
    }

    /// Cause the next firehose registration to fail.
    pub fn fail_next_register(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_register = Some(error.to_string());
    }

    /// Cause the next reachability call (start or check) to fail.
    pub fn fail_next_reachability(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_reachability = Some(error.to_string());
    }

    /// Cause the next `update_category` to fail.
    pub fn fail_next_update(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_update = Some(error.to_string());
    }

    /// Clear all recorded calls and forced failures.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockEngineInner::default();
    }
}

impl Clone for MockEngine {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl Engine for MockEngine {
    async fn register_firehose_filtered(&self, systems: &[String]) -> Result<(), EngineError> {
        let mut inner = self.inner.lock().unwrap();
        inner.registrations.push(systems.to_vec());

        if let Some(reason) = inner.fail_next_register.take() {
            return Err(EngineError::CallFailed {
                method: "registerGregorFirehoseFiltered",
                reason,
            });
        }
        Ok(())
    }

    async fn start_reachability(&self) -> Result<Reachability, EngineError> {
        let mut inner = self.inner.lock().unwrap();
        inner.start_reachability_calls += 1;

        if let Some(reason) = inner.fail_next_reachability.take() {
            return Err(EngineError::CallFailed {
                method: "startReachability",
                reason,
            });
        }
        Ok(inner.reachability)
    }

    async fn check_reachability(&self) -> Result<Reachability, EngineError> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_reachability_calls += 1;

        if let Some(reason) = inner.fail_next_reachability.take() {
            return Err(EngineError::CallFailed {
                method: "checkReachability",
                reason,
            });
        }
        Ok(inner.reachability)
    }

    async fn update_category(
        &self,
        category: &str,
        body: &[u8],
        dtime: TimeOrOffset,
    ) -> Result<MsgId, EngineError> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(reason) = inner.fail_next_update.take() {
            return Err(EngineError::CallFailed {
                method: "updateCategory",
                reason,
            });
        }
        inner.category_updates.push(CategoryUpdate {
            category: category.to_string(),
            body: body.to_vec(),
            dtime,
        });
        Ok(MsgId::random())
    }
}
