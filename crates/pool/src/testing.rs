//! Testing utilities for resource pools
//!
//! [`MockFactory`] produces numbered [`MockResource`]s and can be scripted to
//! fail, stall, or reject its own configuration.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use thiserror::Error;

use crate::error::{Error, Result};
use crate::factory::Factory;

/// Resource handed out by [`MockFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResource {
    /// Creation sequence number, unique per factory.
    pub id: u64,
    /// Free for tests to mutate through a handle.
    pub uses: u32,
}

/// Error returned by a scripted failing [`MockFactory::create`] call.
#[derive(Debug, Clone, Error)]
#[error("mock creation {call} failed")]
pub struct MockError {
    /// Zero-based index of the failing `create` call.
    pub call: u64,
}

/// Factory for tests.
///
/// Every call to `create` gets the next call index. Calls listed with
/// [`fail_on`](Self::fail_on) fail with [`MockError`] instead of yielding a
/// resource; successful calls yield `MockResource { id: call }`.
#[derive(Debug, Default)]
pub struct MockFactory {
    calls: AtomicU64,
    created: AtomicU64,
    failing: HashSet<u64>,
    fail_all: bool,
    delay: Option<Duration>,
    invalid: bool,
}

impl MockFactory {
    /// A factory that always succeeds immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `create` calls with the given zero-based indices.
    #[must_use]
    pub fn fail_on(mut self, calls: &[u64]) -> Self {
        self.failing.extend(calls);
        self
    }

    /// Fail every `create` call.
    #[must_use]
    pub fn always_fail(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Sleep this long inside every `create` call.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make [`Factory::validate`] fail.
    #[must_use]
    pub fn invalid(mut self) -> Self {
        self.invalid = true;
        self
    }

    /// Number of `create` calls so far, failed ones included.
    #[must_use]
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of resources successfully created so far.
    #[must_use]
    pub fn created(&self) -> u64 {
        self.created.load(Ordering::SeqCst)
    }
}

impl Factory for MockFactory {
    type Resource = MockResource;
    type Error = MockError;

    fn id(&self) -> &str {
        "mock"
    }

    fn validate(&self) -> Result<()> {
        if self.invalid {
            return Err(Error::configuration("mock factory marked invalid"));
        }
        Ok(())
    }

    async fn create(&self) -> std::result::Result<MockResource, MockError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_all || self.failing.contains(&call) {
            return Err(MockError { call });
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(MockResource { id: call, uses: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_failures() {
        let factory = MockFactory::new().fail_on(&[1]);
        assert_eq!(factory.create().await.unwrap().id, 0);
        assert_eq!(factory.create().await.unwrap_err().call, 1);
        assert_eq!(factory.create().await.unwrap().id, 2);
        assert_eq!(factory.calls(), 3);
        assert_eq!(factory.created(), 2);
    }

    #[test]
    fn invalid_factory_fails_validation() {
        assert!(MockFactory::new().validate().is_ok());
        assert!(MockFactory::new().invalid().validate().is_err());
    }
}
