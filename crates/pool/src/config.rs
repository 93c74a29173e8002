//! Pool configuration types

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for a resource pool
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoolConfig {
    /// Maximum number of resources checked out at the same time
    pub capacity: usize,
    /// Upper bound on how long `acquire` waits for a permit.
    /// `None` waits until a handle is closed.
    pub acquire_timeout: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            acquire_timeout: None,
        }
    }
}

impl PoolConfig {
    /// Config with the given capacity and no acquire timeout.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Set the acquire timeout.
    #[must_use]
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = Some(timeout);
        self
    }

    /// Validate pool configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::configuration("capacity must be greater than 0"));
        }
        // tokio's semaphore rejects more permits than this
        if self.capacity > tokio::sync::Semaphore::MAX_PERMITS {
            return Err(Error::configuration(format!(
                "capacity ({}) exceeds the maximum of {}",
                self.capacity,
                tokio::sync::Semaphore::MAX_PERMITS
            )));
        }
        if self.acquire_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::configuration(
                "acquire_timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}
