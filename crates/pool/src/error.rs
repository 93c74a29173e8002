//! Error types for pool operations
use std::time::Duration;

use thiserror::Error;

/// Result type for pool operations
pub type Result<T> = std::result::Result<T, Error>;

/// Why a blocked acquire gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelCause {
    /// The caller's cancellation token fired.
    Token,
    /// The configured acquire timeout elapsed.
    Timeout(Duration),
}

impl std::fmt::Display for CancelCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token => f.write_str("cancelled by caller"),
            Self::Timeout(d) => write!(f, "timed out after {}ms", d.as_millis()),
        }
    }
}

/// Error type for pool construction and acquisition
#[derive(Error, Debug)]
pub enum Error {
    /// Pool or factory configuration is invalid
    #[error("Configuration error: {message}")]
    Configuration {
        /// The error message
        message: String,
    },

    /// The factory could not produce a resource
    #[error("Failed to create resource '{resource_id}': {source}")]
    CreationFailed {
        /// The factory identifier
        resource_id: String,
        /// The factory's own error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Acquisition was abandoned while waiting for a permit
    #[error("Acquire on '{resource_id}' abandoned: {cause}")]
    Cancelled {
        /// The factory identifier
        resource_id: String,
        /// What ended the wait
        cause: CancelCause,
    },

    /// Generic internal error
    #[error("Internal error in pool '{resource_id}': {message}")]
    Internal {
        /// The factory identifier
        resource_id: String,
        /// The error message
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Wrap a factory error
    pub fn creation_failed<E>(resource_id: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::CreationFailed {
            resource_id: resource_id.into(),
            source: Box::new(source),
        }
    }

    /// Create a cancellation error
    pub fn cancelled(resource_id: impl Into<String>, cause: CancelCause) -> Self {
        Self::Cancelled {
            resource_id: resource_id.into(),
            cause,
        }
    }

    /// Create an internal error
    pub fn internal(resource_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Internal {
            resource_id: resource_id.into(),
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    ///
    /// Neither a failed creation nor an abandoned wait changes pool state,
    /// so a later acquire may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CreationFailed { .. } | Self::Cancelled { .. })
    }

    /// Get the resource ID associated with this error (if any)
    #[must_use]
    pub fn resource_id(&self) -> Option<&str> {
        match self {
            Self::Configuration { .. } => None,
            Self::CreationFailed { resource_id, .. }
            | Self::Cancelled { resource_id, .. }
            | Self::Internal { resource_id, .. } => Some(resource_id),
        }
    }
}
