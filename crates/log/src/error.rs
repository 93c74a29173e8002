//! Logger setup errors

use thiserror::Error;

/// Result type for logger setup
pub type LogResult<T> = Result<T, LogError>;

/// Errors raised while installing the global subscriber
#[derive(Error, Debug)]
pub enum LogError {
    /// The level/filter directive could not be parsed
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A format name was not recognised
    #[error("Unknown log format '{0}' (expected pretty, compact or json)")]
    Format(String),

    /// A global subscriber is already installed
    #[error("Failed to install logger: {0}")]
    Init(String),
}
