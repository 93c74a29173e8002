//! # Reservoir Log
//!
//! Logging bootstrap shared by the reservoir binaries: builds a
//! `tracing-subscriber` stack from a small [`Config`].
//!
//! ```rust,ignore
//! reservoir_log::init(&reservoir_log::Config::from_env())?;
//! tracing::info!("ready");
//! ```

mod builder;
mod config;
mod error;

pub use builder::init;
pub use config::{Config, Format};
pub use error::{LogError, LogResult};

