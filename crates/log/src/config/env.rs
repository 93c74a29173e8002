//! Configuration from the process environment

use super::Config;

impl Config {
    /// Create configuration from environment variables
    ///
    /// `RESERVOIR_LOG` wins over `RUST_LOG`; `RESERVOIR_LOG_FORMAT` picks the
    /// format and is ignored when unrecognised.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = lookup("RESERVOIR_LOG").or_else(|| lookup("RUST_LOG")) {
            config.level = level;
        }
        if let Some(format) = lookup("RESERVOIR_LOG_FORMAT").and_then(|f| f.parse().ok()) {
            config.format = format;
        }

        config
    }
}
