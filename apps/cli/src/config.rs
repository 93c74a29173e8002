//! Layered application configuration.
//!
//! Sources, lowest to highest precedence: built-in defaults, the logger's own
//! variables (`RESERVOIR_LOG`, `RUST_LOG`, `RESERVOIR_LOG_FORMAT`), an optional
//! TOML file, `RESERVOIR_*` environment variables (`__` separates nesting,
//! e.g. `RESERVOIR_POOL__CAPACITY=8`), then command-line flags.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, ensure};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use reservoir_pool::{PoolConfig, TcpConfig};
use serde::{Deserialize, Serialize};

/// Pool section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSection {
    /// Maximum simultaneously borrowed connections
    pub capacity: usize,
    /// Give up waiting for a connection after this many milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acquire_timeout_ms: Option<u64>,
}

impl Default for PoolSection {
    fn default() -> Self {
        let defaults = PoolConfig::default();
        Self {
            capacity: defaults.capacity,
            acquire_timeout_ms: None,
        }
    }
}

impl PoolSection {
    pub fn to_pool_config(&self) -> PoolConfig {
        PoolConfig {
            capacity: self.capacity,
            acquire_timeout: self.acquire_timeout_ms.map(Duration::from_millis),
        }
    }
}

/// Everything the binary can be configured with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pool: PoolSection,
    pub tcp: TcpConfig,
    pub log: reservoir_log::Config,
}

/// Values given on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub capacity: Option<usize>,
    pub acquire_timeout_ms: Option<u64>,
    pub addr: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<reservoir_log::Format>,
}

impl AppConfig {
    /// Merge defaults, `path` (if any) and the environment, then apply CLI overrides.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> anyhow::Result<Self> {
        Self::load_with_log(path, overrides, reservoir_log::Config::from_env())
    }

    /// Like [`load`](Self::load), with `log` as the logging layer beneath the file.
    fn load_with_log(
        path: Option<&Path>,
        overrides: &Overrides,
        log: reservoir_log::Config,
    ) -> anyhow::Result<Self> {
        let base = Self {
            log,
            ..Self::default()
        };
        let mut figment = Figment::from(Serialized::defaults(base));
        if let Some(path) = path {
            ensure!(path.is_file(), "config file {} not found", path.display());
            figment = figment.merge(Toml::file(path));
        }
        // RESERVOIR_LOG / RESERVOIR_LOG_FORMAT belong to the logger's own env contract
        figment = figment.merge(
            Env::prefixed("RESERVOIR_")
                .split("__")
                .ignore(&["log", "log_format", "config"]),
        );

        let mut config = Self::extract(figment)?;
        config.apply(overrides);
        Ok(config)
    }

    fn extract(figment: Figment) -> anyhow::Result<Self> {
        figment
            .extract()
            .context("failed to read reservoir configuration")
    }

    fn apply(&mut self, overrides: &Overrides) {
        if let Some(capacity) = overrides.capacity {
            self.pool.capacity = capacity;
        }
        if let Some(ms) = overrides.acquire_timeout_ms {
            self.pool.acquire_timeout_ms = Some(ms);
        }
        if let Some(addr) = &overrides.addr {
            self.tcp.addr.clone_from(addr);
        }
        if let Some(level) = &overrides.log_level {
            self.log.level.clone_from(level);
        }
        if let Some(format) = overrides.log_format {
            self.log.format = format;
        }
    }

    /// Render as TOML, the same shape `load` reads.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("failed to render configuration")
    }
}
