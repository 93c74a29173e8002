//! Logger builder implementation

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Format};
use crate::error::{LogError, LogResult};

/// Parse the level directive into an `EnvFilter`.
pub(crate) fn make_filter(level: &str) -> LogResult<EnvFilter> {
    EnvFilter::try_new(level).map_err(|e| LogError::Filter(format!("{level}: {e}")))
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Returns error if:
/// - The level directive cannot be parsed
/// - A global subscriber is already installed
pub fn init(config: &Config) -> LogResult<()> {
    let filter = make_filter(&config.level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        Format::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_ansi(config.ansi)
                    .with_target(config.target),
            )
            .try_init(),
        Format::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_ansi(config.ansi)
                    .with_target(config.target),
            )
            .try_init(),
        Format::Json => registry
            .with(fmt::layer().json().with_target(config.target))
            .try_init(),
    };
    installed.map_err(|e| LogError::Init(e.to_string()))?;
    tracing::debug!(level = %config.level, format = ?config.format, "Logger initialized");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_directive_is_filter_error() {
        let err = make_filter("reservoir=notalevel").unwrap_err();
        assert!(matches!(err, LogError::Filter(_)));
        assert!(make_filter("reservoir_pool=debug,info").is_ok());
    }

    #[test]
    fn second_init_fails() {
        // First call may lose to another test in this binary; either way the
        // second one must report Init.
        let _ = init(&Config::default());
        let err = init(&Config::default()).unwrap_err();
        assert!(matches!(err, LogError::Init(_)));
    }
}
