//! Logging bootstrap for the Boreal compositor, built on the `tracing`
//! ecosystem.

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::CoreError;

/// Initializes a minimal logging setup, directing messages to `stderr`.
///
/// Intended for tests, early startup before configuration is loaded, or as
/// a fallback if full initialization fails. Filters via the `RUST_LOG`
/// environment variable, defaulting to `info`. Errors (e.g. a global
/// subscriber already being set) are ignored.
pub fn init_minimal_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Initializes the global logging system from a [`LoggingConfig`].
///
/// # Errors
///
/// Returns [`CoreError::LoggingInitialization`] if the configured level or
/// format is invalid, or if a global subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), CoreError> {
    let level = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => {
            return Err(CoreError::LoggingInitialization(format!(
                "invalid log level '{other}'"
            )))
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let result = match config.format.to_lowercase().as_str() {
        "json" => fmt::Subscriber::builder()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        "text" => fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        other => {
            return Err(CoreError::LoggingInitialization(format!(
                "invalid log format '{other}'"
            )))
        }
    };
    result.map_err(|e| CoreError::LoggingInitialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_logging_is_idempotent() {
        init_minimal_logging();
        init_minimal_logging();
    }

    #[test]
    fn invalid_level_is_rejected() {
        let config = LoggingConfig {
            level: "verbose".to_string(),
            format: "text".to_string(),
        };
        assert!(matches!(
            init_logging(&config),
            Err(CoreError::LoggingInitialization(_))
        ));
    }

    #[test]
    fn invalid_format_is_rejected() {
        let config = LoggingConfig {
            level: "info".to_string(),
            format: "xml".to_string(),
        };
        assert!(matches!(
            init_logging(&config),
            Err(CoreError::LoggingInitialization(_))
        ));
    }
}
