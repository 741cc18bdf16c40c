//! Error handling for the Boreal core layer.
//!
//! This module defines the error types used throughout the core crate,
//! built with `thiserror`. The main error type is [`CoreError`], which
//! wraps the more specific [`ConfigError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for the Boreal compositor.
///
/// Represents all failures that can occur in the core layer. Higher
/// layers typically wrap this in their own error enums.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Errors related to configuration loading, parsing, or validation.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Errors that occur while initializing the logging system.
    #[error("Logging Initialization Failed: {0}")]
    LoggingInitialization(String),

    /// General I/O errors not covered by more specific variants.
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for unexpected internal errors within the core library.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// Error type for configuration-related operations.
///
/// Typically wrapped by [`CoreError::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An error occurred while reading a configuration file.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file contained invalid TOML.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configuration parsed but failed semantic validation.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_wraps_into_core_error() {
        let err: CoreError = ConfigError::ValidationError("bad level".to_string()).into();
        assert!(matches!(err, CoreError::Config(_)));
        assert!(err.to_string().contains("bad level"));
    }

    #[test]
    fn read_error_reports_path() {
        let err = ConfigError::ReadError {
            path: PathBuf::from("/etc/boreal/boreal.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("boreal.toml"));
    }
}
