//! Loading and validation of the Boreal configuration.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::ConfigError;

use super::types::CompositorConfig;

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const VALID_LOG_FORMATS: &[&str] = &["text", "json"];

/// Loads and validates [`CompositorConfig`] instances.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from the TOML file at `path`.
    ///
    /// A missing file is not an error at this layer; callers that want a
    /// fallback should use [`CompositorConfig::default`] instead.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read,
    /// [`ConfigError::ParseError`] on invalid TOML, and
    /// [`ConfigError::ValidationError`] if the parsed values are out of
    /// range.
    pub fn load_from_path(path: &Path) -> Result<CompositorConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: CompositorConfig = toml::from_str(&contents)?;
        Self::validate(&config)?;
        debug!(path = %path.display(), "loaded compositor configuration");
        Ok(config)
    }

    /// Validates a configuration, whether loaded or constructed in code.
    pub fn validate(config: &CompositorConfig) -> Result<(), ConfigError> {
        let level = config.logging.level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown log level '{}', expected one of {:?}",
                config.logging.level, VALID_LOG_LEVELS
            )));
        }
        let format = config.logging.format.to_lowercase();
        if !VALID_LOG_FORMATS.contains(&format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown log format '{}', expected one of {:?}",
                config.logging.format, VALID_LOG_FORMATS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::LifetimePolicyKind;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_temp_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_valid_config() {
        let file = write_temp_config(
            r#"
            [logging]
            level = "debug"
            format = "json"

            [surfaces]
            lifetime_policy = "sequences"
            temporary_reference_limit = 8
            "#,
        );
        let config = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.surfaces.lifetime_policy, LifetimePolicyKind::Sequences);
        assert_eq!(config.surfaces.temporary_reference_limit, 8);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let result = ConfigLoader::load_from_path(Path::new("/nonexistent/boreal.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn load_invalid_toml_is_parse_error() {
        let file = write_temp_config("[logging\nlevel = ");
        let result = ConfigLoader::load_from_path(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let file = write_temp_config(
            r#"
            [logging]
            level = "verbose"
            "#,
        );
        let result = ConfigLoader::load_from_path(file.path());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn unknown_log_format_fails_validation() {
        let config = CompositorConfig {
            logging: crate::config::LoggingConfig {
                level: "info".to_string(),
                format: "xml".to_string(),
            },
            ..Default::default()
        };
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
