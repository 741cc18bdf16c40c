//! Configuration struct definitions for the Boreal core layer.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Root configuration for a Boreal compositor process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CompositorConfig {
    /// Configuration for the logging subsystem.
    pub logging: LoggingConfig,
    /// Configuration for surface lifetime management.
    pub surfaces: SurfacesConfig,
}

/// Configuration for the logging subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum log level: one of `trace`, `debug`, `info`, `warn`, `error`.
    pub level: String,
    /// Output format: `text` or `json`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::default_log_level(),
            format: defaults::default_log_format(),
        }
    }
}

/// Which lifetime-management strategy the surface manager uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LifetimePolicyKind {
    /// Surfaces stay alive while reachable from the root through explicit
    /// parent-to-child references.
    #[default]
    References,
    /// Surfaces stay alive until every sequence token attached to them has
    /// been satisfied.
    Sequences,
}

/// Configuration for surface lifetime management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfacesConfig {
    /// The lifetime-management strategy to construct the manager with.
    pub lifetime_policy: LifetimePolicyKind,
    /// Upper bound on pending temporary references per frame-sink
    /// namespace. The oldest entry is evicted once the bound is exceeded.
    /// `0` disables the bound.
    pub temporary_reference_limit: usize,
}

impl Default for SurfacesConfig {
    fn default() -> Self {
        Self {
            lifetime_policy: LifetimePolicyKind::default(),
            temporary_reference_limit: defaults::default_temporary_reference_limit(),
        }
    }
}
