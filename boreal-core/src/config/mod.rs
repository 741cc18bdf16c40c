//! Configuration management for the Boreal core layer.
//!
//! Submodules:
//!
//! - [`types`]: the configuration struct definitions ([`CompositorConfig`],
//!   [`LoggingConfig`], [`SurfacesConfig`]) that define the schema.
//! - [`defaults`]: default values used when a configuration file is
//!   missing or incomplete.
//! - [`loader`]: loading and validation logic, centered on
//!   [`ConfigLoader`].
//!
//! Loading goes through [`ConfigLoader::load_from_path`]: the file is
//! read, parsed as TOML, and validated. Parse failures map to
//! [`crate::error::ConfigError::ParseError`], semantic problems to
//! [`crate::error::ConfigError::ValidationError`].

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{CompositorConfig, LifetimePolicyKind, LoggingConfig, SurfacesConfig};
