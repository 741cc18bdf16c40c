//! # Boreal Core Library (`boreal-core`)
//!
//! `boreal-core` is the foundational layer of the Boreal compositor. It
//! carries the pieces every other crate in the workspace leans on:
//!
//! - **Error Handling**: a unified error system through the [`CoreError`]
//!   enum and the more specific [`ConfigError`].
//! - **Core Data Types**: fundamental value types such as the generic
//!   [`Size`] used to describe surface dimensions.
//! - **Configuration Management**: TOML-based configuration loading with
//!   default fallbacks and validation, through [`ConfigLoader`] and
//!   [`CompositorConfig`].
//! - **Logging**: a logging bootstrap built on the `tracing` ecosystem,
//!   configurable for text or JSON output.
//!
//! Key components are re-exported at the crate root for ease of use.
//!
//! ```rust,ignore
//! use boreal_core::config::ConfigLoader;
//! use boreal_core::logging::init_logging;
//!
//! let config = ConfigLoader::load_from_path("boreal.toml".as_ref())?;
//! init_logging(&config.logging)?;
//! tracing::info!("boreal-core initialized");
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

// Re-export key types for convenience
pub use config::{
    CompositorConfig, ConfigLoader, LifetimePolicyKind, LoggingConfig, SurfacesConfig,
};
pub use error::{ConfigError, CoreError};
pub use logging::{init_logging, init_minimal_logging};
pub use types::Size;
