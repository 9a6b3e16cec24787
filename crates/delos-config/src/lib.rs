//! Typed configuration for Delos.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides (`PREFIX__SECTION__KEY`)
//! - Strict parsing: unknown fields are errors
//!
//! # Configuration File Format
//!
//! ```toml
//! [converters]
//! generated_namespace = "delos.generated."
//! reserved_prefixes = ["java"]
//! reserved_rewrite_suffix = "q"
//! artifact_suffix = "$paramConverter$"
//! runtime_converters = false
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ```
//!
//! # Example
//!
//! ```no_run
//! use delos_config::ConfigLoader;
//!
//! # fn main() -> Result<(), delos_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("delos.toml")?
//!     .with_env_prefix("DELOS")
//!     .load()?;
//!
//! let naming = config.converters.naming();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::DelosConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{ConverterConfig, LogFormat, LoggingConfig};
