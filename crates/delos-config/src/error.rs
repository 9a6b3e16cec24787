//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading converter configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Configuration file exists but could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration is neither TOML nor JSON.
    #[error("unsupported configuration format: {format}")]
    UnsupportedFormat {
        /// The format name or file path that was rejected.
        format: String,
    },

    /// Malformed TOML or unknown fields.
    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON or unknown fields.
    #[error("failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A `.env` file exists but could not be loaded.
    #[error("failed to load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// A `PREFIX__SECTION__KEY` override could not be applied.
    #[error("invalid environment override {var}: {reason}")]
    EnvOverride {
        /// The environment variable name.
        var: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A loaded value breaks the naming or logging rules.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Dotted path of the offending field.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },
}

impl ConfigError {
    /// Creates a file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates a read error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates an unsupported format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates an environment override error.
    pub fn env_override(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvOverride {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_error() {
        let err = ConfigError::file_not_found("/etc/delos/delos.toml");
        assert!(err.to_string().contains("/etc/delos/delos.toml"));
    }

    #[test]
    fn test_unsupported_format_error() {
        let err = ConfigError::unsupported_format("yaml");
        assert_eq!(err.to_string(), "unsupported configuration format: yaml");
    }

    #[test]
    fn test_env_override_error() {
        let err = ConfigError::env_override("DELOS__CONVERTERS__RUNTIME_CONVERTERS", "expected boolean");
        assert!(err.to_string().contains("DELOS__CONVERTERS__RUNTIME_CONVERTERS"));
        assert!(err.to_string().contains("expected boolean"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::invalid_value("converters.reserved_rewrite_suffix", "must not be empty");
        assert!(err.to_string().contains("converters.reserved_rewrite_suffix"));
        assert!(err.to_string().contains("must not be empty"));
    }
}
