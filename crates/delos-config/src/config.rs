//! Main configuration type.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConverterConfig, LogFormat, LoggingConfig};

/// Complete Delos configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use delos_config::DelosConfig;
///
/// let config = DelosConfig::default();
/// assert_eq!(config.converters.generated_namespace, "delos.generated.");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct DelosConfig {
    /// Converter resolution.
    #[serde(default)]
    pub converters: ConverterConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DelosConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The generated namespace is empty or does not end in `.`
    /// - The generated namespace itself starts with a reserved prefix
    /// - The rewrite suffix or artifact suffix is empty
    /// - The log level is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let converters = &self.converters;

        if converters.generated_namespace.is_empty() {
            return Err(ConfigError::invalid_value(
                "converters.generated_namespace",
                "must not be empty",
            ));
        }

        if !converters.generated_namespace.ends_with('.') {
            return Err(ConfigError::invalid_value(
                "converters.generated_namespace",
                format!("must end with '.': {}", converters.generated_namespace),
            ));
        }

        if converters.naming().is_reserved(&converters.generated_namespace) {
            return Err(ConfigError::invalid_value(
                "converters.generated_namespace",
                format!(
                    "starts with a reserved prefix: {}",
                    converters.generated_namespace
                ),
            ));
        }

        if converters.reserved_rewrite_suffix.is_empty() {
            return Err(ConfigError::invalid_value(
                "converters.reserved_rewrite_suffix",
                "must not be empty",
            ));
        }

        if converters.artifact_suffix.is_empty() {
            return Err(ConfigError::invalid_value(
                "converters.artifact_suffix",
                "must not be empty",
            ));
        }

        delos_telemetry::logging::create_env_filter(&self.logging.level)
            .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;

        Ok(())
    }

    /// Development preset: pretty debug logs with source locations.
    ///
    /// ```
    /// use delos_config::DelosConfig;
    ///
    /// let config = DelosConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;

        config
    }

    /// Production preset: JSON logs at info level.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;

        config
    }
}
