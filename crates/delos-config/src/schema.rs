//! Configuration schema types.

use delos_converter::{
    ArtifactNaming, DEFAULT_ARTIFACT_SUFFIX, DEFAULT_GENERATED_NAMESPACE, DEFAULT_REWRITE_SUFFIX,
};
use delos_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

/// Converter resolution section.
///
/// # Example
///
/// ```
/// use delos_config::ConverterConfig;
///
/// let config = ConverterConfig::default();
/// let naming = config.naming();
/// assert_eq!(
///     naming.artifact_for("java.time.Duration", false).as_str(),
///     "javaq.time.Duration$paramConverter$"
/// );
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConverterConfig {
    /// Namespace prepended to artifacts converting primitive wrappers.
    #[serde(default = "default_generated_namespace")]
    pub generated_namespace: String,

    /// Leading namespace segments artifacts must never land in.
    #[serde(default = "default_reserved_prefixes")]
    pub reserved_prefixes: Vec<String>,

    /// Text appended to a reserved leading segment.
    #[serde(default = "default_rewrite_suffix")]
    pub reserved_rewrite_suffix: String,

    /// Suffix appended to every artifact name.
    #[serde(default = "default_artifact_suffix")]
    pub artifact_suffix: String,

    /// Defer every parameter's converter choice to start-up.
    #[serde(default)]
    pub runtime_converters: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            generated_namespace: default_generated_namespace(),
            reserved_prefixes: default_reserved_prefixes(),
            reserved_rewrite_suffix: default_rewrite_suffix(),
            artifact_suffix: default_artifact_suffix(),
            runtime_converters: false,
        }
    }
}

impl ConverterConfig {
    /// Builds the artifact naming policy.
    #[must_use]
    pub fn naming(&self) -> ArtifactNaming {
        ArtifactNaming::default()
            .with_generated_namespace(self.generated_namespace.clone())
            .with_reserved_prefixes(self.reserved_prefixes.iter().cloned())
            .with_rewrite_suffix(self.reserved_rewrite_suffix.clone())
            .with_artifact_suffix(self.artifact_suffix.clone())
    }
}

fn default_generated_namespace() -> String {
    DEFAULT_GENERATED_NAMESPACE.to_string()
}

fn default_reserved_prefixes() -> Vec<String> {
    vec!["java".to_string()]
}

fn default_rewrite_suffix() -> String {
    DEFAULT_REWRITE_SUFFIX.to_string()
}

fn default_artifact_suffix() -> String {
    DEFAULT_ARTIFACT_SUFFIX.to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (for production).
    #[default]
    Json,
    /// Human-readable format (for development).
    Pretty,
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (e.g., "info", "delos_converter=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include file and line in log records.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::Json,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Converts to the telemetry crate's logging configuration.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            json_format: self.format == LogFormat::Json,
            file_line_info: self.include_location,
            ..LogConfig::default()
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converter_defaults() {
        let config = ConverterConfig::default();
        assert_eq!(config.generated_namespace, "delos.generated.");
        assert_eq!(config.reserved_prefixes, vec!["java"]);
        assert_eq!(config.reserved_rewrite_suffix, "q");
        assert_eq!(config.artifact_suffix, "$paramConverter$");
        assert!(!config.runtime_converters);
    }

    #[test]
    fn test_naming_reflects_config() {
        let config = ConverterConfig {
            generated_namespace: "acme.gen.".to_string(),
            artifact_suffix: "Converter".to_string(),
            ..Default::default()
        };

        let naming = config.naming();
        assert_eq!(naming.artifact_for("int", true).as_str(), "acme.gen.intConverter");
        assert_eq!(
            naming.artifact_for("java.util.UUID", false).as_str(),
            "javaq.util.UUIDConverter"
        );
    }

    #[test]
    fn test_naming_with_empty_rewrite_suffix_terminates() {
        let config = ConverterConfig {
            reserved_rewrite_suffix: String::new(),
            ..Default::default()
        };

        let naming = config.naming();
        assert_eq!(
            naming.artifact_for("java.time.Duration", false).as_str(),
            "javaq.time.Duration$paramConverter$"
        );
    }

    #[test]
    fn test_logging_to_log_config() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            ..Default::default()
        };

        let log = logging.to_log_config();
        assert!(!log.json_format);
        assert!(log.file_line_info);
        assert_eq!(log.level, "debug");
    }

    #[test]
    fn test_log_format_serde() {
        let json = serde_json::to_string(&LogFormat::Pretty).unwrap();
        assert_eq!(json, "\"pretty\"");
    }

    #[test]
    fn test_unknown_converter_field_rejected() {
        let result: Result<ConverterConfig, _> =
            serde_json::from_str(r#"{"generated_namespace": "x.", "prefix": "y"}"#);
        assert!(result.is_err());
    }
}
