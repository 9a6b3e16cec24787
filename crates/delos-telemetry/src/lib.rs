//! Observability for Delos.
//!
//! - **Logging**: structured JSON or pretty logs via `tracing-subscriber`
//! - **Metrics**: converter resolution and conversion counters via the
//!   `metrics` facade (install any recorder to collect them)
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `delos_converter_resolutions_total` | Counter | `outcome` | Resolutions by outcome |
//! | `delos_converter_artifacts_emitted_total` | Counter | - | Emitted converter artifacts |
//! | `delos_conversion_failures_total` | Counter | `type_name` | Rejected parameter values |
//! | `delos_converter_overrides_total` | Counter | - | Start-up overrides registered |
//!
//! # Example
//!
//! ```rust,ignore
//! use delos_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(type_name = "com.acme.Money", "resolving converter");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use metrics::{register_metric_descriptions, ResolutionOutcome};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
