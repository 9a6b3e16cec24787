//! Converter metrics.
//!
//! Counters are emitted through the `metrics` facade. Without an installed
//! recorder every call is a no-op.

use metrics::{counter, describe_counter};

/// Resolutions by outcome.
pub const RESOLUTIONS_TOTAL: &str = "delos_converter_resolutions_total";

/// Emitted converter artifacts.
pub const ARTIFACTS_EMITTED_TOTAL: &str = "delos_converter_artifacts_emitted_total";

/// Parameter values rejected at request time.
pub const CONVERSION_FAILURES_TOTAL: &str = "delos_conversion_failures_total";

/// Start-up overrides registered.
pub const OVERRIDES_TOTAL: &str = "delos_converter_overrides_total";

/// How a single `resolve` call was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The string type; nothing to convert.
    NoOp,
    /// Answered from the session registry.
    Cached,
    /// A new artifact was emitted.
    Emitted,
    /// Unresolvable at a deferrable site; left to a start-up override.
    DeferredUnresolvable,
    /// Unresolvable and fatal.
    Unresolvable,
}

impl ResolutionOutcome {
    /// Label value for the `outcome` dimension.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoOp => "noop",
            Self::Cached => "cached",
            Self::Emitted => "emitted",
            Self::DeferredUnresolvable => "deferred_unresolvable",
            Self::Unresolvable => "unresolvable",
        }
    }
}

/// Registers descriptions for all converter metrics.
pub fn register_metric_descriptions() {
    describe_counter!(RESOLUTIONS_TOTAL, "Parameter converter resolutions by outcome");
    describe_counter!(ARTIFACTS_EMITTED_TOTAL, "Parameter converter artifacts emitted");
    describe_counter!(
        CONVERSION_FAILURES_TOTAL,
        "Parameter values rejected during conversion"
    );
    describe_counter!(OVERRIDES_TOTAL, "Parameter converter overrides registered at start-up");
}

/// Records the outcome of one resolution.
pub fn record_resolution(outcome: ResolutionOutcome) {
    counter!(RESOLUTIONS_TOTAL, "outcome" => outcome.as_str()).increment(1);
}

/// Records an emitted artifact.
pub fn record_artifact_emitted() {
    counter!(ARTIFACTS_EMITTED_TOTAL).increment(1);
}

/// Records a rejected parameter value.
pub fn record_conversion_failure(type_name: &str) {
    counter!(CONVERSION_FAILURES_TOTAL, "type_name" => type_name.to_string()).increment(1);
}

/// Records a registered override.
pub fn record_override() {
    counter!(OVERRIDES_TOTAL).increment(1);
}
