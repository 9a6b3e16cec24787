//! Converter error types.
//!
//! Build-time failures ([`ResolveError`], [`BuildError`]) abort code
//! generation. [`DeploymentError`] covers start-up wiring. Request-time
//! failures are [`delos_core::ConversionError`] and never appear here.

use delos_core::ArtifactId;
use thiserror::Error;

/// Result type for resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors raised while resolving a converter for one type.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No constructor, `valueOf` or `fromString` exists and the call site
    /// cannot defer to start-up.
    #[error("failed to find a parameter converter for {type_name}")]
    Unresolvable {
        /// The unconvertible type.
        type_name: String,
    },

    /// The emitter could not synthesize the converter artifact.
    #[error("failed to emit parameter converter for {type_name}")]
    Emit {
        /// The type being converted.
        type_name: String,
        /// Emitter failure.
        #[source]
        source: EmitError,
    },
}

impl ResolveError {
    /// Returns the type that failed to resolve.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Unresolvable { type_name } | Self::Emit { type_name, .. } => type_name,
        }
    }
}

/// Errors raised by a [`ConverterEmitter`](crate::ConverterEmitter).
#[derive(Error, Debug)]
pub enum EmitError {
    /// The strategy does not describe an artifact (no-op, deferred or unresolvable).
    #[error("strategy '{strategy}' does not produce an artifact")]
    UnsupportedStrategy {
        /// Strategy label.
        strategy: &'static str,
    },

    /// The member chosen by the resolver has no invocation bound to it.
    #[error("no invocation registered for {member}")]
    MissingInvoker {
        /// Display form of the member reference.
        member: String,
    },

    /// An artifact with the same id was already emitted.
    #[error("artifact {artifact} was already emitted")]
    DuplicateArtifact {
        /// The clashing artifact id.
        artifact: ArtifactId,
    },

    /// The emitter reported a different id than the strategy names.
    #[error("emitter returned artifact {actual}, expected {expected}")]
    UnexpectedArtifact {
        /// Id chosen by the resolver.
        expected: ArtifactId,
        /// Id reported by the emitter.
        actual: ArtifactId,
    },

    /// Backend-specific failure.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Error raised while indexing an endpoint, naming the parameter site.
#[derive(Error, Debug)]
pub enum BuildError {
    /// A parameter's converter could not be resolved.
    #[error("endpoint '{endpoint}', parameter '{parameter}': {source}")]
    Parameter {
        /// Endpoint that declared the parameter.
        endpoint: String,
        /// Parameter name.
        parameter: String,
        /// Underlying resolution failure.
        #[source]
        source: ResolveError,
    },
}

impl BuildError {
    /// Returns the type that could not be converted.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Parameter { source, .. } => source.type_name(),
        }
    }
}

/// Errors raised while wiring converters at start-up.
#[derive(Error, Debug)]
pub enum DeploymentError {
    /// Overrides may only be registered before the deployment starts.
    #[error("cannot register converter override for {type_name}: deployment already started")]
    AlreadyStarted {
        /// Type the override targeted.
        type_name: String,
    },

    /// The override slot for this type was already assigned.
    #[error("converter override for {type_name} is already registered")]
    AlreadyRegistered {
        /// Type the override targeted.
        type_name: String,
    },

    /// A strategy references an artifact the emitter never produced.
    #[error("artifact {artifact} for {type_name} was not emitted")]
    MissingArtifact {
        /// Type the artifact converts to.
        type_name: String,
        /// The missing artifact id.
        artifact: ArtifactId,
    },

    /// A bare `Unresolvable` strategy reached start-up.
    #[error("no converter can be bound for {type_name}")]
    Unresolvable {
        /// The unconvertible type.
        type_name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_build_error_names_site_and_type() {
        let err = BuildError::Parameter {
            endpoint: "GET /orders/{id}".to_string(),
            parameter: "currency".to_string(),
            source: ResolveError::Unresolvable {
                type_name: "com.acme.Currency".to_string(),
            },
        };

        let message = err.to_string();
        assert!(message.contains("GET /orders/{id}"));
        assert!(message.contains("currency"));
        assert!(message.contains("com.acme.Currency"));
        assert_eq!(err.type_name(), "com.acme.Currency");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_emit_error_chain() {
        let err = ResolveError::Emit {
            type_name: "com.acme.Money".to_string(),
            source: EmitError::MissingInvoker {
                member: "com.acme.Money::new(String)".to_string(),
            },
        };

        assert_eq!(err.type_name(), "com.acme.Money");
        let source = err.source().unwrap().to_string();
        assert!(source.contains("com.acme.Money::new(String)"));
    }

    #[test]
    fn test_deployment_error_display() {
        let err = DeploymentError::AlreadyStarted {
            type_name: "com.acme.Money".to_string(),
        };
        assert!(err.to_string().contains("already started"));
    }
}
