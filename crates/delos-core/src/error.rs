//! Conversion error types.
//!
//! A [`ConversionError`] is always a client-input fault: the request carried
//! text that could not be turned into the declared parameter type. It never
//! poisons the converter that produced it.

use http::StatusCode;
use thiserror::Error;

/// Result type alias using [`ConversionError`].
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Error raised when a raw parameter value cannot be converted.
///
/// # Example
///
/// ```rust
/// use delos_core::ConversionError;
/// use http::StatusCode;
///
/// let err = ConversionError::malformed("int", "abc", "invalid digit found in string");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.type_name(), "int");
/// assert!(err.to_string().contains("abc"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The text is not a valid representation of the target type.
    #[error("cannot convert '{value}' to {type_name}: {reason}")]
    Malformed {
        /// Declared parameter type.
        type_name: String,
        /// The offending raw value.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// Neither a start-up override nor a build-time converter exists.
    #[error("no parameter converter available for {type_name}")]
    NoConverter {
        /// Declared parameter type.
        type_name: String,
    },

    /// A user-supplied converter rejected the value.
    #[error("conversion to {type_name} rejected: {message}")]
    Rejected {
        /// Declared parameter type.
        type_name: String,
        /// Message supplied by the converter.
        message: String,
    },
}

impl ConversionError {
    /// Creates an error for text that does not parse as the target type.
    #[must_use]
    pub fn malformed(
        type_name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Malformed {
            type_name: type_name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates an error for a deferred parameter that never got a converter.
    #[must_use]
    pub fn no_converter(type_name: impl Into<String>) -> Self {
        Self::NoConverter {
            type_name: type_name.into(),
        }
    }

    /// Creates an error for a value rejected by a custom converter.
    #[must_use]
    pub fn rejected(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Returns the declared parameter type that failed to convert.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Malformed { type_name, .. }
            | Self::NoConverter { type_name }
            | Self::Rejected { type_name, .. } => type_name,
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// Conversion failures are scoped to the request that supplied the
    /// value, so they always map to `400 Bad Request`.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "MALFORMED_PARAMETER",
            Self::NoConverter { .. } => "UNCONVERTIBLE_PARAMETER",
            Self::Rejected { .. } => "REJECTED_PARAMETER",
        }
    }
}
