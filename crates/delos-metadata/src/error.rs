//! Metadata error types.

use thiserror::Error;

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Errors that can occur while building a type index.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The index document is not valid JSON or does not match the schema.
    #[error("failed to parse type index: {0}")]
    Parse(#[from] serde_json::Error),

    /// The same type was declared twice.
    #[error("type declared more than once: {name}")]
    DuplicateType {
        /// The duplicated type name.
        name: String,
    },

    /// A declaration is internally inconsistent.
    #[error("invalid declaration for {name}: {reason}")]
    InvalidDeclaration {
        /// The offending type name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_type_display() {
        let err = MetadataError::DuplicateType {
            name: "com.acme.Money".to_string(),
        };
        assert_eq!(err.to_string(), "type declared more than once: com.acme.Money");
    }

    #[test]
    fn test_invalid_declaration_display() {
        let err = MetadataError::InvalidDeclaration {
            name: "com.acme.Money".to_string(),
            reason: "not a primitive".to_string(),
        };
        assert!(err.to_string().contains("com.acme.Money"));
        assert!(err.to_string().contains("not a primitive"));
    }
}
