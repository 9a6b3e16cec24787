//! Delos Metadata - type metadata for converter resolution
//!
//! The converter resolver never inspects types directly. It asks a
//! [`TypeMetadataProvider`] to classify a qualified type name and to list the
//! members that can build an instance from a single string.
//!
//! This crate provides the provider trait and [`TypeIndex`], a prebuilt
//! schema of type declarations that can be assembled in code or loaded from
//! JSON.
//!
//! # Example
//!
//! ```rust
//! use delos_metadata::{MemberDeclaration, TypeCategory, TypeDeclaration, TypeIndex, TypeMetadataProvider};
//!
//! let mut index = TypeIndex::new();
//! index
//!     .insert(
//!         TypeDeclaration::new("com.acme.Color", TypeCategory::Enum)
//!             .with_member(MemberDeclaration::static_method("valueOf", ["java.lang.String"]))
//!             .with_member(MemberDeclaration::static_method("fromString", ["java.lang.String"])),
//!     )
//!     .unwrap();
//!
//! let descriptor = index.classify("com.acme.Color").unwrap();
//! assert!(descriptor.is_enum());
//! assert_eq!(descriptor.candidates.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod declaration;
pub mod descriptor;
pub mod error;
pub mod index;

pub use declaration::{
    DeclaredKind, MemberDeclaration, TypeDeclaration, Visibility, FROM_STRING, VALUE_OF,
};
pub use descriptor::{TypeCategory, TypeDescriptor};
pub use error::{MetadataError, MetadataResult};
pub use index::TypeIndex;

/// Classifies types and enumerates their single-string members.
///
/// Implementations may be backed by a prebuilt schema ([`TypeIndex`]),
/// generated tables, or any other stable enumeration. Repeated calls for the
/// same name must return the same answer.
pub trait TypeMetadataProvider {
    /// Classifies `type_name`, or returns `None` if the type is unknown.
    fn classify(&self, type_name: &str) -> Option<TypeDescriptor>;
}

impl<T: TypeMetadataProvider + ?Sized> TypeMetadataProvider for &T {
    fn classify(&self, type_name: &str) -> Option<TypeDescriptor> {
        (**self).classify(type_name)
    }
}

impl<T: TypeMetadataProvider + ?Sized> TypeMetadataProvider for std::sync::Arc<T> {
    fn classify(&self, type_name: &str) -> Option<TypeDescriptor> {
        (**self).classify(type_name)
    }
}
