//! # Delos
//!
//! **Build-time parameter converter resolution**
//!
//! Endpoint parameters arrive as text (path segments, query strings,
//! headers, form fields). Delos decides once, while endpoints are indexed,
//! how each declared parameter type is built from that text, emits exactly
//! one converter per type, and lets start-up configuration override the
//! choice for call sites that allow it.
//!
//! ## Quick Start
//!
//! ```rust
//! use delos::prelude::*;
//!
//! let index = TypeIndex::new();
//! let endpoint = EndpointDescriptor::new("Orders#list")
//!     .with_parameter(ParameterDescriptor::new("page", ParameterSource::Query, "int"));
//!
//! // build time
//! let mut indexer = EndpointIndexer::new(ConverterResolver::new(&index, DispatchEmitter::default()));
//! let resolved = indexer.index(&endpoint).unwrap();
//!
//! // start-up
//! let deployment = ConverterDeployment::new(indexer.into_resolver().into_emitter().into_artifacts());
//! deployment.start();
//!
//! // per request
//! let bindings = deployment.bind_endpoint(&resolved).unwrap();
//! let page = bindings.get("page").unwrap().bind(&["3"]).unwrap();
//! assert_eq!(page, BoundValue::Single(Some(TypedValue::Int(3))));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! EndpointIndexer → ConverterResolver → TypeMetadataProvider
//!                         ↓        ↘
//!                 ConverterRegistry  ConverterEmitter → ArtifactTable
//!                                                          ↓
//!                              ConverterDeployment (overrides, start)
//!                                                          ↓
//!                                    ParameterBinding::bind(raw values)
//! ```

#![doc(html_root_url = "https://docs.rs/delos/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use delos_core as core;

// Re-export type metadata
pub use delos_metadata as metadata;

// Re-export resolution, emission and deployment
pub use delos_converter as converter;

// Re-export configuration
pub use delos_config as config;

// Re-export telemetry
pub use delos_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use delos::prelude::*;
///
/// let strategy = ConversionStrategy::NoOp;
/// assert!(!strategy.is_deferred());
/// ```
pub mod prelude {
    pub use delos_core::{
        ArtifactId, ConversionError, ConversionResult, ConversionStrategy, FnConverter,
        MemberRef, ParameterConverter, PrimitiveKind, SharedConverter, TypedValue, STRING_TYPE,
    };

    // Re-export metadata types
    pub use delos_metadata::{
        MemberDeclaration, TypeCategory, TypeDeclaration, TypeDescriptor, TypeIndex,
        TypeMetadataProvider, Visibility, FROM_STRING, VALUE_OF,
    };

    // Re-export converter pipeline
    pub use delos_converter::{
        ArtifactNaming, BoundValue, BuildError, Cardinality, ConverterDeployment, ConverterEmitter,
        ConverterResolver, DeploymentError, DispatchEmitter, EndpointDescriptor, EndpointIndexer,
        MemberInvokers, ParameterDescriptor, ParameterSource, ResolveError,
    };

    // Re-export configuration
    pub use delos_config::{ConfigLoader, DelosConfig};
}
