//! # Delos Converter
//!
//! Build-time parameter converter resolution with start-up overrides.
//!
//! ## Build time
//!
//! - [`ConverterResolver`] - Picks a [`ConversionStrategy`](delos_core::ConversionStrategy)
//!   per declared type and memoizes it in a session-scoped [`ConverterRegistry`]
//! - [`ConverterEmitter`] / [`DispatchEmitter`] - Synthesize one artifact per type
//! - [`ArtifactNaming`] - Deterministic artifact ids outside reserved namespaces
//! - [`EndpointIndexer`] - Resolves every textual parameter of an endpoint
//!
//! ## Start-up and serving
//!
//! - [`ConverterDeployment`] - Live converters, start-up overrides
//! - [`RuntimeResolvedConverter`] - Deferred choice between override and static converter
//! - [`ParameterBinding`] - Converts the raw values of one request parameter
//!
//! ## Example
//!
//! ```rust
//! use delos_converter::{
//!     BoundValue, ConverterDeployment, ConverterResolver, DispatchEmitter, EndpointDescriptor,
//!     EndpointIndexer, ParameterDescriptor, ParameterSource,
//! };
//! use delos_core::TypedValue;
//! use delos_metadata::TypeIndex;
//!
//! let endpoint = EndpointDescriptor::new("Orders#get")
//!     .with_parameter(ParameterDescriptor::new("id", ParameterSource::Path, "long"));
//!
//! let mut indexer = EndpointIndexer::new(ConverterResolver::new(TypeIndex::new(), DispatchEmitter::default()));
//! let resolved = indexer.index(&endpoint).unwrap();
//!
//! let deployment = ConverterDeployment::new(indexer.into_resolver().into_emitter().into_artifacts());
//! deployment.start();
//!
//! let bindings = deployment.bind_endpoint(&resolved).unwrap();
//! let id = bindings.get("id").unwrap().bind(&["7"]).unwrap();
//! assert_eq!(id, BoundValue::Single(Some(TypedValue::Long(7))));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod deferral;
mod deployment;
mod emitter;
mod error;
mod indexer;
mod naming;
mod registry;
mod resolver;

pub use deferral::{OverrideSlot, RuntimeResolvedConverter, StartupGate};
pub use deployment::{BoundValue, ConverterDeployment, EndpointBindings, ParameterBinding};
pub use emitter::{
    ArtifactRecord, ArtifactTable, ConverterEmitter, DispatchEmitter, GeneratedConverter,
    MemberInvokers,
};
pub use error::{BuildError, DeploymentError, EmitError, ResolveError, ResolveResult};
pub use indexer::{
    Cardinality, EndpointDescriptor, EndpointIndexer, ParameterDescriptor, ParameterSource,
    ResolvedEndpoint, ResolvedParameter,
};
pub use naming::{
    ArtifactNaming, DEFAULT_ARTIFACT_SUFFIX, DEFAULT_GENERATED_NAMESPACE, DEFAULT_REWRITE_SUFFIX,
};
pub use registry::{ConverterRegistry, RegistryEntry};
pub use resolver::ConverterResolver;
