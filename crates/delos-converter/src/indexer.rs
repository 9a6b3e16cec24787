//! Endpoint indexing.
//!
//! The [`EndpointIndexer`] walks endpoint declarations during the build and
//! resolves a converter strategy for every textual parameter. Framework
//! injected parameters (`Context`) are skipped. A failure names the endpoint
//! and parameter that required the unconvertible type.

use delos_core::ConversionStrategy;
use delos_metadata::TypeMetadataProvider;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{BuildError, ConverterEmitter, ConverterResolver};

/// Where a parameter value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterSource {
    /// A path template segment.
    Path,
    /// A query string parameter.
    Query,
    /// A request header.
    Header,
    /// A form field.
    Form,
    /// A cookie.
    Cookie,
    /// A request or response handle injected by the framework.
    Context,
}

impl ParameterSource {
    /// Returns `true` if values arrive as text and need a converter.
    #[must_use]
    pub fn is_textual(self) -> bool {
        !matches!(self, Self::Context)
    }
}

/// Whether a parameter takes one value or all repeated values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// A single value; the first occurrence wins.
    #[default]
    Single,
    /// Every occurrence, converted element by element.
    Multi,
}

/// A declared endpoint parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name.
    pub name: String,
    /// Value source.
    pub source: ParameterSource,
    /// Qualified element type. For multi-valued parameters this is the
    /// element type, not the collection.
    pub type_name: String,
    /// Single or multi-valued.
    #[serde(default)]
    pub cardinality: Cardinality,
    /// Whether the converter may be supplied at start-up.
    #[serde(default)]
    pub runtime_resolvable: bool,
}

impl ParameterDescriptor {
    /// Creates a single-valued parameter.
    pub fn new(name: impl Into<String>, source: ParameterSource, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source,
            type_name: type_name.into(),
            cardinality: Cardinality::Single,
            runtime_resolvable: false,
        }
    }

    /// Creates a framework-injected parameter.
    pub fn context(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name, ParameterSource::Context, type_name)
    }

    /// Marks the parameter as multi-valued.
    #[must_use]
    pub fn multi(mut self) -> Self {
        self.cardinality = Cardinality::Multi;
        self
    }

    /// Allows the converter to be supplied at start-up.
    #[must_use]
    pub fn runtime_resolvable(mut self) -> Self {
        self.runtime_resolvable = true;
        self
    }
}

/// A declared endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Endpoint name (usually `Type#method` or an operation id).
    pub name: String,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}

impl EndpointDescriptor {
    /// Creates an endpoint without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }
}

/// A parameter with its resolved strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParameter {
    /// The declaration.
    pub descriptor: ParameterDescriptor,
    /// Resolved strategy; `None` for `Context` parameters.
    pub strategy: Option<ConversionStrategy>,
}

/// An endpoint whose textual parameters all have strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    /// Endpoint name.
    pub name: String,
    /// Parameters in declaration order.
    pub parameters: Vec<ResolvedParameter>,
}

impl ResolvedEndpoint {
    /// Looks up a parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ResolvedParameter> {
        self.parameters.iter().find(|p| p.descriptor.name == name)
    }
}

/// Resolves converter strategies for endpoint parameters.
#[derive(Debug)]
pub struct EndpointIndexer<P, E> {
    resolver: ConverterResolver<P, E>,
    runtime_converters: bool,
}

impl<P, E> EndpointIndexer<P, E>
where
    P: TypeMetadataProvider,
    E: ConverterEmitter,
{
    /// Creates an indexer around a resolver.
    pub fn new(resolver: ConverterResolver<P, E>) -> Self {
        Self {
            resolver,
            runtime_converters: false,
        }
    }

    /// Defers every parameter to start-up, not just those that ask for it.
    #[must_use]
    pub fn with_runtime_converters(mut self, enabled: bool) -> Self {
        self.runtime_converters = enabled;
        self
    }

    /// Resolves every textual parameter of `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Parameter`] naming the first parameter whose
    /// type cannot be converted.
    pub fn index(&mut self, endpoint: &EndpointDescriptor) -> Result<ResolvedEndpoint, BuildError> {
        let mut parameters = Vec::with_capacity(endpoint.parameters.len());

        for parameter in &endpoint.parameters {
            let strategy = if parameter.source.is_textual() {
                let runtime_resolvable = parameter.runtime_resolvable || self.runtime_converters;
                let strategy = self
                    .resolver
                    .resolve(&parameter.type_name, runtime_resolvable)
                    .map_err(|source| BuildError::Parameter {
                        endpoint: endpoint.name.clone(),
                        parameter: parameter.name.clone(),
                        source,
                    })?;
                Some(strategy)
            } else {
                None
            };

            parameters.push(ResolvedParameter {
                descriptor: parameter.clone(),
                strategy,
            });
        }

        debug!(endpoint = %endpoint.name, parameters = parameters.len(), "indexed endpoint");

        Ok(ResolvedEndpoint {
            name: endpoint.name.clone(),
            parameters,
        })
    }

    /// Indexes several endpoints, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// See [`index`](Self::index).
    pub fn index_all<'a, I>(&mut self, endpoints: I) -> Result<Vec<ResolvedEndpoint>, BuildError>
    where
        I: IntoIterator<Item = &'a EndpointDescriptor>,
    {
        endpoints.into_iter().map(|e| self.index(e)).collect()
    }

    /// The underlying resolver.
    #[must_use]
    pub fn resolver(&self) -> &ConverterResolver<P, E> {
        &self.resolver
    }

    /// Ends indexing and returns the resolver.
    #[must_use]
    pub fn into_resolver(self) -> ConverterResolver<P, E> {
        self.resolver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DispatchEmitter, ResolveError};
    use delos_core::STRING_TYPE;
    use delos_metadata::{MemberDeclaration, TypeCategory, TypeDeclaration, TypeIndex, VALUE_OF};

    fn indexer() -> EndpointIndexer<TypeIndex, DispatchEmitter> {
        let index = TypeIndex::from_declarations([TypeDeclaration::new(
            "com.acme.Level",
            TypeCategory::Enum,
        )
        .with_member(MemberDeclaration::static_method(VALUE_OF, [STRING_TYPE]))])
        .unwrap();
        EndpointIndexer::new(ConverterResolver::new(index, DispatchEmitter::default()))
    }

    fn orders() -> EndpointDescriptor {
        EndpointDescriptor::new("OrderResource#list")
            .with_parameter(ParameterDescriptor::new("page", ParameterSource::Query, "int"))
            .with_parameter(ParameterDescriptor::new("tag", ParameterSource::Query, STRING_TYPE).multi())
            .with_parameter(ParameterDescriptor::context("request", "com.acme.http.Request"))
    }

    #[test]
    fn test_index_endpoint() {
        let mut indexer = indexer();
        let endpoint = indexer.index(&orders()).unwrap();

        assert_eq!(endpoint.name, "OrderResource#list");
        assert_eq!(endpoint.parameters.len(), 3);
        assert_eq!(
            endpoint.parameter("page").unwrap().strategy.as_ref().map(ConversionStrategy::label),
            Some("primitive_parse")
        );
        assert_eq!(
            endpoint.parameter("tag").unwrap().strategy,
            Some(ConversionStrategy::NoOp)
        );
        assert_eq!(endpoint.parameter("tag").unwrap().descriptor.cardinality, Cardinality::Multi);
    }

    #[test]
    fn test_context_parameter_skipped() {
        let mut indexer = indexer();
        let endpoint = indexer.index(&orders()).unwrap();

        assert!(endpoint.parameter("request").unwrap().strategy.is_none());
        assert!(!indexer.resolver().registry().contains("com.acme.http.Request"));
    }

    #[test]
    fn test_failure_names_site() {
        let mut indexer = indexer();
        let endpoint = EndpointDescriptor::new("OrderResource#get")
            .with_parameter(ParameterDescriptor::new("id", ParameterSource::Path, "long"))
            .with_parameter(ParameterDescriptor::new("since", ParameterSource::Header, "com.acme.Instant"));

        let err = indexer.index(&endpoint).unwrap_err();
        let BuildError::Parameter {
            endpoint,
            parameter,
            source,
        } = &err;
        assert_eq!(endpoint, "OrderResource#get");
        assert_eq!(parameter, "since");
        assert!(matches!(source, ResolveError::Unresolvable { .. }));
        assert_eq!(err.type_name(), "com.acme.Instant");
    }

    #[test]
    fn test_runtime_resolvable_parameter_defers() {
        let mut indexer = indexer();
        let endpoint = EndpointDescriptor::new("OrderResource#since").with_parameter(
            ParameterDescriptor::new("since", ParameterSource::Query, "com.acme.Instant").runtime_resolvable(),
        );

        let resolved = indexer.index(&endpoint).unwrap();
        assert_eq!(
            resolved.parameters[0].strategy,
            Some(ConversionStrategy::Deferred(None))
        );
    }

    #[test]
    fn test_runtime_converters_defer_every_site() {
        let mut indexer = indexer().with_runtime_converters(true);
        let endpoint = EndpointDescriptor::new("Levels#get")
            .with_parameter(ParameterDescriptor::new("level", ParameterSource::Query, "com.acme.Level"));

        let resolved = indexer.index(&endpoint).unwrap();
        let strategy = resolved.parameters[0].strategy.as_ref().unwrap();
        assert!(strategy.is_deferred());
        assert_eq!(strategy.member().unwrap().name, VALUE_OF);
    }

    #[test]
    fn test_shared_types_emitted_once() {
        let mut indexer = indexer();
        let second = EndpointDescriptor::new("OrderResource#count")
            .with_parameter(ParameterDescriptor::new("limit", ParameterSource::Query, "int"));

        let resolved = indexer.index_all([&orders(), &second]).unwrap();
        assert_eq!(resolved.len(), 2);

        let emitter = indexer.into_resolver().into_emitter();
        assert_eq!(emitter.len(), 1);
    }

    #[test]
    fn test_descriptor_from_json() {
        let endpoint: EndpointDescriptor = serde_json::from_str(
            r#"{
                "name": "Search#run",
                "parameters": [
                    { "name": "q", "source": "query", "type_name": "java.lang.String" },
                    { "name": "ids", "source": "query", "type_name": "long", "cardinality": "multi" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(endpoint.parameters.len(), 2);
        assert_eq!(endpoint.parameters[1].cardinality, Cardinality::Multi);
        assert!(!endpoint.parameters[0].runtime_resolvable);
    }
}
