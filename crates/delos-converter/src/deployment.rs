//! Start-up wiring of converters.
//!
//! A [`ConverterDeployment`] owns the emitted [`ArtifactTable`] and one
//! override slot per deferred type. Configuration code registers overrides
//! before [`start`](ConverterDeployment::start); afterwards the slots are
//! sealed and endpoints convert raw values through [`ParameterBinding`]s.

use std::collections::HashMap;
use std::sync::Arc;

use delos_core::{
    ConversionResult, ConversionStrategy, NoopConverter, ParameterConverter, SharedConverter,
    TypedValue,
};
use delos_telemetry::metrics::{record_conversion_failure, record_override};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::{
    ArtifactTable, Cardinality, DeploymentError, OverrideSlot, ParameterSource, ResolvedEndpoint,
    RuntimeResolvedConverter, StartupGate,
};

/// Live converters for one application.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use delos_converter::{ConverterDeployment, ConverterResolver, DispatchEmitter};
/// use delos_core::{FnConverter, ParameterConverter, TypedValue};
/// use delos_metadata::TypeIndex;
///
/// let mut resolver = ConverterResolver::new(TypeIndex::new(), DispatchEmitter::default());
/// let strategy = resolver.resolve("com.acme.Instant", true).unwrap();
///
/// let deployment = ConverterDeployment::new(resolver.into_emitter().into_artifacts());
/// deployment
///     .register_override(
///         "com.acme.Instant",
///         Arc::new(FnConverter::new("com.acme.Instant", |raw| Ok(TypedValue::Str(raw.into())))),
///     )
///     .unwrap();
/// deployment.start();
///
/// let converter = deployment.converter_for("com.acme.Instant", &strategy).unwrap();
/// assert_eq!(converter.convert("2024-01-01").unwrap(), TypedValue::Str("2024-01-01".into()));
/// ```
#[derive(Debug)]
pub struct ConverterDeployment {
    artifacts: ArtifactTable,
    gate: Arc<StartupGate>,
    slots: RwLock<HashMap<String, Arc<OverrideSlot>>>,
}

impl ConverterDeployment {
    /// Creates a deployment over the emitted artifacts.
    #[must_use]
    pub fn new(artifacts: ArtifactTable) -> Self {
        Self {
            artifacts,
            gate: Arc::new(StartupGate::new()),
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a start-up override for `type_name`.
    ///
    /// The override takes precedence over any synthesized converter at every
    /// deferred site of that type.
    ///
    /// # Errors
    ///
    /// - [`DeploymentError::AlreadyStarted`] after [`start`](Self::start).
    /// - [`DeploymentError::AlreadyRegistered`] if the type already has one.
    pub fn register_override(
        &self,
        type_name: &str,
        converter: SharedConverter,
    ) -> Result<(), DeploymentError> {
        let mut slots = self.slots.write();

        if self.gate.is_open() {
            warn!(type_name, "rejected converter override after start-up");
            return Err(DeploymentError::AlreadyStarted {
                type_name: type_name.to_string(),
            });
        }

        let slot = slots.entry(type_name.to_string()).or_default();
        if slot.publish(converter).is_err() {
            warn!(type_name, "rejected duplicate converter override");
            return Err(DeploymentError::AlreadyRegistered {
                type_name: type_name.to_string(),
            });
        }

        record_override();
        info!(type_name, "registered converter override");
        Ok(())
    }

    /// Seals override registration. Later calls are no-ops.
    pub fn start(&self) {
        // the write lock orders this against in-flight registrations
        let slots = self.slots.write();
        if self.gate.open() {
            info!(
                overrides = slots.len(),
                artifacts = self.artifacts.len(),
                "converter deployment started"
            );
        }
    }

    /// Returns `true` once [`start`](Self::start) was called.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.gate.is_open()
    }

    /// Returns `true` if an override is registered for `type_name`.
    #[must_use]
    pub fn has_override(&self, type_name: &str) -> bool {
        self.slots
            .read()
            .get(type_name)
            .is_some_and(|slot| slot.is_published())
    }

    /// Builds the live converter for a resolved strategy.
    ///
    /// # Errors
    ///
    /// - [`DeploymentError::MissingArtifact`] if an emitted strategy names an
    ///   artifact this deployment does not hold.
    /// - [`DeploymentError::Unresolvable`] for a bare `Unresolvable` strategy.
    pub fn converter_for(
        &self,
        type_name: &str,
        strategy: &ConversionStrategy,
    ) -> Result<SharedConverter, DeploymentError> {
        match strategy {
            ConversionStrategy::NoOp => Ok(Arc::new(NoopConverter)),
            ConversionStrategy::PrimitiveParse { artifact, .. }
            | ConversionStrategy::Constructor { artifact, .. }
            | ConversionStrategy::FactoryMethod { artifact, .. } => self
                .artifacts
                .get(artifact)
                .cloned()
                .ok_or_else(|| DeploymentError::MissingArtifact {
                    type_name: type_name.to_string(),
                    artifact: artifact.clone(),
                }),
            ConversionStrategy::Deferred(inner) => {
                let fallback = match inner.as_deref() {
                    Some(inner) => Some(self.converter_for(type_name, inner)?),
                    None => None,
                };
                Ok(Arc::new(RuntimeResolvedConverter::new(
                    type_name,
                    fallback,
                    self.slot(type_name),
                    Arc::clone(&self.gate),
                )))
            }
            ConversionStrategy::Unresolvable => Err(DeploymentError::Unresolvable {
                type_name: type_name.to_string(),
            }),
        }
    }

    /// Binds every textual parameter of `endpoint` to its live converter.
    ///
    /// # Errors
    ///
    /// See [`converter_for`](Self::converter_for).
    pub fn bind_endpoint(&self, endpoint: &ResolvedEndpoint) -> Result<EndpointBindings, DeploymentError> {
        let mut bindings = Vec::with_capacity(endpoint.parameters.len());

        for parameter in &endpoint.parameters {
            let Some(strategy) = &parameter.strategy else {
                continue;
            };
            let descriptor = &parameter.descriptor;
            let converter = self.converter_for(&descriptor.type_name, strategy)?;

            bindings.push(ParameterBinding {
                endpoint: endpoint.name.clone(),
                name: descriptor.name.clone(),
                source: descriptor.source,
                cardinality: descriptor.cardinality,
                converter,
            });
        }

        debug!(endpoint = %endpoint.name, bindings = bindings.len(), "bound endpoint parameters");

        Ok(EndpointBindings {
            endpoint: endpoint.name.clone(),
            bindings,
        })
    }

    fn slot(&self, type_name: &str) -> Arc<OverrideSlot> {
        if let Some(slot) = self.slots.read().get(type_name) {
            return Arc::clone(slot);
        }
        Arc::clone(self.slots.write().entry(type_name.to_string()).or_default())
    }
}

/// A converted parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    /// A single-valued parameter; `None` when absent from the request.
    Single(Option<TypedValue>),
    /// A multi-valued parameter, one element per occurrence.
    Multi(Vec<TypedValue>),
}

/// One endpoint parameter wired to its converter.
#[derive(Debug, Clone)]
pub struct ParameterBinding {
    endpoint: String,
    name: String,
    source: ParameterSource,
    cardinality: Cardinality,
    converter: SharedConverter,
}

impl ParameterBinding {
    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value source.
    #[must_use]
    pub fn source(&self) -> ParameterSource {
        self.source
    }

    /// Single or multi-valued.
    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// The live converter.
    #[must_use]
    pub fn converter(&self) -> &SharedConverter {
        &self.converter
    }

    /// Converts the raw values supplied for this parameter by one request.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConversionError`](delos_core::ConversionError);
    /// the failure is scoped to this call.
    pub fn bind(&self, raw: &[&str]) -> ConversionResult<BoundValue> {
        let result = match self.cardinality {
            Cardinality::Single => raw
                .first()
                .map(|value| self.converter.convert(value))
                .transpose()
                .map(BoundValue::Single),
            Cardinality::Multi => raw
                .iter()
                .map(|value| self.converter.convert(value))
                .collect::<ConversionResult<Vec<_>>>()
                .map(BoundValue::Multi),
        };

        if let Err(err) = &result {
            record_conversion_failure(err.type_name());
            debug!(
                endpoint = %self.endpoint,
                parameter = %self.name,
                error = %err,
                "parameter conversion failed"
            );
        }
        result
    }
}

/// Parameter bindings for one endpoint, in declaration order.
#[derive(Debug, Clone)]
pub struct EndpointBindings {
    endpoint: String,
    bindings: Vec<ParameterBinding>,
}

impl EndpointBindings {
    /// Endpoint name.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Looks up a binding by parameter name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParameterBinding> {
        self.bindings.iter().find(|b| b.name == name)
    }

    /// Iterates the bindings.
    pub fn iter(&self) -> impl Iterator<Item = &ParameterBinding> {
        self.bindings.iter()
    }

    /// Number of bound parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if the endpoint has no textual parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
