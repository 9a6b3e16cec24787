//! Converter strategy resolution.
//!
//! [`ConverterResolver`] decides, once per type and build session, how a
//! declared parameter type is converted from text:
//!
//! 1. The string type needs no conversion (`NoOp`).
//! 2. A type already in the session registry reuses its decision, including
//!    a decision that it is unconvertible.
//! 3. Primitive wrappers use their built-in string parser.
//! 4. Enums with a `fromString` factory use it.
//! 5. Otherwise the first single-string constructor wins, then `valueOf`,
//!    then `fromString`.
//!
//! Emitted strategies are synthesized through the [`ConverterEmitter`]
//! exactly once per type. Call sites that allow runtime resolution receive
//! the decision wrapped in `Deferred`, which turns an unconvertible type
//! into a latent failure curable by a start-up override.

use delos_core::{is_string_type, ArtifactId, ConversionStrategy, PrimitiveKind};
use delos_metadata::{TypeDescriptor, TypeMetadataProvider};
use delos_telemetry::metrics::{record_artifact_emitted, record_resolution, ResolutionOutcome};
use tracing::{debug, warn};

use crate::{
    ArtifactNaming, ConverterEmitter, ConverterRegistry, EmitError, RegistryEntry, ResolveError,
    ResolveResult,
};

/// Resolves declared parameter types to conversion strategies.
///
/// A resolver owns the registry for one build session. Drop it (or call
/// [`into_emitter`](Self::into_emitter)) when code generation completes.
///
/// # Example
///
/// ```rust
/// use delos_converter::{ConverterResolver, DispatchEmitter};
/// use delos_core::ConversionStrategy;
/// use delos_metadata::TypeIndex;
///
/// let mut resolver = ConverterResolver::new(TypeIndex::new(), DispatchEmitter::default());
///
/// let strategy = resolver.resolve("int", false).unwrap();
/// assert_eq!(strategy.label(), "primitive_parse");
///
/// assert_eq!(resolver.resolve("java.lang.String", false).unwrap(), ConversionStrategy::NoOp);
/// assert!(resolver.resolve("com.acme.Unknown", false).is_err());
/// ```
#[derive(Debug)]
pub struct ConverterResolver<P, E> {
    provider: P,
    emitter: E,
    registry: ConverterRegistry,
    naming: ArtifactNaming,
}

impl<P, E> ConverterResolver<P, E>
where
    P: TypeMetadataProvider,
    E: ConverterEmitter,
{
    /// Creates a resolver with an empty registry and the default naming policy.
    pub fn new(provider: P, emitter: E) -> Self {
        Self {
            provider,
            emitter,
            registry: ConverterRegistry::new(),
            naming: ArtifactNaming::default(),
        }
    }

    /// Sets the artifact naming policy.
    #[must_use]
    pub fn with_naming(mut self, naming: ArtifactNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Resolves the conversion strategy for `type_name`.
    ///
    /// With `runtime_resolvable` set the result is wrapped in
    /// [`ConversionStrategy::Deferred`]; an unconvertible type then yields
    /// `Deferred(None)` instead of an error.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Unresolvable`] if the type has no viable conversion
    ///   and the call site cannot defer. Raised again on every later
    ///   non-deferred lookup of the same type.
    /// - [`ResolveError::Emit`] if the emitter fails at a site that cannot
    ///   defer. The type is then recorded as unconvertible for the rest of
    ///   the session; a deferrable site gets `Deferred(None)` instead.
    pub fn resolve(
        &mut self,
        type_name: &str,
        runtime_resolvable: bool,
    ) -> ResolveResult<ConversionStrategy> {
        if is_string_type(type_name) {
            record_resolution(ResolutionOutcome::NoOp);
            return Ok(wrap(ConversionStrategy::NoOp, runtime_resolvable));
        }

        if let Some(entry) = self.registry.get(type_name) {
            let strategy = entry.strategy();
            debug!(type_name, strategy = strategy.label(), "converter registry hit");
            record_resolution(ResolutionOutcome::Cached);
            return finish(type_name, strategy, runtime_resolvable);
        }

        let strategy = match self.provider.classify(type_name) {
            Some(descriptor) => self.select(&descriptor),
            None => ConversionStrategy::Unresolvable,
        };

        if strategy.is_unresolvable() {
            self.registry.put(type_name, RegistryEntry::Unresolvable);
            record_resolution(if runtime_resolvable {
                ResolutionOutcome::DeferredUnresolvable
            } else {
                ResolutionOutcome::Unresolvable
            });
            return finish(type_name, strategy, runtime_resolvable);
        }

        if let Err(source) = self.emit(type_name, &strategy) {
            warn!(type_name, error = %source, "parameter converter emission failed");
            self.registry.put(type_name, RegistryEntry::Unresolvable);
            if runtime_resolvable {
                record_resolution(ResolutionOutcome::DeferredUnresolvable);
                return finish(type_name, ConversionStrategy::Unresolvable, true);
            }
            record_resolution(ResolutionOutcome::Unresolvable);
            return Err(ResolveError::Emit {
                type_name: type_name.to_string(),
                source,
            });
        }
        record_artifact_emitted();
        record_resolution(ResolutionOutcome::Emitted);

        self.registry
            .put(type_name, RegistryEntry::Resolved(strategy.clone()));
        finish(type_name, strategy, runtime_resolvable)
    }

    fn emit(&mut self, type_name: &str, strategy: &ConversionStrategy) -> Result<(), EmitError> {
        let actual = self.emitter.emit(type_name, strategy)?;
        match strategy.artifact() {
            Some(expected) if *expected != actual => Err(EmitError::UnexpectedArtifact {
                expected: expected.clone(),
                actual,
            }),
            _ => Ok(()),
        }
    }

    /// First id for `type_name` not yet owned by another type.
    fn allocate(&self, type_name: &str, primitive: bool) -> ArtifactId {
        let mut artifact = self.naming.artifact_for(type_name, primitive);
        let mut attempt = 0;
        while let Some(owner) = self.registry.artifact_owner(&artifact) {
            attempt += 1;
            debug!(type_name, owner, artifact = %artifact, "artifact id taken, trying alternative");
            artifact = self.naming.alternative(type_name, primitive, attempt);
        }
        artifact
    }

    fn select(&self, descriptor: &TypeDescriptor) -> ConversionStrategy {
        let type_name = descriptor.name.as_str();

        if descriptor.is_primitive_wrapper() {
            if let Some(wrapper) = PrimitiveKind::from_type_name(type_name) {
                debug!(type_name, wrapper = wrapper.keyword(), "selected primitive parser");
                return ConversionStrategy::PrimitiveParse {
                    wrapper,
                    artifact: self.allocate(type_name, true),
                };
            }
        }

        let artifact = self.allocate(type_name, false);

        // enums prefer fromString over the implicit valueOf
        if descriptor.is_enum() {
            if let Some(member) = descriptor.from_string() {
                debug!(type_name, member = %member, "selected enum fromString");
                return ConversionStrategy::FactoryMethod {
                    member: member.clone(),
                    artifact,
                };
            }
        }

        let strategy = if let Some(member) = descriptor.constructor() {
            ConversionStrategy::Constructor {
                member: member.clone(),
                artifact,
            }
        } else if let Some(member) = descriptor.value_of().or_else(|| descriptor.from_string()) {
            ConversionStrategy::FactoryMethod {
                member: member.clone(),
                artifact,
            }
        } else {
            ConversionStrategy::Unresolvable
        };

        debug!(type_name, strategy = strategy.label(), "selected conversion strategy");
        strategy
    }

    /// The session registry.
    #[must_use]
    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// The metadata provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The emitter.
    #[must_use]
    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    /// The artifact naming policy.
    #[must_use]
    pub fn naming(&self) -> &ArtifactNaming {
        &self.naming
    }

    /// Ends the session, discarding the registry and returning the emitter.
    #[must_use]
    pub fn into_emitter(self) -> E {
        self.emitter
    }
}

fn wrap(strategy: ConversionStrategy, runtime_resolvable: bool) -> ConversionStrategy {
    if runtime_resolvable {
        strategy.deferred()
    } else {
        strategy
    }
}

fn finish(
    type_name: &str,
    strategy: ConversionStrategy,
    runtime_resolvable: bool,
) -> ResolveResult<ConversionStrategy> {
    if !strategy.is_unresolvable() {
        return Ok(wrap(strategy, runtime_resolvable));
    }
    if runtime_resolvable {
        warn!(type_name, "no static parameter converter, deferring to start-up override");
        return Ok(ConversionStrategy::Deferred(None));
    }
    Err(ResolveError::Unresolvable {
        type_name: type_name.to_string(),
    })
}
