//! Converter artifact emission.
//!
//! The resolver decides *which* member converts a type; a
//! [`ConverterEmitter`] turns that decision into one reusable artifact. The
//! bundled [`DispatchEmitter`] builds a static dispatch table: each artifact
//! is a converter bound to a member invocation registered up front in
//! [`MemberInvokers`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use delos_core::{
    ArtifactId, ConversionResult, ConversionStrategy, ConvertFn, FnConverter, MemberRef,
    ParameterConverter, PrimitiveConverter, SharedConverter, TypedValue,
};
use delos_metadata::{FROM_STRING, VALUE_OF};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

use crate::EmitError;

/// Synthesizes one conversion artifact per strategy.
pub trait ConverterEmitter {
    /// Emits the artifact described by `strategy` for `type_name`.
    ///
    /// Only `PrimitiveParse`, `Constructor` and `FactoryMethod` strategies
    /// describe artifacts.
    fn emit(&mut self, type_name: &str, strategy: &ConversionStrategy) -> Result<ArtifactId, EmitError>;
}

impl<E: ConverterEmitter + ?Sized> ConverterEmitter for &mut E {
    fn emit(&mut self, type_name: &str, strategy: &ConversionStrategy) -> Result<ArtifactId, EmitError> {
        (**self).emit(type_name, strategy)
    }
}

/// Invocations for constructors and static factories, keyed by member.
#[derive(Clone, Default)]
pub struct MemberInvokers {
    invokers: HashMap<MemberRef, ConvertFn>,
}

impl MemberInvokers {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds an invocation to `member`, replacing any earlier binding.
    pub fn register<F>(&mut self, member: MemberRef, invoke: F) -> &mut Self
    where
        F: Fn(&str) -> ConversionResult<TypedValue> + Send + Sync + 'static,
    {
        self.invokers.insert(member, Arc::new(invoke));
        self
    }

    /// Binds the single-string constructor of `owner`.
    pub fn constructor<F>(&mut self, owner: &str, invoke: F) -> &mut Self
    where
        F: Fn(&str) -> ConversionResult<TypedValue> + Send + Sync + 'static,
    {
        self.register(MemberRef::constructor(owner), invoke)
    }

    /// Binds the static factory `name` of `owner`.
    pub fn factory<F>(&mut self, owner: &str, name: &str, invoke: F) -> &mut Self
    where
        F: Fn(&str) -> ConversionResult<TypedValue> + Send + Sync + 'static,
    {
        self.register(MemberRef::factory(owner, name), invoke)
    }

    /// Binds `T`'s [`FromStr`] impl as the constructor, `valueOf` and
    /// `fromString` of `owner`.
    pub fn parsing<T>(&mut self, owner: &str) -> &mut Self
    where
        T: FromStr + std::any::Any + Send + Sync,
        T::Err: fmt::Display,
    {
        let converter = FnConverter::parsing::<T>(owner);
        for member in [
            MemberRef::constructor(owner),
            MemberRef::factory(owner, VALUE_OF),
            MemberRef::factory(owner, FROM_STRING),
        ] {
            let converter = converter.clone();
            self.invokers
                .insert(member, Arc::new(move |raw: &str| converter.convert(raw)));
        }
        self
    }

    /// Looks up the invocation for `member`.
    #[must_use]
    pub fn get(&self, member: &MemberRef) -> Option<&ConvertFn> {
        self.invokers.get(member)
    }

    /// Number of bound members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.invokers.len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.invokers.is_empty()
    }
}

impl fmt::Debug for MemberInvokers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberInvokers")
            .field("member_count", &self.invokers.len())
            .finish()
    }
}

/// An emitted converter, tagged with its artifact id.
#[derive(Debug, Clone)]
pub struct GeneratedConverter {
    artifact: ArtifactId,
    inner: SharedConverter,
}

impl GeneratedConverter {
    /// Artifact id of this converter.
    #[must_use]
    pub fn artifact(&self) -> &ArtifactId {
        &self.artifact
    }
}

impl ParameterConverter for GeneratedConverter {
    fn convert(&self, raw: &str) -> ConversionResult<TypedValue> {
        self.inner.convert(raw)
    }

    fn target_type(&self) -> &str {
        self.inner.target_type()
    }
}

/// Manifest line describing one emitted artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRecord {
    /// Artifact id.
    pub artifact: ArtifactId,
    /// Type the artifact converts to.
    pub type_name: String,
    /// Strategy label (`primitive_parse`, `constructor`, `factory_method`).
    pub strategy: &'static str,
    /// Invoked member, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<MemberRef>,
}

/// Emitted converters by artifact id. Lives for the application lifetime.
#[derive(Debug, Clone, Default)]
pub struct ArtifactTable {
    converters: HashMap<ArtifactId, SharedConverter>,
}

impl ArtifactTable {
    /// Looks up the converter for `artifact`.
    #[must_use]
    pub fn get(&self, artifact: &ArtifactId) -> Option<&SharedConverter> {
        self.converters.get(artifact)
    }

    /// Number of artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Returns `true` if no artifacts were emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

/// Emitter producing a static dispatch table of converters.
///
/// # Example
///
/// ```rust
/// use delos_converter::{ConverterEmitter, DispatchEmitter, MemberInvokers};
/// use delos_core::{ArtifactId, ConversionStrategy, MemberRef, ParameterConverter, TypedValue};
///
/// let mut invokers = MemberInvokers::new();
/// invokers.constructor("com.acme.Sku", |raw| Ok(TypedValue::object("com.acme.Sku", raw.to_string())));
///
/// let mut emitter = DispatchEmitter::new(invokers);
/// let strategy = ConversionStrategy::Constructor {
///     member: MemberRef::constructor("com.acme.Sku"),
///     artifact: ArtifactId::new("com.acme.Sku$paramConverter$"),
/// };
///
/// let id = emitter.emit("com.acme.Sku", &strategy).unwrap();
/// let converter = emitter.converter(&id).unwrap();
/// assert_eq!(converter.convert("A-1").unwrap().downcast_ref::<String>().unwrap(), "A-1");
/// ```
#[derive(Debug, Default)]
pub struct DispatchEmitter {
    invokers: MemberInvokers,
    artifacts: IndexMap<ArtifactId, (ArtifactRecord, GeneratedConverter)>,
}

impl DispatchEmitter {
    /// Creates an emitter over the given member invocations.
    #[must_use]
    pub fn new(invokers: MemberInvokers) -> Self {
        Self {
            invokers,
            artifacts: IndexMap::new(),
        }
    }

    /// Looks up an emitted converter.
    #[must_use]
    pub fn converter(&self, artifact: &ArtifactId) -> Option<&GeneratedConverter> {
        self.artifacts.get(artifact).map(|(_, converter)| converter)
    }

    /// Number of emitted artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Returns `true` if nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Describes every emitted artifact in emission order.
    #[must_use]
    pub fn manifest(&self) -> Vec<ArtifactRecord> {
        self.artifacts
            .values()
            .map(|(record, _)| record.clone())
            .collect()
    }

    /// Renders the manifest as pretty-printed JSON.
    pub fn manifest_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.manifest())
    }

    /// Hands the emitted converters over to the runtime.
    #[must_use]
    pub fn into_artifacts(self) -> ArtifactTable {
        let converters = self
            .artifacts
            .into_iter()
            .map(|(id, (_, converter))| (id, Arc::new(converter) as SharedConverter))
            .collect();
        ArtifactTable { converters }
    }

    fn bind(&self, type_name: &str, member: &MemberRef) -> Result<SharedConverter, EmitError> {
        let invoke = self
            .invokers
            .get(member)
            .ok_or_else(|| EmitError::MissingInvoker {
                member: member.to_string(),
            })?;
        Ok(Arc::new(FnConverter::from_fn(type_name, Arc::clone(invoke))))
    }
}

impl ConverterEmitter for DispatchEmitter {
    fn emit(&mut self, type_name: &str, strategy: &ConversionStrategy) -> Result<ArtifactId, EmitError> {
        let (artifact, inner, member): (&ArtifactId, SharedConverter, Option<&MemberRef>) = match strategy {
            ConversionStrategy::PrimitiveParse { wrapper, artifact } => {
                (artifact, Arc::new(PrimitiveConverter::new(*wrapper)) as SharedConverter, None)
            }
            ConversionStrategy::Constructor { member, artifact }
            | ConversionStrategy::FactoryMethod { member, artifact } => {
                (artifact, self.bind(type_name, member)?, Some(member))
            }
            other => {
                return Err(EmitError::UnsupportedStrategy {
                    strategy: other.label(),
                })
            }
        };

        if self.artifacts.contains_key(artifact) {
            return Err(EmitError::DuplicateArtifact {
                artifact: artifact.clone(),
            });
        }

        let record = ArtifactRecord {
            artifact: artifact.clone(),
            type_name: type_name.to_string(),
            strategy: strategy.label(),
            member: member.cloned(),
        };
        let converter = GeneratedConverter {
            artifact: artifact.clone(),
            inner,
        };
        self.artifacts.insert(artifact.clone(), (record, converter));

        info!(type_name, artifact = %artifact, strategy = strategy.label(), "emitted parameter converter");
        Ok(artifact.clone())
    }
}
