//! Live parameter converters.

use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::{is_string_type, ConversionError, ConversionResult, PrimitiveKind, TypedValue, STRING_TYPE};

/// Converts one textual parameter value into a typed value.
///
/// Implementations must be stateless with respect to individual calls: a
/// failed conversion affects only the request that supplied the value.
pub trait ParameterConverter: Send + Sync + fmt::Debug {
    /// Converts a raw value.
    fn convert(&self, raw: &str) -> ConversionResult<TypedValue>;

    /// Qualified name of the type this converter produces.
    fn target_type(&self) -> &str;
}

/// A converter shared across endpoints and threads.
pub type SharedConverter = Arc<dyn ParameterConverter>;

/// Signature of a member invocation: one string in, one typed value out.
pub type ConvertFn = Arc<dyn Fn(&str) -> ConversionResult<TypedValue> + Send + Sync>;

/// Passes the raw text through as [`TypedValue::Str`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopConverter;

impl ParameterConverter for NoopConverter {
    fn convert(&self, raw: &str) -> ConversionResult<TypedValue> {
        Ok(TypedValue::Str(raw.to_string()))
    }

    fn target_type(&self) -> &str {
        STRING_TYPE
    }
}

/// Parses text with a primitive wrapper's built-in factory.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveConverter {
    kind: PrimitiveKind,
}

impl PrimitiveConverter {
    /// Creates a converter for `kind`.
    #[must_use]
    pub const fn new(kind: PrimitiveKind) -> Self {
        Self { kind }
    }

    /// Returns the primitive being parsed.
    #[must_use]
    pub const fn kind(&self) -> PrimitiveKind {
        self.kind
    }
}

impl ParameterConverter for PrimitiveConverter {
    fn convert(&self, raw: &str) -> ConversionResult<TypedValue> {
        self.kind.parse(raw)
    }

    fn target_type(&self) -> &str {
        self.kind.wrapper_name()
    }
}

/// A converter backed by a closure.
///
/// This is how constructors and factory methods are bound to the emitter,
/// and how start-up overrides are supplied.
///
/// # Example
///
/// ```rust
/// use delos_core::{ConversionError, FnConverter, ParameterConverter, TypedValue};
///
/// let upper = FnConverter::new("com.acme.Code", |raw| {
///     if raw.is_empty() {
///         return Err(ConversionError::rejected("com.acme.Code", "empty code"));
///     }
///     Ok(TypedValue::Str(raw.to_uppercase()))
/// });
///
/// assert_eq!(upper.convert("ab").unwrap(), TypedValue::Str("AB".into()));
/// assert!(upper.convert("").is_err());
/// ```
#[derive(Clone)]
pub struct FnConverter {
    type_name: String,
    func: ConvertFn,
}

impl FnConverter {
    /// Creates a converter for `type_name` from a closure.
    pub fn new<F>(type_name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> ConversionResult<TypedValue> + Send + Sync + 'static,
    {
        Self {
            type_name: type_name.into(),
            func: Arc::new(func),
        }
    }

    /// Creates a converter from an existing [`ConvertFn`].
    pub fn from_fn(type_name: impl Into<String>, func: ConvertFn) -> Self {
        Self {
            type_name: type_name.into(),
            func,
        }
    }

    /// Creates a converter that parses with `T`'s [`FromStr`] impl.
    ///
    /// The parsed value is carried as a [`TypedValue::Object`]; when
    /// `type_name` is the string type the text is passed through.
    pub fn parsing<T>(type_name: impl Into<String>) -> Self
    where
        T: FromStr + Any + Send + Sync,
        T::Err: fmt::Display,
    {
        let type_name = type_name.into();
        if is_string_type(&type_name) {
            return Self::new(type_name, |raw| Ok(TypedValue::Str(raw.to_string())));
        }
        let owner = type_name.clone();
        Self::new(type_name, move |raw| {
            raw.parse::<T>()
                .map(|value| TypedValue::object(owner.clone(), value))
                .map_err(|e| ConversionError::malformed(owner.clone(), raw, e.to_string()))
        })
    }
}

impl ParameterConverter for FnConverter {
    fn convert(&self, raw: &str) -> ConversionResult<TypedValue> {
        (self.func)(raw)
    }

    fn target_type(&self) -> &str {
        &self.type_name
    }
}

impl fmt::Debug for FnConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConverter")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
