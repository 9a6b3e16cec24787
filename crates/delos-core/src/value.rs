//! Converted parameter values.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A parameter value after conversion from its textual form.
///
/// Primitive wrappers and strings have dedicated variants. Every other
/// declared type (enums, value objects) is carried as an [`ObjectValue`].
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// `boolean`
    Bool(bool),
    /// `byte`
    Byte(i8),
    /// `short`
    Short(i16),
    /// `int`
    Int(i32),
    /// `long`
    Long(i64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// `char`
    Char(char),
    /// The string type, passed through unchanged.
    Str(String),
    /// Any other declared type.
    Object(ObjectValue),
}

impl TypedValue {
    /// Wraps an arbitrary value produced by a constructor or factory.
    pub fn object<T: Any + Send + Sync>(type_name: impl Into<String>, value: T) -> Self {
        Self::Object(ObjectValue::new(type_name, value))
    }

    /// Returns the boolean value, if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value widened to `i64` for any integral variant.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Byte(v) => Some(i64::from(*v)),
            Self::Short(v) => Some(i64::from(*v)),
            Self::Int(v) => Some(i64::from(*v)),
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value widened to `f64` for either floating variant.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the character, if this is a `Char`.
    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a `Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Downcasts an `Object` payload to a concrete type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Object(obj) => obj.downcast_ref(),
            _ => None,
        }
    }
}

impl From<bool> for TypedValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for TypedValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for TypedValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f64> for TypedValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for TypedValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for TypedValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// An opaque converted value of a non-primitive type.
///
/// Equality is identity: two `ObjectValue`s are equal only when they share
/// the same allocation.
#[derive(Clone)]
pub struct ObjectValue {
    type_name: String,
    value: Arc<dyn Any + Send + Sync>,
}

impl ObjectValue {
    /// Creates a new object value tagged with its declared type name.
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<String>, value: T) -> Self {
        Self {
            type_name: type_name.into(),
            value: Arc::new(value),
        }
    }

    /// Returns the declared type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Downcasts the payload to a concrete type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && Arc::as_ptr(&self.value).cast::<()>() == Arc::as_ptr(&other.value).cast::<()>()
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Money(u64);

    #[test]
    fn test_integral_widening() {
        assert_eq!(TypedValue::Byte(-3).as_i64(), Some(-3));
        assert_eq!(TypedValue::Short(300).as_i64(), Some(300));
        assert_eq!(TypedValue::Int(42).as_i64(), Some(42));
        assert_eq!(TypedValue::Long(1 << 40).as_i64(), Some(1 << 40));
        assert_eq!(TypedValue::Str("42".into()).as_i64(), None);
    }

    #[test]
    fn test_object_downcast() {
        let value = TypedValue::object("com.acme.Money", Money(150));

        assert_eq!(value.downcast_ref::<Money>(), Some(&Money(150)));
        assert!(value.downcast_ref::<String>().is_none());
        match &value {
            TypedValue::Object(obj) => assert_eq!(obj.type_name(), "com.acme.Money"),
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn test_object_equality_is_identity() {
        let a = ObjectValue::new("com.acme.Money", Money(1));
        let b = ObjectValue::new("com.acme.Money", Money(1));

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
