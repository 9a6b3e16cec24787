//! Primitive wrapper types and their built-in string parsers.
//!
//! Every primitive is known under two names: its keyword (`int`) and its
//! boxed wrapper (`java.lang.Integer`). Both resolve to the same
//! [`PrimitiveKind`] and the same parser.

use serde::{Deserialize, Serialize};

use crate::{ConversionError, ConversionResult, TypedValue};

/// Qualified name of the string type. Parameters of this type need no conversion.
pub const STRING_TYPE: &str = "java.lang.String";

/// Returns `true` if `type_name` denotes the string type.
#[must_use]
pub fn is_string_type(type_name: &str) -> bool {
    type_name == STRING_TYPE
}

/// A primitive type with a built-in string-parsing factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    /// `boolean` / `java.lang.Boolean`
    Boolean,
    /// `byte` / `java.lang.Byte`
    Byte,
    /// `short` / `java.lang.Short`
    Short,
    /// `int` / `java.lang.Integer`
    Int,
    /// `long` / `java.lang.Long`
    Long,
    /// `float` / `java.lang.Float`
    Float,
    /// `double` / `java.lang.Double`
    Double,
    /// `char` / `java.lang.Character`
    Char,
}

impl PrimitiveKind {
    /// All primitive kinds, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Boolean,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Char,
    ];

    /// Looks up a primitive by keyword or wrapper name.
    ///
    /// ```rust
    /// use delos_core::PrimitiveKind;
    ///
    /// assert_eq!(PrimitiveKind::from_type_name("int"), Some(PrimitiveKind::Int));
    /// assert_eq!(PrimitiveKind::from_type_name("java.lang.Integer"), Some(PrimitiveKind::Int));
    /// assert_eq!(PrimitiveKind::from_type_name("com.acme.Money"), None);
    /// ```
    #[must_use]
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.keyword() == type_name || kind.wrapper_name() == type_name)
    }

    /// Returns the primitive keyword (`int`, `boolean`, ...).
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
        }
    }

    /// Returns the qualified name of the boxed wrapper type.
    #[must_use]
    pub const fn wrapper_name(self) -> &'static str {
        match self {
            Self::Boolean => "java.lang.Boolean",
            Self::Byte => "java.lang.Byte",
            Self::Short => "java.lang.Short",
            Self::Int => "java.lang.Integer",
            Self::Long => "java.lang.Long",
            Self::Float => "java.lang.Float",
            Self::Double => "java.lang.Double",
            Self::Char => "java.lang.Character",
        }
    }

    /// Parses `raw` with this wrapper's string factory.
    ///
    /// - Integral types accept an optional sign followed by decimal digits
    ///   and fail on overflow.
    /// - Floating types ignore surrounding whitespace and accept a trailing
    ///   `f`/`F`/`d`/`D` marker.
    /// - `boolean` is `true` iff the text equals `"true"` ignoring case; any
    ///   other text is `false`.
    /// - `char` requires exactly one character.
    pub fn parse(self, raw: &str) -> ConversionResult<TypedValue> {
        let malformed = |reason: String| ConversionError::malformed(self.keyword(), raw, reason);

        match self {
            Self::Boolean => Ok(TypedValue::Bool(raw.eq_ignore_ascii_case("true"))),
            Self::Byte => raw
                .parse()
                .map(TypedValue::Byte)
                .map_err(|e| malformed(e.to_string())),
            Self::Short => raw
                .parse()
                .map(TypedValue::Short)
                .map_err(|e| malformed(e.to_string())),
            Self::Int => raw
                .parse()
                .map(TypedValue::Int)
                .map_err(|e| malformed(e.to_string())),
            Self::Long => raw
                .parse()
                .map(TypedValue::Long)
                .map_err(|e| malformed(e.to_string())),
            Self::Float => float_text(raw)
                .parse()
                .map(TypedValue::Float)
                .map_err(|e| malformed(e.to_string())),
            Self::Double => float_text(raw)
                .parse()
                .map(TypedValue::Double)
                .map_err(|e| malformed(e.to_string())),
            Self::Char => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(TypedValue::Char(c)),
                    _ => Err(malformed(format!(
                        "expected exactly one character, got {}",
                        raw.chars().count()
                    ))),
                }
            }
        }
    }
}

// Strips whitespace and a trailing type marker ("1.5f", "2d").
fn float_text(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.strip_suffix(['f', 'F', 'd', 'D']) {
        Some(rest) if rest.ends_with(|c: char| c.is_ascii_digit() || c == '.') => rest,
        _ => trimmed,
    }
}
