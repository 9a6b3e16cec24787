//! Classification results handed to the converter resolver.

use delos_core::{MemberKind, MemberRef};
use serde::{Deserialize, Serialize};

use crate::{FROM_STRING, VALUE_OF};

/// How a type is classified for converter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCategory {
    /// An ordinary class or value type.
    #[default]
    Plain,
    /// An enumeration.
    Enum,
    /// A primitive or its boxed wrapper.
    PrimitiveWrapper,
}

/// Metadata for one parameter type, read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Qualified type name.
    pub name: String,
    /// Classification.
    pub category: TypeCategory,
    /// Single-string constructors and static factories, in declaration order.
    pub candidates: Vec<MemberRef>,
}

impl TypeDescriptor {
    /// Returns `true` for enumerations.
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.category == TypeCategory::Enum
    }

    /// Returns `true` for primitives and their wrappers.
    #[must_use]
    pub fn is_primitive_wrapper(&self) -> bool {
        self.category == TypeCategory::PrimitiveWrapper
    }

    /// First single-string constructor.
    #[must_use]
    pub fn constructor(&self) -> Option<&MemberRef> {
        self.candidates
            .iter()
            .find(|m| m.kind == MemberKind::Constructor)
    }

    /// First static `valueOf(String)`.
    #[must_use]
    pub fn value_of(&self) -> Option<&MemberRef> {
        self.factory(VALUE_OF)
    }

    /// First static `fromString(String)`.
    #[must_use]
    pub fn from_string(&self) -> Option<&MemberRef> {
        self.factory(FROM_STRING)
    }

    fn factory(&self, name: &str) -> Option<&MemberRef> {
        self.candidates
            .iter()
            .find(|m| m.kind == MemberKind::StaticFactory && m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_candidate_of_each_kind_wins() {
        let descriptor = TypeDescriptor {
            name: "com.acme.Money".to_string(),
            category: TypeCategory::Plain,
            candidates: vec![
                MemberRef::factory("com.acme.Money", VALUE_OF),
                MemberRef::constructor("com.acme.Money"),
                MemberRef::factory("com.acme.Base", VALUE_OF),
            ],
        };

        assert_eq!(descriptor.value_of().unwrap().owner, "com.acme.Money");
        assert!(descriptor.constructor().is_some());
        assert!(descriptor.from_string().is_none());
        assert!(!descriptor.is_enum());
    }
}
