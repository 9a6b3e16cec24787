//! Prebuilt type index.
//!
//! [`TypeIndex`] is a read-only view over type declarations gathered during
//! one indexing pass. It implements [`TypeMetadataProvider`] and knows the
//! primitive wrappers without them being declared.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "types": [
//!     {
//!       "name": "com.acme.Money",
//!       "category": "plain",
//!       "members": [
//!         { "kind": "constructor", "parameters": ["java.lang.String"] },
//!         { "kind": "method", "name": "valueOf", "is_static": true,
//!           "visibility": "private", "parameters": ["java.lang.String"] }
//!       ]
//!     }
//!   ]
//! }
//! ```

use delos_core::{MemberRef, PrimitiveKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    MetadataError, MetadataResult, TypeCategory, TypeDeclaration, TypeDescriptor,
    TypeMetadataProvider, VALUE_OF,
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct IndexDocument {
    #[serde(default)]
    types: Vec<TypeDeclaration>,
}

/// Type declarations keyed by qualified name, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    types: IndexMap<String, TypeDeclaration>,
}

impl TypeIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from declarations.
    ///
    /// # Errors
    ///
    /// Fails on duplicate or inconsistent declarations.
    pub fn from_declarations<I>(declarations: I) -> MetadataResult<Self>
    where
        I: IntoIterator<Item = TypeDeclaration>,
    {
        let mut index = Self::new();
        for declaration in declarations {
            index.insert(declaration)?;
        }
        Ok(index)
    }

    /// Parses an index from its JSON form.
    ///
    /// ```rust
    /// use delos_metadata::{TypeIndex, TypeMetadataProvider};
    ///
    /// let index = TypeIndex::from_json(r#"{
    ///     "types": [
    ///         { "name": "com.acme.Money", "members": [
    ///             { "kind": "constructor", "parameters": ["java.lang.String"] }
    ///         ] }
    ///     ]
    /// }"#).unwrap();
    ///
    /// assert_eq!(index.len(), 1);
    /// assert!(index.classify("com.acme.Money").unwrap().constructor().is_some());
    /// ```
    pub fn from_json(json: &str) -> MetadataResult<Self> {
        let document: IndexDocument = serde_json::from_str(json)?;
        Self::from_declarations(document.types)
    }

    /// Serializes the index to pretty-printed JSON.
    pub fn to_json(&self) -> MetadataResult<String> {
        let document = IndexDocument {
            types: self.types.values().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Adds a declaration.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::DuplicateType`] if the name is already
    /// present, or [`MetadataError::InvalidDeclaration`] if a declaration
    /// claims to be a primitive wrapper but names no known primitive.
    pub fn insert(&mut self, declaration: TypeDeclaration) -> MetadataResult<()> {
        if declaration.category == TypeCategory::PrimitiveWrapper
            && PrimitiveKind::from_type_name(&declaration.name).is_none()
        {
            return Err(MetadataError::InvalidDeclaration {
                name: declaration.name,
                reason: "declared as a primitive wrapper but is not a known primitive".to_string(),
            });
        }
        if self.types.contains_key(&declaration.name) {
            return Err(MetadataError::DuplicateType {
                name: declaration.name,
            });
        }
        self.types.insert(declaration.name.clone(), declaration);
        Ok(())
    }

    /// Looks up a raw declaration.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&TypeDeclaration> {
        self.types.get(type_name)
    }

    /// Number of declared types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.types.values()
    }
}

impl TypeMetadataProvider for TypeIndex {
    fn classify(&self, type_name: &str) -> Option<TypeDescriptor> {
        if let Some(kind) = PrimitiveKind::from_type_name(type_name) {
            return Some(TypeDescriptor {
                name: type_name.to_string(),
                category: TypeCategory::PrimitiveWrapper,
                candidates: vec![MemberRef::factory(kind.wrapper_name(), VALUE_OF)],
            });
        }

        let Some(declaration) = self.types.get(type_name) else {
            debug!(type_name, "type not present in index");
            return None;
        };

        Some(TypeDescriptor {
            name: declaration.name.clone(),
            category: declaration.category,
            candidates: declaration.string_candidates(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemberDeclaration, Visibility, FROM_STRING};
    use delos_core::{MemberKind, STRING_TYPE};

    fn money() -> TypeDeclaration {
        TypeDeclaration::new("com.acme.Money", TypeCategory::Plain)
            .with_member(MemberDeclaration::constructor([STRING_TYPE]))
    }

    #[test]
    fn test_classify_primitive_without_declaration() {
        let index = TypeIndex::new();

        for name in ["int", "java.lang.Integer"] {
            let descriptor = index.classify(name).unwrap();
            assert!(descriptor.is_primitive_wrapper());
            let factory = descriptor.value_of().unwrap();
            assert_eq!(factory.owner, "java.lang.Integer");
            assert_eq!(factory.kind, MemberKind::StaticFactory);
        }
    }

    #[test]
    fn test_classify_unknown_type() {
        let index = TypeIndex::new();
        assert!(index.classify("com.acme.Missing").is_none());
    }

    #[test]
    fn test_classify_declared_type() {
        let index = TypeIndex::from_declarations([money()]).unwrap();
        let descriptor = index.classify("com.acme.Money").unwrap();

        assert_eq!(descriptor.category, TypeCategory::Plain);
        assert_eq!(descriptor.candidates, vec![MemberRef::constructor("com.acme.Money")]);
    }

    #[test]
    fn test_duplicate_declaration_rejected() {
        let err = TypeIndex::from_declarations([money(), money()]).unwrap_err();
        assert!(matches!(err, MetadataError::DuplicateType { name } if name == "com.acme.Money"));
    }

    #[test]
    fn test_bogus_primitive_rejected() {
        let mut index = TypeIndex::new();
        let err = index
            .insert(TypeDeclaration::new("com.acme.Money", TypeCategory::PrimitiveWrapper))
            .unwrap_err();
        assert!(matches!(err, MetadataError::InvalidDeclaration { .. }));
    }

    #[test]
    fn test_json_loading() {
        let json = r#"{
            "types": [
                {
                    "name": "com.acme.Color",
                    "category": "enum",
                    "members": [
                        { "kind": "method", "name": "valueOf", "is_static": true, "parameters": ["java.lang.String"] },
                        { "kind": "method", "name": "fromString", "is_static": true, "parameters": ["java.lang.String"] },
                        { "kind": "constructor", "visibility": "private", "parameters": ["java.lang.String"] }
                    ]
                }
            ]
        }"#;

        let index = TypeIndex::from_json(json).unwrap();
        let descriptor = index.classify("com.acme.Color").unwrap();

        assert!(descriptor.is_enum());
        assert!(descriptor.constructor().is_none());
        assert!(descriptor.value_of().is_some());
        assert_eq!(descriptor.from_string().unwrap().name, FROM_STRING);
    }

    #[test]
    fn test_json_rejects_unknown_fields() {
        let json = r#"{ "types": [ { "name": "T", "flavor": "x" } ] }"#;
        assert!(matches!(
            TypeIndex::from_json(json),
            Err(MetadataError::Parse(_))
        ));
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let index = TypeIndex::from_declarations([
            money(),
            TypeDeclaration::new("com.acme.Color", TypeCategory::Enum).with_member(
                MemberDeclaration::static_method(VALUE_OF, [STRING_TYPE])
                    .with_visibility(Visibility::Package),
            ),
        ])
        .unwrap();

        let reloaded = TypeIndex::from_json(&index.to_json().unwrap()).unwrap();
        let names: Vec<_> = reloaded.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["com.acme.Money", "com.acme.Color"]);
        assert_eq!(reloaded.get("com.acme.Color"), index.get("com.acme.Color"));
    }
}
