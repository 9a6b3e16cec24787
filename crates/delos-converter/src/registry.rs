//! Session-scoped converter memoization.
//!
//! The [`ConverterRegistry`] remembers the decision made for every type
//! resolved in one build session, including the decision that a type cannot
//! be converted. A registry is owned by exactly one resolver and is dropped
//! with it.

use std::collections::HashMap;

use delos_core::{ArtifactId, ConversionStrategy};
use tracing::debug;

/// A memoized resolution decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEntry {
    /// The undeferred strategy chosen for the type.
    Resolved(ConversionStrategy),
    /// The type was found to have no viable conversion.
    Unresolvable,
}

impl RegistryEntry {
    /// Returns the undeferred strategy this entry stands for.
    #[must_use]
    pub fn strategy(&self) -> ConversionStrategy {
        match self {
            Self::Resolved(strategy) => strategy.clone(),
            Self::Unresolvable => ConversionStrategy::Unresolvable,
        }
    }

    /// Returns the artifact backing a resolved entry.
    #[must_use]
    pub fn artifact(&self) -> Option<&ArtifactId> {
        match self {
            Self::Resolved(strategy) => strategy.artifact(),
            Self::Unresolvable => None,
        }
    }
}

/// Map from qualified type name to its memoized decision.
///
/// First writer wins: a second `put` for the same key is ignored.
///
/// The registry also tracks which type owns each emitted artifact id, so no
/// two types in a session share one.
#[derive(Debug, Default)]
pub struct ConverterRegistry {
    entries: HashMap<String, RegistryEntry>,
    owners: HashMap<ArtifactId, String>,
}

impl ConverterRegistry {
    /// Creates an empty registry for a new build session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the decision for `type_name`.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&RegistryEntry> {
        self.entries.get(type_name)
    }

    /// Records the decision for `type_name`.
    ///
    /// Returns `false` (and keeps the existing entry) if the key was
    /// already written.
    pub fn put(&mut self, type_name: impl Into<String>, entry: RegistryEntry) -> bool {
        let type_name = type_name.into();
        if self.entries.contains_key(&type_name) {
            debug!(type_name, "registry entry already written, keeping first");
            return false;
        }
        if let Some(artifact) = entry.artifact() {
            self.owners.insert(artifact.clone(), type_name.clone());
        }
        self.entries.insert(type_name, entry);
        true
    }

    /// Returns the type whose decision uses `artifact`, if any.
    #[must_use]
    pub fn artifact_owner(&self, artifact: &ArtifactId) -> Option<&str> {
        self.owners.get(artifact).map(String::as_str)
    }

    /// Returns `true` if a decision exists for `type_name`.
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    /// Number of memoized types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all memoized decisions.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_writer_wins() {
        let mut registry = ConverterRegistry::new();

        assert!(registry.put("com.acme.Money", RegistryEntry::Unresolvable));
        assert!(!registry.put(
            "com.acme.Money",
            RegistryEntry::Resolved(ConversionStrategy::NoOp)
        ));

        assert_eq!(registry.get("com.acme.Money"), Some(&RegistryEntry::Unresolvable));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_missing_entry() {
        let registry = ConverterRegistry::new();

        assert!(registry.get("com.acme.Money").is_none());
        assert!(!registry.contains("com.acme.Money"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_artifact_owner_tracked() {
        let mut registry = ConverterRegistry::new();
        let artifact = ArtifactId::new("com.acme.Sku$paramConverter$");
        let strategy = ConversionStrategy::Constructor {
            member: delos_core::MemberRef::constructor("com.acme.Sku"),
            artifact: artifact.clone(),
        };

        registry.put("com.acme.Sku", RegistryEntry::Resolved(strategy));
        registry.put("com.acme.Ghost", RegistryEntry::Unresolvable);

        assert_eq!(registry.artifact_owner(&artifact), Some("com.acme.Sku"));
        assert!(registry
            .artifact_owner(&ArtifactId::new("com.acme.Ghost$paramConverter$"))
            .is_none());
    }

    #[test]
    fn test_entry_strategy() {
        assert_eq!(
            RegistryEntry::Unresolvable.strategy(),
            ConversionStrategy::Unresolvable
        );
        assert_eq!(
            RegistryEntry::Resolved(ConversionStrategy::NoOp).strategy(),
            ConversionStrategy::NoOp
        );
    }
}
