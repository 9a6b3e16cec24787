//! Conversion strategies.
//!
//! A [`ConversionStrategy`] records the build-time decision for one declared
//! parameter type: no conversion, a built-in primitive parser, a
//! single-string constructor, a static single-string factory, a deferred
//! choice, or no viable conversion at all.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PrimitiveKind;

/// Identifier of an emitted converter artifact.
///
/// Artifact ids are derived from the qualified type name and are unique
/// within a build session: each type maps to exactly one id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Creates an artifact id from its full name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a member is a constructor or a static factory method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// A constructor taking one string argument.
    Constructor,
    /// A static method taking one string argument and returning its owner.
    StaticFactory,
}

/// Reference to a single-string-argument member of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberRef {
    /// Constructor or static factory.
    pub kind: MemberKind,
    /// Member name (`valueOf`, `fromString`, or [`MemberRef::CONSTRUCTOR_NAME`]).
    pub name: String,
    /// Qualified name of the declaring type.
    pub owner: String,
}

impl MemberRef {
    /// Name used for constructor members.
    pub const CONSTRUCTOR_NAME: &'static str = "new";

    /// References the single-string constructor of `owner`.
    pub fn constructor(owner: impl Into<String>) -> Self {
        Self {
            kind: MemberKind::Constructor,
            name: Self::CONSTRUCTOR_NAME.to_string(),
            owner: owner.into(),
        }
    }

    /// References the static factory `name` of `owner`.
    pub fn factory(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: MemberKind::StaticFactory,
            name: name.into(),
            owner: owner.into(),
        }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}(String)", self.owner, self.name)
    }
}

/// How a declared parameter type is turned into a typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionStrategy {
    /// The parameter is the string type; the raw text is used as-is.
    NoOp,
    /// The wrapper's built-in string-parsing factory.
    PrimitiveParse {
        /// Primitive being parsed.
        wrapper: PrimitiveKind,
        /// Artifact synthesized for this type.
        artifact: ArtifactId,
    },
    /// A single-string constructor.
    Constructor {
        /// The constructor.
        member: MemberRef,
        /// Artifact synthesized for this type.
        artifact: ArtifactId,
    },
    /// A static single-string factory (`valueOf` or `fromString`).
    FactoryMethod {
        /// The factory method.
        member: MemberRef,
        /// Artifact synthesized for this type.
        artifact: ArtifactId,
    },
    /// Final selection postponed to start-up so an override can supersede it.
    ///
    /// `None` means no static converter exists; conversion fails at first
    /// use unless an override is registered.
    Deferred(Option<Box<ConversionStrategy>>),
    /// No viable conversion exists.
    Unresolvable,
}

impl ConversionStrategy {
    /// Wraps this strategy for runtime-overridable resolution.
    ///
    /// `Unresolvable` becomes `Deferred(None)`; an already deferred strategy
    /// is returned unchanged.
    ///
    /// ```rust
    /// use delos_core::ConversionStrategy;
    ///
    /// assert_eq!(ConversionStrategy::Unresolvable.deferred(), ConversionStrategy::Deferred(None));
    /// assert_eq!(
    ///     ConversionStrategy::NoOp.deferred(),
    ///     ConversionStrategy::Deferred(Some(Box::new(ConversionStrategy::NoOp)))
    /// );
    /// ```
    #[must_use]
    pub fn deferred(self) -> Self {
        match self {
            Self::Unresolvable => Self::Deferred(None),
            deferred @ Self::Deferred(_) => deferred,
            other => Self::Deferred(Some(Box::new(other))),
        }
    }

    /// Returns the emitted artifact backing this strategy, looking through `Deferred`.
    #[must_use]
    pub fn artifact(&self) -> Option<&ArtifactId> {
        match self {
            Self::PrimitiveParse { artifact, .. }
            | Self::Constructor { artifact, .. }
            | Self::FactoryMethod { artifact, .. } => Some(artifact),
            Self::Deferred(Some(inner)) => inner.artifact(),
            Self::NoOp | Self::Deferred(None) | Self::Unresolvable => None,
        }
    }

    /// Returns the member invoked by this strategy, looking through `Deferred`.
    #[must_use]
    pub fn member(&self) -> Option<&MemberRef> {
        match self {
            Self::Constructor { member, .. } | Self::FactoryMethod { member, .. } => Some(member),
            Self::Deferred(Some(inner)) => inner.member(),
            _ => None,
        }
    }

    /// Returns `true` for `Deferred` strategies.
    #[must_use]
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// Returns `true` for `Unresolvable`.
    #[must_use]
    pub fn is_unresolvable(&self) -> bool {
        matches!(self, Self::Unresolvable)
    }

    /// Short label for logs and metrics.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoOp => "noop",
            Self::PrimitiveParse { .. } => "primitive_parse",
            Self::Constructor { .. } => "constructor",
            Self::FactoryMethod { .. } => "factory_method",
            Self::Deferred(_) => "deferred",
            Self::Unresolvable => "unresolvable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valued() -> ConversionStrategy {
        ConversionStrategy::FactoryMethod {
            member: MemberRef::factory("com.acme.Color", "fromString"),
            artifact: ArtifactId::new("com.acme.Color$paramConverter$"),
        }
    }

    #[test]
    fn test_deferred_wraps_once() {
        let once = valued().deferred();
        let twice = once.clone().deferred();

        assert!(once.is_deferred());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_artifact_looks_through_deferred() {
        let deferred = valued().deferred();

        assert_eq!(
            deferred.artifact().map(ArtifactId::as_str),
            Some("com.acme.Color$paramConverter$")
        );
        assert_eq!(deferred.member().map(|m| m.name.as_str()), Some("fromString"));
        assert!(ConversionStrategy::NoOp.artifact().is_none());
        assert!(ConversionStrategy::Deferred(None).artifact().is_none());
    }

    #[test]
    fn test_member_display() {
        let ctor = MemberRef::constructor("com.acme.Money");
        assert_eq!(ctor.to_string(), "com.acme.Money::new(String)");
        assert_eq!(ctor.kind, MemberKind::Constructor);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ConversionStrategy::NoOp.label(), "noop");
        assert_eq!(ConversionStrategy::Unresolvable.label(), "unresolvable");
        assert_eq!(valued().label(), "factory_method");
    }
}
