//! Raw type declarations as stored in the index.
//!
//! A declaration lists every member of a type with enough detail to decide
//! whether it can convert a single string: its kind, whether it is static,
//! its visibility, and its parameter types.

use delos_core::{is_string_type, MemberRef};
use serde::{Deserialize, Serialize};

use crate::TypeCategory;

/// Name of the static factory every enum and most value types expose.
pub const VALUE_OF: &str = "valueOf";

/// Name of the static factory signalling custom parsing.
pub const FROM_STRING: &str = "fromString";

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Visible everywhere.
    #[default]
    Public,
    /// Visible to subtypes.
    Protected,
    /// Visible within the declaring namespace.
    Package,
    /// Visible only inside the declaring type.
    Private,
}

/// Whether a declared member is a constructor or a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredKind {
    /// Constructor.
    Constructor,
    /// Instance or static method.
    Method,
}

/// One member of a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberDeclaration {
    /// Constructor or method.
    pub kind: DeclaredKind,
    /// Method name; ignored for constructors.
    #[serde(default)]
    pub name: String,
    /// Whether the method is static.
    #[serde(default)]
    pub is_static: bool,
    /// Member visibility.
    #[serde(default)]
    pub visibility: Visibility,
    /// Qualified parameter type names, in order.
    #[serde(default)]
    pub parameters: Vec<String>,
}

impl MemberDeclaration {
    /// Declares a public constructor.
    pub fn constructor<I, S>(parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: DeclaredKind::Constructor,
            name: MemberRef::CONSTRUCTOR_NAME.to_string(),
            is_static: false,
            visibility: Visibility::Public,
            parameters: parameters.into_iter().map(Into::into).collect(),
        }
    }

    /// Declares a public static method.
    pub fn static_method<I, S>(name: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: DeclaredKind::Method,
            name: name.into(),
            is_static: true,
            visibility: Visibility::Public,
            parameters: parameters.into_iter().map(Into::into).collect(),
        }
    }

    /// Declares a public instance method.
    pub fn method<I, S>(name: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            is_static: false,
            ..Self::static_method(name, parameters)
        }
    }

    /// Sets the visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Returns `true` if the member takes exactly one string argument.
    #[must_use]
    pub fn takes_single_string(&self) -> bool {
        matches!(self.parameters.as_slice(), [only] if is_string_type(only))
    }

    /// Returns a member reference if this member can convert a string into `owner`.
    ///
    /// Only non-private members taking exactly one string qualify, and among
    /// methods only static `valueOf` and `fromString`.
    #[must_use]
    pub fn string_candidate(&self, owner: &str) -> Option<MemberRef> {
        if self.visibility == Visibility::Private || !self.takes_single_string() {
            return None;
        }
        match self.kind {
            DeclaredKind::Constructor => Some(MemberRef::constructor(owner)),
            DeclaredKind::Method
                if self.is_static && (self.name == VALUE_OF || self.name == FROM_STRING) =>
            {
                Some(MemberRef::factory(owner, self.name.clone()))
            }
            DeclaredKind::Method => None,
        }
    }
}

/// A declared type and all of its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDeclaration {
    /// Qualified type name.
    pub name: String,
    /// Classification.
    #[serde(default)]
    pub category: TypeCategory,
    /// Members in declaration order.
    #[serde(default)]
    pub members: Vec<MemberDeclaration>,
}

impl TypeDeclaration {
    /// Creates a declaration with no members.
    pub fn new(name: impl Into<String>, category: TypeCategory) -> Self {
        Self {
            name: name.into(),
            category,
            members: Vec::new(),
        }
    }

    /// Appends a member.
    pub fn with_member(mut self, member: MemberDeclaration) -> Self {
        self.members.push(member);
        self
    }

    /// Returns the single-string candidates in declaration order.
    #[must_use]
    pub fn string_candidates(&self) -> Vec<MemberRef> {
        self.members
            .iter()
            .filter_map(|m| m.string_candidate(&self.name))
            .collect()
    }
}
