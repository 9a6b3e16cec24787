//! Deterministic artifact naming.
//!
//! Every emitted converter is named after the type it converts:
//!
//! ```text
//! [generated namespace] + type name + artifact suffix
//! ```
//!
//! The generated namespace is only prepended for primitive wrappers, whose
//! names would otherwise land in the standard library namespace. If the
//! leading namespace segment of the result is reserved (`java` by default)
//! it is rewritten by appending the rewrite suffix: `java.time.Duration`
//! becomes `javaq.time.Duration`.
//!
//! A rewritten name can coincide with a real type (`javaq.time.Duration`).
//! The resolver then asks for an [`alternative`](ArtifactNaming::alternative)
//! id until it finds one no other type in the session owns.

use delos_core::ArtifactId;

/// Default namespace for artifacts converting primitive wrappers.
pub const DEFAULT_GENERATED_NAMESPACE: &str = "delos.generated.";

/// Default suffix appended to every artifact name.
pub const DEFAULT_ARTIFACT_SUFFIX: &str = "$paramConverter$";

/// Default text appended to a reserved leading segment.
pub const DEFAULT_REWRITE_SUFFIX: &str = "q";

/// Naming policy for emitted converter artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNaming {
    generated_namespace: String,
    reserved_prefixes: Vec<String>,
    rewrite_suffix: String,
    artifact_suffix: String,
}

impl Default for ArtifactNaming {
    fn default() -> Self {
        Self {
            generated_namespace: DEFAULT_GENERATED_NAMESPACE.to_string(),
            reserved_prefixes: vec!["java".to_string()],
            rewrite_suffix: DEFAULT_REWRITE_SUFFIX.to_string(),
            artifact_suffix: DEFAULT_ARTIFACT_SUFFIX.to_string(),
        }
    }
}

impl ArtifactNaming {
    /// Sets the namespace prepended to primitive wrapper artifacts.
    pub fn with_generated_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.generated_namespace = namespace.into();
        self
    }

    /// Replaces the reserved leading namespace segments.
    pub fn with_reserved_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the text appended to a reserved leading segment.
    ///
    /// An empty suffix cannot move a name out of the reserved set and is
    /// replaced by [`DEFAULT_REWRITE_SUFFIX`].
    pub fn with_rewrite_suffix(mut self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        self.rewrite_suffix = if suffix.is_empty() {
            DEFAULT_REWRITE_SUFFIX.to_string()
        } else {
            suffix
        };
        self
    }

    /// Sets the suffix appended to every artifact name.
    pub fn with_artifact_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.artifact_suffix = suffix.into();
        self
    }

    /// Namespace prepended to primitive wrapper artifacts.
    #[must_use]
    pub fn generated_namespace(&self) -> &str {
        &self.generated_namespace
    }

    /// Reserved leading namespace segments.
    #[must_use]
    pub fn reserved_prefixes(&self) -> &[String] {
        &self.reserved_prefixes
    }

    /// Returns `true` if the leading namespace segment of `name` is reserved.
    #[must_use]
    pub fn is_reserved(&self, name: &str) -> bool {
        let head = leading_segment(name);
        self.reserved_prefixes.iter().any(|p| p == head)
    }

    /// Derives the artifact id for `type_name`.
    ///
    /// ```rust
    /// use delos_converter::ArtifactNaming;
    ///
    /// let naming = ArtifactNaming::default();
    /// assert_eq!(
    ///     naming.artifact_for("com.acme.Money", false).as_str(),
    ///     "com.acme.Money$paramConverter$"
    /// );
    /// assert_eq!(
    ///     naming.artifact_for("java.time.Duration", false).as_str(),
    ///     "javaq.time.Duration$paramConverter$"
    /// );
    /// assert_eq!(
    ///     naming.artifact_for("java.lang.Integer", true).as_str(),
    ///     "delos.generated.java.lang.Integer$paramConverter$"
    /// );
    /// ```
    #[must_use]
    pub fn artifact_for(&self, type_name: &str, primitive: bool) -> ArtifactId {
        let base = if primitive {
            format!("{}{}", self.generated_namespace, type_name)
        } else {
            type_name.to_string()
        };
        let base = self.rewrite_reserved(&base);
        ArtifactId::new(format!("{base}{}", self.artifact_suffix))
    }

    /// Derives the `attempt`-th fallback id for `type_name`.
    ///
    /// Used when the preferred id from [`artifact_for`](Self::artifact_for)
    /// already belongs to another type.
    ///
    /// ```rust
    /// use delos_converter::ArtifactNaming;
    ///
    /// let naming = ArtifactNaming::default();
    /// assert_eq!(
    ///     naming.alternative("java.util.Foo", false, 1).as_str(),
    ///     "javaq.util.Foo$paramConverter$1"
    /// );
    /// ```
    #[must_use]
    pub fn alternative(&self, type_name: &str, primitive: bool, attempt: usize) -> ArtifactId {
        let preferred = self.artifact_for(type_name, primitive);
        ArtifactId::new(format!("{preferred}{attempt}"))
    }

    fn rewrite_reserved(&self, name: &str) -> String {
        if !self.is_reserved(name) {
            return name.to_string();
        }
        let head = leading_segment(name);
        let mut rewritten = format!("{head}{}", self.rewrite_suffix);
        // keep rewriting until the segment leaves the reserved set
        while self.reserved_prefixes.iter().any(|p| *p == rewritten) {
            rewritten.push_str(&self.rewrite_suffix);
        }
        format!("{rewritten}{}", &name[head.len()..])
    }
}

fn leading_segment(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}
