//! Allowed-types directives: what a property may reference, and what it may not.
//!
//! A directive comes in two shapes:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`DirectiveDecl`] | Raw, as written by a source (registry config, property attribute). May contain blank entries. |
//! | [`AllowedTypesDirective`] | Validated and de-duplicated. Immutable; only the merger constructs one. |
//!
//! Exact types live in ordered sets. Specification matchers (a type or
//! interface plus an include-derived flag) live in first-seen order, since the
//! enforcement pipeline evaluates them in declaration order.
//!
//! # Serialization
//!
//! ```toml
//! allowed = ["TeaserBlock"]
//! restricted = ["FormBlock"]
//! allowed_specifications = [{ type = "IBlockData", include_derived = true }]
//! ```

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::ContentTypeId;

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Where a directive was declared.
///
/// Used for diagnostics and conflict reports only; never persisted with the
/// merged directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Registered in code/configuration, keyed by (content type, property).
    CodeDeclared,
    /// Declared on the property itself via the injected allowed-types attribute.
    AttributeDeclared,
    /// The older single-source allowed-types attribute.
    Legacy,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CodeDeclared => write!(f, "code-declared"),
            Self::AttributeDeclared => write!(f, "attribute-declared"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

// ---------------------------------------------------------------------------
// DirectiveField
// ---------------------------------------------------------------------------

/// One of the four fields of a directive. Used to locate malformed entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectiveField {
    AllowedTypes,
    AllowedSpecifications,
    RestrictedTypes,
    RestrictedSpecifications,
}

impl fmt::Display for DirectiveField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllowedTypes => write!(f, "allowed"),
            Self::AllowedSpecifications => write!(f, "allowed_specifications"),
            Self::RestrictedTypes => write!(f, "restricted"),
            Self::RestrictedSpecifications => write!(f, "restricted_specifications"),
        }
    }
}

// ---------------------------------------------------------------------------
// Declarations (raw)
// ---------------------------------------------------------------------------

/// A specification matcher as declared. `target` may be missing, which the
/// merger rejects as an invalid directive.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecificationDecl {
    /// The type or interface being matched.
    #[serde(rename = "type", default)]
    pub target: Option<String>,
    /// Whether types deriving from `target` also match.
    #[serde(default)]
    pub include_derived: bool,
}

impl SpecificationDecl {
    /// A matcher for `target`.
    #[must_use]
    pub fn new(target: impl Into<String>, include_derived: bool) -> Self {
        Self {
            target: Some(target.into()),
            include_derived,
        }
    }
}

/// A directive as declared by one source, before validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectiveDecl {
    /// Exact content types permitted. Empty means no restriction from this source.
    #[serde(default)]
    pub allowed: Vec<String>,
    /// Pattern matchers for permitted types.
    #[serde(default)]
    pub allowed_specifications: Vec<SpecificationDecl>,
    /// Exact content types explicitly disallowed.
    #[serde(default)]
    pub restricted: Vec<String>,
    /// Pattern matchers for disallowed types.
    #[serde(default)]
    pub restricted_specifications: Vec<SpecificationDecl>,
}

impl DirectiveDecl {
    /// Add exact allowed types.
    #[must_use]
    pub fn allowing<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed.extend(types.into_iter().map(Into::into));
        self
    }

    /// Add exact restricted types.
    #[must_use]
    pub fn restricting<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.restricted.extend(types.into_iter().map(Into::into));
        self
    }

    /// Add an allowed specification matcher.
    #[must_use]
    pub fn allowing_spec(mut self, target: impl Into<String>, include_derived: bool) -> Self {
        self.allowed_specifications
            .push(SpecificationDecl::new(target, include_derived));
        self
    }

    /// Add a restricted specification matcher.
    #[must_use]
    pub fn restricting_spec(mut self, target: impl Into<String>, include_derived: bool) -> Self {
        self.restricted_specifications
            .push(SpecificationDecl::new(target, include_derived));
        self
    }
}

// ---------------------------------------------------------------------------
// TypeSpecification
// ---------------------------------------------------------------------------

/// A validated specification matcher.
///
/// Two matchers are equal only if both the target and the include-derived flag
/// match; `IBlockData (+derived)` and `IBlockData` are distinct entries.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeSpecification {
    /// The type or interface being matched.
    pub target: ContentTypeId,
    /// Whether types deriving from `target` also match.
    pub include_derived: bool,
}

impl TypeSpecification {
    /// Create a new matcher.
    #[must_use]
    pub const fn new(target: ContentTypeId, include_derived: bool) -> Self {
        Self {
            target,
            include_derived,
        }
    }
}

impl fmt::Display for TypeSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.include_derived {
            write!(f, "{} (+derived)", self.target)
        } else {
            write!(f, "{}", self.target)
        }
    }
}

impl From<&TypeSpecification> for SpecificationDecl {
    fn from(spec: &TypeSpecification) -> Self {
        Self::new(spec.target.as_str(), spec.include_derived)
    }
}

// ---------------------------------------------------------------------------
// AllowedTypesDirective
// ---------------------------------------------------------------------------

/// A validated, de-duplicated allowed-types directive.
///
/// Instances are immutable. They are produced by
/// [`normalize`](crate::merge::normalize) and the merge functions, which
/// guarantee that no entry is blank. Directives returned from
/// [`merge_directives`](crate::merge::merge_directives) additionally never list
/// an exact type as both allowed and restricted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AllowedTypesDirective {
    allowed_types: BTreeSet<ContentTypeId>,
    allowed_specifications: Vec<TypeSpecification>,
    restricted_types: BTreeSet<ContentTypeId>,
    restricted_specifications: Vec<TypeSpecification>,
}

impl AllowedTypesDirective {
    pub(crate) const fn from_parts(
        allowed_types: BTreeSet<ContentTypeId>,
        allowed_specifications: Vec<TypeSpecification>,
        restricted_types: BTreeSet<ContentTypeId>,
        restricted_specifications: Vec<TypeSpecification>,
    ) -> Self {
        Self {
            allowed_types,
            allowed_specifications,
            restricted_types,
            restricted_specifications,
        }
    }

    /// Exact content types permitted.
    #[must_use]
    pub const fn allowed_types(&self) -> &BTreeSet<ContentTypeId> {
        &self.allowed_types
    }

    /// Matchers for permitted type families, in declaration order.
    #[must_use]
    pub fn allowed_specifications(&self) -> &[TypeSpecification] {
        &self.allowed_specifications
    }

    /// Exact content types disallowed.
    #[must_use]
    pub const fn restricted_types(&self) -> &BTreeSet<ContentTypeId> {
        &self.restricted_types
    }

    /// Matchers for disallowed type families, in declaration order.
    #[must_use]
    pub fn restricted_specifications(&self) -> &[TypeSpecification] {
        &self.restricted_specifications
    }

    /// Returns `true` if the directive neither allows nor restricts anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allowed_types.is_empty()
            && self.allowed_specifications.is_empty()
            && self.restricted_types.is_empty()
            && self.restricted_specifications.is_empty()
    }

    /// Returns `true` if `id` is listed as an exact allowed type.
    #[must_use]
    pub fn allows(&self, id: &ContentTypeId) -> bool {
        self.allowed_types.contains(id)
    }

    /// Returns `true` if `id` is listed as an exact restricted type.
    #[must_use]
    pub fn restricts(&self, id: &ContentTypeId) -> bool {
        self.restricted_types.contains(id)
    }

    /// Set equality: same exact types and the same matchers, ignoring matcher
    /// order.
    #[must_use]
    pub fn set_eq(&self, other: &Self) -> bool {
        fn same<T: PartialEq>(a: &[T], b: &[T]) -> bool {
            a.len() == b.len() && a.iter().all(|x| b.contains(x))
        }
        self.allowed_types == other.allowed_types
            && self.restricted_types == other.restricted_types
            && same(&self.allowed_specifications, &other.allowed_specifications)
            && same(
                &self.restricted_specifications,
                &other.restricted_specifications,
            )
    }

    /// Render back into declaration form.
    #[must_use]
    pub fn to_decl(&self) -> DirectiveDecl {
        DirectiveDecl {
            allowed: self.allowed_types.iter().map(ToString::to_string).collect(),
            allowed_specifications: self
                .allowed_specifications
                .iter()
                .map(SpecificationDecl::from)
                .collect(),
            restricted: self
                .restricted_types
                .iter()
                .map(ToString::to_string)
                .collect(),
            restricted_specifications: self
                .restricted_specifications
                .iter()
                .map(SpecificationDecl::from)
                .collect(),
        }
    }
}

impl fmt::Display for AllowedTypesDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Display>(items: impl Iterator<Item = T>) -> String {
            items.map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
        }
        write!(
            f,
            "allowed=[{}] allowed_specs=[{}] restricted=[{}] restricted_specs=[{}]",
            list(self.allowed_types.iter()),
            list(self.allowed_specifications.iter()),
            list(self.restricted_types.iter()),
            list(self.restricted_specifications.iter()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ContentTypeId {
        ContentTypeId::new(s).unwrap()
    }

    #[test]
    fn decl_parses_from_toml() {
        let decl: DirectiveDecl = toml::from_str(
            r#"
allowed = ["TeaserBlock", "ImageBlock"]
restricted = ["FormBlock"]
allowed_specifications = [{ type = "IBlockData", include_derived = true }]
"#,
        )
        .unwrap();
        assert_eq!(decl.allowed, vec!["TeaserBlock", "ImageBlock"]);
        assert_eq!(decl.restricted, vec!["FormBlock"]);
        assert_eq!(
            decl.allowed_specifications,
            vec![SpecificationDecl::new("IBlockData", true)]
        );
        assert!(decl.restricted_specifications.is_empty());
    }

    #[test]
    fn decl_specification_without_type_parses_as_missing_target() {
        let decl: DirectiveDecl =
            toml::from_str("allowed_specifications = [{ include_derived = true }]").unwrap();
        assert_eq!(decl.allowed_specifications[0].target, None);
    }

    #[test]
    fn decl_rejects_unknown_fields() {
        assert!(toml::from_str::<DirectiveDecl>("permitted = [\"A\"]").is_err());
    }

    #[test]
    fn builder_helpers_accumulate() {
        let decl = DirectiveDecl::default()
            .allowing(["A", "B"])
            .restricting(["C"])
            .allowing_spec("IFoo", false)
            .restricting_spec("IBar", true);
        assert_eq!(decl.allowed, vec!["A", "B"]);
        assert_eq!(decl.restricted, vec!["C"]);
        assert_eq!(decl.allowed_specifications.len(), 1);
        assert!(decl.restricted_specifications[0].include_derived);
    }

    #[test]
    fn specification_equality_includes_flag() {
        let a = TypeSpecification::new(id("IBlockData"), true);
        let b = TypeSpecification::new(id("IBlockData"), false);
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "IBlockData (+derived)");
        assert_eq!(b.to_string(), "IBlockData");
    }

    #[test]
    fn directive_to_decl_keeps_all_fields() {
        let directive = AllowedTypesDirective::from_parts(
            [id("B"), id("A")].into_iter().collect(),
            vec![TypeSpecification::new(id("IFoo"), true)],
            [id("C")].into_iter().collect(),
            vec![],
        );
        let decl = directive.to_decl();
        assert_eq!(decl.allowed, vec!["A", "B"]);
        assert_eq!(decl.restricted, vec!["C"]);
        assert_eq!(decl.allowed_specifications, vec![SpecificationDecl::new("IFoo", true)]);
        assert!(directive.allows(&id("A")));
        assert!(directive.restricts(&id("C")));
        assert!(!directive.is_empty());
    }

    #[test]
    fn source_display() {
        assert_eq!(Source::CodeDeclared.to_string(), "code-declared");
        assert_eq!(Source::AttributeDeclared.to_string(), "attribute-declared");
        assert_eq!(Source::Legacy.to_string(), "legacy");
    }
}
