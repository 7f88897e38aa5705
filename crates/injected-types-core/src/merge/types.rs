//! Result and error types for directive merging.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::model::directive::{AllowedTypesDirective, DirectiveField, Source};
use crate::model::types::ContentTypeId;

// ---------------------------------------------------------------------------
// MergeOrigin
// ---------------------------------------------------------------------------

/// Which inputs produced the effective directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOrigin {
    /// Only a code-declared directive was present.
    CodeDeclared,
    /// Only an attribute-declared directive was present.
    AttributeDeclared,
    /// Both were present and were unioned.
    Merged,
    /// A legacy directive was present and replaced everything else.
    Legacy,
}

impl fmt::Display for MergeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CodeDeclared => write!(f, "code-declared"),
            Self::AttributeDeclared => write!(f, "attribute-declared"),
            Self::Merged => write!(f, "merged"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

// ---------------------------------------------------------------------------
// TypeConflict
// ---------------------------------------------------------------------------

/// An exact type that was both allowed and restricted after union.
///
/// The type ends up restricted only; the conflict is reported so property
/// definition assembly can surface it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TypeConflict {
    /// The contested content type.
    pub type_id: ContentTypeId,
    /// Sources that listed the type as allowed.
    pub allowed_by: BTreeSet<Source>,
    /// Sources that listed the type as restricted.
    pub restricted_by: BTreeSet<Source>,
}

impl fmt::Display for TypeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |s: &BTreeSet<Source>| {
            s.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("+")
        };
        write!(
            f,
            "'{}' allowed by {} but restricted by {}; restriction wins",
            self.type_id,
            join(&self.allowed_by),
            join(&self.restricted_by)
        )
    }
}

// ---------------------------------------------------------------------------
// MergeOutcome
// ---------------------------------------------------------------------------

/// The effective directive for one property, plus how it was reached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// The directive to attach to the property definition.
    pub directive: AllowedTypesDirective,
    /// Which inputs produced it.
    pub origin: MergeOrigin,
    /// Allowed/restricted overlaps resolved in favour of restriction, sorted by
    /// type id.
    pub conflicts: Vec<TypeConflict>,
}

impl MergeOutcome {
    /// Returns `true` if no allowed/restricted overlap had to be resolved.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DirectiveError
// ---------------------------------------------------------------------------

/// A directive source supplied a malformed entry.
///
/// This is a contract violation by the source, never coerced to an empty set:
/// dropping an entry could make a restricted type placeable.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DirectiveError {
    /// A type or matcher entry was missing, blank, or not a valid type id.
    #[error("invalid {declared_by} directive: {field}[{index}]: {reason}")]
    InvalidDirective {
        /// Which source declared the directive.
        declared_by: Source,
        /// Which field held the bad entry.
        field: DirectiveField,
        /// Position of the bad entry within that field.
        index: usize,
        /// Why the entry was rejected.
        reason: String,
    },
}
