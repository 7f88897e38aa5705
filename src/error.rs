//! Error types for property scanning.
//!
//! [`ScanError`] is returned by every scan operation. All variants are fatal
//! to the property being scanned: there is no retry and no fallback to an
//! empty directive, because silently dropping a restriction would let a
//! content type be placed where it is blocked. Each message names the
//! offending property and its declaring (or scanned) content type.

use thiserror::Error;

use injected_types_core::merge::{DirectiveError, TypeConflict};
use injected_types_core::model::{ContentTypeId, PropertyName};

/// Errors returned by the resolver, the assigner, and the scanning rules.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A property violates a required declaration-shape precondition.
    #[error("the property '{property}' on the content type '{content_type}' {detail}")]
    StructuralViolation {
        /// The property being scanned.
        property: PropertyName,
        /// The type declaring the property.
        content_type: ContentTypeId,
        /// What is wrong with the declaration.
        detail: String,
    },

    /// A directive source supplied a missing or malformed entry.
    #[error(
        "invalid allowed-types directive on the property '{property}' on the content type '{content_type}': {source}"
    )]
    InvalidDirective {
        /// The property being scanned.
        property: PropertyName,
        /// The scanned content type.
        content_type: ContentTypeId,
        /// Which entry was rejected.
        source: DirectiveError,
    },

    /// A scanning capability the assigner depends on was not provided.
    #[error("scanning capability '{capability}' is not available; the assigner cannot be built")]
    MissingLegacyCapability {
        /// Name of the missing capability.
        capability: &'static str,
    },

    /// A declared type does not fit the property it is attached to.
    #[error("{detail}")]
    TypeMismatch {
        /// The property being scanned.
        property: PropertyName,
        /// The type declaring the property.
        content_type: ContentTypeId,
        /// Host-style description of the mismatch.
        detail: String,
    },

    /// Allowed/restricted overlaps were found and the configuration asks for
    /// them to be fatal.
    #[error(
        "the property '{property}' on the content type '{content_type}' has {}",
        conflict_summary(.conflicts)
    )]
    DirectiveConflict {
        /// The property being scanned.
        property: PropertyName,
        /// The scanned content type.
        content_type: ContentTypeId,
        /// The resolved overlaps.
        conflicts: Vec<TypeConflict>,
    },
}

fn conflict_summary(conflicts: &[TypeConflict]) -> String {
    let noun = if conflicts.len() == 1 { "entry" } else { "entries" };
    let list = conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!("{} conflicting allowed-types {noun}: {list}", conflicts.len())
}

impl ScanError {
    /// The property the error is about, if any.
    #[must_use]
    pub const fn property(&self) -> Option<&PropertyName> {
        match self {
            Self::StructuralViolation { property, .. }
            | Self::InvalidDirective { property, .. }
            | Self::TypeMismatch { property, .. }
            | Self::DirectiveConflict { property, .. } => Some(property),
            Self::MissingLegacyCapability { .. } => None,
        }
    }
}
