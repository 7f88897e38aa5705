//! Union of the code-declared and attribute-declared directives.
//!
//! # Algorithm
//!
//! 1. Neither present → `None`.
//! 2. One present → that directive, normalized.
//! 3. Both present → field-by-field union of the normalized directives.
//!    Exact types union as sets; matchers keep first-seen order (code-declared
//!    first) and drop structural duplicates.
//! 4. Any exact type present in both the allowed and restricted sets is removed
//!    from `allowed` and recorded as a [`TypeConflict`]. Restriction always
//!    wins, whichever source listed which side.
//!
//! The legacy rule sits in front of all of this: see [`merge_with_legacy`].
//!
//! # Guarantees
//!
//! - **Idempotent**: `merge(D, D)` is set-equal to `D`.
//! - **Commutative** up to matcher order: swapping the inputs yields a
//!   set-equal directive and identical conflicts.
//! - **Lossless** for disjoint inputs: every entry of either side survives.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::directive::{
    AllowedTypesDirective, DirectiveDecl, Source, TypeSpecification,
};
use crate::model::types::ContentTypeId;

use super::normalize::normalize;
use super::types::{DirectiveError, MergeOrigin, MergeOutcome, TypeConflict};

/// Merge the code-declared and attribute-declared directives for a property.
///
/// # Errors
/// Returns [`DirectiveError::InvalidDirective`] if either declaration holds a
/// malformed entry. Absence of input is never an error.
pub fn merge_directives(
    code: Option<&DirectiveDecl>,
    attribute: Option<&DirectiveDecl>,
) -> Result<Option<MergeOutcome>, DirectiveError> {
    let sides: Vec<(Source, AllowedTypesDirective)> = [
        (Source::CodeDeclared, code),
        (Source::AttributeDeclared, attribute),
    ]
    .into_iter()
    .filter_map(|(source, decl)| decl.map(|d| (source, d)))
    .map(|(source, decl)| normalize(decl, source).map(|d| (source, d)))
    .collect::<Result<_, _>>()?;

    let origin = match (code.is_some(), attribute.is_some()) {
        (false, false) => return Ok(None),
        (true, false) => MergeOrigin::CodeDeclared,
        (false, true) => MergeOrigin::AttributeDeclared,
        (true, true) => MergeOrigin::Merged,
    };

    let (directive, conflicts) = union(&sides);
    tracing::debug!(
        %origin,
        allowed = directive.allowed_types().len(),
        restricted = directive.restricted_types().len(),
        conflicts = conflicts.len(),
        "merged allowed-types directive"
    );

    Ok(Some(MergeOutcome {
        directive,
        origin,
        conflicts,
    }))
}

/// Resolve the effective directive, giving a legacy directive absolute
/// precedence.
///
/// When `legacy` is present, the code-declared and attribute-declared inputs
/// are not inspected at all, not even validated: the enforcement pipeline
/// consults only the legacy directive once one exists, so merging into it would
/// silently lose data.
///
/// The legacy directive is returned as declared. A type it lists as both
/// allowed and restricted stays in both sets, but is still reported as a
/// [`TypeConflict`] with [`Source::Legacy`] on each side.
///
/// # Errors
/// Returns [`DirectiveError::InvalidDirective`] if the directive that is used
/// holds a malformed entry.
pub fn merge_with_legacy(
    legacy: Option<&DirectiveDecl>,
    code: Option<&DirectiveDecl>,
    attribute: Option<&DirectiveDecl>,
) -> Result<Option<MergeOutcome>, DirectiveError> {
    let Some(legacy) = legacy else {
        return merge_directives(code, attribute);
    };

    if code.is_some() || attribute.is_some() {
        tracing::debug!(
            code_declared = code.is_some(),
            attribute_declared = attribute.is_some(),
            "legacy directive present; ignoring other sources"
        );
    }

    let directive = normalize(legacy, Source::Legacy)?;
    let conflicts = self_overlap(&directive, Source::Legacy);
    Ok(Some(MergeOutcome {
        directive,
        origin: MergeOrigin::Legacy,
        conflicts,
    }))
}

/// Types one directive lists as both allowed and restricted, sorted by id.
fn self_overlap(directive: &AllowedTypesDirective, source: Source) -> Vec<TypeConflict> {
    directive
        .restricted_types()
        .intersection(directive.allowed_types())
        .map(|id| TypeConflict {
            type_id: id.clone(),
            allowed_by: BTreeSet::from([source]),
            restricted_by: BTreeSet::from([source]),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Union
// ---------------------------------------------------------------------------

fn union(sides: &[(Source, AllowedTypesDirective)]) -> (AllowedTypesDirective, Vec<TypeConflict>) {
    let mut allowed: BTreeMap<ContentTypeId, BTreeSet<Source>> = BTreeMap::new();
    let mut restricted: BTreeMap<ContentTypeId, BTreeSet<Source>> = BTreeMap::new();
    let mut allowed_specs: Vec<TypeSpecification> = Vec::new();
    let mut restricted_specs: Vec<TypeSpecification> = Vec::new();

    for (source, d) in sides {
        for id in d.allowed_types() {
            allowed.entry(id.clone()).or_default().insert(*source);
        }
        for id in d.restricted_types() {
            restricted.entry(id.clone()).or_default().insert(*source);
        }
        extend_unique(&mut allowed_specs, d.allowed_specifications());
        extend_unique(&mut restricted_specs, d.restricted_specifications());
    }

    // Restriction wins. BTreeMap iteration keeps the conflict list sorted.
    let mut conflicts = Vec::new();
    for (id, restricted_by) in &restricted {
        if let Some(allowed_by) = allowed.remove(id) {
            conflicts.push(TypeConflict {
                type_id: id.clone(),
                allowed_by,
                restricted_by: restricted_by.clone(),
            });
        }
    }

    let directive = AllowedTypesDirective::from_parts(
        allowed.into_keys().collect(),
        allowed_specs,
        restricted.into_keys().collect(),
        restricted_specs,
    );
    (directive, conflicts)
}

fn extend_unique(into: &mut Vec<TypeSpecification>, from: &[TypeSpecification]) {
    for spec in from {
        if !into.contains(spec) {
            into.push(spec.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
