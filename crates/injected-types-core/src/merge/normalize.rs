//! Validation and de-duplication of a single declared directive.

use std::collections::BTreeSet;

use crate::model::directive::{
    AllowedTypesDirective, DirectiveDecl, DirectiveField, Source, SpecificationDecl,
    TypeSpecification,
};
use crate::model::types::ContentTypeId;

use super::types::DirectiveError;

/// Validate `decl` and collapse duplicate entries.
///
/// Exact types are collected into sets. Specification matchers keep their
/// first-seen order; a matcher is dropped only if a structurally equal one
/// (same target, same include-derived flag) came before it. Matchers are never
/// collapsed by subsumption.
///
/// # Errors
/// Returns [`DirectiveError::InvalidDirective`] for the first blank or
/// malformed entry, or for a matcher without a target type.
pub fn normalize(
    decl: &DirectiveDecl,
    source: Source,
) -> Result<AllowedTypesDirective, DirectiveError> {
    let allowed_types = type_set(&decl.allowed, source, DirectiveField::AllowedTypes)?;
    let allowed_specifications = spec_list(
        &decl.allowed_specifications,
        source,
        DirectiveField::AllowedSpecifications,
    )?;
    let restricted_types = type_set(&decl.restricted, source, DirectiveField::RestrictedTypes)?;
    let restricted_specifications = spec_list(
        &decl.restricted_specifications,
        source,
        DirectiveField::RestrictedSpecifications,
    )?;

    Ok(AllowedTypesDirective::from_parts(
        allowed_types,
        allowed_specifications,
        restricted_types,
        restricted_specifications,
    ))
}

fn type_set(
    entries: &[String],
    source: Source,
    field: DirectiveField,
) -> Result<BTreeSet<ContentTypeId>, DirectiveError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, raw)| parse_type(raw, source, field, index))
        .collect()
}

fn spec_list(
    entries: &[SpecificationDecl],
    source: Source,
    field: DirectiveField,
) -> Result<Vec<TypeSpecification>, DirectiveError> {
    let mut out: Vec<TypeSpecification> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let Some(raw) = entry.target.as_deref() else {
            return Err(DirectiveError::InvalidDirective {
                declared_by: source,
                field,
                index,
                reason: "specification matcher has no type".to_owned(),
            });
        };
        let spec = TypeSpecification::new(
            parse_type(raw, source, field, index)?,
            entry.include_derived,
        );
        if !out.contains(&spec) {
            out.push(spec);
        }
    }
    Ok(out)
}

fn parse_type(
    raw: &str,
    source: Source,
    field: DirectiveField,
    index: usize,
) -> Result<ContentTypeId, DirectiveError> {
    ContentTypeId::new(raw).map_err(|e| DirectiveError::InvalidDirective {
        declared_by: source,
        field,
        index,
        reason: e.reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ContentTypeId {
        ContentTypeId::new(s).unwrap()
    }

    #[test]
    fn empty_decl_normalizes_to_empty_directive() {
        let d = normalize(&DirectiveDecl::default(), Source::CodeDeclared).unwrap();
        assert!(d.is_empty());
    }

    #[test]
    fn duplicate_exact_types_collapse() {
        let decl = DirectiveDecl::default().allowing(["B", "A", "B"]);
        let d = normalize(&decl, Source::CodeDeclared).unwrap();
        assert_eq!(d.allowed_types().len(), 2);
        assert!(d.allows(&id("A")));
    }

    #[test]
    fn duplicate_specifications_collapse_keeping_order() {
        let decl = DirectiveDecl::default()
            .allowing_spec("IZeta", false)
            .allowing_spec("IAlpha", true)
            .allowing_spec("IZeta", false);
        let d = normalize(&decl, Source::AttributeDeclared).unwrap();
        assert_eq!(
            d.allowed_specifications(),
            &[
                TypeSpecification::new(id("IZeta"), false),
                TypeSpecification::new(id("IAlpha"), true),
            ]
        );
    }

    #[test]
    fn specifications_differing_in_flag_are_both_kept() {
        let decl = DirectiveDecl::default()
            .restricting_spec("IBlockData", true)
            .restricting_spec("IBlockData", false);
        let d = normalize(&decl, Source::CodeDeclared).unwrap();
        assert_eq!(d.restricted_specifications().len(), 2);
    }

    #[test]
    fn missing_matcher_type_is_invalid() {
        let mut decl = DirectiveDecl::default().allowing_spec("IFoo", false);
        decl.allowed_specifications.push(SpecificationDecl {
            target: None,
            include_derived: true,
        });
        let err = normalize(&decl, Source::AttributeDeclared).unwrap_err();
        assert_eq!(
            err,
            DirectiveError::InvalidDirective {
                declared_by: Source::AttributeDeclared,
                field: DirectiveField::AllowedSpecifications,
                index: 1,
                reason: "specification matcher has no type".to_owned(),
            }
        );
    }

    #[test]
    fn blank_exact_type_is_invalid_not_dropped() {
        let decl = DirectiveDecl::default().restricting(["FormBlock", ""]);
        let err = normalize(&decl, Source::CodeDeclared).unwrap_err();
        let DirectiveError::InvalidDirective { field, index, .. } = err;
        assert_eq!(field, DirectiveField::RestrictedTypes);
        assert_eq!(index, 1);
    }

    #[test]
    fn error_message_names_source_and_field() {
        let decl = DirectiveDecl::default().allowing([" "]);
        let msg = normalize(&decl, Source::CodeDeclared)
            .unwrap_err()
            .to_string();
        assert!(msg.contains("code-declared"), "{msg}");
        assert!(msg.contains("allowed[0]"), "{msg}");
    }
}
