//! End-to-end property scans: registry, resolver, merge, and assignment.

mod common;

use common::{assigner, content_area, ct, model, registry, scan_first};
use injected_types::{
    DirectiveDecl, MergeOrigin, PropertyAttribute, PropertyDescriptor, ScanError, ScanSettings, Source,
};

#[test]
fn code_declared_and_attribute_declared_are_unioned() {
    let reg = registry(&[("ArticlePage", "Main", DirectiveDecl::default().allowing(["TypeA"]))]);
    let a = assigner(reg, ScanSettings::default());
    let m = model(
        "ArticlePage",
        vec![content_area("ArticlePage", "Main").with_attribute(PropertyAttribute::InjectedAllowedTypes(
            DirectiveDecl::default().allowing(["TypeB"]),
        ))],
    );

    let (def, report) = scan_first(&a, &m).unwrap();
    let directive = def.allowed_types.unwrap();
    let allowed: Vec<&str> = directive.allowed_types().iter().map(|t| t.as_str()).collect();
    assert_eq!(allowed, vec!["TypeA", "TypeB"]);
    assert!(directive.restricted_types().is_empty());
    assert_eq!(report.origin, Some(MergeOrigin::Merged));
    assert!(report.conflicts.is_empty());
}

#[test]
fn legacy_directive_excludes_every_other_source() {
    let reg = registry(&[("ArticlePage", "Main", DirectiveDecl::default().allowing(["TypeC"]))]);
    let a = assigner(reg, ScanSettings::default());
    let m = model(
        "ArticlePage",
        vec![content_area("ArticlePage", "Main").with_attribute(PropertyAttribute::AllowedTypes(
            DirectiveDecl::default().restricting(["TypeC"]),
        ))],
    );

    let (def, report) = scan_first(&a, &m).unwrap();
    let directive = def.allowed_types.unwrap();
    assert!(directive.allowed_types().is_empty());
    assert!(directive.restricts(&ct("TypeC")));
    assert_eq!(report.origin, Some(MergeOrigin::Legacy));
    assert!(report.conflicts.is_empty());
}

#[test]
fn restriction_wins_and_conflict_is_reported() {
    let reg = registry(&[("ArticlePage", "Main", DirectiveDecl::default().restricting(["TypeD"]))]);
    let a = assigner(reg, ScanSettings::default());
    let m = model(
        "ArticlePage",
        vec![content_area("ArticlePage", "Main").with_attribute(PropertyAttribute::InjectedAllowedTypes(
            DirectiveDecl::default().allowing(["TypeD"]),
        ))],
    );

    let (def, report) = scan_first(&a, &m).unwrap();
    let directive = def.allowed_types.unwrap();
    assert!(directive.restricts(&ct("TypeD")));
    assert!(!directive.allows(&ct("TypeD")));

    assert_eq!(report.conflicts.len(), 1);
    let conflict = &report.conflicts[0];
    assert_eq!(conflict.type_id, ct("TypeD"));
    assert!(conflict.allowed_by.contains(&Source::AttributeDeclared));
    assert!(conflict.restricted_by.contains(&Source::CodeDeclared));
}

#[test]
fn conflict_is_fatal_when_configured() {
    let reg = registry(&[("ArticlePage", "Main", DirectiveDecl::default().restricting(["TypeD"]))]);
    let a = assigner(
        reg,
        ScanSettings {
            fail_on_conflict: true,
            ..ScanSettings::default()
        },
    );
    let m = model(
        "ArticlePage",
        vec![content_area("ArticlePage", "Main").with_attribute(PropertyAttribute::InjectedAllowedTypes(
            DirectiveDecl::default().allowing(["TypeD"]),
        ))],
    );

    let err = scan_first(&a, &m).unwrap_err();
    assert!(matches!(err, ScanError::DirectiveConflict { .. }));
    assert!(err.to_string().contains("TypeD"), "{err}");
}

#[test]
fn non_overridable_auto_generated_property_fails_before_resolution() {
    // The malformed directive would fail resolution; the shape check must fire first.
    let reg = registry(&[(
        "ArticlePage",
        "Main",
        DirectiveDecl::default().allowing(["not a valid id"]),
    )]);
    let a = assigner(reg, ScanSettings::default());
    let mut p: PropertyDescriptor = content_area("ArticlePage", "Main");
    p.overridable = false;
    let m = model("ArticlePage", vec![p]);

    let err = scan_first(&a, &m).unwrap_err();
    assert!(matches!(err, ScanError::StructuralViolation { .. }), "{err}");
    assert!(err.to_string().contains("'Main'"), "{err}");
}

#[test]
fn malformed_code_declared_entry_is_fatal() {
    let reg = registry(&[(
        "ArticlePage",
        "Main",
        DirectiveDecl::default().allowing(["TypeA", ""]),
    )]);
    let a = assigner(reg, ScanSettings::default());
    let m = model("ArticlePage", vec![content_area("ArticlePage", "Main")]);

    let err = scan_first(&a, &m).unwrap_err();
    assert!(matches!(err, ScanError::InvalidDirective { .. }), "{err}");
    assert!(err.to_string().contains("allowed[1]"), "{err}");
}

#[test]
fn inherited_property_uses_directive_of_scanned_type() {
    let reg = registry(&[("ArticlePage", "Main", DirectiveDecl::default().allowing(["TypeA"]))]);
    let a = assigner(reg, ScanSettings::default());

    let inherited = content_area("BasePage", "Main");
    let article = model("ArticlePage", vec![inherited.clone()]);
    let base = model("BasePage", vec![inherited]);

    let (def, _) = scan_first(&a, &article).unwrap();
    assert!(def.allowed_types.unwrap().allows(&ct("TypeA")));

    let (def, report) = scan_first(&a, &base).unwrap();
    assert!(def.allowed_types.is_none());
    assert_eq!(report.origin, None);
}

#[test]
fn specification_matchers_are_unioned_without_conflict() {
    let reg = registry(&[(
        "ArticlePage",
        "Main",
        DirectiveDecl::default().allowing_spec("IBlockData", true),
    )]);
    let a = assigner(reg, ScanSettings::default());
    let m = model(
        "ArticlePage",
        vec![content_area("ArticlePage", "Main").with_attribute(PropertyAttribute::InjectedAllowedTypes(
            DirectiveDecl::default()
                .allowing_spec("IBlockData", true)
                .restricting_spec("IBlockData", true),
        ))],
    );

    let (def, report) = scan_first(&a, &m).unwrap();
    let directive = def.allowed_types.unwrap();
    assert_eq!(directive.allowed_specifications().len(), 1);
    assert_eq!(directive.restricted_specifications().len(), 1);
    assert!(report.conflicts.is_empty());
}
