//! Property tests: a legacy directive always wins over the other sources.

mod common;

use proptest::prelude::*;

use common::{assigner, content_area, model, registry, scan_first};
use injected_types::{
    DirectiveDecl, MergeOrigin, PropertyAttribute, ScanSettings, Source, normalize,
};

fn type_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(vec!["TypeA", "TypeB", "TypeC", "TypeD"]), 0..4)
        .prop_map(|v| v.into_iter().map(str::to_owned).collect())
}

fn decl() -> impl Strategy<Value = DirectiveDecl> {
    (type_names(), type_names()).prop_map(|(allowed, restricted)| DirectiveDecl {
        allowed,
        restricted,
        ..DirectiveDecl::default()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_legacy_always_wins(legacy in decl(), code in decl(), injected in decl()) {
        let reg = registry(&[("ArticlePage", "Main", code)]);
        let a = assigner(reg, ScanSettings::default());
        let m = model(
            "ArticlePage",
            vec![content_area("ArticlePage", "Main")
                .with_attribute(PropertyAttribute::InjectedAllowedTypes(injected))
                .with_attribute(PropertyAttribute::AllowedTypes(legacy.clone()))],
        );

        let (def, report) = scan_first(&a, &m).unwrap();
        let expected = normalize(&legacy, Source::Legacy).unwrap();
        prop_assert_eq!(report.origin, Some(MergeOrigin::Legacy));
        let overlap: Vec<_> = expected
            .restricted_types()
            .intersection(expected.allowed_types())
            .cloned()
            .collect();
        let flagged: Vec<_> = report.conflicts.iter().map(|c| c.type_id.clone()).collect();
        prop_assert_eq!(flagged, overlap);
        prop_assert!(report
            .conflicts
            .iter()
            .all(|c| c.allowed_by.contains(&Source::Legacy) && c.restricted_by.contains(&Source::Legacy)));
        prop_assert_eq!(def.allowed_types.unwrap(), expected);
        prop_assert_eq!(
            def.attributes,
            vec![PropertyAttribute::AllowedTypes(legacy)]
        );
    }
}
