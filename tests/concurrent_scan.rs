//! One frozen registry and one assigner shared by many scanning threads.

mod common;

use std::sync::Arc;
use std::thread;

use common::{assigner, content_area, ct, model, registry};
use injected_types::{DirectiveDecl, PropertyAttribute, ScanSettings};

#[test]
fn parallel_scans_see_the_same_directives() {
    let reg = registry(&[
        ("ArticlePage", "Main", DirectiveDecl::default().allowing(["TeaserBlock"])),
        ("StartPage", "Hero", DirectiveDecl::default().restricting(["FormBlock"])),
    ]);
    let a = Arc::new(assigner(reg, ScanSettings::default()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let a = Arc::clone(&a);
            thread::spawn(move || {
                let (content_type, property) = if i % 2 == 0 {
                    ("ArticlePage", "Main")
                } else {
                    ("StartPage", "Hero")
                };
                let m = model(
                    content_type,
                    vec![content_area(content_type, property).with_attribute(
                        PropertyAttribute::InjectedAllowedTypes(DirectiveDecl::default().allowing(["ImageBlock"])),
                    )],
                );
                let scanned = a.scan_content_type(&m).unwrap();
                (i, scanned[0].definition.allowed_types.clone().unwrap())
            })
        })
        .collect();

    for handle in handles {
        let (i, directive) = handle.join().unwrap();
        assert!(directive.allows(&ct("ImageBlock")));
        if i % 2 == 0 {
            assert!(directive.allows(&ct("TeaserBlock")));
        } else {
            assert!(directive.restricts(&ct("FormBlock")));
        }
    }
}
