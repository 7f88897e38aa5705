//! Shared test helpers for injected-types integration tests.
//!
//! Every scan runs against an in-memory registry or a temp directory; nothing
//! touches the working tree.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use injected_types::{
    AttributeResolver, ContentTypeId, ContentTypeModel, DefaultScanningRules, DirectiveDecl, DirectiveRegistry,
    PropertyAssigner, PropertyDefinitionModel, PropertyDescriptor, PropertyName, RegistryBuilder, ScanSettings,
    ValueKind,
};

pub fn ct(s: &str) -> ContentTypeId {
    ContentTypeId::new(s).expect("valid content type id")
}

pub fn pn(s: &str) -> PropertyName {
    PropertyName::new(s).expect("valid property name")
}

/// A frozen registry holding `entries` as (content type, property, directive).
pub fn registry(entries: &[(&str, &str, DirectiveDecl)]) -> Arc<DirectiveRegistry> {
    let mut builder = RegistryBuilder::new();
    for (content_type, property, decl) in entries {
        builder
            .insert(ct(content_type), pn(property), decl.clone())
            .expect("no duplicate keys in test registry");
    }
    Arc::new(builder.freeze())
}

pub fn assigner(registry: Arc<DirectiveRegistry>, settings: ScanSettings) -> PropertyAssigner {
    PropertyAssigner::builder()
        .resolver(AttributeResolver::new(registry))
        .rules(DefaultScanningRules)
        .settings(settings)
        .build()
        .expect("assigner has resolver and rules")
}

/// An auto-generated, overridable content area on `content_type`.
pub fn content_area(content_type: &str, name: &str) -> PropertyDescriptor {
    PropertyDescriptor::new(ct(content_type), pn(name), ValueKind::ContentArea)
}

pub fn model(content_type: &str, properties: Vec<PropertyDescriptor>) -> ContentTypeModel {
    ContentTypeModel {
        model_type: ct(content_type),
        properties,
    }
}

/// Scan the first property of `model` into a fresh definition.
pub fn scan_first(
    assigner: &PropertyAssigner,
    model: &ContentTypeModel,
) -> Result<(PropertyDefinitionModel, injected_types::AssignReport), injected_types::ScanError> {
    let property = &model.properties[0];
    let mut def = PropertyDefinitionModel::new(property.name.clone());
    let report = assigner.assign(&mut def, property, model)?;
    Ok((def, report))
}

/// Write `contents` to `name` inside a fresh temp dir.
pub fn write_temp(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("failed to write temp file");
    (dir, path)
}
