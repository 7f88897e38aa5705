//! injected-types library crate.
//!
//! Property scanning for content types: each scanned property's
//! allowed-types directive is resolved from its three possible sources and
//! merged into one effective directive before the property definition is
//! built. The directive model and the merge itself live in
//! `injected-types-core`; this crate adds the registry, resolver, assigner,
//! scanning rules, and the file formats the CLI reads.

pub mod assign;
pub mod attribute;
pub mod config;
pub mod error;
pub mod manifest;
pub mod property;
pub mod registry;
pub mod resolve;
pub mod rules;

pub use assign::{AssignReport, AssignerBuilder, PropertyAssigner, ScannedProperty, check_declaration_shape};
pub use attribute::{BackingType, DisplayAttribute, PropertyAttribute};
pub use config::{ConfigError, DirectiveEntry, ScanConfig, ScanSettings};
pub use error::ScanError;
pub use injected_types_core::merge::{
    DirectiveError, MergeOrigin, MergeOutcome, TypeConflict, merge_directives, merge_with_legacy, normalize,
};
pub use injected_types_core::model::{
    AllowedTypesDirective, ContentTypeId, DirectiveDecl, DirectiveField, PropertyName, Source, SpecificationDecl,
    TypeSpecification, ValidationError,
};
pub use manifest::ContentModelManifest;
pub use property::{ContentTypeModel, PropertyDefinitionModel, PropertyDescriptor, ValueKind};
pub use registry::{DirectiveRegistry, RegistryBuilder, RegistryError};
pub use resolve::{AttributeResolver, Candidates};
pub use rules::{DefaultScanningRules, ScanningRules};
