//! Directive data model.

pub mod directive;
pub mod types;

pub use directive::{
    AllowedTypesDirective, DirectiveDecl, DirectiveField, Source, SpecificationDecl,
    TypeSpecification,
};
pub use types::{ContentTypeId, ErrorKind, PropertyName, ValidationError};
