//! Per-attribute validation rules shared by every scan path.
//!
//! The host framework keeps these checks private to its own scanner; here
//! they are an explicit contract, implemented once by [`DefaultScanningRules`]
//! and used both for legacy directives and for merged ones.
//!
//! Check order within a property follows attribute declaration order; each
//! rule fails with the first violation it finds.

use injected_types_core::model::AllowedTypesDirective;

use crate::attribute::{BackingType, PropertyAttribute};
use crate::error::ScanError;
use crate::property::{PropertyDescriptor, ValueKind};

/// Validation hooks the assigner calls while folding attributes.
pub trait ScanningRules: Send + Sync {
    /// An allowed-types directive may only sit on a property that holds or
    /// references content.
    ///
    /// # Errors
    /// [`ScanError::TypeMismatch`] when the property cannot carry the directive.
    fn validate_allowed_types(
        &self,
        directive: &AllowedTypesDirective,
        property: &PropertyDescriptor,
    ) -> Result<(), ScanError>;

    /// A backing type must store the same value shape as the property.
    ///
    /// # Errors
    /// [`ScanError::TypeMismatch`] when the shapes differ.
    fn validate_type_compatibility(
        &self,
        property: &PropertyDescriptor,
        backing: &BackingType,
    ) -> Result<(), ScanError>;

    /// Local block properties cannot carry per-value flags.
    ///
    /// # Errors
    /// [`ScanError::StructuralViolation`] when `attribute` is not allowed on a
    /// block property.
    fn validate_block_property_constraints(
        &self,
        attribute: &PropertyAttribute,
        property: &PropertyDescriptor,
    ) -> Result<(), ScanError>;
}

/// The host's stock rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultScanningRules;

impl ScanningRules for DefaultScanningRules {
    fn validate_allowed_types(
        &self,
        _directive: &AllowedTypesDirective,
        property: &PropertyDescriptor,
    ) -> Result<(), ScanError> {
        if property.kind.references_content() {
            return Ok(());
        }
        Err(ScanError::TypeMismatch {
            property: property.name.clone(),
            content_type: property.declaring_type.clone(),
            detail: format!(
                "The AllowedTypes attribute on the property '{}' on '{}' is only valid on content area and content reference properties, not {}.",
                property.name, property.declaring_type, property.kind
            ),
        })
    }

    fn validate_type_compatibility(
        &self,
        property: &PropertyDescriptor,
        backing: &BackingType,
    ) -> Result<(), ScanError> {
        if backing.value_kind == property.kind {
            return Ok(());
        }
        Err(ScanError::TypeMismatch {
            property: property.name.clone(),
            content_type: property.declaring_type.clone(),
            detail: format!(
                "The backing type '{}' stores {} values but the property '{}' on '{}' is {}.",
                backing.type_name,
                backing.value_kind,
                property.name,
                property.declaring_type,
                property.kind
            ),
        })
    }

    fn validate_block_property_constraints(
        &self,
        attribute: &PropertyAttribute,
        property: &PropertyDescriptor,
    ) -> Result<(), ScanError> {
        if property.kind != ValueKind::Block {
            return Ok(());
        }
        match attribute {
            PropertyAttribute::CultureSpecific { .. }
            | PropertyAttribute::Required
            | PropertyAttribute::Searchable { .. } => Err(ScanError::StructuralViolation {
                property: property.name.clone(),
                content_type: property.declaring_type.clone(),
                detail: format!(
                    "is a block property and cannot carry the {} attribute",
                    attribute.name()
                ),
            }),
            _ => Ok(()),
        }
    }
}
