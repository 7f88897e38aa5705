//! Attribute resolution: find the directive sources for one property.
//!
//! Three places can declare an allowed-types directive:
//!
//! | Source | Lookup |
//! |--------|--------|
//! | code-declared | frozen [`DirectiveRegistry`], keyed by (scanned model type, property name) |
//! | attribute-declared | the property's `InjectedAllowedTypes` attribute |
//! | legacy | the property's `AllowedTypes` attribute |
//!
//! All lookups are pure: absence is `None`, never an error. The host's
//! attribute system guarantees at most one attribute of each kind, so the
//! first match is the only match.

use std::sync::Arc;

use injected_types_core::model::{ContentTypeId, DirectiveDecl, PropertyName};

use crate::attribute::PropertyAttribute;
use crate::property::{ContentTypeModel, PropertyDescriptor};
use crate::registry::DirectiveRegistry;

/// The directive candidates found for one property.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Candidates<'a> {
    pub legacy: Option<&'a DirectiveDecl>,
    pub code_declared: Option<&'a DirectiveDecl>,
    pub attribute_declared: Option<&'a DirectiveDecl>,
}

/// Locates directive sources. Cheap to clone; clones share the registry.
#[derive(Clone, Debug)]
pub struct AttributeResolver {
    registry: Arc<DirectiveRegistry>,
}

impl AttributeResolver {
    #[must_use]
    pub const fn new(registry: Arc<DirectiveRegistry>) -> Self {
        Self { registry }
    }

    /// The code-declared directive registered for `property` on `content_type`.
    #[must_use]
    pub fn resolve_code_declared(
        &self,
        content_type: &ContentTypeId,
        property: &PropertyName,
    ) -> Option<&DirectiveDecl> {
        self.registry.get(content_type, property)
    }

    /// The directive declared by the property's injected allowed-types attribute.
    #[must_use]
    pub fn resolve_attribute_declared(property: &PropertyDescriptor) -> Option<&DirectiveDecl> {
        property.attributes.iter().find_map(|a| match a {
            PropertyAttribute::InjectedAllowedTypes(d) => Some(d),
            _ => None,
        })
    }

    /// The directive declared by the property's legacy allowed-types attribute.
    #[must_use]
    pub fn resolve_legacy(property: &PropertyDescriptor) -> Option<&DirectiveDecl> {
        property.attributes.iter().find_map(|a| match a {
            PropertyAttribute::AllowedTypes(d) => Some(d),
            _ => None,
        })
    }

    /// All three candidates for `property` scanned as part of `parent`.
    #[must_use]
    pub fn resolve<'a>(
        &'a self,
        property: &'a PropertyDescriptor,
        parent: &ContentTypeModel,
    ) -> Candidates<'a> {
        let candidates = Candidates {
            legacy: Self::resolve_legacy(property),
            code_declared: self.resolve_code_declared(&parent.model_type, &property.name),
            attribute_declared: Self::resolve_attribute_declared(property),
        };
        tracing::debug!(
            legacy = candidates.legacy.is_some(),
            code_declared = candidates.code_declared.is_some(),
            attribute_declared = candidates.attribute_declared.is_some(),
            "resolved directive candidates"
        );
        candidates
    }
}
