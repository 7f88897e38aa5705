//! Per-property assignment: fold a scanned property into its definition.
//!
//! For each property the assigner:
//!
//! 1. Rejects auto-generated properties that are not declared overridable,
//!    before any directive is looked at.
//! 2. Resolves the legacy, code-declared, and attribute-declared directives and
//!    merges them into the effective directive.
//! 3. Reports restriction conflicts (fatal if configured, otherwise a warning).
//! 4. Replaces the directive attributes with the single effective one and
//!    dispatches every attribute to its rule.
//!
//! Every error aborts the property; [`PropertyAssigner::scan_content_type`]
//! stops at the first one and leaves skip-or-abort to the caller.

use std::sync::Arc;

use serde::Serialize;

use injected_types_core::merge::{MergeOrigin, MergeOutcome, TypeConflict, merge_with_legacy};
use injected_types_core::model::{AllowedTypesDirective, PropertyName};

use crate::attribute::PropertyAttribute;
use crate::config::ScanSettings;
use crate::error::ScanError;
use crate::property::{ContentTypeModel, PropertyDefinitionModel, PropertyDescriptor};
use crate::resolve::AttributeResolver;
use crate::rules::ScanningRules;

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// What happened to one property's allowed-types directive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssignReport {
    pub property: PropertyName,
    /// Which inputs produced the effective directive; `None` if there is none.
    pub origin: Option<MergeOrigin>,
    /// Overlaps resolved in favour of restriction.
    pub conflicts: Vec<TypeConflict>,
}

/// A scanned property: its definition and its report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScannedProperty {
    pub definition: PropertyDefinitionModel,
    pub report: AssignReport,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builds a [`PropertyAssigner`]. Both the resolver and the scanning rules are
/// required.
#[derive(Default)]
pub struct AssignerBuilder {
    resolver: Option<AttributeResolver>,
    rules: Option<Arc<dyn ScanningRules>>,
    settings: ScanSettings,
}

impl AssignerBuilder {
    #[must_use]
    pub fn resolver(mut self, resolver: AttributeResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn rules(mut self, rules: impl ScanningRules + 'static) -> Self {
        self.rules = Some(Arc::new(rules));
        self
    }

    #[must_use]
    pub fn shared_rules(mut self, rules: Arc<dyn ScanningRules>) -> Self {
        self.rules = Some(rules);
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: ScanSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Finish building.
    ///
    /// # Errors
    /// [`ScanError::MissingLegacyCapability`] if the resolver or the scanning
    /// rules were not provided.
    pub fn build(self) -> Result<PropertyAssigner, ScanError> {
        let Some(resolver) = self.resolver else {
            return Err(ScanError::MissingLegacyCapability {
                capability: "attribute resolver",
            });
        };
        let Some(rules) = self.rules else {
            return Err(ScanError::MissingLegacyCapability {
                capability: "scanning rules",
            });
        };
        Ok(PropertyAssigner {
            resolver,
            rules,
            settings: self.settings,
        })
    }
}

// ---------------------------------------------------------------------------
// PropertyAssigner
// ---------------------------------------------------------------------------

/// Assigns scanned properties to property definitions.
///
/// Holds only shared, read-only state; one assigner may scan several content
/// types from several threads at once.
pub struct PropertyAssigner {
    resolver: AttributeResolver,
    rules: Arc<dyn ScanningRules>,
    settings: ScanSettings,
}

impl PropertyAssigner {
    #[must_use]
    pub fn builder() -> AssignerBuilder {
        AssignerBuilder::default()
    }

    /// Scan every property of `model`, in order.
    ///
    /// # Errors
    /// The first [`ScanError`] from any property.
    pub fn scan_content_type(&self, model: &ContentTypeModel) -> Result<Vec<ScannedProperty>, ScanError> {
        let mut scanned = Vec::with_capacity(model.properties.len());
        for property in &model.properties {
            let mut definition = PropertyDefinitionModel::new(property.name.clone());
            let report = self.assign(&mut definition, property, model)?;
            scanned.push(ScannedProperty { definition, report });
        }
        tracing::info!(
            content_type = %model.model_type,
            properties = scanned.len(),
            "content type scanned"
        );
        Ok(scanned)
    }

    /// Resolve and merge the effective directive for `property`, after the
    /// declaration-shape check.
    ///
    /// # Errors
    /// [`ScanError::StructuralViolation`] or [`ScanError::InvalidDirective`].
    pub fn effective_directive(
        &self,
        property: &PropertyDescriptor,
        parent: &ContentTypeModel,
    ) -> Result<Option<MergeOutcome>, ScanError> {
        check_declaration_shape(property)?;
        let candidates = self.resolver.resolve(property, parent);
        merge_with_legacy(
            candidates.legacy,
            candidates.code_declared,
            candidates.attribute_declared,
        )
        .map_err(|source| ScanError::InvalidDirective {
            property: property.name.clone(),
            content_type: parent.model_type.clone(),
            source,
        })
    }

    /// Fold `property` into `definition`.
    ///
    /// # Errors
    /// Any [`ScanError`]; the definition may be partially written.
    #[tracing::instrument(skip_all, fields(content_type = %parent.model_type, property = %property.name))]
    pub fn assign(
        &self,
        definition: &mut PropertyDefinitionModel,
        property: &PropertyDescriptor,
        parent: &ContentTypeModel,
    ) -> Result<AssignReport, ScanError> {
        let outcome = self.effective_directive(property, parent)?;
        let (origin, conflicts, effective) = match outcome {
            Some(o) => (Some(o.origin), o.conflicts, Some(o.directive)),
            None => (None, Vec::new(), None),
        };

        if !conflicts.is_empty() {
            if self.settings.fail_on_conflict {
                return Err(ScanError::DirectiveConflict {
                    property: property.name.clone(),
                    content_type: parent.model_type.clone(),
                    conflicts,
                });
            }
            for conflict in &conflicts {
                tracing::warn!(
                    type_id = %conflict.type_id,
                    "allowed-types conflict: {conflict}"
                );
            }
        }

        for attribute in effective_attributes(property, origin, effective.as_ref()) {
            self.apply(definition, property, &attribute, effective.as_ref())?;
            definition.attributes.push(attribute);
        }

        Ok(AssignReport {
            property: property.name.clone(),
            origin,
            conflicts,
        })
    }

    fn apply(
        &self,
        definition: &mut PropertyDefinitionModel,
        property: &PropertyDescriptor,
        attribute: &PropertyAttribute,
        effective: Option<&AllowedTypesDirective>,
    ) -> Result<(), ScanError> {
        match attribute {
            PropertyAttribute::BackingType(backing) => {
                if !backing.derives_property_data {
                    return Err(ScanError::TypeMismatch {
                        property: property.name.clone(),
                        content_type: property.declaring_type.clone(),
                        detail: format!(
                            "The backing type '{}' attributed to the property '{}' on '{}' does not inherit PropertyData.",
                            backing.type_name, property.name, property.declaring_type
                        ),
                    });
                }
                if property.auto_generated && property.overridable {
                    self.rules.validate_type_compatibility(property, backing)?;
                }
                definition.backing_type = Some(backing.type_name.clone());
            }
            PropertyAttribute::AllowedTypes(_) => {
                // The only AllowedTypes left in the list carries `effective`.
                if let Some(directive) = effective {
                    self.rules.validate_allowed_types(directive, property)?;
                    definition.allowed_types = Some(directive.clone());
                }
            }
            // Folded into the effective AllowedTypes above.
            PropertyAttribute::InjectedAllowedTypes(_) => {}
            PropertyAttribute::Display(display) => {
                definition.display_name.clone_from(&display.name);
                definition.description.clone_from(&display.description);
                definition.order = display.order;
                definition.tab_name.clone_from(&display.group_name);
            }
            PropertyAttribute::Scaffold { scaffold } => {
                definition.available_in_edit_mode = *scaffold;
            }
            PropertyAttribute::CultureSpecific { culture_specific } => {
                self.rules
                    .validate_block_property_constraints(attribute, property)?;
                definition.culture_specific = *culture_specific;
            }
            PropertyAttribute::Required => {
                self.rules
                    .validate_block_property_constraints(attribute, property)?;
                definition.required = true;
            }
            PropertyAttribute::Searchable { searchable } => {
                self.rules
                    .validate_block_property_constraints(attribute, property)?;
                definition.searchable = *searchable;
            }
            PropertyAttribute::UiHint {
                hint,
                presentation_layer,
            } => {
                if hint.is_empty() {
                    return Ok(());
                }
                match presentation_layer.as_deref() {
                    Some(layer) if layer == self.settings.presentation_layer => {
                        definition.template_hint = Some(hint.clone());
                    }
                    None | Some("") if definition.template_hint.is_none() => {
                        definition.template_hint = Some(hint.clone());
                    }
                    _ => {}
                }
            }
            PropertyAttribute::Other { .. } => {}
        }
        Ok(())
    }
}

/// Reject auto-generated properties that the framework cannot override.
///
/// # Errors
/// [`ScanError::StructuralViolation`].
pub fn check_declaration_shape(property: &PropertyDescriptor) -> Result<(), ScanError> {
    if property.auto_generated && !property.overridable {
        return Err(ScanError::StructuralViolation {
            property: property.name.clone(),
            content_type: property.declaring_type.clone(),
            detail: "is autogenerated but not declared overridable".to_owned(),
        });
    }
    Ok(())
}

/// The attribute list to dispatch: injected directives removed, and a single
/// `AllowedTypes` carrying the effective directive.
///
/// A legacy directive stays where it was declared, untouched. Otherwise the
/// merged directive is appended at the end.
fn effective_attributes(
    property: &PropertyDescriptor,
    origin: Option<MergeOrigin>,
    effective: Option<&AllowedTypesDirective>,
) -> Vec<PropertyAttribute> {
    let mut attributes: Vec<PropertyAttribute> = property
        .attributes
        .iter()
        .filter(|a| !matches!(a, PropertyAttribute::InjectedAllowedTypes(_)))
        .cloned()
        .collect();
    if origin == Some(MergeOrigin::Legacy) {
        return attributes;
    }
    if let Some(directive) = effective {
        attributes.push(PropertyAttribute::AllowedTypes(directive.to_decl()));
    }
    attributes
}
