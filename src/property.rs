//! Property descriptors going into a scan, and property definitions coming out.
//!
//! [`PropertyDescriptor`] is what the host's attribute scanner hands us for each
//! property. [`PropertyDefinitionModel`] is the runtime metadata the scan
//! produces; the allowed-types slot is the only part the merge core owns.

use std::fmt;

use serde::{Deserialize, Serialize};

use injected_types_core::model::{AllowedTypesDirective, ContentTypeId, PropertyName};

use crate::attribute::PropertyAttribute;

// ---------------------------------------------------------------------------
// ValueKind
// ---------------------------------------------------------------------------

/// The value shape of a property, as far as scanning rules care.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    /// A list of content items placed inline.
    ContentArea,
    /// A reference to one content item.
    ContentReference,
    /// A list of references to content items.
    ContentReferenceList,
    /// A local block embedded in the owning content.
    Block,
    Text,
    Number,
    Boolean,
    Date,
    Link,
}

impl ValueKind {
    /// Returns `true` if the property holds or references other content, which
    /// is where an allowed-types directive can be enforced.
    #[must_use]
    pub const fn references_content(self) -> bool {
        matches!(
            self,
            Self::ContentArea | Self::ContentReference | Self::ContentReferenceList
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContentArea => write!(f, "content-area"),
            Self::ContentReference => write!(f, "content-reference"),
            Self::ContentReferenceList => write!(f, "content-reference-list"),
            Self::Block => write!(f, "block"),
            Self::Text => write!(f, "text"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Date => write!(f, "date"),
            Self::Link => write!(f, "link"),
        }
    }
}

// ---------------------------------------------------------------------------
// PropertyDescriptor
// ---------------------------------------------------------------------------

/// One scanned property: where it is declared, what it holds, how it is
/// declared, and the attributes on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// The type that declares the property (may be a base of the scanned model).
    pub declaring_type: ContentTypeId,
    /// The property name.
    pub name: PropertyName,
    /// The property's value shape.
    pub kind: ValueKind,
    /// Whether the framework generates the property's implementation.
    pub auto_generated: bool,
    /// Whether the declaration is open for the framework to override.
    pub overridable: bool,
    /// Attributes declared on the property, in declaration order.
    pub attributes: Vec<PropertyAttribute>,
}

impl PropertyDescriptor {
    /// A plain auto-generated, overridable property with no attributes.
    #[must_use]
    pub const fn new(declaring_type: ContentTypeId, name: PropertyName, kind: ValueKind) -> Self {
        Self {
            declaring_type,
            name,
            kind,
            auto_generated: true,
            overridable: true,
            attributes: Vec::new(),
        }
    }

    /// Append an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: PropertyAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

// ---------------------------------------------------------------------------
// ContentTypeModel
// ---------------------------------------------------------------------------

/// The content type being scanned, with its properties in scan order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentTypeModel {
    /// The scanned model type. Code-declared directives are keyed by this, not
    /// by each property's declaring type.
    pub model_type: ContentTypeId,
    pub properties: Vec<PropertyDescriptor>,
}

// ---------------------------------------------------------------------------
// PropertyDefinitionModel
// ---------------------------------------------------------------------------

/// Runtime property metadata assembled by the scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PropertyDefinitionModel {
    pub name: PropertyName,
    pub backing_type: Option<String>,
    /// The effective allowed-types directive, if any source declared one.
    pub allowed_types: Option<AllowedTypesDirective>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub order: Option<i32>,
    pub tab_name: Option<String>,
    pub available_in_edit_mode: bool,
    pub culture_specific: bool,
    pub required: bool,
    pub searchable: bool,
    pub template_hint: Option<String>,
    /// Every attribute applied, effective allowed-types included.
    pub attributes: Vec<PropertyAttribute>,
}

impl PropertyDefinitionModel {
    /// An empty definition for `name`, visible in edit mode.
    #[must_use]
    pub const fn new(name: PropertyName) -> Self {
        Self {
            name,
            backing_type: None,
            allowed_types: None,
            display_name: None,
            description: None,
            order: None,
            tab_name: None,
            available_in_edit_mode: true,
            culture_specific: false,
            required: false,
            searchable: false,
            template_hint: None,
            attributes: Vec::new(),
        }
    }
}
