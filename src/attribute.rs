//! Property attributes: a closed set of declarations the scan understands.
//!
//! The scan dispatches on [`PropertyAttribute`] with an exhaustive `match`;
//! anything the scan has no rule for arrives as [`PropertyAttribute::Other`]
//! and is only recorded on the definition.
//!
//! # Serialization
//!
//! Tagged by `kind`, kebab-case:
//!
//! ```toml
//! attributes = [
//!   { kind = "display", name = "Main content", order = 10, group_name = "Content" },
//!   { kind = "injected-allowed-types", allowed = ["TeaserBlock"] },
//!   { kind = "backing-type", type = "PropertyContentArea", value_kind = "content-area" },
//!   { kind = "required" },
//! ]
//! ```

use serde::{Deserialize, Serialize};

use injected_types_core::model::DirectiveDecl;

use crate::property::ValueKind;

/// One attribute declared on a property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PropertyAttribute {
    /// Overrides the property-data type used to store the value.
    BackingType(BackingType),
    /// The legacy single-source allowed-types directive. Once present it is
    /// the only directive the enforcement pipeline consults.
    AllowedTypes(DirectiveDecl),
    /// The injected allowed-types directive, merged with any code-declared one.
    InjectedAllowedTypes(DirectiveDecl),
    /// Editorial display metadata.
    Display(DisplayAttribute),
    /// Whether the property is shown in edit mode.
    Scaffold {
        #[serde(default = "default_true")]
        scaffold: bool,
    },
    CultureSpecific {
        #[serde(default = "default_true")]
        culture_specific: bool,
    },
    Required,
    Searchable {
        #[serde(default = "default_true")]
        searchable: bool,
    },
    /// Rendering template hint, optionally scoped to a presentation layer.
    UiHint {
        hint: String,
        #[serde(default)]
        presentation_layer: Option<String>,
    },
    /// Any attribute without a scan rule.
    Other { name: String },
}

impl PropertyAttribute {
    /// A short name for diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::BackingType(_) => "BackingType",
            Self::AllowedTypes(_) => "AllowedTypes",
            Self::InjectedAllowedTypes(_) => "InjectedAllowedTypes",
            Self::Display(_) => "Display",
            Self::Scaffold { .. } => "ScaffoldColumn",
            Self::CultureSpecific { .. } => "CultureSpecific",
            Self::Required => "Required",
            Self::Searchable { .. } => "Searchable",
            Self::UiHint { .. } => "UIHint",
            Self::Other { name } => name.as_str(),
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Backing type declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackingType {
    /// Fully qualified backing type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Whether the backing type derives from the host's property-data base.
    #[serde(default = "default_true")]
    pub derives_property_data: bool,
    /// The value shape the backing type stores.
    pub value_kind: ValueKind,
}

/// Display metadata. Every field is optional; absent fields clear the
/// corresponding definition field, matching a fresh display declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayAttribute {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
    /// The editing tab the property is grouped under.
    #[serde(default)]
    pub group_name: Option<String>,
}
