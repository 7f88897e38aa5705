//! Content-model manifest: content types and their properties, as TOML.
//!
//! The host normally supplies property descriptors from its own type scan. The
//! manifest lets the same scan run from a file, for the CLI and for tests.
//!
//! ```toml
//! [[content_types]]
//! name = "ArticlePage"
//!
//! [[content_types.properties]]
//! name = "MainContentArea"
//! kind = "content-area"
//! attributes = [{ kind = "injected-allowed-types", allowed = ["TeaserBlock"] }]
//!
//! [[content_types.properties]]
//! name = "Heading"
//! kind = "text"
//! declared_on = "BasePage"
//! ```

use std::path::Path;

use serde::Deserialize;

use injected_types_core::model::{ContentTypeId, PropertyName};

use crate::attribute::PropertyAttribute;
use crate::config::{ConfigError, parse_toml, read_file};
use crate::property::{ContentTypeModel, PropertyDescriptor, ValueKind};

/// A set of content types to scan.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentModelManifest {
    #[serde(default)]
    pub content_types: Vec<ManifestContentType>,
}

/// One content type in the manifest.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestContentType {
    pub name: ContentTypeId,
    #[serde(default)]
    pub properties: Vec<ManifestProperty>,
}

/// One property in the manifest.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestProperty {
    pub name: PropertyName,
    pub kind: ValueKind,
    /// The declaring type, when inherited from a base. Defaults to the
    /// enclosing content type.
    #[serde(default)]
    pub declared_on: Option<ContentTypeId>,
    #[serde(default = "default_true")]
    pub auto_generated: bool,
    #[serde(default = "default_true")]
    pub overridable: bool,
    #[serde(default)]
    pub attributes: Vec<PropertyAttribute>,
}

const fn default_true() -> bool {
    true
}

impl ContentModelManifest {
    /// Load a manifest from a TOML file. Unlike configuration, a missing
    /// manifest is an error.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file is missing, unreadable, or invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let Some(contents) = read_file(path)? else {
            return Err(ConfigError {
                path: Some(path.to_owned()),
                message: "manifest not found".to_owned(),
            });
        };
        Self::parse(&contents).map_err(|mut e| {
            e.path = Some(path.to_owned());
            e
        })
    }

    /// Parse a manifest from a TOML string.
    ///
    /// # Errors
    /// Returns `ConfigError` on invalid TOML, unknown fields, invalid names, or
    /// a property declaring the same directive attribute twice.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        let manifest: Self = parse_toml(toml_str)?;
        manifest.check_directive_attributes()?;
        Ok(manifest)
    }

    /// At most one `allowed-types` and one `injected-allowed-types` attribute
    /// per property. The resolver reads only the first of each kind.
    fn check_directive_attributes(&self) -> Result<(), ConfigError> {
        for content_type in &self.content_types {
            for property in &content_type.properties {
                let mut legacy = 0;
                let mut injected = 0;
                for attribute in &property.attributes {
                    let count = match attribute {
                        PropertyAttribute::AllowedTypes(_) => &mut legacy,
                        PropertyAttribute::InjectedAllowedTypes(_) => &mut injected,
                        _ => continue,
                    };
                    *count += 1;
                    if *count > 1 {
                        return Err(ConfigError {
                            path: None,
                            message: format!(
                                "the property '{}' on the content type '{}' declares more than one {} attribute",
                                property.name,
                                content_type.name,
                                attribute.name()
                            ),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Convert into scan inputs, in manifest order.
    #[must_use]
    pub fn into_models(self) -> Vec<ContentTypeModel> {
        self.content_types
            .into_iter()
            .map(ManifestContentType::into_model)
            .collect()
    }
}

impl ManifestContentType {
    /// Convert into a scan input.
    #[must_use]
    pub fn into_model(self) -> ContentTypeModel {
        let model_type = self.name;
        let properties = self
            .properties
            .into_iter()
            .map(|p| PropertyDescriptor {
                declaring_type: p.declared_on.unwrap_or_else(|| model_type.clone()),
                name: p.name,
                kind: p.kind,
                auto_generated: p.auto_generated,
                overridable: p.overridable,
                attributes: p.attributes,
            })
            .collect();
        ContentTypeModel {
            model_type,
            properties,
        }
    }
}
