//! The code-declared directive registry.
//!
//! Directives registered in code or configuration are keyed by
//! (content type, property name). Registration happens once, at startup,
//! through [`RegistryBuilder`]; [`RegistryBuilder::freeze`] consumes the
//! builder, so a [`DirectiveRegistry`] can never be written to after a scan
//! has started. The frozen registry has no interior mutability and is shared
//! across scanning threads behind an [`Arc`](std::sync::Arc).

use std::collections::HashMap;

use thiserror::Error;

use injected_types_core::model::{ContentTypeId, DirectiveDecl, PropertyName};

use crate::config::DirectiveEntry;

/// Registration failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A directive was already registered for this key.
    #[error(
        "an allowed-types directive is already registered for the property '{property}' on the content type '{content_type}'"
    )]
    Duplicate {
        content_type: ContentTypeId,
        property: PropertyName,
    },
}

type Entries = HashMap<ContentTypeId, HashMap<PropertyName, DirectiveDecl>>;

// ---------------------------------------------------------------------------
// RegistryBuilder
// ---------------------------------------------------------------------------

/// Collects code-declared directives before the registry is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Entries,
    len: usize,
}

impl RegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `directive` for `property` on `content_type`.
    ///
    /// # Errors
    /// [`RegistryError::Duplicate`] if the key is already registered.
    pub fn insert(
        &mut self,
        content_type: ContentTypeId,
        property: PropertyName,
        directive: DirectiveDecl,
    ) -> Result<&mut Self, RegistryError> {
        let properties = self.entries.entry(content_type.clone()).or_default();
        if properties.contains_key(&property) {
            return Err(RegistryError::Duplicate {
                content_type,
                property,
            });
        }
        tracing::debug!(
            content_type = %content_type,
            property = %property,
            "registered code-declared directive"
        );
        properties.insert(property, directive);
        self.len += 1;
        Ok(self)
    }

    /// Register every `[[directives]]` entry from configuration.
    ///
    /// # Errors
    /// [`RegistryError::Duplicate`] on the first repeated key.
    pub fn extend_from_config(&mut self, entries: &[DirectiveEntry]) -> Result<&mut Self, RegistryError> {
        for entry in entries {
            self.insert(
                entry.content_type.clone(),
                entry.property.clone(),
                entry.to_decl(),
            )?;
        }
        Ok(self)
    }

    /// Freeze the registry. No further registration is possible.
    #[must_use]
    pub fn freeze(self) -> DirectiveRegistry {
        tracing::debug!(entries = self.len, "directive registry frozen");
        DirectiveRegistry {
            entries: self.entries,
            len: self.len,
        }
    }
}

// ---------------------------------------------------------------------------
// DirectiveRegistry
// ---------------------------------------------------------------------------

/// Frozen, read-only map of code-declared directives.
#[derive(Debug, Default)]
pub struct DirectiveRegistry {
    entries: Entries,
    len: usize,
}

impl DirectiveRegistry {
    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build and freeze a registry from configuration entries.
    ///
    /// # Errors
    /// [`RegistryError::Duplicate`] on the first repeated key.
    pub fn from_config(entries: &[DirectiveEntry]) -> Result<Self, RegistryError> {
        let mut builder = RegistryBuilder::new();
        builder.extend_from_config(entries)?;
        Ok(builder.freeze())
    }

    /// Look up the directive for `property` on `content_type`.
    #[must_use]
    pub fn get(&self, content_type: &ContentTypeId, property: &PropertyName) -> Option<&DirectiveDecl> {
        self.entries.get(content_type)?.get(property)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}
