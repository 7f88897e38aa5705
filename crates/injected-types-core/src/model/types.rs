//! Identifier types shared by directive sources, the merger, and the scanner.
//!
//! Content types and properties are named, not numbered: the host hands us the
//! names it scanned, and the registry is keyed by those names. Both identifiers
//! validate their shape on construction so a blank or garbled name can never
//! reach a merged directive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ContentTypeId
// ---------------------------------------------------------------------------

/// A validated content type identifier (e.g. `ArticlePage`, `Blocks.TeaserBlock`).
///
/// Allowed characters are ASCII alphanumerics plus `` _ . : + - ` ``, which
/// covers namespaced and nested type names and backtick generic arity
/// (``Foo`1``). Angle brackets, commas and whitespace are rejected. Ordering is lexicographic so sets of
/// type ids iterate deterministically.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentTypeId(String);

impl ContentTypeId {
    /// The maximum length of a content type identifier.
    pub const MAX_LEN: usize = 128;

    /// Create a new `ContentTypeId`, validating format.
    ///
    /// # Errors
    /// Returns an error if the name is blank, too long, or contains characters
    /// outside the allowed set.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        Self::validate(s)?;
        Ok(Self(s.to_owned()))
    }

    /// Return the identifier as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), ValidationError> {
        let err = |reason: String| ValidationError {
            kind: ErrorKind::ContentTypeId,
            value: s.to_owned(),
            reason,
        };
        if s.trim().is_empty() {
            return Err(err("content type id must not be blank".to_owned()));
        }
        if s.len() > Self::MAX_LEN {
            return Err(err(format!(
                "content type id must be at most {} characters, got {}",
                Self::MAX_LEN,
                s.len()
            )));
        }
        if let Some(bad) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '+' | '-' | '`')))
        {
            return Err(err(format!("invalid character {bad:?}")));
        }
        Ok(())
    }
}

impl fmt::Display for ContentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentTypeId {
    type Err = ValidationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ContentTypeId {
    type Error = ValidationError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::validate(&s)?;
        Ok(Self(s))
    }
}

impl From<ContentTypeId> for String {
    fn from(id: ContentTypeId) -> Self {
        id.0
    }
}

// ---------------------------------------------------------------------------
// PropertyName
// ---------------------------------------------------------------------------

/// A validated property name: `[A-Za-z_][A-Za-z0-9_]*`, at most 128 chars.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyName(String);

impl PropertyName {
    /// The maximum length of a property name.
    pub const MAX_LEN: usize = 128;

    /// Create a new `PropertyName`, validating format.
    ///
    /// # Errors
    /// Returns an error if the name is empty, too long, or not an identifier.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        Self::validate(s)?;
        Ok(Self(s.to_owned()))
    }

    /// Return the property name as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), ValidationError> {
        let err = |reason: String| ValidationError {
            kind: ErrorKind::PropertyName,
            value: s.to_owned(),
            reason,
        };
        let Some(first) = s.chars().next() else {
            return Err(err("property name must not be empty".to_owned()));
        };
        if s.len() > Self::MAX_LEN {
            return Err(err(format!(
                "property name must be at most {} characters, got {}",
                Self::MAX_LEN,
                s.len()
            )));
        }
        if !(first.is_ascii_alphabetic() || first == '_') {
            return Err(err("must start with a letter or underscore".to_owned()));
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(err(
                "must contain only ASCII letters, digits, and underscores".to_owned(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PropertyName {
    type Err = ValidationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PropertyName {
    type Error = ValidationError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::validate(&s)?;
        Ok(Self(s))
    }
}

impl From<PropertyName> for String {
    fn from(name: PropertyName) -> Self {
        name.0
    }
}

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// What kind of identifier failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    ContentTypeId,
    PropertyName,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContentTypeId => write!(f, "content type id"),
            Self::PropertyName => write!(f, "property name"),
        }
    }
}

/// An identifier failed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    /// What kind of value was being validated.
    pub kind: ErrorKind,
    /// The invalid value.
    pub value: String,
    /// Human-readable explanation.
    pub reason: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {:?}: {}", self.kind, self.value, self.reason)
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
