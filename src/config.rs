//! Scan configuration (`injected-types.toml`).
//!
//! Holds the scan settings and the code-declared directives that populate the
//! registry at startup.
//!
//! ```toml
//! [scan]
//! fail_on_conflict = false
//! presentation_layer = "website"
//!
//! [[directives]]
//! content_type = "ArticlePage"
//! property = "MainContentArea"
//! allowed = ["TeaserBlock"]
//! allowed_specifications = [{ type = "IBlockData", include_derived = true }]
//! ```

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use injected_types_core::model::{ContentTypeId, DirectiveDecl, PropertyName, SpecificationDecl};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level scan configuration.
///
/// Missing fields use defaults. Missing file → all defaults (no error).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// Scan behaviour settings.
    #[serde(default)]
    pub scan: ScanSettings,

    /// Code-declared directives, registered before any scan runs.
    #[serde(default)]
    pub directives: Vec<DirectiveEntry>,
}

// ---------------------------------------------------------------------------
// ScanSettings
// ---------------------------------------------------------------------------

/// Scan behaviour settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanSettings {
    /// Treat an allowed/restricted overlap as a fatal scan error instead of a
    /// warning. Restriction wins either way.
    #[serde(default)]
    pub fail_on_conflict: bool,

    /// The presentation layer whose UI hints always apply (default: `"website"`).
    #[serde(default = "default_presentation_layer")]
    pub presentation_layer: String,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            fail_on_conflict: false,
            presentation_layer: default_presentation_layer(),
        }
    }
}

fn default_presentation_layer() -> String {
    "website".to_owned()
}

// ---------------------------------------------------------------------------
// DirectiveEntry
// ---------------------------------------------------------------------------

/// One code-declared directive, keyed by content type and property.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectiveEntry {
    pub content_type: ContentTypeId,
    pub property: PropertyName,
    #[serde(default)]
    pub allowed: Vec<String>,
    #[serde(default)]
    pub allowed_specifications: Vec<SpecificationDecl>,
    #[serde(default)]
    pub restricted: Vec<String>,
    #[serde(default)]
    pub restricted_specifications: Vec<SpecificationDecl>,
}

impl DirectiveEntry {
    /// The directive part of the entry, as declared.
    #[must_use]
    pub fn to_decl(&self) -> DirectiveDecl {
        DirectiveDecl {
            allowed: self.allowed.clone(),
            allowed_specifications: self.allowed_specifications.clone(),
            restricted: self.restricted.clone(),
            restricted_specifications: self.restricted_specifications.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Error loading a configuration or manifest file.
#[derive(Debug)]
pub struct ConfigError {
    /// The path that was being loaded (if available).
    pub path: Option<std::path::PathBuf>,
    /// Human-readable message with line-level detail when possible.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(p) = &self.path {
            write!(f, "{}: {}", p.display(), self.message)
        } else {
            write!(f, "config error: {}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

impl ScanConfig {
    /// Load configuration from a TOML file.
    ///
    /// - If the file does not exist, returns all defaults (not an error).
    /// - If the file exists but contains invalid TOML, unknown fields, or
    ///   invalid type/property names, returns a [`ConfigError`].
    ///
    /// # Errors
    /// Returns `ConfigError` on I/O errors (other than not-found) or parse errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match read_file(path)? {
            Some(contents) => Self::parse(&contents).map_err(|mut e| {
                e.path = Some(path.to_owned());
                e
            }),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `ConfigError` on invalid TOML or unknown fields.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        parse_toml(toml_str)
    }
}

/// Read `path`, mapping not-found to `None`.
pub(crate) fn read_file(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(c) => Ok(Some(c)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError {
            path: Some(path.to_owned()),
            message: format!("could not read file: {e}"),
        }),
    }
}

/// Deserialize TOML, prefixing errors with the offending line number.
pub(crate) fn parse_toml<T: DeserializeOwned>(toml_str: &str) -> Result<T, ConfigError> {
    toml::from_str(toml_str).map_err(|e| {
        let mut message = e.message().to_owned();
        if let Some(span) = e.span() {
            let line = toml_str[..span.start]
                .chars()
                .filter(|&c| c == '\n')
                .count()
                + 1;
            message = format!("line {line}: {message}");
        }
        ConfigError {
            path: None,
            message,
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_all_fields() {
        let cfg = ScanConfig::default();
        assert!(!cfg.scan.fail_on_conflict);
        assert_eq!(cfg.scan.presentation_layer, "website");
        assert!(cfg.directives.is_empty());
    }

    #[test]
    fn parse_empty_string() {
        let cfg = ScanConfig::parse("").unwrap();
        assert_eq!(cfg, ScanConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[scan]
fail_on_conflict = true
presentation_layer = "mobile"

[[directives]]
content_type = "ArticlePage"
property = "MainContentArea"
allowed = ["TeaserBlock", "ImageBlock"]
restricted = ["FormBlock"]
allowed_specifications = [{ type = "IBlockData", include_derived = true }]

[[directives]]
content_type = "StartPage"
property = "Hero"
restricted_specifications = [{ type = "IFormElement" }]
"#;
        let cfg = ScanConfig::parse(toml).unwrap();
        assert!(cfg.scan.fail_on_conflict);
        assert_eq!(cfg.scan.presentation_layer, "mobile");
        assert_eq!(cfg.directives.len(), 2);

        let first = &cfg.directives[0];
        assert_eq!(first.content_type.as_str(), "ArticlePage");
        assert_eq!(first.property.as_str(), "MainContentArea");
        let decl = first.to_decl();
        assert_eq!(decl.allowed, vec!["TeaserBlock", "ImageBlock"]);
        assert_eq!(decl.restricted, vec!["FormBlock"]);
        assert_eq!(
            decl.allowed_specifications,
            vec![SpecificationDecl::new("IBlockData", true)]
        );

        let second = cfg.directives[1].to_decl();
        assert_eq!(
            second.restricted_specifications,
            vec![SpecificationDecl::new("IFormElement", false)]
        );
    }

    #[test]
    fn parse_rejects_unknown_fields() {
        let err = ScanConfig::parse("[scan]\nstrict = true\n").unwrap_err();
        assert!(err.message.contains("strict"), "{}", err.message);
    }

    #[test]
    fn parse_rejects_invalid_content_type_name() {
        let toml = r#"
[[directives]]
content_type = "Article Page"
property = "Body"
"#;
        assert!(ScanConfig::parse(toml).is_err());
    }

    #[test]
    fn parse_includes_line_number_on_error() {
        let toml = "[scan]\nfail_on_conflict = \"yes\"\n";
        let err = ScanConfig::parse(toml).unwrap_err();
        assert!(
            err.message.contains("line 2"),
            "error should include line number: {}",
            err.message
        );
    }

    #[test]
    fn load_missing_file_returns_defaults() {
        let cfg = ScanConfig::load(Path::new("/nonexistent/injected-types.toml")).unwrap();
        assert_eq!(cfg, ScanConfig::default());
    }

    #[test]
    fn load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("injected-types.toml");
        std::fs::write(&path, "[scan]\nfail_on_conflict = true\n").unwrap();
        let cfg = ScanConfig::load(&path).unwrap();
        assert!(cfg.scan.fail_on_conflict);
    }

    #[test]
    fn load_invalid_file_shows_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not valid [[[toml").unwrap();
        let err = ScanConfig::load(&path).unwrap_err();
        assert_eq!(err.path.as_deref(), Some(path.as_path()));
        assert!(err.to_string().starts_with(&path.display().to_string()));
    }

    #[test]
    fn config_error_display_without_path() {
        let err = ConfigError {
            path: None,
            message: "bad".to_owned(),
        };
        assert_eq!(err.to_string(), "config error: bad");
    }
}
