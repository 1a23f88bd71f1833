use std::collections::BTreeMap;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::node::Kind;

/// User overlay location, relative to `$HOME`.
const USER_OVERLAY: &str = "~/.config/shellgen/format.toml";

fn default_indent() -> String {
    "  ".to_string()
}

// ── Formatting policy ──

/// Blank lines inserted around a construct's emitted block.
///
/// Counts are signed so a negative value survives deserialization and is
/// reported by [`FormatConfig::validate`] with the offending kind.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Padding {
    #[serde(default, alias = "newlines_before")]
    pub newlines_before: i64,
    #[serde(default, alias = "newlines_after")]
    pub newlines_after: i64,
}

impl Padding {
    pub fn new(newlines_before: i64, newlines_after: i64) -> Self {
        Self {
            newlines_before,
            newlines_after,
        }
    }
}

/// Formatting policy consumed by [`dump`](crate::render::dump).
///
/// Serialized form (JSON or TOML) keys padding by construct kind at the top
/// level, e.g. `{ "indent": "    ", "while": { "newlinesAfter": 1 } }`.
/// Kinds without an entry get no padding.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FormatConfig {
    #[serde(default = "default_indent")]
    pub indent: String,
    #[serde(flatten)]
    pub padding: BTreeMap<Kind, Padding>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            padding: BTreeMap::new(),
        }
    }
}

// ── Overlay (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct FormatOverlay {
    indent: Option<String>,
    #[serde(flatten)]
    padding: BTreeMap<Kind, Padding>,
}

impl FormatConfig {
    /// Parse a TOML policy.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::configuration(format!("invalid TOML: {e}")))
    }

    /// Parse a JSON policy.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::configuration(format!("invalid JSON: {e}")))
    }

    /// Read a policy file. `~` is expanded; a `.json` extension selects JSON,
    /// anything else is read as TOML.
    pub fn from_file(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let path = Path::new(&*expanded);
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::configuration(format!("cannot read {}: {e}", path.display())))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text),
            _ => Self::from_toml(&text),
        }
    }

    /// Load configuration with resolution order:
    /// 1. Start with defaults (two-space indent, no padding)
    /// 2. Merge user overlay from ~/.config/shellgen/format.toml (if exists)
    ///
    /// Overlay entries replace the default for their kind; `indent`
    /// overrides when present.
    pub fn load() -> Self {
        let mut config = Self::default();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    fn load_overlay() -> Option<FormatOverlay> {
        let expanded = shellexpand::tilde(USER_OVERLAY);
        let content = std::fs::read_to_string(&*expanded).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                warn!("ignoring {USER_OVERLAY}: {e}");
                None
            }
        }
    }

    fn apply_overlay(&mut self, overlay: FormatOverlay) {
        if let Some(indent) = overlay.indent {
            self.indent = indent;
        }
        self.padding.extend(overlay.padding);
    }

    /// Builder-style padding for one kind.
    pub fn with_padding(mut self, kind: Kind, newlines_before: i64, newlines_after: i64) -> Self {
        self.padding
            .insert(kind, Padding::new(newlines_before, newlines_after));
        self
    }

    /// Builder-style indentation unit.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Padding for `kind`, zero when unspecified.
    pub fn padding(&self, kind: Kind) -> Padding {
        self.padding.get(&kind).copied().unwrap_or_default()
    }

    /// Reject values the renderer cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.indent.is_empty() || !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(Error::configuration(format!(
                "indent must be non-empty spaces or tabs, got {:?}",
                self.indent
            )));
        }
        for (kind, p) in &self.padding {
            if p.newlines_before < 0 {
                return Err(Error::configuration(format!(
                    "{kind}.newlinesBefore must be non-negative, got {}",
                    p.newlines_before
                )));
            }
            if p.newlines_after < 0 {
                return Err(Error::configuration(format!(
                    "{kind}.newlinesAfter must be non-negative, got {}",
                    p.newlines_after
                )));
            }
        }
        Ok(())
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: FormatOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_padding() {
        let config = FormatConfig::default();
        assert_eq!(config.indent, "  ");
        for kind in Kind::ALL {
            assert_eq!(config.padding(kind), Padding::default());
        }
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_uses_kind_keys() {
        let config =
            FormatConfig::from_json(r#"{ "while": { "newlinesAfter": 1 }, "function": { "newlinesBefore": 2 } }"#)
                .unwrap();
        assert_eq!(config.padding(Kind::While), Padding::new(0, 1));
        assert_eq!(config.padding(Kind::Function), Padding::new(2, 0));
        assert_eq!(config.padding(Kind::If), Padding::default());
        assert_eq!(config.indent, "  ");
    }

    #[test]
    fn toml_accepts_snake_case_aliases() {
        let config = FormatConfig::from_toml(
            r#"
            indent = "    "

            [caseOption]
            newlines_after = 1

            [if]
            newlinesBefore = 1
        "#,
        )
        .unwrap();
        assert_eq!(config.indent, "    ");
        assert_eq!(config.padding(Kind::CaseOption), Padding::new(0, 1));
        assert_eq!(config.padding(Kind::If), Padding::new(1, 0));
    }

    #[test]
    fn unknown_kind_is_configuration_error() {
        let err = FormatConfig::from_json(r#"{ "loop": { "newlinesAfter": 1 } }"#).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn non_numeric_count_is_configuration_error() {
        let err = FormatConfig::from_json(r#"{ "while": { "newlinesAfter": "one" } }"#).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn negative_count_fails_validation() {
        let config = FormatConfig::from_json(r#"{ "while": { "newlinesAfter": -1 } }"#).unwrap();
        let err = config.validate().unwrap_err();
        match err {
            Error::Configuration { reason } => assert!(reason.contains("while.newlinesAfter")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bad_indent_fails_validation() {
        assert!(FormatConfig::default().with_indent("").validate().is_err());
        assert!(FormatConfig::default().with_indent("--").validate().is_err());
        assert!(FormatConfig::default().with_indent("\t").validate().is_ok());
    }

    #[test]
    fn builder_sets_padding() {
        let config = FormatConfig::default().with_padding(Kind::For, 1, 2);
        assert_eq!(config.padding(Kind::For), Padding::new(1, 2));
    }

    #[test]
    fn overlay_replaces_per_kind() {
        let mut config = FormatConfig::default()
            .with_padding(Kind::While, 1, 1)
            .with_padding(Kind::Function, 0, 1);
        config.apply_overlay_str(
            r#"
            [while]
            newlinesAfter = 3
        "#,
        );
        assert_eq!(config.padding(Kind::While), Padding::new(0, 3));
        // Untouched kinds keep their values
        assert_eq!(config.padding(Kind::Function), Padding::new(0, 1));
        assert_eq!(config.indent, "  ");
    }

    #[test]
    fn overlay_overrides_indent() {
        let mut config = FormatConfig::default();
        config.apply_overlay_str(r#"indent = "\t""#);
        assert_eq!(config.indent, "\t");
    }

    #[test]
    fn empty_overlay_changes_nothing() {
        let original = FormatConfig::default().with_padding(Kind::Case, 1, 0);
        let mut config = original.clone();
        config.apply_overlay_str("");
        assert_eq!(config, original);
    }

    #[test]
    fn from_file_reads_json_and_toml() {
        let dir = std::env::temp_dir().join(format!("shellgen-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let json = dir.join("format.json");
        let toml_path = dir.join("format.toml");
        std::fs::write(&json, r#"{ "until": { "newlinesBefore": 1 } }"#).unwrap();
        std::fs::write(&toml_path, "[select]\nnewlinesAfter = 2\n").unwrap();

        let from_json = FormatConfig::from_file(json.to_str().unwrap()).unwrap();
        assert_eq!(from_json.padding(Kind::Until), Padding::new(1, 0));
        let from_toml = FormatConfig::from_file(toml_path.to_str().unwrap()).unwrap();
        assert_eq!(from_toml.padding(Kind::Select), Padding::new(0, 2));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn from_file_missing_is_configuration_error() {
        let err = FormatConfig::from_file("/nonexistent/shellgen/format.toml").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }
}
