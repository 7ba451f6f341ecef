//! Conversion settings and their persistence.
//!
//! Settings are an explicit value passed into every conversion call. Loading
//! is lenient: an absent or malformed field falls back to its default and is
//! never reported as an error.

use crate::error::{Error, Result};
use crate::models::DocumentId;
use crate::utils::{is_under_folder, normalize_folder_path};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Extensions whose targets are left alone unless configured otherwise
pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "pdf"];

/// How generated markdown link paths are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// Rooted at the vault: `/Folder/File.md`
    #[default]
    Absolute,
    /// Relative to the linking document: `../Folder/File.md`
    Relative,
}

impl fmt::Display for LinkStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute => f.write_str("absolute"),
            Self::Relative => f.write_str("relative"),
        }
    }
}

impl FromStr for LinkStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absolute" => Ok(Self::Absolute),
            "relative" => Ok(Self::Relative),
            other => Err(Error::config_error(format!(
                "unknown link style '{other}' (expected absolute or relative)"
            ))),
        }
    }
}

/// Settings for a conversion pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSettings {
    /// Lower-cased extensions (no dot) whose resolved targets are never rewritten
    pub excluded_extensions: BTreeSet<String>,
    /// Report-only bulk conversion
    pub safe_mode: bool,
    /// Path style for generated markdown links
    pub link_style: LinkStyle,
    /// Normalized folder prefixes skipped by bulk conversion
    pub ignored_folders: Vec<String>,
    /// Leave links inside code blocks and inline code untouched
    pub skip_code: bool,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            excluded_extensions: DEFAULT_EXCLUDED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            safe_mode: true,
            link_style: LinkStyle::Absolute,
            ignored_folders: Vec::new(),
            skip_code: true,
        }
    }
}

impl ConversionSettings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the link style
    pub fn with_link_style(mut self, style: LinkStyle) -> Self {
        self.link_style = style;
        self
    }

    /// Set safe mode
    pub fn with_safe_mode(mut self, safe_mode: bool) -> Self {
        self.safe_mode = safe_mode;
        self
    }

    /// Replace the excluded extension set
    pub fn with_excluded_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_extensions = extensions
            .into_iter()
            .filter_map(|ext| normalize_extension(ext.as_ref()))
            .collect();
        self
    }

    /// Replace the ignored folder list
    pub fn with_ignored_folders<I, S>(mut self, folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_folders.clear();
        for folder in folders {
            self.add_ignored_folder(folder.as_ref());
        }
        self
    }

    /// Set code skipping
    pub fn with_skip_code(mut self, skip_code: bool) -> Self {
        self.skip_code = skip_code;
        self
    }

    /// Add an ignored folder. Returns false when empty after normalization or already present.
    pub fn add_ignored_folder(&mut self, folder: &str) -> bool {
        let normalized = normalize_folder_path(folder);
        if normalized.is_empty() || self.ignored_folders.contains(&normalized) {
            return false;
        }
        self.ignored_folders.push(normalized);
        true
    }

    /// Remove an ignored folder. Returns whether it was present.
    pub fn remove_ignored_folder(&mut self, folder: &str) -> bool {
        let normalized = normalize_folder_path(folder);
        let before = self.ignored_folders.len();
        self.ignored_folders.retain(|f| *f != normalized);
        before != self.ignored_folders.len()
    }

    /// Flip safe mode and return the new value
    pub fn toggle_safe_mode(&mut self) -> bool {
        self.safe_mode = !self.safe_mode;
        self.safe_mode
    }

    /// Whether a document lives under an ignored folder
    pub fn is_ignored(&self, id: &DocumentId) -> bool {
        self.ignored_folders
            .iter()
            .any(|folder| is_under_folder(id.as_str(), folder))
    }

    /// Whether an extension (with or without leading dot) is excluded from rewriting
    pub fn is_excluded_extension(&self, ext: &str) -> bool {
        let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        self.excluded_extensions.contains(&ext)
    }

    /// Whether a document's extension is excluded from rewriting
    pub fn is_excluded(&self, id: &DocumentId) -> bool {
        id.extension()
            .is_some_and(|ext| self.is_excluded_extension(ext))
    }

    /// Build settings from an untyped value, defaulting each malformed field.
    pub fn from_value(value: &Value) -> Self {
        let mut settings = Self::default();

        let Some(map) = value.as_object() else {
            if !value.is_null() {
                log::warn!("Settings are not a key/value record; using defaults");
            }
            return settings;
        };

        match map.get("excludedExtensions") {
            None => {}
            Some(Value::String(list)) => {
                settings = settings.with_excluded_extensions(list.split(','));
            }
            Some(Value::Array(items)) => {
                settings =
                    settings.with_excluded_extensions(items.iter().filter_map(Value::as_str));
            }
            Some(other) => {
                log::warn!("Ignoring malformed excludedExtensions: {}", other);
            }
        }

        match map.get("safeMode") {
            None => {}
            Some(Value::Bool(flag)) => settings.safe_mode = *flag,
            Some(other) => log::warn!("Ignoring malformed safeMode: {}", other),
        }

        if let Some(style) = map.get("linkStyle").or_else(|| map.get("mdLinkStyle")) {
            match style.as_str().map(str::parse::<LinkStyle>) {
                Some(Ok(style)) => settings.link_style = style,
                _ => log::warn!("Ignoring malformed linkStyle: {}", style),
            }
        }

        match map.get("ignoredFolders") {
            Some(Value::Array(items)) => {
                for folder in items.iter().filter_map(Value::as_str) {
                    settings.add_ignored_folder(folder);
                }
            }
            Some(Value::Null) | None => {}
            Some(other) => {
                log::warn!("Ignoring malformed ignoredFolders (treated as empty): {}", other);
            }
        }

        match map.get("skipCode") {
            None => {}
            Some(Value::Bool(flag)) => settings.skip_code = *flag,
            Some(other) => log::warn!("Ignoring malformed skipCode: {}", other),
        }

        settings
    }

    /// Parse settings text (JSON, or YAML when `yaml` is set), leniently.
    pub fn parse_lenient(text: &str, yaml: bool) -> Self {
        let parsed = if yaml {
            serde_yaml::from_str::<Value>(text).map_err(|e| e.to_string())
        } else {
            serde_json::from_str::<Value>(text).map_err(|e| e.to_string())
        };

        match parsed {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                log::warn!("Malformed settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from a file. A missing or unreadable file yields defaults.
    pub async fn load(path: &Path) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Self::parse_lenient(&text, is_yaml_path(path)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!(
                    "Failed to read settings from {}: {}; using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save settings to a file (YAML for `.yaml`/`.yml`, JSON otherwise)
    pub async fn save(&self, path: &Path) -> Result<()> {
        let text = if is_yaml_path(path) {
            serde_yaml::to_string(self)
                .map_err(|e| Error::config_error(format!("Failed to serialize settings: {}", e)))?
        } else {
            serde_json::to_string_pretty(self)
                .map_err(|e| Error::config_error(format!("Failed to serialize settings: {}", e)))?
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(Error::io)?;
        }

        tokio::fs::write(path, text).await.map_err(|e| {
            Error::config_error(format!(
                "Failed to save settings to {}: {}",
                path.display(),
                e
            ))
        })
    }
}

impl<'de> Deserialize<'de> for ConversionSettings {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
    (!ext.is_empty()).then_some(ext)
}

fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}
