//! Theme payloads and theme file export
//!
//! A [`DerivedTheme`] is delivered to the frontend in one of two shapes:
//! two `set_theme` payloads for a live registry, or a YAML document with a
//! top-level block per theme name written under the host's `themes/`
//! directory.

use crate::generator::{DerivedTheme, Mode, ThemeVariant};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory under the host config dir that holds theme files
pub const THEMES_DIR: &str = "themes";
/// File name of the generated theme file
pub const THEME_FILE_NAME: &str = "mirage.yaml";

/// Error type for theme export
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Payload for a single `frontend.set_theme` call
///
/// Serializes flat: `{"name": ..., "mode": ..., "<variable>": ...}`. A
/// payload without variables clears the theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePayload {
    pub name: String,
    pub mode: Mode,
    #[serde(flatten)]
    pub variables: BTreeMap<String, String>,
}

impl From<&ThemeVariant> for ThemePayload {
    fn from(variant: &ThemeVariant) -> Self {
        Self {
            name: variant.name.clone(),
            mode: variant.mode,
            variables: variant.variables.clone(),
        }
    }
}

impl ThemePayload {
    /// An empty payload that resets the named theme
    pub fn cleared(mode: Mode) -> Self {
        Self {
            name: mode.theme_name().to_string(),
            mode,
            variables: BTreeMap::new(),
        }
    }
}

/// Payloads for a live apply, dark first
pub fn live_payloads(theme: &DerivedTheme) -> Vec<ThemePayload> {
    theme.variants().into_iter().map(ThemePayload::from).collect()
}

/// Payloads that clear both themes
pub fn cleared_payloads() -> Vec<ThemePayload> {
    Mode::all().into_iter().map(ThemePayload::cleared).collect()
}

/// Path of the theme file under a host config directory
pub fn theme_file_path(ha_config_dir: &Path) -> PathBuf {
    ha_config_dir.join(THEMES_DIR).join(THEME_FILE_NAME)
}

/// Render the theme file document.
///
/// # Example
///
/// ```
/// use mirage_theme::generator::generate;
/// use mirage_theme::options::ThemeOptions;
/// use mirage_theme::output::to_yaml;
///
/// let yaml = to_yaml(&generate(&ThemeOptions::default())).unwrap();
/// assert!(yaml.starts_with("Mirage Dark:"));
/// assert!(yaml.contains("Mirage Light:"));
/// ```
pub fn to_yaml(theme: &DerivedTheme) -> Result<String, OutputError> {
    let document: BTreeMap<&str, &BTreeMap<String, String>> = theme
        .variants()
        .into_iter()
        .map(|variant| (variant.name.as_str(), &variant.variables))
        .collect();
    Ok(serde_yaml::to_string(&document)?)
}

/// Render both live payloads as pretty JSON
pub fn to_json(theme: &DerivedTheme) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(&live_payloads(theme))?)
}

/// Write the theme file, creating parent directories as needed.
pub fn write_theme_file(theme: &DerivedTheme, path: &Path) -> Result<(), OutputError> {
    let yaml = to_yaml(theme)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, yaml)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use crate::options::ThemeOptions;
    use tempfile::TempDir;

    #[test]
    fn payload_serializes_flat() {
        let theme = generate(&ThemeOptions::default());
        let payload = ThemePayload::from(&theme.dark);
        let json: serde_json::Value = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["name"], "Mirage Dark");
        assert_eq!(json["mode"], "dark");
        assert_eq!(json["mirage-glass-bg-color-dark"], "rgba(86, 94, 88, 0.54)");
    }

    #[test]
    fn live_payloads_dark_then_light() {
        let payloads = live_payloads(&generate(&ThemeOptions::default()));
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0].mode, Mode::Dark);
        assert_eq!(payloads[1].mode, Mode::Light);
        assert_eq!(payloads[1].name, "Mirage Light");
    }

    #[test]
    fn cleared_payload_has_only_name_and_mode() {
        let json = serde_json::to_string(&ThemePayload::cleared(Mode::Light)).unwrap();
        assert_eq!(json, r#"{"name":"Mirage Light","mode":"light"}"#);
        assert_eq!(cleared_payloads().len(), 2);
    }

    #[test]
    fn yaml_has_both_theme_blocks() {
        let yaml = to_yaml(&generate(&ThemeOptions::default())).unwrap();
        let parsed: BTreeMap<String, BTreeMap<String, String>> =
            serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(
            parsed["Mirage Dark"]["mirage-temperature-color"],
            "var(--mirage-accent-color)"
        );
        assert_eq!(
            parsed["Mirage Light"]["mirage-glass-bg-color-light"],
            "rgba(240, 242, 240, 0.60)"
        );
        assert_eq!(parsed["Mirage Light"]["primary-background-color"], "#f3f4f6");
    }

    #[test]
    fn yaml_output_is_stable() {
        let theme = generate(&ThemeOptions::default());
        assert_eq!(to_yaml(&theme).unwrap(), to_yaml(&theme).unwrap());
    }

    #[test]
    fn theme_file_written_under_themes_dir() {
        let dir = TempDir::new().unwrap();
        let path = theme_file_path(dir.path());
        write_theme_file(&generate(&ThemeOptions::default()), &path).unwrap();

        assert!(path.ends_with("themes/mirage.yaml"));
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Mirage Dark:"));
    }
}
