//! Integration tests for Mirage Theme
//!
//! These tests drive the integration the way a host would: setup, panel
//! commands, presets and removal, checking what lands in the registry and
//! on disk.

use mirage_theme::commands::{ERR_INVALID_FORMAT, ERR_INVALID_SETTINGS, ERR_UPLOAD_FAILED};
use mirage_theme::config::{Config, OutputTarget};
use mirage_theme::host::{JsonLinesRegistry, RecordingRegistry, ServiceCall};
use mirage_theme::output::theme_file_path;
use mirage_theme::presets::{import_settings, PresetStore, SettingsExport};
use mirage_theme::{generate, CardTextColorMode, Integration, Mode, ThemeOptions};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config_for(dir: &TempDir, output: OutputTarget) -> Config {
    let mut config = Config::default();
    config.integration.output = output;
    config.integration.ha_config_dir = dir.path().join("ha");
    config
}

/// Integration that persists to `<dir>/config.toml`
fn integration(dir: &TempDir, output: OutputTarget) -> Integration<RecordingRegistry> {
    Integration::new(
        config_for(dir, output),
        Some(config_file(dir)),
        RecordingRegistry::new(),
    )
}

fn config_file(dir: &TempDir) -> PathBuf {
    dir.path().join("config.toml")
}

fn read_theme_file(dir: &TempDir) -> BTreeMap<String, BTreeMap<String, String>> {
    let yaml = fs::read_to_string(theme_file_path(&dir.path().join("ha"))).unwrap();
    serde_yaml::from_str(&yaml).unwrap()
}

// ---------------------------------------------------------------------------
// Theme delivery
// ---------------------------------------------------------------------------

#[test]
fn default_options_produce_documented_glass_colors() {
    let theme = generate(&ThemeOptions::default());

    assert_eq!(theme.dark.get("mirage-accent-color"), Some("#3b82f6"));
    assert_eq!(
        theme.dark.get("mirage-glass-bg-color-dark"),
        Some("rgba(86, 94, 88, 0.54)")
    );
    assert_eq!(
        theme.light.get("mirage-glass-bg-color-light"),
        Some("rgba(240, 242, 240, 0.60)")
    );
    assert_eq!(
        theme.light.get("mirage-door-color"),
        Some("var(--mirage-accent-color)")
    );
}

#[test]
fn file_mode_writes_both_themes_and_reloads() {
    let dir = TempDir::new().unwrap();
    let mut integration = integration(&dir, OutputTarget::File);
    assert!(integration.setup());

    let document = read_theme_file(&dir);
    assert_eq!(
        document.keys().collect::<Vec<_>>(),
        vec!["Mirage Dark", "Mirage Light"]
    );
    let expected = generate(&ThemeOptions::default());
    assert_eq!(document["Mirage Dark"], expected.dark.variables);
    assert_eq!(document["Mirage Light"], expected.light.variables);

    assert_eq!(integration.registry().services(), vec!["reload_themes"]);
}

#[test]
fn live_mode_sets_dark_then_light_then_reloads() {
    let dir = TempDir::new().unwrap();
    let mut integration = integration(&dir, OutputTarget::Live);
    integration.setup();

    let calls = &integration.registry().calls;
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].domain, "frontend");
    assert_eq!(calls[0].data["name"], "Mirage Dark");
    assert_eq!(calls[0].data["mode"], "dark");
    assert_eq!(calls[1].data["name"], "Mirage Light");
    assert_eq!(calls[1].data["mode"], "light");
    assert_eq!(calls[2].service, "reload_themes");

    assert!(!theme_file_path(&dir.path().join("ha")).exists());
}

#[test]
fn failing_registry_never_fails_setup() {
    let dir = TempDir::new().unwrap();
    let mut integration = Integration::new(
        config_for(&dir, OutputTarget::Live),
        None,
        RecordingRegistry::failing("frontend unavailable"),
    );

    assert!(integration.setup());
    assert!(integration.registry().calls.is_empty());
    assert!(integration.unload());
}

#[test]
fn json_lines_registry_emits_one_call_per_line() {
    let dir = TempDir::new().unwrap();
    let mut integration = Integration::new(
        config_for(&dir, OutputTarget::Live),
        None,
        JsonLinesRegistry::new(Vec::new()),
    );
    integration.setup();

    let out = String::from_utf8(integration.into_registry().into_inner()).unwrap();
    let calls: Vec<ServiceCall> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let services: Vec<&str> = calls.iter().map(|c| c.service.as_str()).collect();
    assert_eq!(services, vec!["set_theme", "set_theme", "reload_themes"]);
}

// ---------------------------------------------------------------------------
// Panel commands
// ---------------------------------------------------------------------------

#[test]
fn update_settings_persists_and_reapplies() {
    let dir = TempDir::new().unwrap();
    let mut integration = integration(&dir, OutputTarget::Live);

    let response = integration.handle_raw(
        &json!({
            "id": 10,
            "type": "mirage/update_settings",
            "settings": {
                "accent_color": "#ff6b35",
                "glass_transparency": 50,
                "card_text_color_mode": "dark",
                "door_color": ""
            }
        })
        .to_string(),
    );
    assert!(response.success);
    assert_eq!(response.result, Some(json!({"success": true})));

    let saved = Config::load_from(&config_file(&dir)).unwrap();
    assert_eq!(saved.options.accent_color, "#ff6b35");
    assert_eq!(saved.options.card_text_color_mode, CardTextColorMode::Dark);
    assert_eq!(saved.options.door_color, None);

    let calls = &integration.registry().calls;
    assert_eq!(calls[0].data["mirage-glass-bg-color-dark"], "rgba(86, 94, 88, 0.90)");
    assert_eq!(calls[1].data["mirage-card-primary-text-color"], "#e5e7eb");
    assert_eq!(calls[1].data["mirage-primary-text-color"], "#1f2937");
}

#[test]
fn get_settings_reflects_update() {
    let dir = TempDir::new().unwrap();
    let mut integration = integration(&dir, OutputTarget::File);
    integration.handle_raw(
        r#"{"id": 1, "type": "mirage/update_settings", "settings": {"glass_blur": 8}}"#,
    );

    let response = integration.handle_raw(r#"{"id": 2, "type": "mirage/get_settings"}"#);
    let settings = response.result.unwrap();
    assert_eq!(settings["glass_blur"], 8.0);
    assert_eq!(settings["accent_color"], "#3b82f6");
}

#[test]
fn invalid_settings_leave_state_untouched() {
    let dir = TempDir::new().unwrap();
    let mut integration = integration(&dir, OutputTarget::Live);

    let response = integration.handle_raw(
        r#"{"id": 3, "type": "mirage/update_settings", "settings": {"border_radius": 64}}"#,
    );
    assert_eq!(response.error_code(), Some(ERR_INVALID_SETTINGS));
    assert_eq!(integration.options().border_radius, 16.0);
    assert!(!config_file(&dir).exists());

    let response = integration.handle_raw(
        r#"{"id": 4, "type": "mirage/update_settings", "settings": "nope"}"#,
    );
    assert_eq!(response.error_code(), Some(ERR_INVALID_SETTINGS));
}

#[test]
fn cleared_panel_fields_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let mut integration = integration(&dir, OutputTarget::Live);

    let response = integration.handle_raw(
        &json!({
            "id": 11,
            "type": "mirage/update_settings",
            "settings": {
                "card_text_color_mode": "",
                "border_radius": null,
                "glass_transparency": "",
                "floating_opacity": null
            }
        })
        .to_string(),
    );
    assert_eq!(response.result, Some(json!({"success": true})));
    assert_eq!(integration.options(), &ThemeOptions::default());

    let response = integration.handle_raw(
        r#"{"id": 12, "type": "mirage/update_settings", "settings": {"card_text_color_mode": null}}"#,
    );
    assert!(response.success);
    assert_eq!(integration.options().card_text_color_mode, CardTextColorMode::Auto);
}

#[test]
fn unknown_message_is_invalid_format() {
    let dir = TempDir::new().unwrap();
    let mut integration = integration(&dir, OutputTarget::Live);
    let response = integration.handle_raw(r#"{"id": 5, "type": "mirage/unknown"}"#);
    assert_eq!(response.id, 5);
    assert_eq!(response.error_code(), Some(ERR_INVALID_FORMAT));
}

#[test]
fn upload_then_remove_cleans_up() {
    let dir = TempDir::new().unwrap();
    let mut integration = integration(&dir, OutputTarget::File);
    integration.setup();

    let response = integration.handle_raw(
        r#"{"id": 6, "type": "mirage/upload_image", "file_name": "night.jpg", "file_data": "data:image/jpeg;base64,aGVsbG8="}"#,
    );
    assert_eq!(
        response.result,
        Some(json!({"success": true, "url": "/local/mirage_backgrounds/night.jpg"}))
    );
    let uploaded = dir.path().join("ha/www/mirage_backgrounds/night.jpg");
    assert_eq!(fs::read(&uploaded).unwrap(), b"hello");

    integration.remove();
    assert!(!uploaded.exists());
    assert!(!theme_file_path(&dir.path().join("ha")).exists());
}

#[test]
fn upload_rejects_malformed_data() {
    let dir = TempDir::new().unwrap();
    let mut integration = integration(&dir, OutputTarget::File);
    let response = integration.handle_raw(
        r#"{"id": 7, "type": "mirage/upload_image", "file_name": "x.png", "file_data": "data:image/png;base64,***"}"#,
    );
    assert!(!response.success);
    assert_eq!(response.error_code(), Some(ERR_UPLOAD_FAILED));
}

// ---------------------------------------------------------------------------
// Presets and import/export
// ---------------------------------------------------------------------------

#[test]
fn apply_builtin_preset_updates_theme() {
    let dir = TempDir::new().unwrap();
    let presets = PresetStore::load_from(&dir.path().join("presets.json")).unwrap();
    let mut integration = integration(&dir, OutputTarget::Live);

    integration.apply_preset(&presets, "Pure Glass").unwrap();

    assert_eq!(integration.options().border_radius, 24.0);
    let light = &integration.registry().calls[1].data;
    assert_eq!(light["mirage-border-radius"], "24px");
    assert_eq!(light["mirage-border-width"], "0px");
    assert_eq!(light["mirage-glass-bg-color-light"], "rgba(240, 242, 240, 0.50)");
    assert_eq!(light["mirage-card-primary-text-color"], "#1f2937");
}

#[test]
fn user_preset_survives_reload_and_applies() {
    let dir = TempDir::new().unwrap();
    let presets_path = dir.path().join("presets.json");
    let mut presets = PresetStore::load_from(&presets_path).unwrap();
    let options = ThemeOptions {
        accent_color: "#10b981".to_string(),
        ..Default::default()
    };
    presets.save_preset("Forest", &options).unwrap();

    let presets = PresetStore::load_from(&presets_path).unwrap();
    let mut integration = integration(&dir, OutputTarget::File);
    integration.apply_preset(&presets, "Forest").unwrap();

    let document = read_theme_file(&dir);
    assert_eq!(document["Mirage Dark"]["primary-color"], "#10b981");
}

#[test]
fn export_import_roundtrip_through_integration() {
    let dir = TempDir::new().unwrap();
    let options = ThemeOptions {
        glass_transparency: 10.0,
        humidity_color: Some("#0ea5e9".to_string()),
        ..Default::default()
    };
    let export = SettingsExport::new(&options).to_json().unwrap();

    let mut integration = integration(&dir, OutputTarget::Live);
    integration
        .options_updated(import_settings(&export).unwrap())
        .unwrap();

    let theme = integration.current_theme();
    assert_eq!(theme.variant(Mode::Dark).get("mirage-humidity-color"), Some("#0ea5e9"));
    assert_eq!(
        theme.variant(Mode::Dark).get("mirage-glass-bg-color-dark"),
        Some("rgba(86, 94, 88, 0.18)")
    );
}
