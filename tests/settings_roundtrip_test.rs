//! Settings persistence round-trips

use tempfile::TempDir;
use tubescribe::settings::{DEFAULT_PLATFORM, DEFAULT_PROMPT, Settings};

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.selected_platform, DEFAULT_PLATFORM);
    assert_eq!(settings.custom_prompt, DEFAULT_PROMPT);
}

#[test]
fn saved_values_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let settings = Settings {
        selected_platform: "claude".to_string(),
        custom_prompt: "X".to_string(),
    };
    settings.save_to(&path).unwrap();

    let reloaded = Settings::load_from(&path).unwrap();
    assert_eq!(reloaded, settings);

    // Saving again over the same file stays stable
    reloaded.save_to(&path).unwrap();
    assert_eq!(Settings::load_from(&path).unwrap(), settings);
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"selected_platform": "gemini"}"#).unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.selected_platform, "gemini");
    assert_eq!(settings.custom_prompt, DEFAULT_PROMPT);
}

#[test]
fn corrupt_file_is_an_error_not_a_silent_reset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{broken").unwrap();

    assert!(Settings::load_from(&path).is_err());
}
