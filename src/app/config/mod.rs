// SPDX-License-Identifier: MPL-2.0
//! Loading and saving user preferences to `settings.toml`.
//!
//! # Configuration Sections
//!
//! - `[general]` - Language and theme mode
//! - `[engine]` - Decoding engine location
//! - `[scan]` - Intake behavior (directory recursion)
//! - `[decode]` - The full decode options record
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable
//! deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with an explicit path
//! 2. Set `BARCODE_LENS_CONFIG_DIR` environment variable
//! 3. Falls back to the platform-specific config directory

use crate::app::paths;
use crate::decode::DecodeOptions;
use crate::engine::EngineLocation;
use crate::error::{Error, Result};
use crate::ui::theming::ThemeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "fr").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Application theme mode (light, dark, or system).
    #[serde(
        default = "default_theme_mode",
        deserialize_with = "deserialize_theme_mode"
    )]
    pub theme_mode: ThemeMode,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: None,
            theme_mode: default_theme_mode(),
        }
    }
}

/// Decoding engine settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EngineConfig {
    /// Where the engine binary is fetched from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<EngineLocation>,
}

/// Intake settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// Whether dropped directories are expanded recursively.
    #[serde(default = "default_recurse", skip_serializing_if = "Option::is_none")]
    pub recurse_directories: Option<bool>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recurse_directories: default_recurse(),
        }
    }
}

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Decoding engine settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Intake settings.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Decode options handed to the engine.
    #[serde(default)]
    pub decode: DecodeOptions,
}

impl Config {
    /// Returns the configured engine location or its default.
    #[must_use]
    pub fn engine_location(&self) -> EngineLocation {
        self.engine.location.unwrap_or_default()
    }

    /// Returns whether directory recursion is enabled (default: yes).
    #[must_use]
    pub fn recurse_directories(&self) -> bool {
        self.scan.recurse_directories.unwrap_or(true)
    }
}

fn default_theme_mode() -> ThemeMode {
    ThemeMode::System
}

fn default_recurse() -> Option<bool> {
    Some(true)
}

fn deserialize_theme_mode<'de, D>(deserializer: D) -> std::result::Result<ThemeMode, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let raw = String::deserialize(deserializer)?;
    match raw.to_lowercase().as_str() {
        "light" => Ok(ThemeMode::Light),
        "dark" => Ok(ThemeMode::Dark),
        "system" => Ok(ThemeMode::System),
        other => Err(D::Error::custom(format!("invalid theme_mode: {}", other))),
    }
}

/// Returns the config file path with an optional override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// the default config with a warning key explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(_) => {
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
///
/// Decode options are clamped into their supported ranges so a hand-edited
/// file cannot request nonsensical values.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;
    config.decode = config.decode.clamped();
    Ok(config)
}

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{BarcodeFormat, Binarizer};
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let mut config = Config {
            general: GeneralConfig {
                language: Some("fr".to_string()),
                theme_mode: ThemeMode::Light,
            },
            engine: EngineConfig {
                location: Some(EngineLocation::Jsdelivr),
            },
            ..Config::default()
        };
        config.decode.binarizer = Binarizer::FixedThreshold;
        config.decode.toggle_format(BarcodeFormat::QrCode);

        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        match load_from_path(&config_path) {
            Err(Error::Config(message)) => assert!(message.contains("expected")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.general.theme_mode, ThemeMode::System);
        assert_eq!(config.engine_location(), EngineLocation::Bundled);
        assert!(config.recurse_directories());
        assert_eq!(config.decode, DecodeOptions::default());
    }

    #[test]
    fn loading_clamps_hand_edited_decode_options() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(
            &config_path,
            "[decode]\ndownscale_factor = 99\nmin_line_count = 0\n",
        )
        .expect("write config");

        let loaded = load_from_path(&config_path).expect("load config");
        assert_eq!(loaded.decode.downscale_factor, 4);
        assert_eq!(loaded.decode.min_line_count, 1);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[general]\nlanguage = \"fr\"\n").expect("write config");

        let loaded = load_from_path(&config_path).expect("load config");
        assert_eq!(loaded.general.language, Some("fr".to_string()));
        assert_eq!(loaded.decode, DecodeOptions::default());
        assert!(loaded.recurse_directories());
    }

    #[test]
    fn saved_config_uses_sectioned_format() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");

        save_to_path(&Config::default(), &config_path).expect("save config");
        let content = fs::read_to_string(&config_path).expect("read config");

        assert!(content.contains("[general]"));
        assert!(content.contains("[decode]"));
    }

    #[test]
    fn load_with_override_from_corrupted_file_returns_default_with_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let base_dir = temp_dir.path().to_path_buf();
        fs::write(base_dir.join("settings.toml"), "not = valid = toml").expect("write file");

        let (config, warning) = load_with_override(Some(base_dir));
        assert_eq!(warning.as_deref(), Some("notification-config-load-error"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_with_override_from_empty_directory_returns_default() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert!(warning.is_none());
        assert_eq!(config, Config::default());
    }
}
