//! Configuration file persistence for Persona Card
//!
//! This module handles loading and saving configuration files to
//! platform-specific directories with graceful fallback to defaults.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "persona-card";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// - **Windows**: `%APPDATA%\persona-card\`
/// - **macOS**: `~/Library/Application Support/persona-card/`
/// - **Linux**: `~/.config/persona-card/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the configuration file.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load configuration from the default config file location.
///
/// 1. If the config file exists and is valid JSON, load and sanitize it
/// 2. If the config file doesn't exist or is empty, return default settings
/// 3. If the config file is corrupted, log a warning and return defaults
pub fn load_config() -> Settings {
    get_config_file_path()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

/// Load configuration from an explicit path.
pub fn load_config_from(config_path: &Path) -> Result<Settings> {
    if !config_path.exists() {
        debug!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        return Ok(Settings::default());
    }

    debug!("Loading config from: {}", config_path.display());

    let contents = fs::read_to_string(config_path).map_err(|e| Error::ConfigLoad {
        path: config_path.to_path_buf(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
        warn!(
            "Config file at {} contains invalid JSON: {}",
            config_path.display(),
            e
        );
        Error::ConfigParse {
            message: format!("Failed to parse config file: {}", e),
            source: Some(Box::new(e)),
        }
    })?;

    info!("Configuration loaded from {}", config_path.display());
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save configuration to the default config file location.
pub fn save_config(settings: &Settings) -> Result<()> {
    save_config_to(&get_config_file_path()?, settings)
}

/// Save configuration to an explicit path.
///
/// Writes `<path>.bak` first and renames it over the original.
pub fn save_config_to(config_path: &Path, settings: &Settings) -> Result<()> {
    if let Some(config_dir) = config_path.parent() {
        if !config_dir.exists() {
            debug!("Creating config directory: {}", config_dir.display());
            fs::create_dir_all(config_dir).map_err(|e| Error::ConfigSave {
                path: config_dir.to_path_buf(),
                source: Box::new(e),
            })?;
        }
    }

    let mut backup = config_path.as_os_str().to_owned();
    backup.push(".bak");
    let backup_path = PathBuf::from(backup);

    debug!("Saving config to: {}", config_path.display());

    let json = serde_json::to_string_pretty(settings).map_err(|e| Error::ConfigSave {
        path: config_path.to_path_buf(),
        source: Box::new(e),
    })?;

    fs::write(&backup_path, &json).map_err(|e| Error::ConfigSave {
        path: backup_path.clone(),
        source: Box::new(e),
    })?;

    fs::rename(&backup_path, config_path).map_err(|e| Error::ConfigSave {
        path: config_path.to_path_buf(),
        source: Box::new(e),
    })?;

    info!("Configuration saved to {}", config_path.display());
    Ok(())
}

/// Save configuration, logging instead of returning errors.
///
/// Returns `true` if the save was successful.
pub fn save_config_silent(settings: &Settings) -> bool {
    match save_config(settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save configuration: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CardFormat, CardMode, Theme};
    use crate::persona::NotifyPolicy;
    use tempfile::TempDir;

    fn config_path(temp_dir: &TempDir) -> PathBuf {
        temp_dir.path().join(APP_NAME).join(CONFIG_FILE_NAME)
    }

    #[test]
    fn test_get_config_dir_names_app() {
        if let Ok(path) = get_config_dir() {
            assert!(path.to_string_lossy().contains(APP_NAME));
        }
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let settings = load_config_from(&config_path(&temp_dir)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = config_path(&temp_dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "  \n").unwrap();

        let settings = load_config_from(&path).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_corrupted_config_is_parse_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = config_path(&temp_dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ invalid json }").unwrap();

        let result = load_config_from(&path);
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_load_sanitizes_values() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = config_path(&temp_dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"font_size": 99.0, "max_recent_files": 500}"#).unwrap();

        let settings = load_config_from(&path).unwrap();
        assert_eq!(settings.font_size, Settings::MAX_FONT_SIZE);
        assert_eq!(settings.max_recent_files, 100);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = config_path(&temp_dir);
        let original = Settings {
            theme: Theme::Light,
            card_format: CardFormat::Bullet,
            card_mode: CardMode::Edit,
            notify_policy: NotifyPolicy::OnChange,
            font_size: 18.0,
            last_selected_persona: Some("default-1-0".to_string()),
            ..Settings::default()
        };

        save_config_to(&path, &original).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(original, loaded);
        assert!(!path.with_extension("json.bak").exists());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = config_path(&temp_dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"theme": "light", "future_feature": true}"#).unwrap();

        let settings = load_config_from(&path).unwrap();
        assert_eq!(settings.theme, Theme::Light);
    }

    #[test]
    fn test_wrong_types_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = config_path(&temp_dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"font_size": "large"}"#).unwrap();

        assert!(load_config_from(&path).is_err());
    }
}
