// Relaybrowser Settings Engine
// Loads, saves and edits the session configuration.
// The configuration is a JSON file at the platform-specific config path.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::AppConfig;

pub const SETTINGS_FILE: &str = "settings.json";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<AppConfig, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &AppConfig;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &Path;
}

/// Settings engine persisting an [`AppConfig`] as JSON on disk.
pub struct SettingsEngine {
    config_path: PathBuf,
    defaults: AppConfig,
    settings: AppConfig,
}

impl SettingsEngine {
    /// Creates an engine using the browser preset as its defaults.
    ///
    /// Without `path_override` the file lives in the platform config directory.
    pub fn new(path_override: Option<PathBuf>) -> Self {
        Self::with_defaults(path_override, AppConfig::browser())
    }

    /// Creates an engine whose missing-file and reset state is `defaults`.
    pub fn with_defaults(path_override: Option<PathBuf>, defaults: AppConfig) -> Self {
        let config_path =
            path_override.unwrap_or_else(|| platform::get_config_dir().join(SETTINGS_FILE));
        Self {
            config_path,
            settings: defaults.clone(),
            defaults,
        }
    }
}

/// Replaces the value at a dot-separated path inside `root`.
///
/// Only existing keys can be replaced.
fn replace_at(root: &mut Value, key: &str, value: Value) -> Result<(), SettingsError> {
    let mut parts = key.split('.').peekable();
    let mut current = root;

    while let Some(part) = parts.next() {
        if part.is_empty() {
            return Err(SettingsError::InvalidKey(format!("Empty segment in key '{}'", key)));
        }
        let map = current.as_object_mut().ok_or_else(|| {
            SettingsError::InvalidKey(format!("'{}' does not name a settings section", key))
        })?;
        let slot = map
            .get_mut(part)
            .ok_or_else(|| SettingsError::InvalidKey(format!("Key '{}' not found in settings", key)))?;

        if parts.peek().is_none() {
            *slot = value;
            return Ok(());
        }
        current = slot;
    }

    Err(SettingsError::InvalidKey("Key cannot be empty".to_string()))
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads the configuration file.
    ///
    /// A missing file yields the defaults; a malformed one is a serialization error.
    fn load(&mut self) -> Result<AppConfig, SettingsError> {
        if !self.config_path.exists() {
            self.settings = self.defaults.clone();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        self.settings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        Ok(self.settings.clone())
    }

    fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(&self.config_path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))
    }

    fn get_settings(&self) -> &AppConfig {
        &self.settings
    }

    /// Updates one setting by dot-notation path and saves.
    ///
    /// # Examples
    /// - `"mode.should_fetch"` → `settings.mode.should_fetch`
    /// - `"navigation.search_url"` → `settings.navigation.search_url`
    /// - `"timing.resize_debounce_ms"` → `settings.timing.resize_debounce_ms`
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut tree = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;
        replace_at(&mut tree, key, value)?;

        self.settings = serde_json::from_value(tree).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;
        self.save()
    }

    /// Restores the defaults and saves.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = self.defaults.clone();
        self.save()
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}
