//! Configuration file support for slotscriber.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/slotscriber/config.toml`. Settings include the list of background
//! images (one slot per image), background loading and history storage.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::StorageMode;
pub use types::{BackgroundConfig, ImageEntry, StorageConfig};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [[images]]
/// image_url = "img/a.png"
///
/// [[images]]
/// image_url = "file:///srv/boards/b.png"
///
/// [background]
/// asset_dir = "~/boards"
/// timeout_ms = 5000
///
/// [storage]
/// storage = "custom"
/// custom_directory = "~/boards/history"
/// max_segments_per_slot = 0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Background images in slot order
    #[serde(default)]
    pub images: Vec<ImageEntry>,

    /// Background loading settings
    #[serde(default)]
    pub background: BackgroundConfig,

    /// History persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Validates and clamps configuration values to acceptable ranges.
    ///
    /// Validated ranges:
    /// - `background.timeout_ms`: 100 - 60000
    /// - `storage.max_file_size_mb`: 1 - 64
    fn validate_and_clamp(&mut self) {
        if !(100..=60_000).contains(&self.background.timeout_ms) {
            warn!(
                "Invalid background timeout_ms {}, clamping to 100-60000 range",
                self.background.timeout_ms
            );
            self.background.timeout_ms = self.background.timeout_ms.clamp(100, 60_000);
        }

        if !(1..=64).contains(&self.storage.max_file_size_mb) {
            warn!(
                "Invalid storage max_file_size_mb {}, clamping to 1-64 range",
                self.storage.max_file_size_mb
            );
            self.storage.max_file_size_mb = self.storage.max_file_size_mb.clamp(1, 64);
        }

        if self.storage.storage == StorageMode::Custom && self.storage.custom_directory.is_none() {
            warn!("storage = \"custom\" without custom_directory, falling back to \"auto\"");
            self.storage.storage = StorageMode::Auto;
        }

        for (index, image) in self.images.iter().enumerate() {
            if image.image_url.trim().is_empty() {
                warn!("Slot {} has an empty image_url; it will have no background", index);
            }
        }
    }

    /// Returns the path to the default configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("slotscriber");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Loads configuration from `config_path`, or returns defaults if the file is missing.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or contains invalid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let config = Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(source: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(source)?;
        config.validate_and_clamp();
        Ok(config)
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> Result<String> {
        let schema = schemars::schema_for!(Config);
        serde_json::to_string_pretty(&schema).context("Failed to serialize config schema")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert!(config.images.is_empty());
        assert_eq!(config.background.timeout_ms, 5_000);
        assert_eq!(config.storage.storage, StorageMode::Auto);
        assert_eq!(config.storage.max_segments_per_slot, 0);
        assert!(config.storage.backup);
    }

    #[test]
    fn images_keep_declared_order() {
        let config = Config::from_toml(
            r#"
            [[images]]
            image_url = "img/a.png"

            [[images]]
            image_url = "img/b.png"
            "#,
        )
        .unwrap();
        let urls: Vec<_> = config.images.iter().map(|i| i.image_url.as_str()).collect();
        assert_eq!(urls, ["img/a.png", "img/b.png"]);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = Config::from_toml(
            r#"
            [background]
            timeout_ms = 5

            [storage]
            max_file_size_mb = 1000
            "#,
        )
        .unwrap();
        assert_eq!(config.background.timeout_ms, 100);
        assert_eq!(config.storage.max_file_size_mb, 64);
    }

    #[test]
    fn custom_storage_without_directory_falls_back_to_auto() {
        let config = Config::from_toml(
            r#"
            [storage]
            storage = "custom"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.storage, StorageMode::Auto);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(Config::from_toml("images = 3").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&temp.path().join("absent.toml")).unwrap();
        assert!(config.images.is_empty());
    }

    #[test]
    fn schema_mentions_image_url() {
        let schema = Config::json_schema().unwrap();
        assert!(schema.contains("image_url"));
    }
}
