//! Configuration type definitions.

use super::enums::StorageMode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One background image; its position in the list is the slot index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImageEntry {
    /// Plain path or `file://` URL of a PNG image
    pub image_url: String,
}

impl ImageEntry {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
        }
    }
}

/// Background loading settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BackgroundConfig {
    /// Directory that relative image paths are resolved against
    /// (defaults to the working directory)
    #[serde(default)]
    pub asset_dir: Option<String>,

    /// How long the CLI waits for pending background loads, in milliseconds
    /// (valid range: 100 - 60000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            asset_dir: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Slot history persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StorageConfig {
    /// Storage location strategy
    #[serde(default)]
    pub storage: StorageMode,

    /// Directory used when `storage = "custom"` (`~/` is expanded)
    #[serde(default)]
    pub custom_directory: Option<String>,

    /// Maximum segments per slot; further clicks are not drawn (0 = unlimited, the default)
    #[serde(default = "default_max_segments")]
    pub max_segments_per_slot: usize,

    /// Values larger than this are refused on save and on load (valid range: 1 - 64)
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Keep the previous value of each slot as `<key>.json.bak`
    #[serde(default = "default_backup")]
    pub backup: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage: StorageMode::default(),
            custom_directory: None,
            max_segments_per_slot: default_max_segments(),
            max_file_size_mb: default_max_file_size_mb(),
            backup: default_backup(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_max_segments() -> usize {
    0
}

fn default_max_file_size_mb() -> u64 {
    4
}

fn default_backup() -> bool {
    true
}
