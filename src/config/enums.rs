//! Configuration enum types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where slot histories are stored on disk.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StorageMode {
    /// Platform data directory (`~/.local/share/slotscriber` on Linux)
    #[default]
    Auto,
    /// Next to the configuration file
    Config,
    /// The directory named by `storage.custom_directory`
    Custom,
}
