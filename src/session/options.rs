use super::store::SlotKey;
use crate::config::{StorageConfig, StorageMode};
use crate::util::expand_tilde;
use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 4 * 1024 * 1024;

/// Runtime options derived from configuration for history persistence.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub base_dir: PathBuf,
    pub max_segments_per_slot: usize,
    pub max_file_size_bytes: u64,
    pub backup: bool,
}

impl StoreOptions {
    /// Creates a basic options struct with sensible defaults. Intended mainly for tests.
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            max_segments_per_slot: 0,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            backup: true,
        }
    }

    pub fn value_path(&self, key: SlotKey) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    pub fn backup_path(&self, key: SlotKey) -> PathBuf {
        self.base_dir.join(format!("{key}.json.bak"))
    }

    pub fn lock_path(&self, key: SlotKey) -> PathBuf {
        self.base_dir.join(format!("{key}.lock"))
    }
}

/// Build runtime store options from configuration values.
pub fn options_from_config(storage_cfg: &StorageConfig, config_dir: &Path) -> Result<StoreOptions> {
    let base_dir = match storage_cfg.storage {
        StorageMode::Auto => {
            let root = dirs::data_dir().unwrap_or_else(|| config_dir.to_path_buf());
            root.join("slotscriber")
        }
        StorageMode::Config => config_dir.to_path_buf(),
        StorageMode::Custom => {
            let raw = storage_cfg.custom_directory.as_ref().ok_or_else(|| {
                anyhow!("storage.custom_directory must be set when storage = \"custom\"")
            })?;
            let expanded = expand_tilde(raw);
            if expanded.as_os_str().is_empty() {
                return Err(anyhow!(
                    "storage.custom_directory resolved to an empty path"
                ));
            }
            expanded
        }
    };

    let mut options = StoreOptions::new(base_dir);
    options.max_segments_per_slot = storage_cfg.max_segments_per_slot;
    options.max_file_size_bytes = storage_cfg
        .max_file_size_mb
        .saturating_mul(1024 * 1024)
        .max(1);
    options.backup = storage_cfg.backup;

    Ok(options)
}
