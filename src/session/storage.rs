use super::file::FileSlotStore;
use super::options::StoreOptions;
use super::store::{LoadOutcome, SlotKey, SlotStore};
use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

/// What a slot's stored value currently holds.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotStatus {
    Missing,
    Stored { segments: usize },
    Malformed(String),
}

/// Summary information about one slot's stored history.
#[derive(Debug, Clone)]
pub struct SlotInspection {
    pub key: SlotKey,
    pub path: PathBuf,
    pub exists: bool,
    pub size_bytes: Option<u64>,
    pub modified: Option<SystemTime>,
    pub backup_path: PathBuf,
    pub backup_exists: bool,
    pub status: SlotStatus,
}

/// Inspect the stored values of slots `0..slot_count` for CLI reporting.
pub fn inspect_slots(options: &StoreOptions, slot_count: usize) -> Result<Vec<SlotInspection>> {
    let store = FileSlotStore::new(options.clone());
    let mut report = Vec::with_capacity(slot_count);

    for index in 0..slot_count {
        let key = SlotKey::new(index);
        let path = options.value_path(key);
        let backup_path = options.backup_path(key);
        let metadata = fs::metadata(&path).ok();

        let status = match store.load(key)? {
            LoadOutcome::Found(history) => SlotStatus::Stored {
                segments: history.len(),
            },
            LoadOutcome::NotFound => SlotStatus::Missing,
            LoadOutcome::Malformed(reason) => SlotStatus::Malformed(reason),
        };

        report.push(SlotInspection {
            key,
            exists: metadata.is_some(),
            size_bytes: metadata.as_ref().map(|m| m.len()),
            modified: metadata.as_ref().and_then(|m| m.modified().ok()),
            backup_exists: backup_path.exists(),
            path,
            backup_path,
            status,
        });
    }

    Ok(report)
}
