use super::options::StoreOptions;
use super::store::{LoadOutcome, SlotKey, SlotStore, StoreError, decode_history, encode_history};
use crate::draw::DrawingHistory;
use fs2::FileExt;
use log::{debug, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Slot store keeping one JSON file per key under `base_dir`.
///
/// Writes go to a temporary file that is synced and renamed into place while
/// holding an exclusive lock on `<key>.lock`; loads take a shared lock.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    options: StoreOptions,
}

impl FileSlotStore {
    pub fn new(options: StoreOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    fn open_lock(&self, key: SlotKey) -> Result<File, StoreError> {
        let lock_path = self.options.lock_path(key);
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(StoreError::io("failed to open lock file", &lock_path))
    }

    fn save_inner(&self, key: SlotKey, history: &DrawingHistory) -> Result<(), StoreError> {
        let value_path = self.options.value_path(key);
        let backup_path = self.options.backup_path(key);

        let payload = encode_history(key, history)?;
        let size = payload.len() as u64;
        if size > self.options.max_file_size_bytes {
            return Err(StoreError::TooLarge {
                key,
                size,
                limit: self.options.max_file_size_bytes,
            });
        }

        let tmp_path = temp_path(&value_path);
        let replaced = write_temp(&tmp_path, payload.as_bytes())
            .and_then(|()| {
                // The previous value stays in place until the rename replaces it
                if self.options.backup && value_path.is_file() {
                    fs::copy(&value_path, &backup_path)
                        .map_err(StoreError::io("failed to back up previous value", &backup_path))?;
                }
                Ok(())
            })
            .and_then(|()| {
                fs::rename(&tmp_path, &value_path)
                    .map_err(StoreError::io("failed to move temporary file into", &value_path))
            });

        if let Err(err) = replaced {
            if tmp_path.exists() {
                if let Err(cleanup) = fs::remove_file(&tmp_path) {
                    warn!("failed to remove {}: {}", tmp_path.display(), cleanup);
                }
            }
            return Err(err);
        }

        info!(
            "Slot {} saved to {} ({} segments, {} bytes)",
            key,
            value_path.display(),
            history.len(),
            size
        );

        Ok(())
    }
}

impl SlotStore for FileSlotStore {
    fn save(&self, key: SlotKey, history: &DrawingHistory) -> Result<(), StoreError> {
        fs::create_dir_all(&self.options.base_dir).map_err(StoreError::io(
            "failed to create storage directory",
            &self.options.base_dir,
        ))?;

        let lock_file = self.open_lock(key)?;
        lock_file
            .lock_exclusive()
            .map_err(StoreError::io("failed to lock", self.options.lock_path(key)))?;

        let result = self.save_inner(key, history);

        lock_file.unlock().unwrap_or_else(|err| {
            warn!(
                "failed to unlock {}: {}",
                self.options.lock_path(key).display(),
                err
            )
        });

        result
    }

    fn load(&self, key: SlotKey) -> Result<LoadOutcome, StoreError> {
        let value_path = self.options.value_path(key);
        if !value_path.exists() {
            debug!(
                "No stored history for slot {} at {}",
                key,
                value_path.display()
            );
            return Ok(LoadOutcome::NotFound);
        }

        let metadata =
            fs::metadata(&value_path).map_err(StoreError::io("failed to stat", &value_path))?;
        if metadata.len() > self.options.max_file_size_bytes {
            return Ok(LoadOutcome::Malformed(format!(
                "{} is {} bytes which exceeds the limit of {} bytes",
                value_path.display(),
                metadata.len(),
                self.options.max_file_size_bytes
            )));
        }

        let lock_file = self.open_lock(key)?;
        lock_file
            .lock_shared()
            .map_err(StoreError::io("failed to acquire shared lock", self.options.lock_path(key)))?;

        let mut bytes = Vec::new();
        let read = File::open(&value_path)
            .and_then(|mut file| file.read_to_end(&mut bytes))
            .map_err(StoreError::io("failed to read", &value_path));

        lock_file.unlock().unwrap_or_else(|err| {
            warn!(
                "failed to unlock {}: {}",
                self.options.lock_path(key).display(),
                err
            )
        });

        read?;
        Ok(decode_history(&bytes))
    }
}

fn write_temp(path: &Path, payload: &[u8]) -> Result<(), StoreError> {
    let mut tmp_file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(StoreError::io("failed to open temporary file", path))?;
    tmp_file
        .write_all(payload)
        .map_err(StoreError::io("failed to write", path))?;
    tmp_file
        .sync_all()
        .map_err(StoreError::io("failed to sync", path))
}

fn temp_path(target: &Path) -> PathBuf {
    let mut candidate = target.with_extension("json.tmp");
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        candidate = target.with_extension(format!("json.tmp{}", counter));
    }
    candidate
}
