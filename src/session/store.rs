use crate::draw::DrawingHistory;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Persistence key of a slot: its index, stringified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey(usize);

impl SlotKey {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for SlotKey {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of looking up a slot's stored history.
///
/// A stored empty sequence is `Found` with an empty history, which is distinct
/// from `NotFound`.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Found(DrawingHistory),
    NotFound,
    /// A value exists but could not be used; carries the reason
    Malformed(String),
}

/// Errors raised by slot stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialise history for slot {key}: {source}")]
    Serialize {
        key: SlotKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("history for slot {key} is {size} bytes which exceeds the limit of {limit} bytes")]
    TooLarge { key: SlotKey, size: u64, limit: u64 },

    #[error("slot store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| StoreError::Io {
            action,
            path,
            source,
        }
    }
}

/// Key-value persistence for slot histories.
///
/// `save` fully replaces the value stored under `key` (last write wins).
/// Keys are independent; there are no guarantees across keys.
pub trait SlotStore: Send + Sync {
    fn save(&self, key: SlotKey, history: &DrawingHistory) -> Result<(), StoreError>;
    fn load(&self, key: SlotKey) -> Result<LoadOutcome, StoreError>;
}

/// Serialises a history into its stored form: a JSON array of segments.
pub fn encode_history(key: SlotKey, history: &DrawingHistory) -> Result<String, StoreError> {
    serde_json::to_string(history).map_err(|source| StoreError::Serialize { key, source })
}

/// Parses a stored value, rejecting unparseable data and invalid coordinates.
///
/// Well-formed histories are returned whole, whatever their length.
pub fn decode_history(raw: &[u8]) -> LoadOutcome {
    let history: DrawingHistory = match serde_json::from_slice(raw) {
        Ok(history) => history,
        Err(err) => return LoadOutcome::Malformed(format!("unparseable history: {err}")),
    };

    if let Some(position) = history.first_invalid() {
        return LoadOutcome::Malformed(format!(
            "segment {position} has negative or non-finite coordinates"
        ));
    }

    LoadOutcome::Found(history)
}

/// In-memory store holding raw serialised values.
///
/// Values go through the same encoding as the file store, so corrupted data
/// can be injected with [`MemorySlotStore::insert_raw`].
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    values: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw value without counting it as a write.
    pub fn insert_raw(&self, key: impl ToString, value: impl Into<String>) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.into());
        }
    }

    /// Raw stored value for `key`, if any.
    pub fn raw(&self, key: impl ToString) -> Option<String> {
        self.values
            .lock()
            .ok()
            .and_then(|values| values.get(&key.to_string()).cloned())
    }

    /// Number of successful `save` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl SlotStore for MemorySlotStore {
    fn save(&self, key: SlotKey, history: &DrawingHistory) -> Result<(), StoreError> {
        let encoded = encode_history(key, history)?;
        self.values
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .insert(key.to_string(), encoded);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn load(&self, key: SlotKey) -> Result<LoadOutcome, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(match values.get(&key.to_string()) {
            Some(raw) => decode_history(raw.as_bytes()),
            None => LoadOutcome::NotFound,
        })
    }
}
