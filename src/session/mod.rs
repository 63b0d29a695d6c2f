//! Slot history persistence.
//!
//! Histories are stored as key-value pairs: the key is the stringified slot
//! index and the value a JSON array of segments. The file-backed store writes
//! one file per key with locking, atomic replacement and backup rotation; the
//! in-memory store serves tests and ephemeral boards.

mod file;
mod options;
mod storage;
mod store;

pub use file::FileSlotStore;
pub use options::{DEFAULT_MAX_FILE_SIZE_BYTES, StoreOptions, options_from_config};
pub use storage::{SlotInspection, SlotStatus, inspect_slots};
pub use store::{
    LoadOutcome, MemorySlotStore, SlotKey, SlotStore, StoreError, decode_history, encode_history,
};

#[cfg(test)]
mod tests;
