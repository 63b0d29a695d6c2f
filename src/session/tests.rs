use super::*;
use crate::config::{StorageConfig, StorageMode};
use crate::draw::{DrawingHistory, LineSegment};
use std::fs;

fn sample_history() -> DrawingHistory {
    DrawingHistory::from(vec![
        LineSegment::new(10.0, 10.0, 50.0, 60.0),
        LineSegment::new(0.5, 1.25, 249.0, 299.0),
    ])
}

fn file_store(dir: &std::path::Path) -> FileSlotStore {
    FileSlotStore::new(StoreOptions::new(dir.to_path_buf()))
}

#[test]
fn slot_key_is_stringified_index() {
    assert_eq!(SlotKey::new(0).to_string(), "0");
    assert_eq!(SlotKey::from(12).to_string(), "12");
}

#[test]
fn memory_store_round_trip_preserves_order() {
    let store = MemorySlotStore::new();
    let history = sample_history();
    store.save(SlotKey::new(3), &history).unwrap();

    assert_eq!(
        store.load(SlotKey::new(3)).unwrap(),
        LoadOutcome::Found(history)
    );
    assert_eq!(store.write_count(), 1);
}

#[test]
fn memory_store_distinguishes_empty_from_missing() {
    let store = MemorySlotStore::new();
    assert_eq!(store.load(SlotKey::new(0)).unwrap(), LoadOutcome::NotFound);

    store.save(SlotKey::new(0), &DrawingHistory::new()).unwrap();
    assert_eq!(
        store.load(SlotKey::new(0)).unwrap(),
        LoadOutcome::Found(DrawingHistory::new())
    );
    assert_eq!(store.raw(0).as_deref(), Some("[]"));
}

#[test]
fn memory_store_reports_corrupted_values() {
    let store = MemorySlotStore::new();
    store.insert_raw(1, "{not json");
    assert!(matches!(
        store.load(SlotKey::new(1)).unwrap(),
        LoadOutcome::Malformed(_)
    ));
    assert_eq!(store.write_count(), 0);
}

#[test]
fn last_write_wins_and_keys_are_independent() {
    let store = MemorySlotStore::new();
    store.save(SlotKey::new(0), &sample_history()).unwrap();
    store.save(SlotKey::new(1), &sample_history()).unwrap();
    store.save(SlotKey::new(0), &DrawingHistory::new()).unwrap();

    assert_eq!(
        store.load(SlotKey::new(0)).unwrap(),
        LoadOutcome::Found(DrawingHistory::new())
    );
    assert_eq!(
        store.load(SlotKey::new(1)).unwrap(),
        LoadOutcome::Found(sample_history())
    );
}

#[test]
fn decode_rejects_negative_coordinates() {
    let raw = br#"[{"x1":-1,"y1":0,"x2":5,"y2":5}]"#;
    assert!(matches!(
        decode_history(raw),
        LoadOutcome::Malformed(_)
    ));
}

#[test]
fn decode_rejects_records_with_missing_fields() {
    let raw = br#"[{"x1":1,"y1":2}]"#;
    assert!(matches!(
        decode_history(raw),
        LoadOutcome::Malformed(_)
    ));
}

#[test]
fn decode_keeps_every_segment() {
    let long: DrawingHistory = (0..50)
        .map(|i| LineSegment::new(i as f64, 0.0, i as f64, 10.0))
        .collect();
    let raw = encode_history(SlotKey::new(0), &long).unwrap();
    assert_eq!(decode_history(raw.as_bytes()), LoadOutcome::Found(long));
}

#[test]
fn file_store_loads_histories_longer_than_segment_limit() {
    let temp = tempfile::tempdir().unwrap();
    let mut options = StoreOptions::new(temp.path().to_path_buf());
    options.max_segments_per_slot = 1;
    let store = FileSlotStore::new(options);

    store.save(SlotKey::new(0), &sample_history()).unwrap();
    assert_eq!(
        store.load(SlotKey::new(0)).unwrap(),
        LoadOutcome::Found(sample_history())
    );
}

#[test]
fn file_store_round_trip_and_layout() {
    let temp = tempfile::tempdir().unwrap();
    let store = file_store(temp.path());
    let history = sample_history();

    store.save(SlotKey::new(0), &history).unwrap();

    let on_disk = fs::read_to_string(temp.path().join("0.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
    assert_eq!(
        parsed[0],
        serde_json::json!({"x1": 10.0, "y1": 10.0, "x2": 50.0, "y2": 60.0})
    );
    assert_eq!(
        store.load(SlotKey::new(0)).unwrap(),
        LoadOutcome::Found(history)
    );
}

#[test]
fn file_store_missing_value_is_not_found() {
    let temp = tempfile::tempdir().unwrap();
    let store = file_store(&temp.path().join("never-created"));
    assert_eq!(store.load(SlotKey::new(5)).unwrap(), LoadOutcome::NotFound);
}

#[test]
fn file_store_rotates_backup() {
    let temp = tempfile::tempdir().unwrap();
    let store = file_store(temp.path());

    store.save(SlotKey::new(2), &sample_history()).unwrap();
    store.save(SlotKey::new(2), &DrawingHistory::new()).unwrap();

    assert_eq!(
        fs::read_to_string(temp.path().join("2.json")).unwrap(),
        "[]"
    );
    let backup = fs::read_to_string(temp.path().join("2.json.bak")).unwrap();
    let restored: DrawingHistory = serde_json::from_str(&backup).unwrap();
    assert_eq!(restored, sample_history());
}

#[test]
fn file_store_without_backup_leaves_no_bak_file() {
    let temp = tempfile::tempdir().unwrap();
    let mut options = StoreOptions::new(temp.path().to_path_buf());
    options.backup = false;
    let store = FileSlotStore::new(options);

    store.save(SlotKey::new(0), &sample_history()).unwrap();
    store.save(SlotKey::new(0), &sample_history()).unwrap();
    assert!(!temp.path().join("0.json.bak").exists());
    assert!(!temp.path().join("0.json.tmp").exists());
}

fn temp_files(dir: &std::path::Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.contains(".tmp"))
        .collect()
}

#[test]
fn failed_backup_keeps_previous_value() {
    let temp = tempfile::tempdir().unwrap();
    let store = file_store(temp.path());
    store.save(SlotKey::new(3), &sample_history()).unwrap();

    // A directory in place of the backup file makes the copy fail
    let blocked = temp.path().join("3.json.bak");
    fs::remove_file(&blocked).ok();
    fs::create_dir(&blocked).unwrap();
    fs::write(blocked.join("keep"), "x").unwrap();

    let err = store.save(SlotKey::new(3), &DrawingHistory::new()).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert_eq!(
        store.load(SlotKey::new(3)).unwrap(),
        LoadOutcome::Found(sample_history())
    );
    assert!(temp_files(temp.path()).is_empty());
}

#[test]
fn failed_replace_removes_temporary_file() {
    let temp = tempfile::tempdir().unwrap();
    let mut options = StoreOptions::new(temp.path().to_path_buf());
    options.backup = false;
    let store = FileSlotStore::new(options);

    let blocked = temp.path().join("5.json");
    fs::create_dir(&blocked).unwrap();
    fs::write(blocked.join("keep"), "x").unwrap();

    for _ in 0..3 {
        assert!(store.save(SlotKey::new(5), &sample_history()).is_err());
    }
    assert!(temp_files(temp.path()).is_empty());
    assert!(blocked.join("keep").exists());
}

#[test]
fn file_store_reports_corrupted_file() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("4.json"), "garbage").unwrap();
    let store = file_store(temp.path());
    assert!(matches!(
        store.load(SlotKey::new(4)).unwrap(),
        LoadOutcome::Malformed(_)
    ));
    assert_eq!(fs::read_to_string(temp.path().join("4.json")).unwrap(), "garbage");
}

#[test]
fn file_store_enforces_size_limit() {
    let temp = tempfile::tempdir().unwrap();
    let mut options = StoreOptions::new(temp.path().to_path_buf());
    options.max_file_size_bytes = 16;
    let store = FileSlotStore::new(options);

    let err = store.save(SlotKey::new(0), &sample_history()).unwrap_err();
    assert!(matches!(err, StoreError::TooLarge { .. }));
    assert!(!temp.path().join("0.json").exists());

    fs::write(temp.path().join("0.json"), "[".repeat(64)).unwrap();
    assert!(matches!(
        store.load(SlotKey::new(0)).unwrap(),
        LoadOutcome::Malformed(_)
    ));
}

#[test]
fn options_from_config_custom_storage() {
    let temp = tempfile::tempdir().unwrap();
    let custom_dir = temp.path().join("histories");

    let cfg = StorageConfig {
        storage: StorageMode::Custom,
        custom_directory: Some(custom_dir.to_string_lossy().to_string()),
        max_segments_per_slot: 7,
        max_file_size_mb: 2,
        backup: false,
    };

    let options = options_from_config(&cfg, temp.path()).unwrap();
    assert_eq!(options.base_dir, custom_dir);
    assert_eq!(options.max_segments_per_slot, 7);
    assert_eq!(options.max_file_size_bytes, 2 * 1024 * 1024);
    assert!(!options.backup);
    assert_eq!(options.value_path(SlotKey::new(3)), custom_dir.join("3.json"));
}

#[test]
fn options_from_config_config_storage_uses_config_dir() {
    let temp = tempfile::tempdir().unwrap();
    let cfg = StorageConfig {
        storage: StorageMode::Config,
        ..StorageConfig::default()
    };

    let options = options_from_config(&cfg, temp.path()).unwrap();
    assert_eq!(options.base_dir, temp.path());
    assert_eq!(options.lock_path(SlotKey::new(1)), temp.path().join("1.lock"));
}

#[test]
fn options_from_config_custom_without_directory_fails() {
    let temp = tempfile::tempdir().unwrap();
    let cfg = StorageConfig {
        storage: StorageMode::Custom,
        custom_directory: None,
        ..StorageConfig::default()
    };
    assert!(options_from_config(&cfg, temp.path()).is_err());
}

#[test]
fn inspect_reports_each_slot() {
    let temp = tempfile::tempdir().unwrap();
    let options = StoreOptions::new(temp.path().to_path_buf());
    let store = FileSlotStore::new(options.clone());
    store.save(SlotKey::new(0), &sample_history()).unwrap();
    fs::write(temp.path().join("2.json"), "nope").unwrap();

    let report = inspect_slots(&options, 3).unwrap();
    assert_eq!(report.len(), 3);

    assert!(report[0].exists);
    assert_eq!(report[0].status, SlotStatus::Stored { segments: 2 });
    assert!(report[0].size_bytes.unwrap() > 0);
    assert!(!report[0].backup_exists);

    assert!(!report[1].exists);
    assert_eq!(report[1].status, SlotStatus::Missing);

    assert!(matches!(report[2].status, SlotStatus::Malformed(_)));
}
