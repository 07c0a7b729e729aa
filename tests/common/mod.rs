#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use stash_core::{
    core::time::FixedClock,
    storage::{FileStorage, KeyValueStorage, MemoryStorage},
    StashManager,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
}

/// Creates a unique directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Manager over fresh in-memory storage and a clock pinned to `fixed_instant`.
pub fn memory_manager() -> (StashManager, Arc<MemoryStorage>, Arc<FixedClock>) {
    let storage = Arc::new(MemoryStorage::new());
    let clock = Arc::new(FixedClock::new(fixed_instant()));
    let manager = StashManager::new(storage.clone(), clock.clone());
    (manager, storage, clock)
}

/// Manager over file storage in an isolated directory.
pub fn file_manager() -> (StashManager, FileStorage, Arc<FixedClock>) {
    let storage = FileStorage::new(temp_base().join("data")).expect("create file storage");
    let clock = Arc::new(FixedClock::new(fixed_instant()));
    let shared: Arc<dyn KeyValueStorage> = Arc::new(storage.clone());
    (StashManager::new(shared, clock.clone()), storage, clock)
}
