#![allow(dead_code)]

use std::{path::PathBuf, sync::{Arc, Mutex}};

use chrono::{TimeZone, Utc};
use fintrack::{config::ConfigManager, core::BookManager};
use fintrack_core::FixedClock;
use fintrack_storage_json::{JsonEntryStorage, StoragePaths};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh directory kept alive until the test binary exits.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated managers backed by unique directories for each test.
pub fn setup_test_env() -> (BookManager, ConfigManager) {
    let base = temp_base();
    let storage = JsonEntryStorage::with_retention(StoragePaths::under(&base), 3)
        .expect("create json storage backend");
    let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()));
    let book_manager = BookManager::new(Box::new(storage), clock);
    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");

    (book_manager, config_manager)
}
