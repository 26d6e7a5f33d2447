#![allow(dead_code)]

use std::sync::Once;
use tempfile::TempDir;
use tracklet::files::PresignedStore;
use tracklet::rpc::Router;
use tracklet::storage::SqliteStorage;

pub mod fixtures;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(tracklet::logging::init_test_logging);
}

pub fn test_db() -> SqliteStorage {
    init_test_logging();
    SqliteStorage::open_memory().expect("Failed to create test database")
}

pub fn test_db_with_dir() -> (SqliteStorage, TempDir) {
    init_test_logging();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join(".tracklet").join("tracklet.db");
    std::fs::create_dir_all(db_path.parent().unwrap()).unwrap();
    let storage = SqliteStorage::open(&db_path).expect("Failed to create test database");
    (storage, dir)
}

pub fn test_store() -> PresignedStore {
    PresignedStore::new("http://localhost:9000", "avatars-test", "test-secret", 60)
}

pub fn test_router() -> Router {
    Router::new(test_db(), test_store())
}
