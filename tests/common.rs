#![allow(dead_code)]
use dblocal::{Config, DbManager};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_dblocal.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Build a manager over a unique file-backed database for this test
pub fn manager_for(name: &str) -> DbManager {
    DbManager::new(Config::at_path(setup_test_db(name))).expect("valid config")
}
