use dblocal::{AppError, Config, Location};
use std::path::PathBuf;

mod common;

#[test]
fn test_default_config_values() {
    let cfg = Config::default();

    assert_eq!(cfg.busy_timeout_ms, 5000);
    assert_eq!(cfg.journal_mode, "WAL");
    assert!(cfg.foreign_keys);
    assert!(cfg.database.ends_with("dblocal.sqlite"));
}

#[test]
fn test_location_mapping() {
    assert_eq!(Config::in_memory().location(), Location::InMemory);

    let cfg = Config::at_path("/tmp/some.sqlite");
    assert_eq!(
        cfg.location(),
        Location::OnDisk {
            path: PathBuf::from("/tmp/some.sqlite")
        }
    );
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("dblocal.conf");

    let mut cfg = Config::at_path("/tmp/roundtrip.sqlite");
    cfg.busy_timeout_ms = 250;
    cfg.journal_mode = "DELETE".to_string();
    cfg.foreign_keys = false;

    cfg.save_to(&file).expect("save config");
    let loaded = Config::load_from(&file).expect("load config");

    assert_eq!(loaded.database, cfg.database);
    assert_eq!(loaded.busy_timeout_ms, 250);
    assert_eq!(loaded.journal_mode, "DELETE");
    assert!(!loaded.foreign_keys);
}

#[test]
fn test_load_from_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope.conf");

    assert!(matches!(Config::load_from(&missing), Err(AppError::Io(_))));
}

#[test]
fn test_load_from_malformed_file_is_a_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("broken.conf");
    std::fs::write(&file, "database: [unclosed\n").expect("write yaml");

    // Malformed and missing files must stay distinguishable.
    assert!(matches!(
        Config::load_from(&file),
        Err(AppError::ConfigLoad(_))
    ));
}

#[test]
fn test_partial_yaml_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("partial.conf");
    std::fs::write(&file, "database: /tmp/partial.sqlite\n").expect("write yaml");

    let cfg = Config::load_from(&file).expect("load partial config");

    assert_eq!(cfg.database, "/tmp/partial.sqlite");
    assert_eq!(cfg.busy_timeout_ms, 5000);
    assert_eq!(cfg.journal_mode, "WAL");
    assert!(cfg.foreign_keys);
}

#[test]
fn test_validate_rejects_unknown_journal_mode() {
    let mut cfg = Config::in_memory();
    cfg.journal_mode = "BANANA".to_string();

    assert!(matches!(cfg.validate(), Err(AppError::Config(_))));
}

#[test]
fn test_manager_rejects_invalid_config() {
    let mut cfg = Config::at_path(common::setup_test_db("invalid_cfg"));
    cfg.journal_mode = "NOPE".to_string();

    assert!(dblocal::DbManager::new(cfg).is_err());
}
