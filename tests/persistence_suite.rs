mod common;

use std::fs;

use common::{sample_session, setup_test_env, temp_base_dir};
use shift_core::{
    config::{Config, ConfigManager},
    core::{Profile, ReconciliationSession},
    errors::ShiftError,
    storage::{JsonStorage, StorageBackend},
    utils::files::staging_path,
};

#[test]
fn atomic_save_failure_preserves_original_file() {
    let base = temp_base_dir();
    let store = JsonStorage::new(Some(base), Some(2)).unwrap();

    let mut session = sample_session();
    let path = store.save(&session, "reliable").expect("initial save");
    let original = fs::read_to_string(&path).expect("read original file");

    // A directory sitting on the staging path makes the write fail.
    fs::create_dir_all(staging_path(&path)).unwrap();

    session.update_money_management_field("cash", "1");
    let result = store.save_to_path(&session, &path);
    assert!(result.is_err(), "expected save_to_path to fail");

    let current = fs::read_to_string(&path).expect("read after failure");
    assert_eq!(current, original, "original file should be untouched");
}

#[test]
fn sample_session_survives_a_roundtrip() {
    let (mut manager, _config, _base) = setup_test_env();
    let mut session = sample_session();
    session.add_sales_management_field("Propane");
    session.update_sales_management_field("propane", "12");
    session.submit_sales_management();
    session.submit_in_hand();
    manager.set_current(session, None, None);
    manager.save_as("Sample Shift").unwrap();
    let saved = manager.session().unwrap().clone();

    manager.clear();
    let loaded = manager.load("sample shift").unwrap().clone();
    assert_eq!(loaded, saved);
    assert_eq!(loaded.lottery_ledger().book("$5").unwrap().abs_total(), 150.0);
    assert_eq!(loaded.snapshot().sales_management.value("propane"), Some("12"));
    assert_eq!(manager.list_sessions().unwrap(), vec!["sample_shift"]);
}

#[test]
fn retention_limits_backups() {
    let (mut manager, _config, _base) = setup_test_env();
    manager.create("Busy");
    manager.save_as("busy").unwrap();
    for note in ["one", "two", "three", "four"] {
        manager.backup(Some(note)).unwrap();
    }
    assert!(manager.list_backups("busy").unwrap().len() <= 3);
}

#[test]
fn missing_sessions_are_storage_errors() {
    let (mut manager, _config, _base) = setup_test_env();
    match manager.load("nobody") {
        Err(ShiftError::StorageError(message)) => assert!(message.contains("nobody")),
        other => panic!("expected storage error, got {other:?}"),
    }
}

#[test]
fn older_files_load_with_defaults() {
    let base = temp_base_dir();
    let path = base.join("legacy.json");
    let session = ReconciliationSession::new("Legacy");
    let mut json: serde_json::Value = serde_json::to_value(&session).unwrap();
    let object = json.as_object_mut().unwrap();
    object.remove("snapshot");
    object.remove("catalog");
    object.remove("schema_version");
    fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();

    let store = JsonStorage::new(Some(base), None).unwrap();
    let loaded = store.load_from_path(&path).unwrap();
    assert_eq!(loaded.schema_version, 1);
    assert!(loaded.ticket_catalog().contains("$50", "1529"));
    assert!(loaded.snapshot().sales_management.is_empty());
}

#[test]
fn config_roundtrip_and_backups() {
    let (_manager, config_manager, base) = setup_test_env();
    assert_eq!(config_manager.load().unwrap(), Config::default());

    let mut config = Config::default();
    config.set_value("profile", "clerk").unwrap();
    config.set_value("backup_retention", "0").unwrap();
    config_manager.save(&config).unwrap();

    let reopened = ConfigManager::with_base_dir(base).unwrap();
    let loaded = reopened.load().unwrap();
    assert_eq!(loaded.profile, Profile::Clerk);
    assert_eq!(loaded.backup_retention, 1);

    let backup = reopened.backup(&loaded, Some("before close")).unwrap();
    assert!(backup.starts_with("config_"));
    assert_eq!(reopened.list_backups().unwrap(), vec![backup.clone()]);
    assert_eq!(reopened.restore(&backup).unwrap(), loaded);

    assert!(matches!(
        config.set_value("colour", "on"),
        Err(ShiftError::ConfigError(_))
    ));
}
