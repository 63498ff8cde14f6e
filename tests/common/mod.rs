#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use shift_core::{
    config::ConfigManager,
    core::{ReconciliationSession, SessionManager},
    ledger::{FuelKind, FuelReadingPatch},
    storage::JsonStorage,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh data directory that outlives the calling test.
pub fn temp_base_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated managers backed by unique directories for each test.
pub fn setup_test_env() -> (SessionManager, ConfigManager, PathBuf) {
    let base = temp_base_dir();
    let storage = JsonStorage::new(Some(base.clone()), Some(3)).expect("create json storage backend");
    let session_manager = SessionManager::new(Box::new(storage));
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (session_manager, config_manager, base)
}

pub fn fuel_patch(pairs: &[(&str, &str)]) -> FuelReadingPatch {
    let mut patch = FuelReadingPatch::default();
    for (key, value) in pairs {
        assert!(patch.set(key, *value), "unknown fuel field {key}");
    }
    patch
}

/// A 2024 shift with something in every form.
pub fn sample_session() -> ReconciliationSession {
    let mut session = ReconciliationSession::for_year("Sample Shift", 2024);
    session.record_ticket_reading("$5", "1514", "10", "40");
    session.record_ticket_reading("$20", "1543", "5", "2");
    session.record_fuel_reading(
        FuelKind::Gas,
        2,
        29,
        fuel_patch(&[("openingStock", "1000"), ("todaySale", "250"), ("newStock", "50")]),
    );
    session.update_sales_management_fields([("gasSales", "300"), ("deliSales", "40")]);
    session.update_sales_totals_fields([("gas", "20"), ("lotto", "5")]);
    session.update_money_management_fields([("cash", "150"), ("cashToATM", "25")]);
    session.update_cash_field("cashOnHand", "100");
    session.update_cash_field("cashFromStore", "50");
    session.update_cash_field("cashToBank", "30");
    session.update_cash_field("extraCash", "20");
    session.update_check_field("checkOnHand", "80");
    session.update_check_field("instantBook", "999");
    session
}
