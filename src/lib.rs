#![doc(test(attr(deny(warnings))))]

//! Shift Core reconciles a gas station shift: lottery ticket roll-over,
//! daily fuel stock, sales and money forms, cash and check in hand, and a
//! submitted snapshot that feeds the summary view and the CSV export.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod export;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!(build = %utils::build_info::current().summary(), "Shift Core tracing initialized.");
    });
}
