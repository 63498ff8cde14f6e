pub mod commands;
pub mod core;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
mod shell;
pub mod table;

pub use shell::{run_cli, SCRIPT_ENV};
