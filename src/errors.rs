use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the session, storage, config, and export layers.
///
/// The reconciliation arithmetic itself never fails; these variants only
/// surface from the surfaces that touch the filesystem or parse operator
/// commands.
#[derive(Debug, Error)]
pub enum ShiftError {
    #[error("Session not loaded")]
    SessionNotLoaded,
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Export error: {0}")]
    ExportError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, ShiftError>;

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ShiftError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for ShiftError {
    fn from(err: std::io::Error) -> Self {
        ShiftError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for ShiftError {
    fn from(err: serde_json::Error) -> Self {
        ShiftError::StorageError(err.to_string())
    }
}

impl From<csv::Error> for ShiftError {
    fn from(err: csv::Error) -> Self {
        ShiftError::ExportError(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_to_storage() {
        let err: ShiftError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ShiftError::StorageError(ref msg) if msg.contains("gone")));
    }

    #[test]
    fn cli_error_wraps_core_message() {
        let err = CliError::from(ShiftError::SessionNotLoaded);
        assert_eq!(err.to_string(), "Session not loaded");
    }
}
