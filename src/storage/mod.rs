pub mod json_backend;

use std::path::{Path, PathBuf};

use crate::{core::session::ReconciliationSession, errors::Result};

/// Abstraction over persistence backends capable of storing sessions and their backups.
pub trait StorageBackend: Send + Sync {
    fn save(&self, session: &ReconciliationSession, name: &str) -> Result<PathBuf>;
    fn load(&self, name: &str) -> Result<ReconciliationSession>;
    fn session_path(&self, name: &str) -> PathBuf;
    fn list_sessions(&self) -> Result<Vec<String>>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn backup(&self, session: &ReconciliationSession, name: &str, note: Option<&str>)
        -> Result<String>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<ReconciliationSession>;
    fn last_session(&self) -> Result<Option<String>>;
    fn record_last_session(&self, name: Option<&str>) -> Result<()>;

    /// Ad-hoc file operations outside the managed sessions directory.
    fn save_to_path(&self, session: &ReconciliationSession, path: &Path) -> Result<()> {
        json_backend::save_session_to_path(session, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<ReconciliationSession> {
        json_backend::load_session_from_path(path)
    }
}

pub use json_backend::{canonical_name, JsonStorage};
