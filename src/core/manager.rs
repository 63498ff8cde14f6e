use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::session::{ReconciliationSession, CURRENT_SCHEMA_VERSION};
use crate::errors::{Result, ShiftError};
use crate::storage::StorageBackend;

/// Facade that owns the working session and coordinates persistence and backups.
pub struct SessionManager {
    pub current: Option<ReconciliationSession>,
    current_name: Option<String>,
    current_path: Option<PathBuf>,
    storage: Box<dyn StorageBackend>,
}

impl SessionManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            current: None,
            current_name: None,
            current_path: None,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    /// Starts a fresh, unsaved session and makes it current.
    pub fn create(&mut self, name: &str) -> &mut ReconciliationSession {
        info!(session = name, "new session started");
        self.current_name = None;
        self.current_path = None;
        self.current.insert(ReconciliationSession::new(name))
    }

    pub fn session(&self) -> Result<&ReconciliationSession> {
        self.current.as_ref().ok_or(ShiftError::SessionNotLoaded)
    }

    pub fn session_mut(&mut self) -> Result<&mut ReconciliationSession> {
        self.current.as_mut().ok_or(ShiftError::SessionNotLoaded)
    }

    pub fn load(&mut self, name: &str) -> Result<&ReconciliationSession> {
        let session = self.storage.load(name)?;
        ensure_schema_support(session.schema_version)?;
        let path = self.storage.session_path(name);
        info!(session = name, path = %path.display(), "session loaded");
        self.set_current(session, Some(path), Some(name.to_string()));
        self.record_last_opened(Some(name))?;
        self.session()
    }

    pub fn load_from_path(&mut self, path: &Path) -> Result<&ReconciliationSession> {
        let session = self.storage.load_from_path(path)?;
        ensure_schema_support(session.schema_version)?;
        info!(path = %path.display(), "session loaded from file");
        self.set_current(session, Some(path.to_path_buf()), None);
        self.session()
    }

    pub fn save(&mut self) -> Result<PathBuf> {
        self.session()?;
        if let Some(name) = self.current_name.clone() {
            return self.save_as(&name);
        }
        match self.current_path.clone() {
            Some(path) => {
                self.save_to_path(&path)?;
                Ok(path)
            }
            None => Err(ShiftError::StorageError(
                "current session has no name yet; use `session save <name>`".into(),
            )),
        }
    }

    pub fn save_as(&mut self, name: &str) -> Result<PathBuf> {
        let session = self.current.as_mut().ok_or(ShiftError::SessionNotLoaded)?;
        session.touch();
        let path = self.storage.save(session, name)?;
        info!(session = name, path = %path.display(), "session saved");
        self.current_name = Some(name.to_string());
        self.current_path = Some(path.clone());
        self.record_last_opened(Some(name))?;
        Ok(path)
    }

    pub fn save_to_path(&mut self, path: &Path) -> Result<()> {
        let session = self.current.as_mut().ok_or(ShiftError::SessionNotLoaded)?;
        session.touch();
        self.storage.save_to_path(session, path)?;
        info!(path = %path.display(), "session saved to file");
        self.current_path = Some(path.to_path_buf());
        self.current_name = None;
        Ok(())
    }

    pub fn backup(&self, note: Option<&str>) -> Result<String> {
        let session = self.session()?;
        let name = self
            .current_name
            .as_deref()
            .ok_or_else(|| ShiftError::StorageError("current session is unnamed".into()))?;
        let backup = self.storage.backup(session, name, note)?;
        info!(session = name, backup = %backup, "backup created");
        Ok(backup)
    }

    pub fn list_sessions(&self) -> Result<Vec<String>> {
        self.storage.list_sessions()
    }

    pub fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        self.storage.list_backups(name)
    }

    /// Restores a backup over the named session and makes it current.
    pub fn restore(&mut self, name: &str, backup_name: &str) -> Result<&ReconciliationSession> {
        let session = self.storage.restore(name, backup_name)?;
        ensure_schema_support(session.schema_version)?;
        info!(session = name, backup = backup_name, "backup restored");
        let path = self.storage.session_path(name);
        self.set_current(session, Some(path), Some(name.to_string()));
        self.session()
    }

    pub fn last_opened(&self) -> Result<Option<String>> {
        self.storage.last_session()
    }

    pub fn record_last_opened(&self, name: Option<&str>) -> Result<()> {
        self.storage.record_last_session(name)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn set_current(
        &mut self,
        session: ReconciliationSession,
        path: Option<PathBuf>,
        name: Option<String>,
    ) {
        self.current = Some(session);
        self.current_path = path;
        self.current_name = name;
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.current_name = None;
        self.current_path = None;
    }
}

fn ensure_schema_support(schema_version: u8) -> Result<()> {
    if schema_version > CURRENT_SCHEMA_VERSION {
        return Err(ShiftError::StorageError(format!(
            "session schema v{} is newer than supported v{}",
            schema_version, CURRENT_SCHEMA_VERSION
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStorage;
    use std::fs;
    use tempfile::tempdir;

    fn manager_in(dir: &Path) -> SessionManager {
        let store = JsonStorage::new(Some(dir.to_path_buf()), Some(3)).unwrap();
        SessionManager::new(Box::new(store))
    }

    #[test]
    fn save_and_load_named_roundtrip() {
        let temp = tempdir().unwrap();
        let mut manager = manager_in(temp.path());
        manager
            .create("Morning")
            .update_money_management_field("cash", "15");
        let path = manager.save_as("morning-shift").expect("save session");
        assert!(path.exists());

        manager.clear();
        assert!(matches!(manager.session(), Err(ShiftError::SessionNotLoaded)));
        let loaded = manager.load("morning-shift").expect("load session");
        assert_eq!(loaded.money_management().cash, "15");
        assert_eq!(manager.current_name(), Some("morning-shift"));
        assert_eq!(
            manager.last_opened().unwrap().as_deref(),
            Some("morning_shift")
        );
    }

    #[test]
    fn save_without_a_name_is_an_error() {
        let temp = tempdir().unwrap();
        let mut manager = manager_in(temp.path());
        assert!(matches!(manager.save(), Err(ShiftError::SessionNotLoaded)));
        manager.create("Unnamed");
        assert!(matches!(manager.save(), Err(ShiftError::StorageError(_))));
    }

    #[test]
    fn backup_uses_timestamped_names() {
        let temp = tempdir().unwrap();
        let mut manager = manager_in(temp.path());
        manager.create("Evening");
        manager.save_as("evening").unwrap();

        let backup = manager.backup(Some("Drawer Count")).expect("create backup");
        assert!(backup.starts_with("evening_"));
        assert!(backup.contains("drawer-count"));
        assert_eq!(manager.list_backups("evening").unwrap(), vec![backup.clone()]);

        manager.restore("evening", &backup).expect("restore backup");
        assert_eq!(manager.session().unwrap().name, "Evening");
    }

    #[test]
    fn rejects_future_schema_versions() {
        let temp = tempdir().unwrap();
        let mut manager = manager_in(temp.path());

        let path = temp.path().join("future.json");
        let mut session = ReconciliationSession::new("Future");
        session.schema_version = CURRENT_SCHEMA_VERSION + 5;
        fs::write(&path, serde_json::to_string(&session).unwrap()).unwrap();

        let err = manager
            .load_from_path(&path)
            .expect_err("load future schema should fail");
        match err {
            ShiftError::StorageError(message) => {
                assert!(message.contains("newer"), "unexpected error: {message}");
            }
            other => panic!("expected storage error, got {other:?}"),
        }
    }
}
