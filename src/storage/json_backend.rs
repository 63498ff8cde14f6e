use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    config::DEFAULT_BACKUP_RETENTION,
    core::session::ReconciliationSession,
    errors::{Result, ShiftError},
    utils::{ensure_dir, files, PathResolver},
};

use super::StorageBackend;

const EXTENSION: &str = "json";
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Stores each session as pretty JSON under `<base>/sessions/<slug>.json`,
/// with timestamped copies under `<base>/backups/<slug>/`.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    sessions: PathBuf,
    backups: PathBuf,
    state: PathBuf,
    retention: usize,
}

/// Bookkeeping that outlives a single shell run.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    last_session: Option<String>,
}

impl JsonStorage {
    /// Lays out the store under `base` (or the resolved data directory),
    /// keeping at least one backup per session.
    pub fn new(base: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let base = PathResolver::resolve_base(base);
        let sessions = PathResolver::session_dir_in(&base);
        let backups = PathResolver::backup_dir_in(&base);
        ensure_dir(&sessions)?;
        ensure_dir(&backups)?;
        Ok(Self {
            state: PathResolver::state_file_in(&base),
            sessions,
            backups,
            retention: retention.unwrap_or(DEFAULT_BACKUP_RETENTION).max(1),
        })
    }

    fn backups_for(&self, name: &str) -> PathBuf {
        self.backups.join(canonical_name(name))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backups_for(name).join(backup_name)
    }

    fn state(&self) -> Result<StoreState> {
        if self.state.is_file() {
            files::read_json(&self.state)
        } else {
            Ok(StoreState::default())
        }
    }

    fn new_backup_name(name: &str, note: Option<&str>) -> String {
        files::stamped_file_name(&canonical_name(name), STAMP_FORMAT, note, EXTENSION)
    }

    /// Drops the oldest backups beyond the retention limit. Removal failures
    /// are logged and skipped.
    fn prune_backups(&self, name: &str) -> Result<()> {
        for stale in self.list_backups(name)?.iter().skip(self.retention) {
            let path = self.backup_path(name, stale);
            if let Err(err) = fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    /// Saving over an existing file first copies it into the backups.
    fn save(&self, session: &ReconciliationSession, name: &str) -> Result<PathBuf> {
        let path = self.session_path(name);
        if path.is_file() {
            let dir = self.backups_for(name);
            ensure_dir(&dir)?;
            let backup_name = Self::new_backup_name(name, None);
            fs::copy(&path, dir.join(&backup_name))?;
            tracing::debug!(session = name, backup = %backup_name, "previous session file backed up");
            self.prune_backups(name)?;
        }
        save_session_to_path(session, &path)?;
        Ok(path)
    }

    fn load(&self, name: &str) -> Result<ReconciliationSession> {
        let path = self.session_path(name);
        if !path.is_file() {
            return Err(ShiftError::StorageError(format!("no saved session named `{name}`")));
        }
        load_session_from_path(&path)
    }

    fn session_path(&self, name: &str) -> PathBuf {
        self.sessions
            .join(format!("{}.{EXTENSION}", canonical_name(name)))
    }

    fn list_sessions(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = files::file_names_with_ext(&self.sessions, EXTENSION)?
            .into_iter()
            .filter_map(|file| file.strip_suffix(".json").map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let mut names = files::file_names_with_ext(&self.backups_for(name), EXTENSION)?;
        files::sort_newest_first(&mut names, STAMP_FORMAT);
        Ok(names)
    }

    fn backup(
        &self,
        session: &ReconciliationSession,
        name: &str,
        note: Option<&str>,
    ) -> Result<String> {
        let backup_name = Self::new_backup_name(name, note);
        files::write_json(&self.backup_path(name, &backup_name), session)?;
        self.prune_backups(name)?;
        Ok(backup_name)
    }

    /// Copies the backup over the live session file and returns its contents.
    fn restore(&self, name: &str, backup_name: &str) -> Result<ReconciliationSession> {
        let source = self.backup_path(name, backup_name);
        if !source.is_file() {
            return Err(ShiftError::StorageError(format!(
                "no backup named `{backup_name}` for `{name}`"
            )));
        }
        let target = self.session_path(name);
        fs::copy(&source, &target)?;
        load_session_from_path(&target)
    }

    fn last_session(&self) -> Result<Option<String>> {
        Ok(self.state()?.last_session)
    }

    fn record_last_session(&self, name: Option<&str>) -> Result<()> {
        let mut state = self.state()?;
        state.last_session = name.map(canonical_name);
        files::write_json(&self.state, &state)
    }
}

pub fn save_session_to_path(session: &ReconciliationSession, path: &Path) -> Result<()> {
    files::write_json(path, session)
}

pub fn load_session_from_path(path: &Path) -> Result<ReconciliationSession> {
    files::read_json(path)
}

/// File-system slug for a session name: lowercase ASCII alphanumerics, everything else `_`.
pub fn canonical_name(name: &str) -> String {
    let slug: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if slug.chars().all(|c| c == '_') {
        "session".into()
    } else {
        slug
    }
}
