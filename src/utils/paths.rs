use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use dirs::home_dir;

/// Overrides the data directory when set.
pub const HOME_ENV: &str = "SHIFT_CORE_HOME";

const DEFAULT_DIR_NAME: &str = ".shift_core";
const SESSION_DIR: &str = "sessions";
const BACKUP_DIR: &str = "backups";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const EXPORT_DIR: &str = "exports";
const STATE_FILE: &str = "state.json";

/// Resolves the on-disk layout under the data directory.
pub struct PathResolver;

impl PathResolver {
    /// `$SHIFT_CORE_HOME`, else `~/.shift_core`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(Self::base_dir)
    }

    pub fn session_dir_in(base: &Path) -> PathBuf {
        base.join(SESSION_DIR)
    }

    pub fn backup_dir_in(base: &Path) -> PathBuf {
        base.join(BACKUP_DIR)
    }

    pub fn config_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_FILE)
    }

    pub fn config_backup_dir_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(BACKUP_DIR)
    }

    pub fn export_dir_in(base: &Path) -> PathBuf {
        base.join(EXPORT_DIR)
    }

    pub fn state_file_in(base: &Path) -> PathBuf {
        base.join(STATE_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_hangs_off_the_base() {
        let base = Path::new("/data/shift");
        assert_eq!(
            PathResolver::config_file_in(base),
            PathBuf::from("/data/shift/config/config.json")
        );
        assert_eq!(
            PathResolver::config_backup_dir_in(base),
            PathBuf::from("/data/shift/config/backups")
        );
        assert_eq!(
            PathResolver::session_dir_in(base),
            PathBuf::from("/data/shift/sessions")
        );
    }

    #[test]
    fn explicit_root_wins() {
        let root = PathBuf::from("/tmp/elsewhere");
        assert_eq!(PathResolver::resolve_base(Some(root.clone())), root);
    }
}
