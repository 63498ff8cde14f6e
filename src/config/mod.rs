use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::access::Profile,
    errors::{Result, ShiftError},
    utils::{ensure_dir, files, PathResolver},
};

const EXTENSION: &str = "json";
const STAMP_FORMAT: &str = "%Y%m%d_%H%M";

pub const DEFAULT_BACKUP_RETENTION: usize = 5;

/// User preferences for the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub profile: Profile,
    /// Where `export` writes when no path is given. Defaults to `<data dir>/exports`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_session: Option<String>,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            export_dir: None,
            last_opened_session: None,
            backup_retention: Self::default_backup_retention(),
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub fn default_backup_retention() -> usize {
        DEFAULT_BACKUP_RETENTION
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_export_dir(&self, base: &Path) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathResolver::export_dir_in(base))
    }

    /// Applies `key=value` from the shell. Unknown keys and malformed values are rejected.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "profile" => {
                self.profile = Profile::parse(value).ok_or_else(|| {
                    ShiftError::ConfigError(format!("unknown profile `{value}`"))
                })?;
            }
            "export_dir" => {
                self.export_dir = optional(value).map(PathBuf::from);
            }
            "last_opened_session" => {
                self.last_opened_session = optional(value).map(str::to_string);
            }
            "backup_retention" => {
                let retention: usize = value.trim().parse().map_err(|_| {
                    ShiftError::ConfigError(format!("`{value}` is not a whole number"))
                })?;
                self.backup_retention = retention.max(1);
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = parse_flag(value).ok_or_else(|| {
                    ShiftError::ConfigError(format!("`{value}` is not on/off"))
                })?;
            }
            other => {
                return Err(ShiftError::ConfigError(format!(
                    "unknown configuration key `{other}`"
                )))
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("profile", self.profile.to_string()),
            (
                "export_dir",
                self.export_dir
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "(default)".into()),
            ),
            (
                "last_opened_session",
                self.last_opened_session
                    .clone()
                    .unwrap_or_else(|| "(none)".into()),
            ),
            ("backup_retention", self.backup_retention.to_string()),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
        ]
    }
}

fn optional(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(value)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Reads and writes `config/config.json` and keeps dated copies of it in
/// `config/backups/`.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    file: PathBuf,
    backups: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        let backups = PathResolver::config_backup_dir_in(&base);
        ensure_dir(&backups)?;
        Ok(Self {
            file: PathResolver::config_file_in(&base),
            backups,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(&self) -> Result<Config> {
        if !self.file.is_file() {
            return Ok(Config::default());
        }
        parse_config(&self.file)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        files::write_json(&self.file, config)?;
        tracing::debug!(path = %self.file.display(), "configuration saved");
        Ok(())
    }

    /// Writes a dated copy of `config` and returns its file name.
    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String> {
        let name = files::stamped_file_name("config", STAMP_FORMAT, note, EXTENSION);
        files::write_json(&self.backups.join(&name), config)?;
        Ok(name)
    }

    pub fn restore(&self, backup_name: &str) -> Result<Config> {
        let path = self.backups.join(backup_name);
        if !path.is_file() {
            return Err(ShiftError::ConfigError(format!(
                "no configuration backup named `{backup_name}`"
            )));
        }
        parse_config(&path)
    }

    /// Backup file names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>> {
        let mut names = files::file_names_with_ext(&self.backups, EXTENSION)?;
        files::sort_newest_first(&mut names, STAMP_FORMAT);
        Ok(names)
    }
}

fn parse_config(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|err| ShiftError::ConfigError(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert!(manager.path().ends_with("config/config.json"));
    }

    #[test]
    fn save_then_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.set_value("profile", "clerk").unwrap();
        config.set_value("backup_retention", "0").unwrap();
        config.set_value("ui_color_enabled", "off").unwrap();
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.profile, Profile::Clerk);
        assert_eq!(loaded.backup_retention, 1);
        assert!(!loaded.ui_color_enabled);
        assert!(!files::staging_path(manager.path()).exists());
    }

    #[test]
    fn set_value_rejects_unknown_keys() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_value("theme", "dark"),
            Err(ShiftError::ConfigError(_))
        ));
        assert!(config.set_value("profile", "owner").is_err());
        config.set_value("export_dir", "none").unwrap();
        assert_eq!(config.export_dir, None);
    }

    #[test]
    fn backups_can_be_restored() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.set_value("last_opened_session", "monday").unwrap();
        let name = manager.backup(&config, Some("Before Close")).unwrap();
        assert!(name.starts_with("config_"));
        assert!(name.ends_with("_before-close.json"));
        assert_eq!(manager.list_backups().unwrap(), vec![name.clone()]);
        assert_eq!(manager.restore(&name).unwrap(), config);
        assert!(manager.restore("config_missing.json").is_err());
    }
}
