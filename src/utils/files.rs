//! File helpers shared by the config store, the session store, and export.

use std::{
    cmp::Reverse,
    ffi::{OsStr, OsString},
    fs,
    path::{Path, PathBuf},
};

use chrono::{NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::Result;

use super::ensure_dir;

/// Sibling file a write is staged in before being renamed over the target.
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `contents` to a staging file and renames it over `path`, so a
/// failed write never truncates the existing file.
pub fn replace_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        ensure_dir(dir)?;
    }
    let staged = staging_path(path);
    fs::write(&staged, contents)?;
    fs::rename(&staged, path)?;
    Ok(())
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    replace_file(path, serde_json::to_string_pretty(value)?)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Reduces a free-form backup note to lowercase words joined by `-`.
/// Returns `None` when nothing usable is left.
pub fn note_slug(note: Option<&str>) -> Option<String> {
    let words: Vec<String> = note?
        .split(|c: char| c.is_whitespace() || c == '-' || c == '.')
        .map(|word| {
            word.chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect();
    (!words.is_empty()).then(|| words.join("-"))
}

/// `<prefix>_<now formatted with stamp_format>[_<note>].<ext>`
pub fn stamped_file_name(prefix: &str, stamp_format: &str, note: Option<&str>, ext: &str) -> String {
    let stamp = Utc::now().format(stamp_format);
    match note_slug(note) {
        Some(slug) => format!("{prefix}_{stamp}_{slug}.{ext}"),
        None => format!("{prefix}_{stamp}.{ext}"),
    }
}

/// Finds the rightmost `<date>_<time>` pair in a file name that parses with
/// `stamp_format`.
pub fn embedded_stamp(name: &str, stamp_format: &str) -> Option<NaiveDateTime> {
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    let parts: Vec<&str> = stem.split('_').collect();
    parts.windows(2).rev().find_map(|pair| {
        let digits = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
        if !digits(pair[0]) || !digits(pair[1]) {
            return None;
        }
        NaiveDateTime::parse_from_str(&format!("{}_{}", pair[0], pair[1]), stamp_format).ok()
    })
}

/// Newest stamp first; names without a stamp sink to the end.
pub fn sort_newest_first(names: &mut [String], stamp_format: &str) {
    names.sort_by_cached_key(|name| Reverse((embedded_stamp(name, stamp_format), name.clone())));
}

/// File names in `dir` with extension `ext`. A missing directory is empty.
pub fn file_names_with_ext(dir: &Path, ext: &str) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension() != Some(OsStr::new(ext)) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(OsStr::to_str) {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn notes_become_dashed_slugs() {
        assert_eq!(note_slug(Some("Before Audit")).as_deref(), Some("before-audit"));
        assert_eq!(note_slug(Some(" a - b.c ")).as_deref(), Some("a-b-c"));
        assert_eq!(note_slug(Some("!!!")), None);
        assert_eq!(note_slug(None), None);
    }

    #[test]
    fn stamps_are_found_next_to_notes() {
        let format = "%Y%m%d_%H%M%S";
        let stamp = embedded_stamp("night_shift_20240301_221500_pre-close.json", format).unwrap();
        assert_eq!(stamp.to_string(), "2024-03-01 22:15:00");
        assert!(embedded_stamp("config_20240301_2215.json", format).is_none());
        assert!(embedded_stamp("config_20240301_2215.json", "%Y%m%d_%H%M").is_some());
    }

    #[test]
    fn newest_first_keeps_unstamped_last() {
        let mut names = vec![
            "a_20240101_0800.json".to_string(),
            "loose.json".to_string(),
            "a_20240301_0800.json".to_string(),
        ];
        sort_newest_first(&mut names, "%Y%m%d_%H%M");
        assert_eq!(
            names,
            vec!["a_20240301_0800.json", "a_20240101_0800.json", "loose.json"]
        );
    }

    #[test]
    fn replace_file_leaves_no_staging_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("out.csv");
        replace_file(&path, "a,b\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n");
        assert!(!staging_path(&path).exists());
        assert_eq!(
            file_names_with_ext(&temp.path().join("nested"), "csv").unwrap(),
            vec!["out.csv"]
        );
    }
}
