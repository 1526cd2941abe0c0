//! Settings and view snapshot persistence.
//! Handles loading and saving `config.json` (settings) and `state.json` (last route).
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DEFAULT_THEME;
use crate::config::constants::{
    CONFIG_FILE, DEFAULT_API_URL, DEFAULT_BRANCH_BASE, LOG_DIR, REQUEST_TIMEOUT_SECS, STATE_FILE, STORE_DIR,
};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// User settings. Every field has a default so partial files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the branch/file data service
    pub api_url: String,
    /// Sent as the `api_key` query parameter when set
    pub api_key: Option<String>,
    /// Branch the selected file is diffed against
    pub base_branch: String,
    /// Whether the diff ("after") panel may be shown at all
    pub show_diff_panel: bool,
    pub request_timeout_secs: u64,
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            base_branch: DEFAULT_BRANCH_BASE.to_string(),
            show_diff_panel: true,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            theme: DEFAULT_THEME.to_string(),
        }
    }
}

/// What survives a restart of the view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSnapshot {
    pub route: String,
}

/// Files under the store directory.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.dir.join(LOG_DIR)
    }

    /// Load settings; a missing file yields defaults.
    pub fn load_settings(&self) -> Result<Settings, SettingsError> {
        load_json(&self.config_path())
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), SettingsError> {
        save_json(&self.config_path(), settings)
    }

    pub fn load_snapshot(&self) -> Result<ViewSnapshot, SettingsError> {
        load_json(&self.state_path())
    }

    pub fn save_snapshot(&self, snapshot: &ViewSnapshot) -> Result<(), SettingsError> {
        save_json(&self.state_path(), snapshot)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(STORE_DIR)
    }
}

fn load_json<T: Default + for<'de> Deserialize<'de>>(path: &Path) -> Result<T, SettingsError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let json = fs::read_to_string(path).map_err(|source| SettingsError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_str(&json).map_err(|source| SettingsError::Parse { path: path.to_path_buf(), source })
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SettingsError::Write { path: parent.to_path_buf(), source })?;
    }
    let json = serde_json::to_string_pretty(value).map_err(SettingsError::Serialize)?;
    fs::write(path, json).map_err(|source| SettingsError::Write { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_files_give_defaults() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path().join("store"));
        assert_eq!(store.load_settings().unwrap(), Settings::default());
        assert_eq!(store.load_snapshot().unwrap(), ViewSnapshot::default());
    }

    #[test]
    fn partial_settings_fill_defaults() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path());
        fs::write(store.config_path(), r#"{"base_branch": "main", "show_diff_panel": false}"#).unwrap();

        let settings = store.load_settings().unwrap();
        assert_eq!(settings.base_branch, "main");
        assert!(!settings.show_diff_panel);
        assert_eq!(settings.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn snapshot_round_trips_through_disk() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path().join("nested"));
        let snapshot = ViewSnapshot { route: "?tab=branches".to_string() };
        store.save_snapshot(&snapshot).unwrap();
        assert_eq!(store.load_snapshot().unwrap(), snapshot);
    }

    #[test]
    fn malformed_settings_report_path() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path());
        fs::write(store.config_path(), "{not json").unwrap();
        let err = store.load_settings().unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains("config.json"));
    }
}
