use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = ".rollcall";
const CONFIG_FILE: &str = "rollcall.conf";
const DATABASE_FILE: &str = "rollcall.sqlite";

/// Backend used for the live attendance window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveBackend {
    /// SQLite file; survives between CLI invocations.
    Sqlite,
    /// Process memory; only useful when the engine is embedded.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub records_database: Option<String>,
    #[serde(default)]
    pub live_database: Option<String>,
    #[serde(default = "default_live_backend")]
    pub live_backend: LiveBackend,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_unknown_name_label")]
    pub unknown_name_label: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_live_backend() -> LiveBackend {
    LiveBackend::Sqlite
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_unknown_name_label() -> String {
    "Person".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            records_database: None,
            live_database: None,
            live_backend: default_live_backend(),
            log_level: default_log_level(),
            unknown_name_label: default_unknown_name_label(),
        }
    }
}

/// `<dir>/<stem>-<suffix>.sqlite` next to the identity database.
fn sibling(database: &str, suffix: &str) -> String {
    let path = Path::new(database);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "rollcall".to_string());

    path.with_file_name(format!("{stem}-{suffix}.sqlite"))
        .to_string_lossy()
        .to_string()
}

impl Config {
    /// Return the configuration directory (`~/.rollcall`).
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE)
    }

    /// Return the default path of the identity database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join(DATABASE_FILE)
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, yaml)?;
        Ok(())
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Point the identity database somewhere else. Record and live files
    /// follow it unless they were set explicitly.
    pub fn override_database(&mut self, database: &str) {
        self.database = database.to_string();
    }

    pub fn records_path(&self) -> String {
        self.records_database
            .clone()
            .unwrap_or_else(|| sibling(&self.database, "records"))
    }

    pub fn live_path(&self) -> String {
        self.live_database
            .clone()
            .unwrap_or_else(|| sibling(&self.database, "live"))
    }

    /// Directory of per-event lock files: `<live stem>.locks` beside the live database.
    pub fn lock_dir(&self) -> PathBuf {
        let live = PathBuf::from(self.live_path());
        let stem = live
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "rollcall-live".to_string());
        live.with_file_name(format!("{stem}.locks"))
    }
}
