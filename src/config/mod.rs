use crate::db::Location;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    #[serde(default = "default_journal_mode")]
    pub journal_mode: String,
    #[serde(default = "default_foreign_keys")]
    pub foreign_keys: bool,
}

fn default_busy_timeout_ms() -> u64 {
    5000
}
fn default_journal_mode() -> String {
    "WAL".to_string()
}
fn default_foreign_keys() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: default_journal_mode(),
            foreign_keys: default_foreign_keys(),
        }
    }
}

impl Config {
    /// Configuration for a private in-memory database (one per thread).
    pub fn in_memory() -> Self {
        Self {
            database: String::new(),
            ..Self::default()
        }
    }

    /// Configuration for a database at an explicit path.
    pub fn at_path(path: impl AsRef<Path>) -> Self {
        Self {
            database: path.as_ref().to_string_lossy().to_string(),
            ..Self::default()
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("dblocal")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".dblocal")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("dblocal.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("dblocal.sqlite")
    }

    /// The slot/accounting key this configuration maps to.
    /// An empty `database` means a private in-memory database.
    pub fn location(&self) -> Location {
        if self.database.is_empty() {
            Location::InMemory
        } else {
            Location::OnDisk {
                path: PathBuf::from(&self.database),
            }
        }
    }

    /// Load configuration from the standard config file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file path.
    /// A missing file surfaces as `AppError::Io`, a malformed one as
    /// `AppError::ConfigLoad` with the parse error attached.
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(AppError::ConfigLoad)
    }

    /// Save configuration to an explicit file path
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let yaml = serde_yaml::to_string(self).map_err(AppError::ConfigSave)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration before handing it to a manager.
    pub fn validate(&self) -> AppResult<()> {
        match self.journal_mode.to_uppercase().as_str() {
            "WAL" | "DELETE" | "TRUNCATE" | "PERSIST" | "MEMORY" | "OFF" => Ok(()),
            other => Err(AppError::Config(format!(
                "unsupported journal_mode: {other}"
            ))),
        }
    }
}
