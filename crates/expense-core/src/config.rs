//! Store configuration: where the database and photos live, and how old
//! database files are upgraded.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::db::MigrationPolicy;
use crate::error::{Error, Result};
use crate::util::normalize_text_option;

const APP_DIR_NAME: &str = "expense-tracker";
const CONFIG_FILE_NAME: &str = "config.json";
const DATABASE_FILE_NAME: &str = "expense.db";
const PHOTO_DIR_NAME: &str = "photos";

pub const DB_PATH_ENV: &str = "EXPENSE_DB_PATH";
pub const PHOTO_DIR_ENV: &str = "EXPENSE_PHOTO_DIR";
pub const MIGRATION_POLICY_ENV: &str = "EXPENSE_MIGRATION_POLICY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    pub database_path: PathBuf,
    pub photo_dir: PathBuf,
    pub migration_policy: MigrationPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let root = default_data_dir();
        Self {
            database_path: root.join(DATABASE_FILE_NAME),
            photo_dir: root.join(PHOTO_DIR_NAME),
            migration_policy: MigrationPolicy::default(),
        }
    }
}

/// Application data directory, or a relative one when the platform has none
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or_else(|| Error::Config("Failed to resolve config directory".to_string()))
}

impl StoreConfig {
    /// Load from `path` (or the default config file), then apply environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_config_path()?,
        };
        Self::load_from_path(&path)?.with_overrides(|key| std::env::var(key).ok())
    }

    /// Read a config file; a missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|error| {
            Error::Config(format!("Failed to parse config at {}: {error}", path.display()))
        })
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Apply overrides looked up by environment variable name. Blank values
    /// are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let value = |key: &str| normalize_text_option(lookup(key));

        if let Some(path) = value(DB_PATH_ENV) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(dir) = value(PHOTO_DIR_ENV) {
            self.photo_dir = PathBuf::from(dir);
        }
        if let Some(policy) = value(MIGRATION_POLICY_ENV) {
            self.migration_policy = policy.parse()?;
        }
        Ok(self)
    }
}
