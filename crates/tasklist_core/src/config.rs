//! Runtime configuration for store selection and file locations.
//!
//! # Responsibility
//! - Hold the names and paths both store backends persist to.
//! - Resolve overrides from `TASKLIST_*` environment variables.
//!
//! # Invariants
//! - Blank environment values fall back to defaults.
//! - Unknown backend/policy names are rejected, never guessed.

use crate::db::UpgradePolicy;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DATA_DIR: &str = "TASKLIST_DATA_DIR";
pub const ENV_BACKEND: &str = "TASKLIST_BACKEND";
pub const ENV_UPGRADE_POLICY: &str = "TASKLIST_UPGRADE_POLICY";

pub const DEFAULT_PREFS_NAME: &str = "myDatabase";
pub const DEFAULT_PREFS_KEY: &str = "tasks_value";
pub const DEFAULT_DB_FILE_NAME: &str = "tasks.db";
const DEFAULT_DATA_DIR_NAME: &str = "tasklist";

/// Which persistence strategy backs the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Single-table SQLite database with stable row ids.
    #[default]
    Sqlite,
    /// Named preference file holding an unordered description set.
    Preferences,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Preferences => "prefs",
        }
    }

    /// Parses `sqlite|prefs` (case-insensitive; `preferences` is accepted too).
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "db" => Ok(Self::Sqlite),
            "prefs" | "preferences" => Ok(Self::Preferences),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownBackend(String),
    UnknownUpgradePolicy(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBackend(value) => {
                write!(f, "unsupported backend `{value}`; expected sqlite|prefs")
            }
            Self::UnknownUpgradePolicy(value) => {
                write!(f, "unsupported upgrade policy `{value}`; expected migrate|recreate")
            }
        }
    }
}

impl Error for ConfigError {}

/// Where and how tasks are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListConfig {
    /// Directory holding the preference file and the database file.
    pub data_dir: PathBuf,
    pub backend: StoreBackend,
    /// Preference file name, without extension.
    pub prefs_name: String,
    /// Key inside the preference file holding the description set.
    pub prefs_key: String,
    pub db_file_name: String,
    pub upgrade_policy: UpgradePolicy,
}

impl Default for TaskListConfig {
    fn default() -> Self {
        Self {
            data_dir: std::env::temp_dir().join(DEFAULT_DATA_DIR_NAME),
            backend: StoreBackend::default(),
            prefs_name: DEFAULT_PREFS_NAME.to_string(),
            prefs_key: DEFAULT_PREFS_KEY.to_string(),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            upgrade_policy: UpgradePolicy::default(),
        }
    }
}

impl TaskListConfig {
    /// Default configuration rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Builds configuration from `TASKLIST_*` variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(dir) = non_blank(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(backend) = non_blank(ENV_BACKEND) {
            config.backend = StoreBackend::parse(&backend)?;
        }
        if let Some(policy) = non_blank(ENV_UPGRADE_POLICY) {
            config.upgrade_policy = UpgradePolicy::parse(&policy)
                .ok_or(ConfigError::UnknownUpgradePolicy(policy))?;
        }
        Ok(config)
    }

    /// Path of the preference file, `<data_dir>/<prefs_name>.json`.
    pub fn prefs_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.prefs_name))
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreBackend, TaskListConfig, DEFAULT_PREFS_KEY};
    use crate::db::UpgradePolicy;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn from_lookup_uses_defaults_when_unset_or_blank() {
        let config =
            TaskListConfig::from_lookup(lookup_from(&[("TASKLIST_BACKEND", "   ")])).unwrap();
        assert_eq!(config.backend, StoreBackend::Sqlite);
        assert_eq!(config.upgrade_policy, UpgradePolicy::Migrate);
        assert_eq!(config.prefs_key, DEFAULT_PREFS_KEY);
    }

    #[test]
    fn from_lookup_applies_overrides() {
        let config = TaskListConfig::from_lookup(lookup_from(&[
            ("TASKLIST_DATA_DIR", "/data/tasks"),
            ("TASKLIST_BACKEND", "Prefs"),
            ("TASKLIST_UPGRADE_POLICY", "recreate"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/data/tasks"));
        assert_eq!(config.backend, StoreBackend::Preferences);
        assert_eq!(config.upgrade_policy, UpgradePolicy::Recreate);
        assert_eq!(config.prefs_path(), PathBuf::from("/data/tasks/myDatabase.json"));
        assert_eq!(config.db_path(), PathBuf::from("/data/tasks/tasks.db"));
    }

    #[test]
    fn from_lookup_rejects_unknown_values() {
        let err = TaskListConfig::from_lookup(lookup_from(&[("TASKLIST_BACKEND", "redis")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownBackend("redis".to_string()));

        let err =
            TaskListConfig::from_lookup(lookup_from(&[("TASKLIST_UPGRADE_POLICY", "wipe")]))
                .unwrap_err();
        assert_eq!(err, ConfigError::UnknownUpgradePolicy("wipe".to_string()));
    }
}
