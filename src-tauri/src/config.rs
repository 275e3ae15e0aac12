//! Application configuration.
//!
//! Read from `medipredict.toml` in the platform config directory; every
//! field is optional. `MEDIPREDICT_API_URL` and `MEDIPREDICT_DATA_DIR`
//! override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::MediPredictError;
use crate::inference::{default_rules, load_rules, RuleEngine};
use crate::remote::RemoteClient;
use crate::storage::{FileStorage, SqliteStorage, Storage};

pub const CONFIG_FILE_NAME: &str = "medipredict.toml";
const APP_DIR_NAME: &str = "medipredict";
const SQLITE_FILE_NAME: &str = "medipredict.db";

pub const ENV_API_URL: &str = "MEDIPREDICT_API_URL";
pub const ENV_DATA_DIR: &str = "MEDIPREDICT_DATA_DIR";

/// Which `Storage` backs persisted state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// One JSON file per key
    #[default]
    Json,
    /// Rows in a SQLite key/value table
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root URL of the remote prediction service; local-only when unset
    pub api_url: Option<String>,
    pub request_timeout_secs: u64,
    /// Fixed delay before results are shown
    pub analysis_delay_ms: u64,
    /// Extra random delay on top of `analysis_delay_ms`
    pub analysis_jitter_ms: u64,
    /// Custom rule table replacing the embedded one
    pub rules_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub storage: StorageKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            request_timeout_secs: 10,
            analysis_delay_ms: 1500,
            analysis_jitter_ms: 0,
            rules_path: None,
            data_dir: None,
            storage: StorageKind::Json,
        }
    }
}

impl AppConfig {
    /// `<config dir>/medipredict/medipredict.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from the default location and apply environment overrides.
    /// A broken file is logged and replaced by the defaults.
    pub fn load_default() -> Self {
        let config = match Self::default_path() {
            Some(path) => Self::load(&path).unwrap_or_else(|e| {
                warn!("Ignoring invalid config at {:?}: {}", path, e);
                Self::default()
            }),
            None => Self::default(),
        };
        config.with_overrides(
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_DATA_DIR).ok(),
        )
    }

    /// Apply override values (normally taken from the environment).
    pub fn with_overrides(mut self, api_url: Option<String>, data_dir: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = Some(url);
        }
        if let Some(dir) = data_dir.filter(|d| !d.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        self
    }

    /// Configured API URL, ignoring blank values.
    pub fn api_url(&self) -> Option<&str> {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    pub fn analysis_jitter(&self) -> Duration {
        Duration::from_millis(self.analysis_jitter_ms)
    }

    /// Directory holding persisted state.
    pub fn data_dir(&self) -> Result<PathBuf, MediPredictError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|d| d.join(APP_DIR_NAME))
                .ok_or_else(|| MediPredictError::Config("No data directory available".to_string())),
        }
    }

    /// Rule engine from `rules_path`, or the embedded table.
    pub fn rule_engine(&self) -> Result<RuleEngine> {
        let rules = match &self.rules_path {
            Some(path) => {
                info!("Loading prediction rules from {:?}", path);
                load_rules(path)?
            }
            None => default_rules(),
        };
        Ok(RuleEngine::new(rules))
    }

    /// Remote client when an API URL is configured.
    pub fn remote_client(&self) -> Result<Option<RemoteClient>, MediPredictError> {
        self.api_url()
            .map(|url| RemoteClient::new(url, self.request_timeout()))
            .transpose()
    }

    /// Open the storage for `key` according to `storage`.
    pub fn open_storage(&self, key: &str) -> Result<Box<dyn Storage>, MediPredictError> {
        let dir = self.data_dir()?;
        Ok(match self.storage {
            StorageKind::Json => Box::new(FileStorage::for_key(&dir, key)),
            StorageKind::Sqlite => Box::new(SqliteStorage::open(&dir.join(SQLITE_FILE_NAME), key)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.analysis_delay(), Duration::from_millis(1500));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.storage, StorageKind::Json);
        assert!(config.api_url().is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "api_url = \"http://localhost:8000\"\nstorage = \"sqlite\"\nanalysis_delay_ms = 0\n",
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.api_url(), Some("http://localhost:8000"));
        assert_eq!(config.storage, StorageKind::Sqlite);
        assert_eq!(config.analysis_delay(), Duration::ZERO);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "storage = \"floppy\"").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::default().with_overrides(
            Some("https://api.example.com".to_string()),
            Some("/tmp/medipredict".to_string()),
        );
        assert_eq!(config.api_url(), Some("https://api.example.com"));
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/medipredict"));

        let blank = AppConfig::default().with_overrides(Some("  ".to_string()), Some(String::new()));
        assert!(blank.api_url().is_none());
        assert!(blank.data_dir.is_none());
    }

    #[test]
    fn test_remote_client_only_when_configured() {
        assert!(AppConfig::default().remote_client().unwrap().is_none());

        let config = AppConfig {
            api_url: Some("http://localhost:8000".to_string()),
            ..AppConfig::default()
        };
        assert!(config.remote_client().unwrap().is_some());
    }

    #[test]
    fn test_open_storage_kinds() {
        let dir = TempDir::new().unwrap();
        for kind in [StorageKind::Json, StorageKind::Sqlite] {
            let config = AppConfig {
                data_dir: Some(dir.path().join(format!("{:?}", kind))),
                storage: kind,
                ..AppConfig::default()
            };
            let storage = config.open_storage("predictionHistory").unwrap();
            storage.save("[]").unwrap();
            assert_eq!(storage.load().unwrap().as_deref(), Some("[]"));
        }
    }

    #[test]
    fn test_rule_engine_default_and_custom() {
        assert_eq!(AppConfig::default().rule_engine().unwrap().rule_count(), 4);

        let config = AppConfig {
            rules_path: Some(PathBuf::from("/nonexistent/rules.toml")),
            ..AppConfig::default()
        };
        assert!(config.rule_engine().is_err());
    }
}
