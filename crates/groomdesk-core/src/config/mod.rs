//! Local configuration for the offline data layer.
//!
//! Holds where the local store lives and which API the sync queue replays
//! against. Credentials never go here; the API token is supplied at runtime.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

const CONFIG_DIR_NAME: &str = "groomdesk";
const CONFIG_FILE_NAME: &str = "config.json";
const STORE_FILE_NAME: &str = "local.db";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GroomdeskConfig {
    /// Base URL of the REST API, e.g. `https://api.example.com/v1`
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Path of the local SQLite store
    #[serde(default)]
    pub store_path: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// `<config_dir>/groomdesk/config.json`
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or_else(|| Error::Config("Failed to resolve config directory".to_string()))
}

/// `<data_dir>/groomdesk/local.db`
pub fn default_store_path() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(STORE_FILE_NAME))
        .ok_or_else(|| Error::Config("Failed to resolve data directory".to_string()))
}

impl GroomdeskConfig {
    pub fn load() -> Result<Self> {
        Self::load_from_path(&default_config_path()?)
    }

    /// Read and normalize the config at `path`; a missing file yields defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            Error::Config(format!(
                "Failed to read config at {}: {}",
                path.display(),
                error
            ))
        })?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            Error::Config(format!(
                "Failed to parse config at {}: {}",
                path.display(),
                error
            ))
        })?;
        config.normalize()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut normalized = self.clone();
        normalized.normalize()?;
        let serialized = serde_json::to_string_pretty(&normalized)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Configured store path, or the platform default
    pub fn resolved_store_path(&self) -> Result<PathBuf> {
        match self.store_path.as_deref() {
            Some(path) => Ok(PathBuf::from(path)),
            None => default_store_path(),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    fn normalize(&mut self) -> Result<()> {
        self.store_path = normalize_text_option(self.store_path.take());
        self.api_base_url = match normalize_text_option(self.api_base_url.take()) {
            Some(url) if is_http_url(&url) => Some(url.trim_end_matches('/').to_string()),
            Some(url) => {
                return Err(Error::Config(format!(
                    "api_base_url '{url}' must include http:// or https://"
                )))
            }
            None => None,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GroomdeskConfig::load_from_path(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, GroomdeskConfig::default());
    }

    #[test]
    fn save_and_load_normalizes_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = GroomdeskConfig {
            api_base_url: Some(" https://api.example.com/v1/ ".to_string()),
            store_path: Some("   ".to_string()),
            request_timeout_secs: Some(30),
        };

        config.save_to_path(&path).unwrap();
        let loaded = GroomdeskConfig::load_from_path(&path).unwrap();

        assert_eq!(
            loaded,
            GroomdeskConfig {
                api_base_url: Some("https://api.example.com/v1".to_string()),
                store_path: None,
                request_timeout_secs: Some(30),
            }
        );
        assert_eq!(loaded.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn rejects_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api_token": "secret"}"#).unwrap();

        let error = GroomdeskConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(error, Error::Config(_)));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api_base_url": "ftp://example.com"}"#).unwrap();

        let error = GroomdeskConfig::load_from_path(&path).unwrap_err();
        assert!(error.to_string().contains("http://"));
    }

    #[test]
    fn explicit_store_path_wins() {
        let config = GroomdeskConfig {
            store_path: Some("/tmp/groomdesk.db".to_string()),
            ..GroomdeskConfig::default()
        };
        assert_eq!(
            config.resolved_store_path().unwrap(),
            PathBuf::from("/tmp/groomdesk.db")
        );
        assert_eq!(config.request_timeout(), None);
    }
}
