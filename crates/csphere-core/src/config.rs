//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL, the last used username and the login
//! policy flags.
//!
//! Configuration is stored at `~/.config/csphere/config.json`. The
//! `NEXT_PUBLIC_API_BASE_URL` environment variable overrides the stored
//! base URL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_REQUEST_TIMEOUT_SECS;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "csphere";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable holding the API base URL
pub const API_BASE_URL_ENV: &str = "NEXT_PUBLIC_API_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub last_username: Option<String>,
    /// Treat a success response without a token as a failed login
    #[serde(default)]
    pub require_token: bool,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Load from the default location and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env(std::env::var(API_BASE_URL_ENV).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Override the base URL with the environment value, if set and non-empty
    pub fn apply_env(&mut self, base_url: Option<String>) {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = Some(url.trim().to_string());
        }
    }

    /// The API base URL. There is no fallback: a missing value is an error.
    pub fn base_url(&self) -> Result<&str> {
        self.api_base_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| anyhow::anyhow!("{} is not set", API_BASE_URL_ENV))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the cookie jar and log files
    pub fn session_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_base_url_names_variable() {
        let config = Config::default();
        let err = config.base_url().unwrap_err();
        assert!(err.to_string().contains("NEXT_PUBLIC_API_BASE_URL"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config {
            api_base_url: Some("http://from-file".to_string()),
            ..Default::default()
        };
        config.apply_env(Some("http://from-env".to_string()));
        assert_eq!(config.base_url().unwrap(), "http://from-env");
    }

    #[test]
    fn test_empty_env_keeps_file_value() {
        let mut config = Config {
            api_base_url: Some("http://from-file".to_string()),
            ..Default::default()
        };
        config.apply_env(Some("  ".to_string()));
        config.apply_env(None);
        assert_eq!(config.base_url().unwrap(), "http://from-file");
    }

    #[test]
    fn test_request_timeout_default() {
        assert_eq!(Config::default().request_timeout(), Duration::from_secs(30));
        let config = Config {
            request_timeout_secs: Some(5),
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            api_base_url: Some("http://localhost:8000".to_string()),
            last_username: Some("alice".to_string()),
            require_token: true,
            request_timeout_secs: None,
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"last_username":"alice"}"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.last_username.as_deref(), Some("alice"));
        assert!(!config.require_token);
    }
}
