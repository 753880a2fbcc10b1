//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL, page size, cache lifetime and the last
//! used username.
//!
//! Configuration is stored at `~/.config/athletics-browser/config.json`.
//! The `ATHLETICS_API_URL` environment variable overrides the stored URL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "athletics-browser";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "ATHLETICS_API_URL";

/// Base URL used when neither the config file nor the environment set one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Default rows per page for list views.
pub const DEFAULT_PER_PAGE: u32 = 50;

/// The server caps page size at 200.
pub const MAX_PER_PAGE: u32 = 200;

/// Default lifetime of cached view data, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub per_page: u32,
    pub cache_ttl_secs: u64,
    pub last_username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            per_page: DEFAULT_PER_PAGE,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            last_username: None,
        }
    }
}

impl Config {
    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Take the API URL from the environment when set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_base_url = Some(url);
            }
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Base URL without a trailing slash.
    pub fn api_base_url(&self) -> String {
        self.api_base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    /// Page size clamped to what the server will honor.
    pub fn per_page(&self) -> u32 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(config.per_page(), 50);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_base_url_trailing_slash_and_blank() {
        let mut config = Config {
            api_base_url: Some("https://api.example.org/ ".to_string()),
            ..Config::default()
        };
        assert_eq!(config.api_base_url(), "https://api.example.org");

        config.api_base_url = Some("   ".to_string());
        assert_eq!(config.api_base_url(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_per_page_is_clamped() {
        let mut config = Config {
            per_page: 1000,
            ..Config::default()
        };
        assert_eq!(config.per_page(), MAX_PER_PAGE);
        config.per_page = 0;
        assert_eq!(config.per_page(), 1);
    }

    #[test]
    fn test_save_and_load_roundtrip_with_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        assert_eq!(Config::load_from(&path).unwrap().per_page, DEFAULT_PER_PAGE);

        let config = Config {
            last_username: Some("admin".to_string()),
            per_page: 20,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.last_username.as_deref(), Some("admin"));
        assert_eq!(loaded.per_page, 20);

        // Missing fields take their defaults
        std::fs::write(&path, r#"{"last_username": "x"}"#).unwrap();
        let partial = Config::load_from(&path).unwrap();
        assert_eq!(partial.cache_ttl_secs, DEFAULT_CACHE_TTL_SECS);
    }
}
