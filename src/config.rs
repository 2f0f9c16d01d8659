//! Client Configuration
//!
//! Config is stored in `~/.config/sentiment-client/config.toml`.
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. CLI flags (applied by the binary)
//! 2. Environment variables (`SENTIMENT_API_URL`, `SENTIMENT_HISTORY_FILE`)
//! 3. Config file
//! 4. Defaults

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SentimentError};

const APP_DIR: &str = "sentiment-client";

pub const ENV_API_URL: &str = "SENTIMENT_API_URL";
pub const ENV_HISTORY_FILE: &str = "SENTIMENT_HISTORY_FILE";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the sentiment service
    pub api_url: String,

    /// Classification endpoint, relative to `api_url`
    pub sentiment_path: String,

    /// Liveness endpoint, relative to `api_url`
    pub health_path: String,

    pub probe_interval_secs: u64,

    /// Refuse submissions while the last probe reported the API down
    pub gate_on_connectivity: bool,

    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,

    /// Where the history record lives (defaults to the data directory)
    pub history_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            sentiment_path: "/sentiment".to_string(),
            health_path: "/actuator/health".to_string(),
            probe_interval_secs: 30,
            gate_on_connectivity: true,
            connect_timeout_ms: 5_000,
            request_timeout_ms: 15_000,
            history_file: None,
        }
    }
}

impl ClientConfig {
    /// Returns `~/.config/sentiment-client/` on Unix, `%APPDATA%/sentiment-client/` on Windows
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Directory holding the history record and the TUI log
    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a file
    ///
    /// Returns default config if file doesn't exist.
    /// Returns error if file exists but is malformed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SentimentError::Config {
            reason: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| SentimentError::Config {
            reason: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Merge with environment variables
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Merge with an arbitrary variable lookup; empty values are ignored
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.api_url = url;
        }
        if let Some(path) = lookup(ENV_HISTORY_FILE).filter(|v| !v.is_empty()) {
            self.history_file = Some(PathBuf::from(path));
        }
        self
    }

    /// Effective history file path
    pub fn history_path(&self) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("sentiment_history.json"))
    }

    pub fn sentiment_url(&self) -> Result<Url> {
        self.endpoint(&self.sentiment_path)
    }

    pub fn health_url(&self) -> Result<Url> {
        self.endpoint(&self.health_path)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs.max(1))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = Url::parse(self.api_url.trim_end_matches('/')).map_err(|e| {
            SentimentError::InvalidUrl {
                url: self.api_url.clone(),
                reason: e.to_string(),
            }
        })?;
        // Url::join would drop the last base segment
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_path_contains_app_dir() {
        let path = ClientConfig::config_path();
        assert!(path.to_string_lossy().contains(APP_DIR));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.probe_interval(), Duration::from_secs(30));
        assert!(config.gate_on_connectivity);
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_missing_file_yields_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = ClientConfig::load_from(&temp_dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "api_url = \"https://sentiment.example.com\"\ngate_on_connectivity = false\n",
        )
        .unwrap();

        let config = ClientConfig::load_from(&path).unwrap();
        assert_eq!(config.api_url, "https://sentiment.example.com");
        assert!(!config.gate_on_connectivity);
        assert_eq!(config.health_path, "/actuator/health");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "api_url = [unterminated").unwrap();

        let err = ClientConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, SentimentError::Config { .. }));
    }

    #[test]
    fn test_env_overrides_config() {
        let config = ClientConfig::default().with_env_from(|key| match key {
            ENV_API_URL => Some("http://10.0.0.2:9000".to_string()),
            ENV_HISTORY_FILE => Some("/tmp/h.json".to_string()),
            _ => None,
        });
        assert_eq!(config.api_url, "http://10.0.0.2:9000");
        assert_eq!(config.history_path(), PathBuf::from("/tmp/h.json"));
    }

    #[test]
    fn test_env_does_not_override_with_empty() {
        let config = ClientConfig::default().with_env_from(|_| Some(String::new()));
        assert_eq!(config.api_url, "http://localhost:8080");
        assert!(config.history_file.is_none());
    }

    #[test]
    fn test_endpoint_urls() {
        let config = ClientConfig {
            api_url: "http://localhost:8080/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.sentiment_url().unwrap().as_str(),
            "http://localhost:8080/sentiment"
        );
        assert_eq!(
            config.health_url().unwrap().as_str(),
            "http://localhost:8080/actuator/health"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let config = ClientConfig {
            api_url: "https://host.example/api".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.sentiment_url().unwrap().as_str(),
            "https://host.example/api/sentiment"
        );
    }

    #[test]
    fn test_invalid_url_is_reported_as_such() {
        let config = ClientConfig {
            api_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.health_url(),
            Err(SentimentError::InvalidUrl { .. })
        ));
    }
}
