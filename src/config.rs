//! Configuration management for smart-search.
//!
//! Handles loading configuration from TOML files and environment variables.
//! The backend base URL is always injected from here; nothing else in the
//! crate hard-codes an endpoint.

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "SMART_SEARCH_API_URL";

/// Base URL used when neither CLI, environment nor config file provide one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Suggestion backend settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Controller timing and behaviour.
    #[serde(default)]
    pub suggest: SuggestConfig,
}

/// Suggestion backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL the `/search`, `/interval` and `/terms` paths are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Parses and validates the base URL.
    ///
    /// Only `http` and `https` are accepted. A trailing slash is tolerated.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim_end_matches('/'))
            .map_err(|e| {
                SearchError::config(format!("Invalid base URL '{}': {e}", self.base_url))
            })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(SearchError::config(format!(
                "Invalid scheme '{other}'. Expected 'http' or 'https'"
            ))),
        }
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Applies `SMART_SEARCH_API_URL` if it is set and non-empty.
    pub fn apply_env_override(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.base_url = url;
            }
        }
    }
}

/// Controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestConfig {
    /// Quiescence window before a query is sent, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Lifetime of a status message, in milliseconds.
    #[serde(default = "default_message_ttl_ms")]
    pub message_ttl_ms: u64,

    /// Ignore responses that belong to a superseded request.
    ///
    /// Off by default: responses are applied in arrival order.
    #[serde(default)]
    pub discard_stale_responses: bool,

    /// Ignore keystrokes while the exact-match request is outstanding.
    #[serde(default)]
    pub lock_input_while_loading: bool,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_message_ttl_ms() -> u64 {
    3000
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            message_ttl_ms: default_message_ttl_ms(),
            discard_stale_responses: false,
            lock_input_while_loading: false,
        }
    }
}

impl SuggestConfig {
    /// Returns the debounce window.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Returns the message lifetime.
    pub fn message_ttl(&self) -> Duration {
        Duration::from_millis(self.message_ttl_ms)
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("smart-search")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SearchError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            SearchError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Resolves the effective base URL.
    ///
    /// Precedence: CLI flag, then `SMART_SEARCH_API_URL`, then the file value.
    pub fn resolve_base_url(&mut self, cli_url: Option<&str>) -> Result<Url> {
        self.api.apply_env_override();
        if let Some(url) = cli_url {
            self.api.base_url = url.to_string();
        }
        self.api.parsed_base_url()
    }
}
