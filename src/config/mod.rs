//! Configuration management for Threadbar

mod keys;

pub use keys::{Action, ActionGroup, KeyBindings};

use crate::agent::AgentListParams;
use crate::paths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable consulted for the API token when the config has none
pub const TOKEN_ENV_VAR: &str = "THREADBAR_TOKEN";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the backend API (e.g., `http://localhost:8000/api`)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL of the web frontend, used for share links and navigation
    #[serde(default = "default_web_url")]
    pub web_url: String,

    /// Bearer token sent with API requests
    #[serde(default)]
    pub api_token: Option<String>,

    /// Poll interval in milliseconds for the event loop tick
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Global timeout for API requests, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// How long notifications stay on screen, in seconds
    #[serde(default = "default_toast_ttl")]
    pub toast_ttl_secs: u64,

    /// Parameters for the agent list query
    #[serde(default)]
    pub agents: AgentListParams,

    /// Drop rename results that arrive after a newer rename already landed
    #[serde(default)]
    pub strict_rename_ordering: bool,

    /// Open navigation targets in the system browser
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,

    /// Keybindings configuration
    #[serde(default)]
    pub keys: KeyBindings,
}

fn default_api_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_web_url() -> String {
    "http://localhost:3000".to_string()
}

const fn default_poll_interval() -> u64 {
    100
}

const fn default_request_timeout() -> u64 {
    10
}

const fn default_toast_ttl() -> u64 {
    4
}

const fn default_open_browser() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            web_url: default_web_url(),
            api_token: None,
            poll_interval_ms: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
            toast_ttl_secs: default_toast_ttl(),
            agents: AgentListParams::default(),
            strict_rename_ordering: false,
            open_browser: default_open_browser(),
            keys: KeyBindings::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// # Errors
    ///
    /// Returns an error if reading or parsing the config file fails
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        // Ensure any new default keybindings are available
        config.keys.merge_defaults();
        Ok(config)
    }

    /// Save configuration to a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn default_path() -> PathBuf {
        paths::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("threadbar")
            .join("config.json")
    }

    /// The API token from config, falling back to `THREADBAR_TOKEN`
    #[must_use]
    pub fn resolved_token(&self) -> Option<String> {
        self.api_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok())
            .filter(|t| !t.trim().is_empty())
    }

    /// Join a frontend route onto the web URL
    #[must_use]
    pub fn web_route(&self, route: &str) -> String {
        format!(
            "{}/{}",
            self.web_url.trim_end_matches('/'),
            route.trim_start_matches('/')
        )
    }

    /// Share link for a thread
    #[must_use]
    pub fn share_url(&self, thread_id: &str) -> String {
        self.web_route(&format!("share/{thread_id}"))
    }
}
