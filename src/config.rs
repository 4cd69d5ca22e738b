//! Configuration management
//!
//! Configuration is resolved in three layers:
//! 1. Built-in defaults (`Default` impls)
//! 2. User config at `~/.config/tasklink/config.toml`
//! 3. Environment overrides (`TASKLINK_API_URL`, `TASKLINK_TIMEOUT_SECS`)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};

/// Default API base URL (matches the development server)
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Remote API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Logging settings as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default log level ("trace".."error")
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: "pretty", "json", "compact"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Enable rotating file output
    #[serde(default)]
    pub file_output: bool,
    /// Log file directory (platform data dir when unset)
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file_output: false,
            file_path: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl AppConfig {
    /// Platform path of the user config file
    #[must_use]
    pub fn user_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tasklink")
            .join("config.toml")
    }

    /// Load configuration: defaults, then user file, then environment
    pub fn load() -> ConfigResult<Self> {
        let path = Self::user_config_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file path
    pub fn load_from(path: &PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound { path: path.clone() });
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("TASKLINK_API_URL") {
            if !url.is_empty() {
                self.api.base_url = url;
            }
        }
        if let Ok(timeout) = std::env::var("TASKLINK_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.api.timeout_secs = secs;
            }
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.api.base_url.is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "api.timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
