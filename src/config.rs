//! Crate configuration: Splunk endpoints and the search head base URL.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Base URL of the search head used when opening searches and the job
    /// inspector in a browser (e.g. "https://sh1.example.com:8000").
    /// Used verbatim; never validated.
    #[serde(default = "default_search_head_url")]
    pub search_head_url: String,

    /// Base URL of the Splunk REST management endpoint
    /// (e.g. "https://sh1.example.com:8089")
    #[serde(default = "default_rest_url")]
    pub rest_url: String,

    /// Bearer token for authenticating against the REST endpoint
    #[serde(default)]
    pub token: String,

    /// Timeout in seconds applied to each REST request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_search_head_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_rest_url() -> String {
    "https://localhost:8089".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_head_url: default_search_head_url(),
            rest_url: default_rest_url(),
            token: String::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Errors raised while loading or saving configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Default config file location under the platform config directory.
    /// Returns `None` when no config directory can be determined.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("splunk-notebooks").join("config.json"))
    }

    /// Load from the default path, falling back to defaults when the file is
    /// missing or the directory cannot be determined.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("Config not loaded from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
