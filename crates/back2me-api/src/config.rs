//! Configuration file parsing for the API service.
//!
//! Loads settings from TOML files including bind address, database path,
//! and the Resend delivery credentials.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// API configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),
}

/// API configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// SQLite database path (":memory:" for ephemeral)
    pub database_path: String,

    /// Resend API key; owner notifications are disabled when absent
    #[serde(default)]
    pub resend_api_key: Option<String>,

    /// Sender identity for owner notifications
    #[serde(default)]
    pub notify_from: Option<String>,

    /// Pending-notification queue depth (default: 64)
    #[serde(default = "default_notification_queue")]
    pub notification_queue: usize,
}

/// Default notification queue depth
fn default_notification_queue() -> usize {
    64
}

impl ApiConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ApiConfig = toml::from_str(&contents)?;

        // Validate required fields
        if config.database_path.is_empty() {
            return Err(ConfigError::MissingField("database_path".to_string()));
        }

        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ApiConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            database_path: ":memory:".to_string(),
            resend_api_key: None,
            notify_from: None,
            notification_queue: 64,
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
