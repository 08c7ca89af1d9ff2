use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::models::{Connection, SearchField, UpdateMethod};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_db")]
    pub db: String,

    #[serde(default)]
    pub timeouts: TimeoutConfig,

    #[serde(default)]
    pub default_search_field: SearchField,
    #[serde(default)]
    pub default_update_method: UpdateMethod,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeoutConfig {
    /// Per-request timeout in milliseconds
    #[serde(default = "default_request_ms")]
    pub request_ms: u64,

    /// Timeout for bulk file uploads in milliseconds
    #[serde(default = "default_file_ms")]
    pub file_ms: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5800
}

fn default_db() -> String {
    "test".to_string()
}

fn default_request_ms() -> u64 {
    10_000
}

fn default_file_ms() -> u64 {
    600_000
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_ms: default_request_ms(),
            file_ms: default_file_ms(),
        }
    }
}

/// Fallbacks applied when a call leaves a soft knob unset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDefaults {
    pub timeout: Duration,
    pub file_timeout: Duration,
    pub search_field: SearchField,
    pub update_method: UpdateMethod,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        ClientConfig::default().defaults()
    }
}

impl ClientConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn connection(&self) -> Connection {
        Connection::new(&self.host, self.port, self.db.clone())
    }

    pub fn defaults(&self) -> RequestDefaults {
        RequestDefaults {
            timeout: Duration::from_millis(self.timeouts.request_ms),
            file_timeout: Duration::from_millis(self.timeouts.file_ms),
            search_field: self.default_search_field,
            update_method: self.default_update_method,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db: default_db(),
            timeouts: TimeoutConfig::default(),
            default_search_field: SearchField::default(),
            default_update_method: UpdateMethod::default(),
        }
    }
}
