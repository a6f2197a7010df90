//! Per-television configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TvError};

pub const DEFAULT_PORT: u16 = panasonic_api::DEFAULT_PORT;

/// Default media renderer poll interval in milliseconds
pub const DEFAULT_REFRESH_INTERVAL: u64 = 1000;

/// Configuration of one bound television
///
/// Deserialized from camelCase keys:
///
/// ```json
/// { "hostName": "192.168.1.40", "port": 55000, "refreshInterval": 1000 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TvConfig {
    #[serde(default)]
    pub host_name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Poll interval in milliseconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL
}

impl TvConfig {
    pub fn new(host_name: impl Into<String>) -> Self {
        Self {
            host_name: host_name.into(),
            port: DEFAULT_PORT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }

    pub fn with_refresh_interval(mut self, millis: u64) -> Self {
        self.refresh_interval = millis;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TvError::Configuration(format!("Invalid configuration: {}", e)))
    }

    /// Fail if the configuration cannot bind a television
    pub fn validate(&self) -> Result<()> {
        if self.host_name.trim().is_empty() {
            return Err(TvError::Configuration("Hostname not set!".to_string()));
        }
        if self.refresh_interval == 0 {
            return Err(TvError::Configuration(
                "Refresh interval must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval)
    }
}
