use crate::error::ConfigError;
use crate::http::KeyConvention;
use crate::types::NetworkAccess;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
const DEFAULT_SYSFS_ROOT: &str = "/sys/class/net";

/// Main configuration structure for the network layer
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// HTTP client settings
    #[serde(default)]
    pub client: ClientConfig,
    /// Connectivity monitor settings
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Whether to follow redirects
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,
    /// User agent sent with every request
    pub user_agent: Option<String>,
    /// Key convention applied to response documents before decoding
    #[serde(default)]
    pub key_convention: KeyConvention,
    /// Headers applied to all requests
    pub headers: Option<HashMap<String, String>>,
    /// Allow requests while the path is expensive (cellular, hotspot)
    #[serde(default = "default_allow_network_access")]
    pub allow_expensive: bool,
    /// Allow requests while the path is constrained (low data mode)
    #[serde(default = "default_allow_network_access")]
    pub allow_constrained: bool,
}

/// Connectivity monitor settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// How often the platform monitor re-reads interface state, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Directory listing network devices
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: PathBuf,
    /// Report every path as constrained (user-restricted data mode)
    #[serde(default)]
    pub constrained: bool,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_follow_redirects() -> bool {
    true
}

fn default_allow_network_access() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_sysfs_root() -> PathBuf {
    PathBuf::from(DEFAULT_SYSFS_ROOT)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            follow_redirects: true,
            user_agent: None,
            key_convention: KeyConvention::default(),
            headers: None,
            allow_expensive: true,
            allow_constrained: true,
        }
    }
}

impl ClientConfig {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Paths requests may be sent over
    pub fn network_access(&self) -> NetworkAccess {
        NetworkAccess {
            allow_expensive: self.allow_expensive,
            allow_constrained: self.allow_constrained,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            sysfs_root: default_sysfs_root(),
            constrained: false,
        }
    }
}

impl MonitorConfig {
    /// Poll interval as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl NetworkConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client.timeout_seconds == 0 {
            return Err(ConfigError::invalid("timeout_seconds must be greater than zero"));
        }

        if self.monitor.poll_interval_ms == 0 {
            return Err(ConfigError::invalid("poll_interval_ms must be greater than zero"));
        }

        if let Some(headers) = &self.client.headers {
            if headers.keys().any(|name| name.trim().is_empty()) {
                return Err(ConfigError::invalid("Header names must not be empty"));
            }
        }

        Ok(())
    }
}
