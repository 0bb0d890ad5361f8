use crate::config::types::NetworkConfig;
use crate::error::ConfigError;
use crate::http::KeyConvention;
use std::path::PathBuf;

/// Builder for NetworkConfig to improve API ergonomics
pub struct NetworkConfigBuilder {
    config: NetworkConfig,
}

impl NetworkConfigBuilder {
    /// Create a new config builder
    pub fn new() -> Self {
        Self {
            config: NetworkConfig::default(),
        }
    }

    /// Set timeout in seconds
    #[must_use]
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.client.timeout_seconds = seconds;
        self
    }

    /// Set whether to follow redirects
    #[must_use]
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.config.client.follow_redirects = follow;
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.client.user_agent = Some(user_agent.into());
        self
    }

    /// Add a header sent with every request
    #[must_use]
    pub fn header<S: Into<String>>(mut self, name: S, value: S) -> Self {
        self.config
            .client
            .headers
            .get_or_insert_with(Default::default)
            .insert(name.into(), value.into());
        self
    }

    /// Set the key convention used when decoding responses
    #[must_use]
    pub fn key_convention(mut self, convention: KeyConvention) -> Self {
        self.config.client.key_convention = convention;
        self
    }

    /// Set whether requests may use an expensive path
    #[must_use]
    pub fn allow_expensive(mut self, allow: bool) -> Self {
        self.config.client.allow_expensive = allow;
        self
    }

    /// Set whether requests may use a constrained path
    #[must_use]
    pub fn allow_constrained(mut self, allow: bool) -> Self {
        self.config.client.allow_constrained = allow;
        self
    }

    /// Set the monitor poll interval in milliseconds
    #[must_use]
    pub fn poll_interval_ms(mut self, millis: u64) -> Self {
        self.config.monitor.poll_interval_ms = millis;
        self
    }

    /// Set the directory the platform monitor reads devices from
    #[must_use]
    pub fn sysfs_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.config.monitor.sysfs_root = root.into();
        self
    }

    /// Report every path as constrained
    #[must_use]
    pub fn constrained(mut self, constrained: bool) -> Self {
        self.config.monitor.constrained = constrained;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<NetworkConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for NetworkConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
