use crate::config::types::NetworkConfig;
use crate::error::ConfigError;
use std::path::Path;

/// Configuration loader trait
pub trait ConfigLoader {
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<NetworkConfig, ConfigError>;
    fn load_with_validation<P: AsRef<Path>>(path: P) -> Result<NetworkConfig, ConfigError>;
}

/// Default configuration loader implementation
pub struct DefaultConfigLoader;

impl ConfigLoader for DefaultConfigLoader {
    /// Load configuration from a TOML file
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<NetworkConfig, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|_| ConfigError::NotFound {
            path: path.as_ref().to_path_buf(),
        })?;

        NetworkConfig::from_toml_str(&content)
    }

    /// Load configuration and reject values the layer cannot run with
    fn load_with_validation<P: AsRef<Path>>(path: P) -> Result<NetworkConfig, ConfigError> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(ConfigError::NotFound {
                path: path_ref.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path_ref)?;

        let config: NetworkConfig = toml::from_str(&content).map_err(|e| {
            ConfigError::invalid(format!(
                "Failed to parse TOML in {}: {}",
                path_ref.display(),
                e
            ))
        })?;

        config.validate()?;
        tracing::debug!("Loaded network configuration from {}", path_ref.display());
        Ok(config)
    }
}

// Convenience functions maintaining the API
impl NetworkConfig {
    /// Create a new config builder
    pub fn builder() -> crate::config::builder::NetworkConfigBuilder {
        crate::config::builder::NetworkConfigBuilder::new()
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        DefaultConfigLoader::load_from_file(path)
    }

    /// Load configuration with validation
    pub fn load_with_validation<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        DefaultConfigLoader::load_with_validation(path)
    }
}
