pub mod builder;
pub mod loader;
pub mod types;

pub use builder::NetworkConfigBuilder;
pub use loader::{ConfigLoader, DefaultConfigLoader};
pub use types::{ClientConfig, MonitorConfig, NetworkConfig};
