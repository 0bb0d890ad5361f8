//! Network layer - HTTP request execution with classified errors and connectivity observation
//!
//! Requests go through a [`RequestCoordinator`], which performs one transport
//! call, decodes successful responses and reduces every failure to a single
//! [`ClassifiedError`]. A [`ConnectivityObserver`] reports the device's
//! connectivity as a pull sequence or a shared push stream, and feeds the
//! coordinator's reachability so failures while offline read as
//! `ConnectionLost`.

// Core modules
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

// Main functionality modules
pub mod analysis;
pub mod coordinator;
pub mod http;
pub mod monitor;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use analysis::ErrorClassifierImpl;
pub use config::{ClientConfig, MonitorConfig, NetworkConfig, NetworkConfigBuilder};
pub use coordinator::RequestCoordinator;
pub use error::{ClassifiedError, ConfigError, EndpointError, ErrorKind, RequestFailure, Result, TransportError};
pub use http::{CachePolicy, Endpoint, JsonResponseMapper, KeyConvention, ReqwestTransport};
pub use monitor::{
    ConnectivityObserver, ConnectivitySequence, ConnectivityStream, ManualPathController, ManualPathMonitorFactory,
    NetworkPath, ObserverState, PathMonitor, PathMonitorFactory, PathStatus, ReachabilityCache, SysfsMonitorFactory,
};
pub use traits::{ErrorClassifier, Reachability, ResponseMapper, Transport};
pub use types::{ConnectivityState, InterfaceKind, NetworkAccess, RawResponse};

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that all modules can be imported and basic types work
    #[test]
    fn test_module_imports() {
        let config = NetworkConfig::default();
        assert!(config.validate().is_ok());

        let observer = ConnectivityObserver::new(ManualPathMonitorFactory::new());
        assert_eq!(observer.state(), ObserverState::Idle);
    }

    /// Test that error types work correctly
    #[test]
    fn test_error_types() {
        assert_eq!(ClassifiedError::TimedOut.kind(), ErrorKind::TimedOut);
        assert!(ConfigError::invalid("test error").to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_platform_observer_uses_config() {
        let config = MonitorConfig {
            poll_interval_ms: 50,
            ..MonitorConfig::default()
        };
        let observer = ConnectivityObserver::platform(&config);
        assert_eq!(observer.active_sessions(), 0);
    }
}
