//! Connectivity observation: path monitors and the observer built on them

pub mod manual;
pub mod observer;
pub mod path;
pub mod reachability;
pub mod sysfs;

pub use manual::{ManualPathController, ManualPathMonitor, ManualPathMonitorFactory};
pub use observer::{ConnectivityObserver, ConnectivitySequence, ConnectivityStream, ObserverState};
pub use path::{NetworkPath, PathMonitor, PathMonitorFactory, PathStatus, PathUpdateHandler};
pub use reachability::ReachabilityCache;
pub use sysfs::{SysfsMonitorFactory, SysfsPathMonitor};

use crate::config::MonitorConfig;
use std::sync::{Mutex, MutexGuard, PoisonError};

impl ConnectivityObserver<SysfsMonitorFactory> {
    /// Observer backed by the sysfs monitor
    pub fn platform(config: &MonitorConfig) -> Self {
        Self::new(SysfsMonitorFactory::new(config))
    }
}

/// Lock a mutex, recovering the data if a holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
