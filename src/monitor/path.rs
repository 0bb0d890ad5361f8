//! Path-monitor abstraction.
//!
//! A path monitor reports the state of the route the device would use to reach
//! the network. Monitors are one-shot: once cancelled they cannot be started
//! again, so callers ask a [`PathMonitorFactory`] for a fresh instance every
//! time monitoring begins.

use crate::types::{ConnectivityState, InterfaceKind};

/// Whether a path can currently carry traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathStatus {
    /// The path is usable
    Satisfied,
    /// No usable route exists
    #[default]
    Unsatisfied,
    /// A route exists but must be brought up first (dial-on-demand, VPN on demand)
    RequiresConnection,
}

/// Snapshot of the network path as reported by a monitor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkPath {
    pub status: PathStatus,
    pub is_expensive: bool,
    pub is_constrained: bool,
    /// Interface kinds the path runs over
    pub interfaces: Vec<InterfaceKind>,
}

impl NetworkPath {
    /// A usable path over the given interfaces
    pub fn satisfied(interfaces: Vec<InterfaceKind>) -> Self {
        Self {
            status: PathStatus::Satisfied,
            is_expensive: interfaces.contains(&InterfaceKind::Cellular),
            is_constrained: false,
            interfaces,
        }
    }

    /// A path with no usable route
    pub fn unsatisfied() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn expensive(mut self, expensive: bool) -> Self {
        self.is_expensive = expensive;
        self
    }

    #[must_use]
    pub fn constrained(mut self, constrained: bool) -> Self {
        self.is_constrained = constrained;
        self
    }

    /// Whether the path runs over the given interface kind
    pub fn uses_interface_type(&self, kind: InterfaceKind) -> bool {
        self.interfaces.contains(&kind)
    }
}

impl From<&NetworkPath> for ConnectivityState {
    fn from(path: &NetworkPath) -> Self {
        ConnectivityState {
            active: path.status == PathStatus::Satisfied,
            expensive: path.is_expensive,
            constrained: path.is_constrained,
            interface: InterfaceKind::resolve(|kind| path.uses_interface_type(kind)),
        }
    }
}

/// Callback invoked by a monitor for the initial path and every change after it
pub type PathUpdateHandler = Box<dyn Fn(NetworkPath) + Send + Sync + 'static>;

/// A one-shot source of path updates
pub trait PathMonitor: Send + 'static {
    /// Start delivering paths to `handler` from the monitor's own execution context.
    ///
    /// Starting a monitor twice, or after it was cancelled, has no effect.
    fn start(&mut self, handler: PathUpdateHandler);

    /// Stop delivering updates and release the handler. Idempotent.
    fn cancel(&mut self);
}

/// Creates fresh path monitors
pub trait PathMonitorFactory: Send + Sync + 'static {
    type Monitor: PathMonitor;

    fn make_monitor(&self) -> Self::Monitor;
}
