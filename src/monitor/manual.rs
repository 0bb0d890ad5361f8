//! Path monitor driven by the application.
//!
//! Useful where the platform reports connectivity through some other channel
//! (a mobile host app, a supervisor process) and in tests, where paths must be
//! injected at precise points.

use super::lock;
use crate::monitor::path::{NetworkPath, PathMonitor, PathMonitorFactory, PathUpdateHandler};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::trace;

#[derive(Default)]
struct ControllerState {
    next_id: u64,
    current: Option<NetworkPath>,
    handlers: HashMap<u64, PathUpdateHandler>,
    started: usize,
    cancelled: usize,
}

/// Pushes paths into every running monitor created by its factory
#[derive(Clone, Default)]
pub struct ManualPathController {
    state: Arc<Mutex<ControllerState>>,
}

impl ManualPathController {
    /// Report a new path to all running monitors.
    ///
    /// Monitors started later receive the most recent path as their initial one.
    pub fn send(&self, path: NetworkPath) {
        let mut state = lock(&self.state);
        trace!(monitors = state.handlers.len(), ?path, "Delivering manual path");
        for handler in state.handlers.values() {
            handler(path.clone());
        }
        state.current = Some(path);
    }

    /// The last path sent, if any
    pub fn current(&self) -> Option<NetworkPath> {
        lock(&self.state).current.clone()
    }

    /// Number of monitors currently started and not cancelled
    pub fn running_monitors(&self) -> usize {
        lock(&self.state).handlers.len()
    }

    /// Total number of monitors ever started
    pub fn started_monitors(&self) -> usize {
        lock(&self.state).started
    }

    /// Total number of monitors cancelled after being started
    pub fn cancelled_monitors(&self) -> usize {
        lock(&self.state).cancelled
    }
}

/// Factory of [`ManualPathMonitor`]s sharing one controller
#[derive(Clone, Default)]
pub struct ManualPathMonitorFactory {
    controller: ManualPathController,
}

impl ManualPathMonitorFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known path instead of waiting for the first `send`
    pub fn with_initial_path(path: NetworkPath) -> Self {
        let factory = Self::default();
        lock(&factory.controller.state).current = Some(path);
        factory
    }

    pub fn controller(&self) -> ManualPathController {
        self.controller.clone()
    }
}

impl PathMonitorFactory for ManualPathMonitorFactory {
    type Monitor = ManualPathMonitor;

    fn make_monitor(&self) -> ManualPathMonitor {
        let mut state = lock(&self.controller.state);
        let id = state.next_id;
        state.next_id += 1;
        ManualPathMonitor {
            id,
            controller: self.controller.clone(),
            phase: Phase::Created,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Created,
    Running,
    Cancelled,
}

/// A monitor that reports whatever its controller sends
pub struct ManualPathMonitor {
    id: u64,
    controller: ManualPathController,
    phase: Phase,
}

impl PathMonitor for ManualPathMonitor {
    fn start(&mut self, handler: PathUpdateHandler) {
        if self.phase != Phase::Created {
            return;
        }
        self.phase = Phase::Running;

        let mut state = lock(&self.controller.state);
        state.started += 1;
        if let Some(path) = state.current.clone() {
            handler(path);
        }
        state.handlers.insert(self.id, handler);
    }

    fn cancel(&mut self) {
        if self.phase != Phase::Running {
            self.phase = Phase::Cancelled;
            return;
        }
        self.phase = Phase::Cancelled;

        let mut state = lock(&self.controller.state);
        state.handlers.remove(&self.id);
        state.cancelled += 1;
    }
}

impl Drop for ManualPathMonitor {
    fn drop(&mut self) {
        self.cancel();
    }
}
