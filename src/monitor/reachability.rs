use crate::monitor::observer::ConnectivityStream;
use crate::traits::Reachability;
use crate::types::ConnectivityState;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Latest connectivity snapshot seen on a stream, readable from any thread.
///
/// Until the first snapshot arrives the network is assumed reachable, so a
/// request issued right after start-up is not misreported as a lost connection.
#[derive(Debug, Clone)]
pub struct ReachabilityCache {
    receiver: watch::Receiver<Option<ConnectivityState>>,
}

impl ReachabilityCache {
    /// Follow `stream` on a spawned task.
    ///
    /// The returned handle owns the listener; aborting it stops the updates and
    /// the cache keeps its last value. When the stream itself ends (the observer
    /// was stopped or dropped) the cache falls back to unknown. Must be called
    /// within a tokio runtime.
    pub fn track(stream: ConnectivityStream) -> (Self, JoinHandle<()>) {
        Self::track_on(&Handle::current(), stream)
    }

    /// Like [`track`](Self::track), spawning the listener on `runtime`
    pub fn track_on(runtime: &Handle, mut stream: ConnectivityStream) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = watch::channel(None);
        let listener = runtime.spawn(async move {
            while let Some(state) = stream.next().await {
                trace!(active = state.active, "Reachability updated");
                sender.send_replace(Some(state));
            }
            // No monitor reports anymore, so the last snapshot no longer holds
            sender.send_replace(None);
            debug!("Connectivity stream ended, reachability unknown");
        });
        (Self { receiver }, listener)
    }

    /// A cache that never receives a snapshot and so always reports reachable
    pub fn unknown() -> Self {
        let (_, receiver) = watch::channel(None);
        Self { receiver }
    }

    /// A cache fixed at the given snapshot
    pub fn fixed(state: ConnectivityState) -> Self {
        let (_, receiver) = watch::channel(Some(state));
        Self { receiver }
    }
}

impl Reachability for ReachabilityCache {
    fn is_reachable(&self) -> bool {
        self.receiver.borrow().map_or(true, |state| state.active)
    }

    fn snapshot(&self) -> Option<ConnectivityState> {
        *self.receiver.borrow()
    }
}
