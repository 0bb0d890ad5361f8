//! Connectivity observer.
//!
//! Every subscription gets its own monitoring session: a fresh path monitor
//! feeding a `watch` channel. Monitor callbacks run on the monitor's own
//! context and only replace the channel value, so a slow consumer skips
//! straight to the newest snapshot instead of queueing stale ones.
//!
//! Two delivery models are offered:
//!
//! * [`ConnectivitySequence`]: a pull sequence owned by one consumer. Dropping
//!   it cancels its monitor.
//! * [`ConnectivityStream`]: a push stream that can be subscribed to any number
//!   of times. Its monitor stops when the last subscriber is dropped.
//!
//! [`ConnectivityObserver::stop`] ends every session at once.

use super::lock;
use crate::monitor::path::{NetworkPath, PathMonitor, PathMonitorFactory};
use crate::types::ConnectivityState;
use futures::{Stream, StreamExt};
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::task::{Context, Poll};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, trace};

/// Whether the observer currently runs any monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    Idle,
    Monitoring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeliveryModel {
    Sequence,
    Stream,
}

type SessionId = u64;

/// Producing side of a session. Closing it ends every consumer of the session.
struct StateSink {
    session: SessionId,
    sender: Mutex<Option<watch::Sender<ConnectivityState>>>,
}

impl StateSink {
    fn new(session: SessionId) -> (Arc<Self>, watch::Receiver<ConnectivityState>) {
        let (sender, receiver) = watch::channel(ConnectivityState::default());
        let sink = Arc::new(Self {
            session,
            sender: Mutex::new(Some(sender)),
        });
        (sink, receiver)
    }

    fn publish(&self, state: ConnectivityState) {
        match lock(&self.sender).as_ref() {
            Some(sender) => {
                trace!(session = self.session, ?state, "Publishing connectivity state");
                sender.send_replace(state);
            }
            None => debug!(session = self.session, "Discarding path update from a stopped monitor"),
        }
    }

    fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        match lock(&self.sender).as_ref() {
            Some(sender) => sender.subscribe(),
            None => watch::channel(ConnectivityState::default()).1,
        }
    }

    fn close(&self) {
        lock(&self.sender).take();
    }
}

struct Session<M> {
    monitor: M,
    sink: Arc<StateSink>,
    model: DeliveryModel,
}

impl<M: PathMonitor> Session<M> {
    fn shut_down(mut self) {
        // Close first so a callback still running during cancel is discarded
        self.sink.close();
        self.monitor.cancel();
        debug!(session = self.sink.session, model = ?self.model, "Connectivity monitoring stopped");
    }
}

struct Sessions<M> {
    entries: Mutex<HashMap<SessionId, Session<M>>>,
}

/// Lets consumers end their session without knowing the monitor type
trait SessionRegistry: Send + Sync {
    fn end(&self, id: SessionId);
}

impl<M: PathMonitor> SessionRegistry for Sessions<M> {
    fn end(&self, id: SessionId) {
        let session = lock(&self.entries).remove(&id);
        if let Some(session) = session {
            session.shut_down();
        }
    }
}

/// Ends its session when dropped
struct SessionGuard {
    id: SessionId,
    registry: Weak<dyn SessionRegistry>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.end(self.id);
        }
    }
}

/// Observes device connectivity through monitors created by `F`
pub struct ConnectivityObserver<F: PathMonitorFactory> {
    factory: F,
    sessions: Arc<Sessions<F::Monitor>>,
    next_session: AtomicU64,
}

impl<F: PathMonitorFactory> ConnectivityObserver<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            sessions: Arc::new(Sessions {
                entries: Mutex::new(HashMap::new()),
            }),
            next_session: AtomicU64::new(0),
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Start a private monitor and return a sequence of its snapshots.
    ///
    /// The sequence suspends until the next path update and ends after
    /// [`stop`](Self::stop). Unread snapshots are coalesced to the newest one.
    pub fn observe_as_sequence(&self) -> ConnectivitySequence {
        let (_, receiver, guard) = self.start_session(DeliveryModel::Sequence);
        ConnectivitySequence {
            inner: WatchStream::from_changes(receiver),
            _guard: guard,
        }
    }

    /// Start a shared monitor and return its first subscriber.
    ///
    /// Further subscribers come from [`ConnectivityStream::subscribe`] and only
    /// see updates published after they subscribed.
    pub fn observe_as_stream(&self) -> ConnectivityStream {
        let (sink, receiver, guard) = self.start_session(DeliveryModel::Stream);
        ConnectivityStream {
            inner: WatchStream::from_changes(receiver),
            shared: Arc::new(SharedSession { sink, _guard: guard }),
        }
    }

    /// Cancel every monitor and end every sequence and stream. Idempotent.
    pub fn stop(&self) {
        let drained: Vec<Session<F::Monitor>> =
            lock(&self.sessions.entries).drain().map(|(_, session)| session).collect();
        if drained.is_empty() {
            return;
        }

        debug!(sessions = drained.len(), "Stopping connectivity observer");
        for session in drained {
            session.shut_down();
        }
    }

    pub fn state(&self) -> ObserverState {
        if lock(&self.sessions.entries).is_empty() {
            ObserverState::Idle
        } else {
            ObserverState::Monitoring
        }
    }

    /// Number of sessions with a running monitor
    pub fn active_sessions(&self) -> usize {
        lock(&self.sessions.entries).len()
    }

    fn start_session(
        &self,
        model: DeliveryModel,
    ) -> (Arc<StateSink>, watch::Receiver<ConnectivityState>, SessionGuard) {
        let id = self.next_session.fetch_add(1, Ordering::Relaxed);
        let (sink, receiver) = StateSink::new(id);

        let target = Arc::downgrade(&sink);
        let mut monitor = self.factory.make_monitor();
        monitor.start(Box::new(move |path: NetworkPath| {
            if let Some(sink) = target.upgrade() {
                sink.publish(ConnectivityState::from(&path));
            }
        }));

        lock(&self.sessions.entries).insert(
            id,
            Session {
                monitor,
                sink: Arc::clone(&sink),
                model,
            },
        );
        debug!(session = id, ?model, "Connectivity monitoring started");

        let registry: Arc<dyn SessionRegistry> = self.sessions.clone();
        let guard = SessionGuard {
            id,
            registry: Arc::downgrade(&registry),
        };
        (sink, receiver, guard)
    }
}

impl<F: PathMonitorFactory + Default> Default for ConnectivityObserver<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl<F: PathMonitorFactory> Drop for ConnectivityObserver<F> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Pull-model sequence of connectivity snapshots
pub struct ConnectivitySequence {
    inner: WatchStream<ConnectivityState>,
    _guard: SessionGuard,
}

impl ConnectivitySequence {
    /// Wait for the next snapshot; `None` once the observer stopped
    pub async fn next(&mut self) -> Option<ConnectivityState> {
        self.inner.next().await
    }
}

impl Stream for ConnectivitySequence {
    type Item = ConnectivityState;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

struct SharedSession {
    sink: Arc<StateSink>,
    _guard: SessionGuard,
}

/// Push-model stream of connectivity snapshots shared by its subscribers
pub struct ConnectivityStream {
    inner: WatchStream<ConnectivityState>,
    shared: Arc<SharedSession>,
}

impl ConnectivityStream {
    /// Add a subscriber on the same monitor
    pub fn subscribe(&self) -> Self {
        Self {
            inner: WatchStream::from_changes(self.shared.sink.subscribe()),
            shared: Arc::clone(&self.shared),
        }
    }

    /// Number of live subscribers on this stream's monitor
    pub fn subscriber_count(&self) -> usize {
        Arc::strong_count(&self.shared)
    }

    /// Wait for the next snapshot; `None` once the observer stopped
    pub async fn next(&mut self) -> Option<ConnectivityState> {
        self.inner.next().await
    }
}

impl Clone for ConnectivityStream {
    fn clone(&self) -> Self {
        self.subscribe()
    }
}

impl Stream for ConnectivityStream {
    type Item = ConnectivityState;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}
