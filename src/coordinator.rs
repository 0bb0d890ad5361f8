//! Request execution pipeline.
//!
//! A coordinator performs exactly one transport call per request. Successful
//! responses go through the response mapper; anything that fails on the way is
//! handed to the error classifier together with the latest known reachability.

use crate::analysis::ErrorClassifierImpl;
use crate::config::NetworkConfig;
use crate::error::{ClassifiedError, ConfigError, RequestFailure, Result, TransportError};
use crate::http::{Endpoint, JsonResponseMapper, ReqwestTransport};
use crate::monitor::{ConnectivityObserver, PathMonitorFactory, ReachabilityCache};
use crate::traits::{ErrorClassifier, Reachability, ResponseMapper, Transport};
use crate::types::{ConnectivityState, NetworkAccess, RawResponse};
use futures::Stream;
use reqwest::Request;
use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Aborts the reachability listener with its coordinator
struct Listener(JoinHandle<()>);

impl Drop for Listener {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Executes requests and classifies their failures
pub struct RequestCoordinator<
    T,
    R = ReachabilityCache,
    M = JsonResponseMapper,
    C = ErrorClassifierImpl,
> {
    transport: T,
    reachability: R,
    mapper: M,
    classifier: C,
    access: NetworkAccess,
    _listener: Option<Listener>,
}

impl<T: Transport> RequestCoordinator<T> {
    /// Create a coordinator that tracks reachability through `observer`.
    ///
    /// Subscribes once to the observer's push stream. Outside a tokio runtime
    /// nothing is tracked and the network is always treated as reachable.
    pub fn new<F: PathMonitorFactory>(transport: T, observer: &ConnectivityObserver<F>) -> Self {
        let (reachability, listener) = match Handle::try_current() {
            Ok(runtime) => {
                let (cache, listener) = ReachabilityCache::track_on(&runtime, observer.observe_as_stream());
                (cache, Some(Listener(listener)))
            }
            Err(error) => {
                warn!("Reachability not tracked outside a tokio runtime: {}", error);
                (ReachabilityCache::unknown(), None)
            }
        };
        Self {
            transport,
            reachability,
            mapper: JsonResponseMapper::new(),
            classifier: ErrorClassifierImpl::new(),
            access: NetworkAccess::default(),
            _listener: listener,
        }
    }
}

impl RequestCoordinator<ReqwestTransport> {
    /// Build the default transport and mapper from configuration
    pub fn from_config<F: PathMonitorFactory>(
        config: &NetworkConfig,
        observer: &ConnectivityObserver<F>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config.client)?;
        Ok(Self::new(transport, observer)
            .with_network_access(config.client.network_access())
            .with_mapper(JsonResponseMapper::with_key_convention(config.client.key_convention)))
    }
}

impl<T: Transport, R: Reachability> RequestCoordinator<T, R> {
    /// Create a coordinator reading reachability from `reachability`
    pub fn with_reachability(transport: T, reachability: R) -> Self {
        Self {
            transport,
            reachability,
            mapper: JsonResponseMapper::new(),
            classifier: ErrorClassifierImpl::new(),
            access: NetworkAccess::default(),
            _listener: None,
        }
    }
}

impl<T, R, M, C> RequestCoordinator<T, R, M, C>
where
    T: Transport,
    R: Reachability,
    M: ResponseMapper,
    C: ErrorClassifier,
{
    pub fn with_mapper<M2: ResponseMapper>(self, mapper: M2) -> RequestCoordinator<T, R, M2, C> {
        RequestCoordinator {
            transport: self.transport,
            reachability: self.reachability,
            mapper,
            classifier: self.classifier,
            access: self.access,
            _listener: self._listener,
        }
    }

    pub fn with_classifier<C2: ErrorClassifier>(self, classifier: C2) -> RequestCoordinator<T, R, M, C2> {
        RequestCoordinator {
            transport: self.transport,
            reachability: self.reachability,
            mapper: self.mapper,
            classifier,
            access: self.access,
            _listener: self._listener,
        }
    }

    /// Refuse requests while the current path is one `access` rules out
    #[must_use]
    pub fn with_network_access(mut self, access: NetworkAccess) -> Self {
        self.access = access;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether the network was reachable at the last snapshot
    pub fn is_reachable(&self) -> bool {
        self.reachability.is_reachable()
    }

    /// The last observed connectivity snapshot
    pub fn connectivity(&self) -> Option<ConnectivityState> {
        self.reachability.snapshot()
    }

    /// Perform `request` and decode its 2xx body into `V`
    pub async fn execute<V: DeserializeOwned>(&self, request: Request) -> Result<V> {
        let response = self.dispatch(request).await?;
        self.mapper
            .map(&response)
            .map_err(|error| self.fail(error.into(), Some(response.status)))
    }

    /// Perform `request` and only check its status
    pub async fn execute_empty(&self, request: Request) -> Result<()> {
        let response = self.dispatch(request).await?;
        self.mapper
            .map_empty(&response)
            .map_err(|error| self.fail(error.into(), Some(response.status)))
    }

    /// Assemble the endpoint's request and execute it
    pub async fn execute_endpoint<V, E>(&self, endpoint: &E) -> Result<V>
    where
        V: DeserializeOwned,
        E: Endpoint + ?Sized,
    {
        let request = endpoint.url_request().map_err(|error| self.fail(error.into(), None))?;
        self.execute(request).await
    }

    /// Like [`execute`](Self::execute), delivered as a stream with exactly one item
    pub fn publisher<'a, V>(&'a self, request: Request) -> impl Stream<Item = Result<V>> + Send + 'a
    where
        V: DeserializeOwned + Send + 'a,
    {
        futures::stream::once(self.execute(request))
    }

    async fn dispatch(&self, request: Request) -> Result<RawResponse> {
        if let Some(path) = self.connectivity().and_then(|state| self.access.denial(&state)) {
            debug!(path, url = %request.url(), "Refusing request on a disallowed path");
            return Err(self.fail(TransportError::NotPermitted { path }.into(), None));
        }

        debug!(method = %request.method(), url = %request.url(), "Dispatching request");
        self.transport
            .perform(request)
            .await
            .map_err(|error| self.fail(error.into(), None))
    }

    fn fail(&self, failure: RequestFailure, status: Option<u16>) -> ClassifiedError {
        let reachable = self.reachability.is_reachable();
        let error = self.classifier.classify(failure, status, reachable);
        warn!(?status, reachable, kind = ?error.kind(), "Request failed: {}", error);
        error
    }
}
