use crate::error::{ClassifiedError, RequestFailure, TransportError};
use crate::types::{ConnectivityState, RawResponse};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;

/// Trait for the primitive that performs a request on the wire
pub trait Transport: Send + Sync {
    /// Perform a request and return the raw response, whatever its status
    fn perform(
        &self,
        request: reqwest::Request,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// Trait for turning a raw response into a typed value
pub trait ResponseMapper: Send + Sync {
    /// Decode a 2xx response into `T`
    fn map<T: DeserializeOwned>(&self, response: &RawResponse) -> Result<T, ClassifiedError>;

    /// Accept a 2xx response without decoding its body
    fn map_empty(&self, response: &RawResponse) -> Result<(), ClassifiedError>;
}

/// Trait for reducing a raw failure to the error a caller should see
pub trait ErrorClassifier: Send + Sync {
    /// Classify a failure given the response status (if one arrived) and reachability
    fn classify(
        &self,
        failure: RequestFailure,
        status: Option<u16>,
        is_reachable: bool,
    ) -> ClassifiedError;
}

/// Read-only accessor for the latest known reachability
pub trait Reachability: Send + Sync {
    /// Whether the network is currently believed reachable
    fn is_reachable(&self) -> bool;

    /// The latest full snapshot, if one was observed
    fn snapshot(&self) -> Option<ConnectivityState> {
        None
    }
}

impl<T: Transport> Transport for Arc<T> {
    fn perform(
        &self,
        request: reqwest::Request,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send {
        (**self).perform(request)
    }
}

impl<R: Reachability + ?Sized> Reachability for Arc<R> {
    fn is_reachable(&self) -> bool {
        (**self).is_reachable()
    }

    fn snapshot(&self) -> Option<ConnectivityState> {
        (**self).snapshot()
    }
}
