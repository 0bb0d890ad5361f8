use crate::error::TransportError;
use crate::traits::{Reachability, Transport};
use crate::types::RawResponse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Debug)]
enum MockFailure {
    Timeout,
    Connect,
    Other(String),
}

/// Mock transport for testing
#[derive(Clone)]
pub struct MockTransport {
    pub response: RawResponse,
    failure: Option<MockFailure>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            response: test_helpers::response(200, "{}"),
            failure: None,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_response(mut self, status: u16, body: &str) -> Self {
        self.response = test_helpers::response(status, body);
        self
    }

    pub fn with_timeout(mut self) -> Self {
        self.failure = Some(MockFailure::Timeout);
        self
    }

    pub fn with_connect_failure(mut self) -> Self {
        self.failure = Some(MockFailure::Connect);
        self
    }

    pub fn with_failure(mut self, message: &str) -> Self {
        self.failure = Some(MockFailure::Other(message.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of requests performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    async fn perform(&self, _request: reqwest::Request) -> Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.failure {
            Some(MockFailure::Timeout) => Err(TransportError::Timeout),
            Some(MockFailure::Connect) => Err(TransportError::Connect("connection refused".to_string())),
            Some(MockFailure::Other(message)) => Err(TransportError::other(message.clone())),
            None => Ok(self.response.clone()),
        }
    }
}

/// Reachability flag set directly by a test
#[derive(Debug)]
pub struct StaticReachability {
    reachable: AtomicBool,
}

impl StaticReachability {
    pub fn new(reachable: bool) -> Self {
        Self {
            reachable: AtomicBool::new(reachable),
        }
    }

    pub fn set(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }
}

impl Reachability for StaticReachability {
    fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }
}

/// Test helper functions
pub mod test_helpers {
    use super::*;

    /// Create a raw response with a JSON content type
    pub fn response(status: u16, body: &str) -> RawResponse {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        RawResponse::new(status, headers, body.as_bytes().to_vec(), "https://api.test".to_string())
    }

    /// Create a GET request
    pub fn get(url: &str) -> reqwest::Request {
        reqwest::Request::new(reqwest::Method::GET, url.parse().expect("valid test URL"))
    }
}
