//! Shared helpers for network-layer integration tests
#![allow(dead_code)]

use network_layer::{
    ClientConfig, ConnectivityState, InterfaceKind, ReachabilityCache, ReqwestTransport, RequestCoordinator,
};
use serde::Deserialize;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
pub struct Item {
    pub id: i64,
    pub name: String,
}

/// Mount a GET route answering with `status` and a JSON body
pub async fn mount_json(server: &MockServer, route: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a GET route answering with `status` and a raw body
pub async fn mount_raw(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

pub fn get(url: &str) -> reqwest::Request {
    reqwest::Request::new(reqwest::Method::GET, url.parse().unwrap())
}

pub fn get_route(server: &MockServer, route: &str) -> reqwest::Request {
    get(&format!("{}{}", server.uri(), route))
}

pub fn reachability(reachable: bool) -> ReachabilityCache {
    if reachable {
        ReachabilityCache::fixed(ConnectivityState::online(InterfaceKind::WiredEthernet))
    } else {
        ReachabilityCache::fixed(ConnectivityState::offline())
    }
}

/// Coordinator over a real transport with a fixed reachability
pub fn coordinator(reachable: bool) -> RequestCoordinator<ReqwestTransport> {
    let transport = ReqwestTransport::new(&ClientConfig::default()).unwrap();
    RequestCoordinator::with_reachability(transport, reachability(reachable))
}
