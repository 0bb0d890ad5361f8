use crate::error::EndpointError;
use crate::http::KeyConvention;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Method, Request};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const JSON: &str = "application/json";

/// How a request may be answered from an HTTP cache, expressed as a `Cache-Control` request directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Leave caching to the protocol; no directive is sent
    UseProtocolCachePolicy,
    /// Always revalidate with the origin
    ReloadIgnoringLocalCacheData,
    /// Accept cached data of any age, loading only when nothing is cached
    #[default]
    ReturnCacheDataElseLoad,
    /// Accept cached data only, never load
    ReturnCacheDataDontLoad,
}

impl CachePolicy {
    pub fn directive(&self) -> Option<&'static str> {
        match self {
            Self::UseProtocolCachePolicy => None,
            Self::ReloadIgnoringLocalCacheData => Some("no-cache"),
            Self::ReturnCacheDataElseLoad => Some("max-stale"),
            Self::ReturnCacheDataDontLoad => Some("only-if-cached"),
        }
    }
}

/// Description of a single API call.
///
/// Implementors provide the location and method; everything else has a
/// default. Bodies are sent as JSON with `snake_case` keys.
pub trait Endpoint {
    fn base_url(&self) -> &str;

    fn path(&self) -> &str;

    fn method(&self) -> Method;

    /// Headers layered over the JSON defaults; these win on conflict
    fn headers(&self) -> Option<HashMap<String, String>> {
        None
    }

    fn body(&self) -> Option<serde_json::Value> {
        None
    }

    fn timeout(&self) -> Duration {
        DEFAULT_TIMEOUT
    }

    fn cache_policy(&self) -> CachePolicy {
        CachePolicy::default()
    }

    /// Default JSON headers merged with the endpoint's own
    fn all_headers(&self) -> Result<HeaderMap, EndpointError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));

        if let Some(extra) = self.headers() {
            for (name, value) in extra {
                let header_name = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|_| EndpointError::InvalidHeader { name: name.clone() })?;
                let header_value =
                    HeaderValue::from_str(&value).map_err(|_| EndpointError::InvalidHeader { name })?;
                headers.insert(header_name, header_value);
            }
        }
        Ok(headers)
    }

    /// Assemble the request this endpoint describes
    fn url_request(&self) -> Result<Request, EndpointError> {
        let raw = format!("{}{}", self.base_url(), self.path());
        let url = url::Url::parse(&raw).map_err(|source| EndpointError::InvalidUrl { url: raw, source })?;

        let mut request = Request::new(self.method(), url);
        *request.timeout_mut() = Some(self.timeout());

        let mut headers = self.all_headers()?;
        if let Some(directive) = self.cache_policy().directive() {
            if !headers.contains_key(CACHE_CONTROL) {
                headers.insert(CACHE_CONTROL, HeaderValue::from_static(directive));
            }
        }
        *request.headers_mut() = headers;

        if let Some(body) = self.body() {
            let encoded = serde_json::to_vec(&KeyConvention::SnakeCase.apply(body))?;
            *request.body_mut() = Some(encoded.into());
        }

        Ok(request)
    }
}
