use crate::config::ClientConfig;
use crate::error::{ConfigError, TransportError};
use crate::traits::Transport;
use crate::types::RawResponse;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Request};
use std::collections::HashMap;
use tracing::debug;

/// Transport implementation over a shared `reqwest` client
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a new transport with configuration
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder()
            .timeout(config.timeout())
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::default()
            } else {
                reqwest::redirect::Policy::none()
            });

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        if let Some(headers) = &config.headers {
            builder = builder.default_headers(Self::header_map(headers)?);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an already configured client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, ConfigError> {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ConfigError::invalid(format!("Invalid header name: {}", name)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ConfigError::invalid(format!("Invalid value for header {}", name)))?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}

impl Transport for ReqwestTransport {
    async fn perform(&self, request: Request) -> Result<RawResponse, TransportError> {
        debug!(method = %request.method(), url = %request.url(), "Sending request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(TransportError::from_reqwest)?;

        let status = response.status().as_u16();
        let url = response.url().to_string();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(name.to_string(), value_str.to_string());
            }
        }

        let body = response.bytes().await.map_err(TransportError::from_reqwest)?;
        debug!(status, url = %url, bytes = body.len(), "Received response");

        Ok(RawResponse {
            status,
            headers,
            body: body.to_vec(),
            url,
        })
    }
}
