//! Transport seam for outbound HTTP.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use storefront_core::TransportConfig;

use crate::error::QueryError;
use crate::request::HttpRequest;
use crate::response::HttpResponse;

/// Sends one HTTP request and returns the raw response.
///
/// Implementations report only connection-level failures as errors; status
/// handling belongs to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, QueryError>;
}

/// Transport backed by a shared `reqwest::Client`.
///
/// Timeouts, when configured, are enforced here; the query layer adds none.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the client's default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Create a transport with a whole-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, QueryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QueryError::Connection(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Create a transport from configuration.
    pub fn from_config(config: &TransportConfig) -> Result<Self, QueryError> {
        match config.timeout() {
            Some(timeout) => Self::with_timeout(timeout),
            None => Ok(Self::new()),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, QueryError> {
        let mut builder = self.client.request(request.method, &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(connection_error)?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.bytes().await.map_err(connection_error)?.to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}

fn connection_error(e: reqwest::Error) -> QueryError {
    if e.is_timeout() {
        QueryError::Connection(format!("request timed out: {}", e))
    } else {
        QueryError::Connection(e.to_string())
    }
}
