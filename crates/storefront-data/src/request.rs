//! Outbound request handed to a transport.

use std::collections::HashMap;

use http::Method;
use serde::Serialize;

use crate::error::QueryError;

/// One HTTP call as a [`Transport`](crate::Transport) should perform it.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute endpoint URL.
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// POST to `url` with no headers or body yet.
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Merge `headers`; later keys overwrite earlier ones.
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Serialize `value` as the body and mark it `application/json`.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, QueryError> {
        let body = serde_json::to_vec(value)
            .map_err(|e| QueryError::Decode(format!("failed to encode request: {}", e)))?;
        self.body = Some(body);
        Ok(self.header("Content-Type", "application/json"))
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find_map(|(k, v)| k.eq_ignore_ascii_case(key).then_some(v.as_str()))
    }
}
