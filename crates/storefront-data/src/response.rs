//! Raw HTTP responses from a transport.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::error::QueryError;

/// Status, headers and body exactly as the transport received them.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// `200 OK` carrying a JSON document.
    pub fn ok_json(body: &serde_json::Value) -> Self {
        let headers = HashMap::from([("Content-Type".to_string(), "application/json".to_string())]);
        Self::new(200, headers, body.to_string().into_bytes())
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, QueryError> {
        serde_json::from_slice(&self.body).map_err(QueryError::from)
    }

    /// Header value, matched case-insensitively.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find_map(|(k, v)| k.eq_ignore_ascii_case(key).then_some(v.as_str()))
    }

    /// Fail non-2xx responses with [`QueryError::Http`].
    ///
    /// The body is dropped; backends put stack traces there.
    pub fn error_for_status(self) -> Result<Self, QueryError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(QueryError::http(self.status))
        }
    }
}
