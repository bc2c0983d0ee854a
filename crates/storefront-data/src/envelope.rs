//! GraphQL request/response envelopes.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query variables (`variables` object of the request envelope).
pub type Variables = serde_json::Map<String, Value>;

/// Convert a JSON value into variables.
///
/// Non-object values (including `null`) yield an empty map.
pub fn variables(value: Value) -> Variables {
    match value {
        Value::Object(map) => map,
        _ => Variables::new(),
    }
}

/// Wire payload sent for every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequestEnvelope<'a> {
    /// Query document text.
    pub query: Cow<'a, str>,
    /// Variables, `{}` when none are given.
    #[serde(default)]
    pub variables: Variables,
}

impl<'a> ApiRequestEnvelope<'a> {
    /// Create an envelope borrowing the query text.
    pub fn new(query: &'a str, variables: Variables) -> Self {
        Self {
            query: Cow::Borrowed(query),
            variables,
        }
    }
}

/// Wire payload returned by the endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiResponseEnvelope<T = Value> {
    /// Result data; `null` or absent on total failure.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Application-level errors.
    #[serde(default)]
    pub errors: Option<Vec<Value>>,
}

impl<T> ApiResponseEnvelope<T> {
    /// Whether the response carries at least one error.
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }
}
