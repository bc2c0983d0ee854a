//! Query executor: one envelope in, one result out.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use storefront_observability::StructuredLogger;

use crate::envelope::{ApiRequestEnvelope, ApiResponseEnvelope, Variables};
use crate::error::{QueryError, QueryResult};
use crate::query::{QueryDescriptor, QueryRunner};
use crate::request::HttpRequest;
use crate::transport::Transport;

/// Executes GraphQL-style queries over a [`Transport`].
///
/// Every call is a single attempt. A response with a non-empty `errors` list
/// fails with [`QueryError::Protocol`] even when `data` is populated; the
/// errors themselves are only written to the diagnostic logger. Transport and
/// status failures are returned unlogged so the caller can log them once,
/// under the request name.
#[derive(Clone)]
pub struct QueryExecutor {
    transport: Arc<dyn Transport>,
    logger: StructuredLogger,
    default_headers: HashMap<String, String>,
}

impl QueryExecutor {
    /// Create an executor.
    pub fn new(transport: Arc<dyn Transport>, logger: StructuredLogger) -> Self {
        Self {
            transport,
            logger,
            default_headers: HashMap::new(),
        }
    }

    /// Add a header that will be included in all requests.
    pub fn with_default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// The diagnostic logger.
    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }

    /// Execute a query and return the untyped `data` value.
    ///
    /// Absent or `null` data on an error-free response yields `Value::Null`.
    pub async fn execute(
        &self,
        endpoint: &str,
        query: &str,
        variables: &Variables,
    ) -> QueryResult<Value> {
        self.send_envelope(endpoint, None, query, variables).await
    }

    /// Execute a query and deserialize `data` into `T`.
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &str,
        variables: &Variables,
    ) -> QueryResult<T> {
        let data = self.send_envelope(endpoint, None, query, variables).await?;
        serde_json::from_value(data).map_err(QueryError::from)
    }

    async fn send_envelope(
        &self,
        endpoint: &str,
        operation: Option<&str>,
        query: &str,
        variables: &Variables,
    ) -> QueryResult<Value> {
        let envelope = ApiRequestEnvelope::new(query, variables.clone());
        let request = HttpRequest::post(endpoint)
            .headers(self.default_headers.clone())
            .json(&envelope)?;

        let response = self.transport.send(request).await?.error_for_status()?;

        let envelope: ApiResponseEnvelope = response.json()?;

        if envelope.has_errors() {
            self.logger
                .error_builder("API returned errors")
                .field("endpoint", endpoint)
                .field("operation", operation.unwrap_or("anonymous"))
                .json("errors", Value::Array(envelope.errors.unwrap_or_default()))
                .emit();
            return Err(QueryError::Protocol);
        }

        Ok(envelope.data.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl QueryRunner for QueryExecutor {
    async fn run(&self, query: &QueryDescriptor, variables: &Variables) -> QueryResult<Value> {
        self.send_envelope(&query.endpoint, query.operation, &query.document, variables)
            .await
    }
}
