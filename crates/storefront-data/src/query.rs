//! Query descriptors and the runner seam.

use std::borrow::Cow;
use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::envelope::Variables;
use crate::error::QueryResult;

/// What to send and where: endpoint plus query document.
#[derive(Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    /// Endpoint URL the envelope is posted to.
    pub endpoint: String,
    /// Query document text.
    pub document: Cow<'static, str>,
    /// Operation name used in logs.
    pub operation: Option<&'static str>,
}

impl QueryDescriptor {
    /// Describe a static query document.
    pub fn new(endpoint: impl Into<String>, document: &'static str) -> Self {
        Self {
            endpoint: endpoint.into(),
            document: Cow::Borrowed(document),
            operation: None,
        }
    }

    /// Describe an owned query document.
    pub fn owned(endpoint: impl Into<String>, document: String) -> Self {
        Self {
            endpoint: endpoint.into(),
            document: Cow::Owned(document),
            operation: None,
        }
    }

    /// Set the operation name.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Operation name, or `"anonymous"`.
    pub fn operation_name(&self) -> &'static str {
        self.operation.unwrap_or("anonymous")
    }
}

// Documents can be long; keep Debug output to one line.
impl fmt::Debug for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryDescriptor")
            .field("endpoint", &self.endpoint)
            .field("operation", &self.operation_name())
            .field("document_len", &self.document.len())
            .finish()
    }
}

/// Anything that can execute a described query and return untyped `data`.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    /// Execute one query.
    async fn run(&self, query: &QueryDescriptor, variables: &Variables) -> QueryResult<Value>;
}
