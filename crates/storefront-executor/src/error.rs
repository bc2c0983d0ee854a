//! Error types for page data orchestration.

use storefront_data::{ErrorKind, QueryError};
use thiserror::Error;

/// A load plan could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("duplicate data request name: {0}")]
    DuplicateName(String),
}

/// The critical set failed; the page must not render.
///
/// Names the first failing request in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("critical request '{request}' failed: {source}")]
pub struct AggregateCriticalError {
    /// Name of the failing request.
    pub request: String,
    /// Category of the underlying failure.
    pub kind: ErrorKind,
    /// The underlying failure.
    pub source: QueryError,
}

impl AggregateCriticalError {
    pub fn new(request: impl Into<String>, source: QueryError) -> Self {
        Self {
            request: request.into(),
            kind: source.kind(),
            source,
        }
    }
}
