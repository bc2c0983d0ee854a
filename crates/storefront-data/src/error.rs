//! Query error taxonomy.

use std::fmt;

use thiserror::Error;

/// Coarse classification of a failed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network failure or non-success HTTP status.
    Transport,
    /// Well-formed response carrying application-level errors.
    Protocol,
    /// Response body was not a usable envelope, or `data` had the wrong shape.
    Decode,
}

impl ErrorKind {
    /// Stable lowercase name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Protocol => "protocol",
            Self::Decode => "decode",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors produced by a single query execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The request could not be sent or no response arrived.
    #[error("API connection failed: {0}")]
    Connection(String),

    /// The endpoint answered with a non-success status.
    #[error("API error: {status} {status_text}")]
    Http { status: u16, status_text: String },

    /// The response carried a non-empty `errors` list.
    ///
    /// Intentionally detail-free; the raw payload only goes to the diagnostic log.
    #[error("API returned errors")]
    Protocol,

    /// The response body or its `data` field could not be decoded.
    #[error("API response could not be decoded: {0}")]
    Decode(String),
}

impl QueryError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection(_) | Self::Http { .. } => ErrorKind::Transport,
            Self::Protocol => ErrorKind::Protocol,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    /// Build an HTTP error, filling the canonical reason phrase.
    pub fn http(status: u16) -> Self {
        let status_text = http::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_string();
        Self::Http {
            status,
            status_text,
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(e: serde_json::Error) -> Self {
        QueryError::Decode(e.to_string())
    }
}

/// Result of executing one query.
pub type QueryResult<T> = Result<T, QueryError>;
