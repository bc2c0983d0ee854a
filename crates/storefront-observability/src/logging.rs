//! Request-scoped structured logging for page loads.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use storefront_core::{LoggingConfig, RequestId};

use crate::sink::{DiagnosticSink, LogFormat, StderrSink, TracingSink};

/// Severity, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown level name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown log level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// One diagnostic record, as handed to a [`DiagnosticSink`].
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Page (loader) name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// Additional structured fields, e.g. the offending payload. Serialized
    /// under `"fields"` so no key can shadow the entry's own.
    pub fields: BTreeMap<String, serde_json::Value>,
    /// Wall-clock time the entry was created.
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Create an entry with no context fields.
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            request_id: None,
            page: None,
            fields: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Render as a single JSON line.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// `[LEVEL] message page=.. request_id=.. | k=v ...`
    pub fn to_human(&self) -> String {
        let mut out = format!("[{}] {}", self.level, self.message);
        let context = [("page", &self.page), ("request_id", &self.request_id)];
        for (key, value) in context {
            if let Some(value) = value {
                out.push_str(&format!(" {}={}", key, value));
            }
        }

        let mut fields = self.fields.iter().map(|(k, v)| format!("{}={}", k, v));
        if let Some(first) = fields.next() {
            out.push_str(" | ");
            out.push_str(&first);
            for field in fields {
                out.push(' ');
                out.push_str(&field);
            }
        }
        out
    }

    /// Fields rendered as one JSON object.
    pub fn fields_json(&self) -> String {
        serde_json::to_string(&self.fields).unwrap_or_default()
    }

    /// Whether the message or any field value mentions `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.message.contains(needle) || self.fields_json().contains(needle)
    }
}

/// Logger carrying the request ID and page of the load it serves.
///
/// Every entry is stamped with the optional request ID and page name, then
/// forwarded to the injected [`DiagnosticSink`]. Cloning is cheap and shares
/// the sink, so a logger can move into spawned tasks.
#[derive(Clone)]
pub struct StructuredLogger {
    sink: Arc<dyn DiagnosticSink>,
    request_id: Option<RequestId>,
    page: Option<String>,
    min_level: LogLevel,
}

impl fmt::Debug for StructuredLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredLogger")
            .field("request_id", &self.request_id)
            .field("page", &self.page)
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}

impl StructuredLogger {
    /// Create a logger writing to `sink`.
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            sink,
            request_id: None,
            page: None,
            min_level: LogLevel::Info,
        }
    }

    /// Logger backed by `tracing` events.
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    /// Build a logger from configuration.
    ///
    /// Unknown values fall back to the defaults; `StorefrontConfig::validate`
    /// rejects them earlier.
    pub fn from_config(config: &LoggingConfig) -> Self {
        let sink: Arc<dyn DiagnosticSink> = match config.format.as_str() {
            "json" => Arc::new(StderrSink::new(LogFormat::Json)),
            "human" => Arc::new(StderrSink::new(LogFormat::Human)),
            _ => Arc::new(TracingSink),
        };
        let min_level = config.min_level.parse().unwrap_or(LogLevel::Info);
        Self::new(sink).with_min_level(min_level)
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Drop entries below `level`. Defaults to [`LogLevel::Info`].
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, BTreeMap::new());
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, BTreeMap::new());
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, BTreeMap::new());
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, BTreeMap::new());
    }

    fn log(&self, level: LogLevel, message: &str, fields: BTreeMap<String, serde_json::Value>) {
        if !self.enabled(level) {
            return;
        }

        let mut entry = LogEntry::new(level, message);
        entry.request_id = self.request_id.as_ref().map(|id| id.to_string());
        entry.page = self.page.clone();
        entry.fields = fields;

        self.sink.record(&entry);
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Whether entries at `level` are recorded.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

/// Accumulates fields for one entry; nothing is recorded until [`emit`](Self::emit).
#[must_use = "log entries are only recorded on emit()"]
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    level: LogLevel,
    message: String,
    fields: BTreeMap<String, serde_json::Value>,
}

impl<'a> LogBuilder<'a> {
    pub fn new(logger: &'a StructuredLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn field(self, key: &str, value: impl Into<String>) -> Self {
        self.json(key, serde_json::Value::String(value.into()))
    }

    pub fn field_i64(self, key: &str, value: i64) -> Self {
        self.json(key, value.into())
    }

    pub fn field_bool(self, key: &str, value: bool) -> Self {
        self.json(key, value.into())
    }

    /// Attach a JSON value verbatim, e.g. a GraphQL `errors` array.
    pub fn json(mut self, key: &str, value: serde_json::Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Whole milliseconds.
    pub fn duration_ms(self, key: &str, duration: std::time::Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.json(key, millis.into())
    }

    pub fn emit(self) {
        self.logger.log(self.level, &self.message, self.fields);
    }
}

impl StructuredLogger {
    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug, message)
    }

    pub fn info_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Info, message)
    }

    pub fn warn_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Warn, message)
    }

    pub fn error_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Error, message)
    }
}
