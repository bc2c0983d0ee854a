//! Diagnostic sinks.

use std::sync::Mutex;

use crate::logging::{LogEntry, LogLevel};

/// Write-only logging collaborator.
///
/// Page-load code never reads back what it wrote; sinks decide where entries
/// go (tracing, stderr, memory for tests).
pub trait DiagnosticSink: Send + Sync {
    /// Record one entry.
    fn record(&self, entry: &LogEntry);
}

/// Sink that forwards entries as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, entry: &LogEntry) {
        let request_id = entry.request_id.as_deref().unwrap_or("-");
        let page = entry.page.as_deref().unwrap_or("-");
        let fields = entry.fields_json();
        match entry.level {
            LogLevel::Trace => {
                tracing::trace!(request_id, page, fields = %fields, "{}", entry.message)
            }
            LogLevel::Debug => {
                tracing::debug!(request_id, page, fields = %fields, "{}", entry.message)
            }
            LogLevel::Info => {
                tracing::info!(request_id, page, fields = %fields, "{}", entry.message)
            }
            LogLevel::Warn => {
                tracing::warn!(request_id, page, fields = %fields, "{}", entry.message)
            }
            LogLevel::Error => {
                tracing::error!(request_id, page, fields = %fields, "{}", entry.message)
            }
        }
    }
}

/// Output format for [`StderrSink`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format (for production/log aggregation).
    #[default]
    Json,
    /// Human-readable format (for development).
    Human,
}

/// Sink printing one line per entry to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink {
    format: LogFormat,
}

impl StderrSink {
    /// Create a stderr sink with the given format.
    pub fn new(format: LogFormat) -> Self {
        Self { format }
    }

    /// Render an entry the way this sink prints it.
    pub fn render(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Json => entry.to_json(),
            LogFormat::Human => entry.to_human(),
        }
    }
}

impl DiagnosticSink for StderrSink {
    fn record(&self, entry: &LogEntry) {
        eprintln!("{}", self.render(entry));
    }
}

/// Capturing sink that keeps every entry in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any entry mentions `needle` in its message or fields.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries
            .lock()
            .map(|e| e.iter().any(|entry| entry.mentions(needle)))
            .unwrap_or(false)
    }

    /// Entries at `level`.
    pub fn at_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == level)
            .collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, entry: &LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry.clone());
        }
    }
}
