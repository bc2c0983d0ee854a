//! Diagnostic logging collaborators for storefront page loads.
//!
//! This crate provides:
//! - `DiagnosticSink` - Injected write-only logging collaborator
//! - `TracingSink` / `StderrSink` / `MemorySink` - Sink implementations
//! - `StructuredLogger` - Request-scoped structured logging
//! - `LogBuilder` - Fluent entry construction

mod logging;
mod sink;

pub use logging::*;
pub use sink::*;

// Re-export RequestId from storefront-core for convenience
pub use storefront_core::RequestId;
