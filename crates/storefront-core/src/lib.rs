//! Core abstractions for the storefront data-orchestration platform.
//!
//! This crate provides the fundamental types shared by every page load:
//! - `RequestId` - Unique page-invocation identifier
//! - `RequestContext` - Typed request parameters and locale
//! - `TimingContext` / `LoadPhase` - Page load lifecycle tracking
//! - `StorefrontConfig` - Endpoint, transport and logging configuration

mod config;
mod context;
mod lifecycle;

pub use config::*;
pub use context::*;
pub use lifecycle::*;
