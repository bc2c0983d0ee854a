//! Critical/deferred data request orchestration.
//!
//! This crate splits a page's data needs in two:
//! - `resolve_critical` - Requests the page cannot render without, all-or-nothing
//! - `dispatch_deferred` - Fire-and-forget requests, each failure-isolated
//! - `PendingHandle` - Single-resolution result shared by any number of observers
//! - `ProgressiveRenderer` - Fallback-then-content rendering contract
//! - `PageLoader` - Classify, dispatch, resolve, bundle

mod bundle;
mod classify;
mod critical;
mod deferred;
mod error;
mod handle;
mod loader;
mod render;
mod request;

pub use bundle::*;
pub use classify::*;
pub use critical::*;
pub use deferred::*;
pub use error::*;
pub use handle::*;
pub use loader::*;
pub use render::*;
pub use request::*;

#[cfg(test)]
mod mock;
