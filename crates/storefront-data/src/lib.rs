//! Query execution against GraphQL-style APIs.
//!
//! This crate provides:
//! - `QueryExecutor` - Envelope construction, status and `errors` handling
//! - `QueryRunner` - Seam the page loader dispatches through
//! - `Transport` - Outbound HTTP seam, `ReqwestTransport` in production
//! - `CustomApiClient` - Typed calls into the custom backend's query catalog

mod catalog;
mod custom_api;
mod envelope;
mod error;
mod executor;
mod query;
mod request;
mod response;
mod transport;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use catalog::*;
pub use custom_api::*;
pub use envelope::*;
pub use error::*;
pub use executor::*;
pub use query::*;
pub use request::*;
pub use response::*;
pub use transport::*;
