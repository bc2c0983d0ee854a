//! Storefront home and product pages - Reference workload.
//!
//! Demonstrates critical/deferred loading with:
//! - A critical featured collection that gates the home page
//! - Deferred recommended products that may fail without breaking the page
//! - Product reviews and AI recommendations from the custom backend
//! - Locale-aware commerce queries (`@inContext`)

mod data;
mod pages;
mod queries;
mod storefront;

pub use data::*;
pub use pages::*;
pub use queries::*;
pub use storefront::*;
