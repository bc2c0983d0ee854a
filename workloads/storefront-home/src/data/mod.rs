//! Commerce data models.

mod collection;
mod product;

pub use collection::*;
pub use product::*;
