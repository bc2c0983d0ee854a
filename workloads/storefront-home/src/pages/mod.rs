//! Page loaders.

mod home;
mod product;

pub use home::*;
pub use product::*;
