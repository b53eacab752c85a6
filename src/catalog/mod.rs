//! Product catalog
//!
//! Loading, holding and searching the shop's product list.

pub mod matcher;
pub mod product;
pub mod store;

pub use matcher::{find_exact, shortlist};
pub use product::Product;
pub use store::Catalog;
