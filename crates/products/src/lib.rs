//! Catalog records.
//!
//! Products and categories as the Stockia backend serves them, plus the
//! request/patch/query shapes the client sends back. No IO lives here.

pub mod category;
pub mod product;
pub mod query;
pub mod request;

pub use category::{Category, CategoryRef};
pub use product::{Product, ProductPatch};
pub use query::ProductQuery;
pub use request::{ProductRequest, product_schema};
