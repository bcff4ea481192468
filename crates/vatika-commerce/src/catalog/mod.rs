//! Service catalog module.
//!
//! Contains catalog item types and the provider interface the cart reads
//! prices through.

mod item;
mod provider;

pub use item::{CatalogItem, ServiceCategory};
pub use provider::{CatalogProvider, InMemoryCatalog};
