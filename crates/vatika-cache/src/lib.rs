//! Type-safe key-value persistence for the Vatika storefront.
//!
//! Plays the part of the browser's local storage: small JSON values keyed by
//! string, surviving a reload when backed by [`FileStore`].
//!
//! # Example
//!
//! ```rust,ignore
//! use vatika_cache::{Cache, FileStore};
//! use std::sync::Arc;
//!
//! let cache = Cache::new(Arc::new(FileStore::open("/var/lib/vatika")?));
//!
//! // Store a value
//! cache.set("cart", &lines)?;
//!
//! // Retrieve a value
//! let lines: Option<Vec<Line>> = cache.get("cart")?;
//!
//! // Delete a value
//! cache.delete("cart")?;
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::{Cache, KvStore};
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
