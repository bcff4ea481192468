//! Cart and booking core for the Vatika decoration storefront.
//!
//! - **Catalog**: service items and the provider interface prices resolve through
//! - **Cart**: the per-session cart store, pricing and persistence
//! - **Checkout**: booking message, contact details and the submission flow
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vatika_commerce::prelude::*;
//!
//! let catalog = Arc::new(InMemoryCatalog::with_items([CatalogItem::new(
//!     "arch-01",
//!     "Floral Arch",
//!     Money::from_rupees(4500),
//!     ServiceCategory::Wedding,
//! )])?);
//!
//! let config = StorefrontConfig::default();
//! let cache = config.open_cache()?;
//! let mut cart = CartStore::restore(catalog.clone(), Arc::new(cache), &config.cart);
//!
//! if let Some(item) = catalog.get_item(&ItemId::new("arch-01")) {
//!     cart.add_item(&item)?;
//! }
//! println!("Total: {}", cart.snapshot().total_price.display());
//!
//! let mut checkout = CheckoutFlow::with_config(&config.checkout);
//! let receipt = checkout
//!     .checkout(&mut cart, ContactDetails::new("Asha", "asha@example.com", "98765"), &submitter)
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use config::StorefrontConfig;
pub use error::CommerceError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{CartConfig, CheckoutConfig, StorageConfig, StorefrontConfig};
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::{CatalogItem, CatalogProvider, InMemoryCatalog, ServiceCategory};

    // Cart
    pub use crate::cart::{
        CartEvent, CartLine, CartPersistence, CartSnapshot, CartStore, CartSubscriber,
        CartTotals, SnapshotLine,
    };

    // Checkout
    pub use crate::checkout::{
        build_booking_message, BookingReceipt, BookingRequest, BookingSubmitter, CheckoutFlow,
        CheckoutOutcome, CheckoutState, ContactDetails, SubmissionError,
    };
}
