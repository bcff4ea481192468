//! Shopping cart module.
//!
//! The [`CartStore`] owns the lines; [`pricing`] derives totals from them;
//! [`CartSnapshot`] is the read-only view handed to the UI and checkout.

mod events;
mod line;
mod persist;
pub mod pricing;
mod snapshot;
mod store;

pub use events::{CartEvent, CartSubscriber, DEFAULT_EVENT_CAPACITY};
pub use line::CartLine;
pub use persist::{CartPersistence, PersistedCart, PersistedLine};
pub use pricing::{compute_totals, line_total, price_line, CartTotals};
pub use snapshot::{CartSnapshot, SnapshotLine};
pub use store::CartStore;
