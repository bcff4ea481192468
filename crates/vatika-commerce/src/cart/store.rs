//! The cart store: sole owner of the session's cart lines.

use std::sync::Arc;

use crate::cart::events::{CartEvent, CartSubscriber, DEFAULT_EVENT_CAPACITY};
use crate::cart::persist::{clamp_quantity, CartPersistence, PersistedCart};
use crate::cart::pricing::{compute_totals, CartTotals};
use crate::cart::{CartLine, CartSnapshot};
use crate::catalog::{CatalogItem, CatalogProvider};
use crate::config::CartConfig;
use crate::error::CommerceError;
use crate::ids::ItemId;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Authoritative list of selected services for one browsing session.
///
/// All mutation goes through `&mut self`, so there is exactly one writer.
/// Totals are never stored; [`CartStore::snapshot`] derives them on every
/// call. When persistence is attached every change is written through to
/// it; a failed write is logged and otherwise ignored, the in-memory lines
/// stay authoritative.
pub struct CartStore {
    lines: Vec<CartLine>,
    catalog: Arc<dyn CatalogProvider>,
    persistence: Option<Arc<dyn CartPersistence>>,
    storage_key: String,
    max_quantity: u32,
    warning_threshold: u32,
    failed_writes: u32,
    events: broadcast::Sender<CartEvent>,
}

impl CartStore {
    /// Create an empty, in-memory cart with default limits.
    pub fn new(catalog: Arc<dyn CatalogProvider>) -> Self {
        Self::with_config(catalog, &CartConfig::default())
    }

    /// Create an empty, in-memory cart.
    pub fn with_config(catalog: Arc<dyn CatalogProvider>, config: &CartConfig) -> Self {
        let (events, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Self {
            lines: Vec::new(),
            catalog,
            persistence: None,
            storage_key: config.storage_key.clone(),
            max_quantity: config.max_quantity_per_line.max(1),
            warning_threshold: config.persistence_warning_threshold.max(1),
            failed_writes: 0,
            events,
        }
    }

    /// Create a cart backed by `persistence`, restoring whatever was saved
    /// under `config.storage_key`.
    ///
    /// Unreadable saved data is logged and the cart starts empty. Lines whose
    /// item has left the catalog are kept and show up as stale.
    pub fn restore(
        catalog: Arc<dyn CatalogProvider>,
        persistence: Arc<dyn CartPersistence>,
        config: &CartConfig,
    ) -> Self {
        let mut store = Self::with_config(catalog, config);

        match persistence.load(&store.storage_key) {
            Ok(Some(saved)) => {
                store.lines = saved.into_lines(store.max_quantity);
                debug!(
                    key = %store.storage_key,
                    lines = store.lines.len(),
                    "restored saved cart"
                );
            }
            Ok(None) => {
                debug!(key = %store.storage_key, "no saved cart");
            }
            Err(e) => {
                warn!(
                    key = %store.storage_key,
                    error = %e,
                    "could not read saved cart, starting empty"
                );
            }
        }

        store.persistence = Some(persistence);
        store
    }

    /// Add one unit of `item`.
    ///
    /// Creates a line with quantity 1, or increments the existing line.
    /// Fails only when the item id is blank, which is a caller bug.
    pub fn add_item(&mut self, item: &CatalogItem) -> Result<(), CommerceError> {
        if item.id.is_blank() {
            return Err(CommerceError::InvalidItem(format!(
                "item {:?} has an empty id",
                item.name
            )));
        }

        let quantity = match self.lines.iter().position(|l| l.item_id == item.id) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                if line.quantity >= self.max_quantity {
                    warn!(
                        item_id = %item.id,
                        max = self.max_quantity,
                        "line already at maximum quantity"
                    );
                    return Ok(());
                }
                line.quantity += 1;
                line.quantity
            }
            None => {
                self.lines.push(CartLine::new(item.id.clone(), 1));
                1
            }
        };

        debug!(item_id = %item.id, quantity, "added item to cart");
        self.commit(CartEvent::ItemAdded {
            item_id: item.id.clone(),
            quantity,
        });
        Ok(())
    }

    /// Set a line's quantity.
    ///
    /// `quantity < 1` removes the line. Unknown items are ignored; this never
    /// creates a line.
    pub fn set_quantity(&mut self, item_id: &ItemId, quantity: i64) {
        if quantity < 1 {
            self.remove_item(item_id);
            return;
        }

        let max_quantity = self.max_quantity;
        let Some(line) = self.lines.iter_mut().find(|l| &l.item_id == item_id) else {
            debug!(%item_id, "set_quantity on an item not in the cart");
            return;
        };

        let new_quantity = clamp_quantity(quantity, max_quantity);
        if i64::from(new_quantity) != quantity {
            warn!(%item_id, requested = quantity, max = max_quantity, "clamped quantity");
        }
        if line.quantity == new_quantity {
            return;
        }
        line.quantity = new_quantity;

        debug!(%item_id, quantity = new_quantity, "updated cart quantity");
        self.commit(CartEvent::QuantityChanged {
            item_id: item_id.clone(),
            quantity: new_quantity,
        });
    }

    /// Remove a line. No-op if absent.
    pub fn remove_item(&mut self, item_id: &ItemId) {
        let len_before = self.lines.len();
        self.lines.retain(|l| &l.item_id != item_id);
        if self.lines.len() == len_before {
            return;
        }

        debug!(%item_id, "removed item from cart");
        self.commit(CartEvent::ItemRemoved {
            item_id: item_id.clone(),
        });
    }

    /// Remove every line.
    ///
    /// Always writes the empty cart through, so storage is empty afterwards
    /// even if an earlier write failed. Subscribers are only notified when
    /// something was removed.
    pub fn clear(&mut self) {
        let had_lines = !self.lines.is_empty();
        self.lines.clear();
        self.persist();
        if had_lines {
            debug!("cleared cart");
            self.notify(CartEvent::Cleared);
        }
    }

    /// Remove what a confirmed booking took out of the cart.
    ///
    /// Each line in `booked` is subtracted from the matching line here; lines
    /// that reach zero are removed. Units added after `booked` was taken stay
    /// in the cart. If nothing is left the empty cart is written through and
    /// subscribers see [`CartEvent::Cleared`].
    pub fn confirm_checkout(&mut self, booked: &CartSnapshot) {
        let mut events = Vec::new();
        for booked_line in &booked.lines {
            let Some(idx) = self
                .lines
                .iter()
                .position(|l| l.item_id == booked_line.item_id)
            else {
                continue;
            };

            let current = self.lines[idx].quantity;
            if current > booked_line.quantity {
                let remaining = current - booked_line.quantity;
                self.lines[idx].quantity = remaining;
                events.push(CartEvent::QuantityChanged {
                    item_id: booked_line.item_id.clone(),
                    quantity: remaining,
                });
            } else {
                self.lines.remove(idx);
                events.push(CartEvent::ItemRemoved {
                    item_id: booked_line.item_id.clone(),
                });
            }
        }

        if self.lines.is_empty() {
            self.persist();
            if !events.is_empty() {
                debug!("booked lines removed, cart empty");
                self.notify(CartEvent::Cleared);
            }
            return;
        }
        if events.is_empty() {
            return;
        }

        debug!(remaining_lines = self.lines.len(), "booked lines removed");
        self.persist();
        for event in events {
            self.notify(event);
        }
    }

    /// Current lines with resolved prices and totals.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::resolve(&self.lines, self.catalog.as_ref())
    }

    /// Totals only, without cloning catalog items.
    pub fn totals(&self) -> CartTotals {
        compute_totals(&self.lines, |id| self.catalog.unit_price(id))
    }

    /// Raw lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Quantity of `item_id`, zero if absent.
    pub fn quantity_of(&self, item_id: &ItemId) -> u32 {
        self.lines
            .iter()
            .find(|l| &l.item_id == item_id)
            .map(|l| l.quantity)
            .unwrap_or(0)
    }

    /// Check if `item_id` has a line.
    pub fn contains(&self, item_id: &ItemId) -> bool {
        self.lines.iter().any(|l| &l.item_id == item_id)
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities over lines whose item still exists.
    pub fn total_items(&self) -> u64 {
        self.lines
            .iter()
            .filter(|l| self.catalog.get_item(&l.item_id).is_some())
            .map(|l| u64::from(l.quantity))
            .sum()
    }

    /// Lines whose item has left the catalog.
    pub fn stale_items(&self) -> Vec<ItemId> {
        self.lines
            .iter()
            .filter(|l| self.catalog.get_item(&l.item_id).is_none())
            .map(|l| l.item_id.clone())
            .collect()
    }

    /// True once enough consecutive saves have failed that the user should
    /// see a non-blocking warning.
    pub fn persistence_degraded(&self) -> bool {
        self.failed_writes >= self.warning_threshold
    }

    /// Listen for changes.
    pub fn subscribe(&self) -> CartSubscriber {
        CartSubscriber::new(self.events.subscribe())
    }

    /// Catalog the cart resolves prices through.
    pub fn catalog(&self) -> &Arc<dyn CatalogProvider> {
        &self.catalog
    }

    /// Per-line quantity cap.
    pub fn max_quantity(&self) -> u32 {
        self.max_quantity
    }

    fn commit(&mut self, event: CartEvent) {
        self.persist();
        self.notify(event);
    }

    fn persist(&mut self) {
        let Some(persistence) = self.persistence.clone() else {
            return;
        };

        match persistence.save(&self.storage_key, &PersistedCart::from_lines(&self.lines)) {
            Ok(()) => {
                if self.failed_writes > 0 {
                    info!(
                        key = %self.storage_key,
                        after_failures = self.failed_writes,
                        "cart persistence recovered"
                    );
                }
                self.failed_writes = 0;
            }
            Err(e) => {
                self.failed_writes = self.failed_writes.saturating_add(1);
                warn!(
                    key = %self.storage_key,
                    error = %e,
                    consecutive_failures = self.failed_writes,
                    "failed to save cart"
                );
            }
        }
    }

    fn notify(&self, event: CartEvent) {
        // Err only means nobody is listening.
        let _ = self.events.send(event);
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.lines)
            .field("storage_key", &self.storage_key)
            .field("max_quantity", &self.max_quantity)
            .field("failed_writes", &self.failed_writes)
            .finish_non_exhaustive()
    }
}
