//! Catalog provider interface and an in-memory implementation.

use parking_lot::RwLock;

use crate::catalog::{CatalogItem, ServiceCategory};
use crate::error::CommerceError;
use crate::ids::ItemId;
use crate::money::Money;

/// Read access to the list of sellable items.
///
/// The cart never assumes the catalog is static: an item may disappear
/// between being added to the cart and checkout.
pub trait CatalogProvider: Send + Sync {
    /// All items, in catalog order.
    fn list_items(&self) -> Vec<CatalogItem>;

    /// Look up one item.
    fn get_item(&self, id: &ItemId) -> Option<CatalogItem>;

    /// Unit price of an item, if it still exists.
    fn unit_price(&self, id: &ItemId) -> Option<Money> {
        self.get_item(id).map(|item| item.unit_price)
    }

    /// Featured items.
    fn featured(&self) -> Vec<CatalogItem> {
        self.list_items().into_iter().filter(|i| i.featured).collect()
    }

    /// Items in one category.
    fn by_category(&self, category: ServiceCategory) -> Vec<CatalogItem> {
        self.list_items()
            .into_iter()
            .filter(|i| i.category == category)
            .collect()
    }
}

/// Catalog held in memory, editable by the admin surface.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    items: RwLock<Vec<CatalogItem>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from a list of items. Later duplicates replace earlier ones.
    ///
    /// Fails on the first item with a negative price.
    pub fn with_items(items: impl IntoIterator<Item = CatalogItem>) -> Result<Self, CommerceError> {
        let catalog = Self::new();
        for item in items {
            catalog.upsert(item)?;
        }
        Ok(catalog)
    }

    /// Load a catalog from a JSON array of items.
    pub fn from_json(json: &str) -> Result<Self, CommerceError> {
        let items: Vec<CatalogItem> = serde_json::from_str(json)?;
        Self::with_items(items)
    }

    /// Insert or replace an item, keeping its position if it already exists.
    pub fn upsert(&self, item: CatalogItem) -> Result<(), CommerceError> {
        if item.unit_price.is_negative() {
            return Err(CommerceError::InvalidPrice(format!(
                "{} has negative price {}",
                item.id,
                item.unit_price.display()
            )));
        }

        let mut items = self.items.write();
        match items.iter().position(|i| i.id == item.id) {
            Some(idx) => items[idx] = item,
            None => items.push(item),
        }
        Ok(())
    }

    /// Delete an item. Returns whether it existed.
    pub fn remove(&self, id: &ItemId) -> bool {
        let mut items = self.items.write();
        let len_before = items.len();
        items.retain(|i| &i.id != id);
        items.len() < len_before
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl CatalogProvider for InMemoryCatalog {
    fn list_items(&self) -> Vec<CatalogItem> {
        self.items.read().clone()
    }

    fn get_item(&self, id: &ItemId) -> Option<CatalogItem> {
        self.items.read().iter().find(|i| &i.id == id).cloned()
    }

    fn unit_price(&self, id: &ItemId) -> Option<Money> {
        self.items
            .read()
            .iter()
            .find(|i| &i.id == id)
            .map(|i| i.unit_price)
    }
}
