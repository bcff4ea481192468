//! Read-only view of the cart with resolved prices.

use std::collections::HashMap;

use crate::cart::pricing::{compute_totals, line_total};
use crate::cart::CartLine;
use crate::catalog::{CatalogItem, CatalogProvider};
use crate::ids::ItemId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A cart line joined with its catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLine {
    /// Referenced item id.
    pub item_id: ItemId,
    /// Quantity, at least 1.
    pub quantity: u32,
    /// The catalog item, or `None` if it has been removed from the catalog.
    pub item: Option<CatalogItem>,
    /// quantity × unit price; zero for stale lines.
    pub line_total: Money,
}

impl SnapshotLine {
    /// Check if the referenced item no longer exists.
    pub fn is_stale(&self) -> bool {
        self.item.is_none()
    }

    /// Item name, if resolved.
    pub fn name(&self) -> Option<&str> {
        self.item.as_ref().map(|i| i.name.as_str())
    }

    /// Unit price, if resolved.
    pub fn unit_price(&self) -> Option<Money> {
        self.item.as_ref().map(|i| i.unit_price)
    }
}

/// Ordered cart lines plus derived totals, computed at read time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Lines in insertion order.
    pub lines: Vec<SnapshotLine>,
    /// Sum of quantities over resolvable lines.
    pub total_items: u64,
    /// Sum of line totals over resolvable lines.
    pub total_price: Money,
}

impl CartSnapshot {
    /// Resolve `lines` against `catalog`.
    pub fn resolve(lines: &[CartLine], catalog: &dyn CatalogProvider) -> Self {
        let resolved: HashMap<&ItemId, CatalogItem> = lines
            .iter()
            .filter_map(|l| catalog.get_item(&l.item_id).map(|item| (&l.item_id, item)))
            .collect();

        let totals = compute_totals(lines, |id| resolved.get(id).map(|i| i.unit_price));

        let lines = lines
            .iter()
            .map(|line| {
                let item = resolved.get(&line.item_id).cloned();
                let line_total = item
                    .as_ref()
                    .map(|i| line_total(i.unit_price, line.quantity))
                    .unwrap_or(Money::ZERO);
                SnapshotLine {
                    item_id: line.item_id.clone(),
                    quantity: line.quantity,
                    item,
                    line_total,
                }
            })
            .collect();

        Self {
            lines,
            total_items: totals.total_items,
            total_price: totals.total_price,
        }
    }

    /// Check if the cart has no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines whose item still resolves, in order.
    pub fn bookable_lines(&self) -> impl Iterator<Item = (&SnapshotLine, &CatalogItem)> {
        self.lines
            .iter()
            .filter_map(|l| l.item.as_ref().map(|item| (l, item)))
    }

    /// Ids of lines whose item no longer resolves.
    pub fn stale_items(&self) -> Vec<ItemId> {
        self.lines
            .iter()
            .filter(|l| l.is_stale())
            .map(|l| l.item_id.clone())
            .collect()
    }

    /// Find a line by item id.
    pub fn line(&self, item_id: &ItemId) -> Option<&SnapshotLine> {
        self.lines.iter().find(|l| &l.item_id == item_id)
    }
}
