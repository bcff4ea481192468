//! Cart pricing calculations.
//!
//! Everything here is a pure function of the cart lines and a price lookup.
//! Nothing is cached, so totals can never drift from the lines.

use crate::cart::CartLine;
use crate::catalog::CatalogItem;
use crate::ids::ItemId;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Derived totals for a set of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of quantities over lines whose item still exists.
    pub total_items: u64,
    /// Sum of quantity × unit price over lines whose item still exists.
    pub total_price: Money,
    /// Lines whose item no longer resolves in the catalog.
    pub stale_items: Vec<ItemId>,
}

impl CartTotals {
    /// Check if any line points at a missing catalog item.
    pub fn has_stale_items(&self) -> bool {
        !self.stale_items.is_empty()
    }
}

/// Total for a single line.
pub fn line_total(unit_price: Money, quantity: u32) -> Money {
    unit_price * quantity
}

/// Total for `line` priced against `item`.
pub fn price_line(line: &CartLine, item: &CatalogItem) -> Money {
    line_total(item.unit_price, line.quantity)
}

/// Compute totals for `lines`, resolving prices through `lookup`.
///
/// A line whose item cannot be resolved contributes to neither total and is
/// reported in `stale_items`. This never fails.
pub fn compute_totals<F>(lines: &[CartLine], lookup: F) -> CartTotals
where
    F: Fn(&ItemId) -> Option<Money>,
{
    let mut totals = CartTotals::default();

    for line in lines {
        match lookup(&line.item_id) {
            Some(unit_price) => {
                totals.total_items += u64::from(line.quantity);
                totals.total_price = totals.total_price + line_total(unit_price, line.quantity);
            }
            None => {
                warn!(
                    item_id = %line.item_id,
                    quantity = line.quantity,
                    "cart line references an item missing from the catalog"
                );
                totals.stale_items.push(line.item_id.clone());
            }
        }
    }

    totals
}
