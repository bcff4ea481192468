//! Cart line type.

use crate::ids::ItemId;
use serde::{Deserialize, Serialize};

/// One selected service and how many of it.
///
/// The quantity is always at least 1 while the line is in a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Catalog item this line refers to.
    pub item_id: ItemId,
    /// Quantity, at least 1.
    pub quantity: u32,
}

impl CartLine {
    pub(crate) fn new(item_id: ItemId, quantity: u32) -> Self {
        Self { item_id, quantity }
    }
}
