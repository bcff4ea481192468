//! Cart persistence: the serialized form and the storage interface.

use std::collections::HashMap;

use crate::cart::CartLine;
use crate::error::CommerceError;
use crate::ids::ItemId;
use serde::{Deserialize, Serialize};
use tracing::warn;
use vatika_cache::Cache;

/// Storage the cart writes through to on every change.
pub trait CartPersistence: Send + Sync {
    /// Replace the saved cart under `key`.
    fn save(&self, key: &str, cart: &PersistedCart) -> Result<(), CommerceError>;

    /// Read the saved cart under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<PersistedCart>, CommerceError>;
}

impl CartPersistence for Cache {
    fn save(&self, key: &str, cart: &PersistedCart) -> Result<(), CommerceError> {
        self.set(key, cart).map_err(CommerceError::from)
    }

    fn load(&self, key: &str) -> Result<Option<PersistedCart>, CommerceError> {
        self.get(key).map_err(CommerceError::from)
    }
}

/// One saved line. Quantity is signed so that hand-edited or older data
/// with bad quantities still parses and can be sanitized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedLine {
    pub item_id: ItemId,
    pub quantity: i64,
}

/// The saved cart: an ordered list of `{ itemId, quantity }` pairs.
///
/// Totals are never saved; they are recomputed after loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedCart {
    pub lines: Vec<PersistedLine>,
}

impl PersistedCart {
    /// Capture the current lines.
    pub fn from_lines(lines: &[CartLine]) -> Self {
        Self {
            lines: lines
                .iter()
                .map(|l| PersistedLine {
                    item_id: l.item_id.clone(),
                    quantity: i64::from(l.quantity),
                })
                .collect(),
        }
    }

    /// Turn saved data back into valid cart lines.
    ///
    /// Drops blank ids and non-positive quantities, merges duplicate ids
    /// into the first occurrence, and clamps quantities to `max_quantity`.
    pub fn into_lines(self, max_quantity: u32) -> Vec<CartLine> {
        let mut lines: Vec<CartLine> = Vec::with_capacity(self.lines.len());
        let mut positions: HashMap<ItemId, usize> = HashMap::new();

        for saved in self.lines {
            if saved.item_id.is_blank() || saved.quantity < 1 {
                warn!(
                    item_id = %saved.item_id,
                    quantity = saved.quantity,
                    "dropping invalid saved cart line"
                );
                continue;
            }
            let quantity = clamp_quantity(saved.quantity, max_quantity);
            match positions.get(&saved.item_id) {
                Some(&idx) => {
                    warn!(item_id = %saved.item_id, "merging duplicate saved cart line");
                    let line = &mut lines[idx];
                    line.quantity = line.quantity.saturating_add(quantity).min(max_quantity);
                }
                None => {
                    positions.insert(saved.item_id.clone(), lines.len());
                    lines.push(CartLine::new(saved.item_id, quantity));
                }
            }
        }

        lines
    }
}

/// Clamp a positive requested quantity into `1..=max_quantity`.
pub(crate) fn clamp_quantity(quantity: i64, max_quantity: u32) -> u32 {
    u32::try_from(quantity)
        .unwrap_or(u32::MAX)
        .clamp(1, max_quantity.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(id: &str, quantity: i64) -> PersistedLine {
        PersistedLine {
            item_id: ItemId::new(id),
            quantity,
        }
    }

    #[test]
    fn test_wire_format() {
        let cart = PersistedCart::from_lines(&[
            CartLine::new(ItemId::new("a"), 2),
            CartLine::new(ItemId::new("b"), 1),
        ]);
        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(
            json,
            r#"[{"itemId":"a","quantity":2},{"itemId":"b","quantity":1}]"#
        );
    }

    #[test]
    fn test_sanitize() {
        let cart = PersistedCart {
            lines: vec![
                saved("a", 2),
                saved("", 3),
                saved("b", 0),
                saved("c", -4),
                saved("d", 1),
                saved("a", 5),
                saved("e", 1_000_000),
            ],
        };

        let lines = cart.into_lines(9999);
        assert_eq!(
            lines,
            vec![
                CartLine::new(ItemId::new("a"), 7),
                CartLine::new(ItemId::new("d"), 1),
                CartLine::new(ItemId::new("e"), 9999),
            ]
        );
    }

    #[test]
    fn test_cache_roundtrip() {
        let cache = Cache::in_memory();
        let cart = PersistedCart::from_lines(&[CartLine::new(ItemId::new("a"), 3)]);
        cache.save("cart", &cart).unwrap();
        assert_eq!(CartPersistence::load(&cache, "cart").unwrap(), Some(cart));
        assert_eq!(CartPersistence::load(&cache, "other").unwrap(), None);
    }

    #[test]
    fn test_clamp_quantity() {
        assert_eq!(clamp_quantity(5, 10), 5);
        assert_eq!(clamp_quantity(50, 10), 10);
        assert_eq!(clamp_quantity(i64::MAX, 10), 10);
        assert_eq!(clamp_quantity(3, 0), 1);
    }
}
