//! Booking message formatting.
//!
//! The message is the human-readable summary sent to the business with a
//! booking enquiry. It is a pure function of the snapshot.

use crate::cart::CartSnapshot;

const MESSAGE_HEADER: &str = "I'd like to book the following services:";

/// Item lines only, one `{name} (₹{price}) x {quantity}` per resolvable line,
/// newline-joined in cart order.
pub fn booking_line_items(snapshot: &CartSnapshot) -> String {
    snapshot
        .bookable_lines()
        .map(|(line, item)| {
            format!(
                "{} ({}) x {}",
                item.name,
                item.unit_price.display_compact(),
                line.quantity
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full booking message: header, item lines and the total.
///
/// Stale lines have no name or price and are left out; the total is the
/// snapshot's, which already excludes them.
pub fn build_booking_message(snapshot: &CartSnapshot) -> String {
    format!(
        "{}\n\n{}\n\nTotal: {}",
        MESSAGE_HEADER,
        booking_line_items(snapshot),
        snapshot.total_price.display_compact()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use crate::catalog::{CatalogItem, InMemoryCatalog, ServiceCategory};
    use crate::ids::ItemId;
    use crate::money::Money;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::with_items([
            CatalogItem::new("a", "A", Money::from_rupees(50), ServiceCategory::Wedding),
            CatalogItem::new("b", "B", Money::from_rupees(30), ServiceCategory::Birthday),
            CatalogItem::new("c", "Rose Arch", Money::from_paise(4950), ServiceCategory::Other),
        ])
        .unwrap()
    }

    fn line(id: &str, quantity: u32) -> CartLine {
        CartLine::new(ItemId::new(id), quantity)
    }

    #[test]
    fn test_message_format() {
        let snapshot = CartSnapshot::resolve(&[line("a", 2), line("b", 1)], &catalog());

        assert_eq!(booking_line_items(&snapshot), "A (\u{20b9}50) x 2\nB (\u{20b9}30) x 1");
        assert_eq!(
            build_booking_message(&snapshot),
            "I'd like to book the following services:\n\n\
             A (\u{20b9}50) x 2\nB (\u{20b9}30) x 1\n\n\
             Total: \u{20b9}130"
        );
    }

    #[test]
    fn test_message_follows_cart_order() {
        let snapshot = CartSnapshot::resolve(&[line("b", 1), line("a", 2)], &catalog());
        assert_eq!(booking_line_items(&snapshot), "B (\u{20b9}30) x 1\nA (\u{20b9}50) x 2");
    }

    #[test]
    fn test_fractional_prices() {
        let snapshot = CartSnapshot::resolve(&[line("c", 2)], &catalog());
        assert!(build_booking_message(&snapshot)
            .ends_with("Rose Arch (\u{20b9}49.50) x 2\n\nTotal: \u{20b9}99"));
    }

    #[test]
    fn test_stale_lines_omitted() {
        let snapshot = CartSnapshot::resolve(&[line("gone", 3), line("a", 1)], &catalog());
        assert_eq!(booking_line_items(&snapshot), "A (\u{20b9}50) x 1");
        assert!(build_booking_message(&snapshot).ends_with("Total: \u{20b9}50"));
    }

    #[test]
    fn test_deterministic() {
        let snapshot = CartSnapshot::resolve(&[line("a", 1), line("b", 4)], &catalog());
        assert_eq!(build_booking_message(&snapshot), build_booking_message(&snapshot.clone()));
    }
}
