//! Change notifications published by the cart store.

use crate::ids::ItemId;
use tokio::sync::broadcast;
use tracing::warn;

/// Default channel capacity for cart subscribers.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// A state change in the cart.
///
/// Subscribers re-read the snapshot on any event; the payload says what
/// changed for callers that want finer-grained updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A line was created or its quantity incremented.
    ItemAdded { item_id: ItemId, quantity: u32 },
    /// A line's quantity was set.
    QuantityChanged { item_id: ItemId, quantity: u32 },
    /// A line was removed.
    ItemRemoved { item_id: ItemId },
    /// All lines were removed.
    Cleared,
}

/// Receiving end of the cart's change notifications.
pub struct CartSubscriber {
    receiver: broadcast::Receiver<CartEvent>,
}

impl CartSubscriber {
    pub(crate) fn new(receiver: broadcast::Receiver<CartEvent>) -> Self {
        Self { receiver }
    }

    /// Wait for the next event. Returns `None` once the store is dropped.
    pub async fn recv(&mut self) -> Option<CartEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(missed = count, "cart subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next event without waiting.
    pub fn try_recv(&mut self) -> Option<CartEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    warn!(missed = count, "cart subscriber lagged");
                    continue;
                }
                Err(_) => return None,
            }
        }
    }

    /// Drain every pending event.
    pub fn drain(&mut self) -> Vec<CartEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
