//! The order store: the order collection mirrored to one slot.

use repairdesk_core::Order;
use tracing::{debug, warn};

use crate::error::Result;
use crate::traits::SlotBackend;

/// Default slot key for the order collection.
pub const DEFAULT_SLOT: &str = "service_orders";

/// Appended to a slot key to name the copy of a corrupt payload.
pub const QUARANTINE_SUFFIX: &str = ".corrupt";

/// Loads and saves the full order collection through a [`SlotBackend`].
///
/// The collection is always written whole: `save` serializes every order
/// and replaces the slot in a single backend call.
#[derive(Debug)]
pub struct OrderStore<B> {
    backend: B,
    slot: String,
}

impl<B: SlotBackend> OrderStore<B> {
    /// Bind a backend to the default slot.
    pub fn new(backend: B) -> Self {
        Self::with_slot(backend, DEFAULT_SLOT)
    }

    /// Bind a backend to a named slot.
    pub fn with_slot(backend: B, slot: impl Into<String>) -> Self {
        Self {
            backend,
            slot: slot.into(),
        }
    }

    /// The slot key this store reads and writes.
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read the persisted collection.
    ///
    /// Never fails: a missing slot, a backend read error, or a payload that
    /// does not parse all yield an empty collection (the latter two are
    /// logged).
    pub fn load(&self) -> Vec<Order> {
        let payload = match self.backend.read_slot(&self.slot) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!(slot = %self.slot, "no stored orders");
                return Vec::new();
            }
            Err(e) => {
                warn!(slot = %self.slot, error = %e, "failed to read orders, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Order>>(&payload) {
            Ok(orders) => {
                debug!(slot = %self.slot, count = orders.len(), "loaded orders");
                orders
            }
            Err(e) => {
                warn!(
                    slot = %self.slot,
                    bytes = payload.len(),
                    error = %e,
                    "stored orders are corrupt, starting empty"
                );
                self.quarantine(&payload);
                Vec::new()
            }
        }
    }

    /// Slot that receives an unparsable payload before it can be overwritten.
    pub fn quarantine_slot(&self) -> String {
        format!("{}{QUARANTINE_SUFFIX}", self.slot)
    }

    /// Copy an unparsable payload aside so the next save does not lose it.
    /// An existing copy is replaced.
    fn quarantine(&self, payload: &str) {
        let key = self.quarantine_slot();
        match self.backend.write_slot(&key, payload) {
            Ok(()) => warn!(slot = %self.slot, copy = %key, "kept corrupt payload"),
            Err(e) => warn!(slot = %self.slot, error = %e, "failed to keep corrupt payload"),
        }
    }

    /// Overwrite the slot with `orders`.
    pub fn save(&self, orders: &[Order]) -> Result<()> {
        let payload = serde_json::to_string(orders)?;
        self.backend.write_slot(&self.slot, &payload)?;
        debug!(slot = %self.slot, count = orders.len(), "saved orders");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::memory::MemoryBackend;
    use chrono::{TimeZone, Utc};
    use repairdesk_core::{OrderDraft, OrderId, Region, Status};

    fn sample() -> Vec<Order> {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        vec![
            Order::from_draft(
                OrderId::new("b"),
                OrderDraft::new("Saw", "Petrov")
                    .phone("+7 900 111-22-33")
                    .region(Region::Rostov)
                    .status(Status::Done)
                    .labor_price(1200.0),
                now,
            ),
            Order::from_draft(
                OrderId::new("a"),
                OrderDraft::new("Drill", "Ivanov")
                    .labor_price(500.0)
                    .part("Brush", 100.0, 2)
                    .comment("sparks at the collector"),
                now,
            ),
        ]
    }

    #[test]
    fn test_load_missing_slot_is_empty() {
        let store = OrderStore::new(MemoryBackend::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let store = OrderStore::new(MemoryBackend::new());
        let orders = sample();
        store.save(&orders).unwrap();
        assert_eq!(store.load(), orders);
    }

    #[test]
    fn test_save_overwrites_without_merge() {
        let store = OrderStore::new(MemoryBackend::new());
        let orders = sample();
        store.save(&orders).unwrap();
        store.save(&orders[..1]).unwrap();
        assert_eq!(store.load(), orders[..1].to_vec());

        store.save(&[]).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_corrupt_payload_degrades_to_empty() {
        let store = OrderStore::new(MemoryBackend::with_slot(DEFAULT_SLOT, "{not json"));
        assert!(store.load().is_empty());

        let store = OrderStore::new(MemoryBackend::with_slot(DEFAULT_SLOT, r#"{"id":"x"}"#));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_corrupt_payload_is_kept_aside() {
        // One web-app record with a fractional quantity poisons the whole array.
        let raw = r#"[{"id":"keep1","toolName":"Drill","clientName":"Ivanov","clientPhone":"","region":"","status":"received","comment":"","parts":[],"repairPrice":500,"createdAt":"2024-03-07T10:30:00.000Z","updatedAt":"2024-03-07T10:30:00.000Z"},{"id":"frac","toolName":"Saw","clientName":"Petrov","clientPhone":"","region":"","status":"received","comment":"","parts":[{"id":"p1","name":"Oil","price":100,"quantity":1.5}],"repairPrice":0,"createdAt":"2024-03-07T10:31:00.000Z","updatedAt":"2024-03-07T10:31:00.000Z"}]"#;
        let backend = std::sync::Arc::new(MemoryBackend::with_slot(DEFAULT_SLOT, raw));
        let store = OrderStore::new(backend.clone());

        assert!(store.load().is_empty());
        assert_eq!(store.quarantine_slot(), "service_orders.corrupt");

        store.save(&sample()).unwrap();
        assert_eq!(
            backend.read_slot("service_orders.corrupt").unwrap().as_deref(),
            Some(raw)
        );
    }

    #[test]
    fn test_full_precision_prices_survive_roundtrip() {
        let prices = [
            57414.518664216484,
            47960.756426982596,
            27394.861362581578,
            27189.486291803434,
            0.1 + 0.2,
        ];
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let orders: Vec<Order> = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| {
                Order::from_draft(
                    OrderId::new(format!("o{i}")),
                    OrderDraft::new("Grinder", "Sidorova")
                        .labor_price(price)
                        .part("Bearing", price / 3.0, 3),
                    now,
                )
            })
            .collect();

        let store = OrderStore::new(MemoryBackend::new());
        store.save(&orders).unwrap();
        let loaded = store.load();

        assert_eq!(loaded, orders);
        for (order, price) in loaded.iter().zip(prices) {
            assert_eq!(order.labor_price.to_bits(), price.to_bits());
        }
    }

    #[test]
    fn test_named_slots_are_independent() {
        let backend = std::sync::Arc::new(MemoryBackend::new());
        let main = OrderStore::with_slot(backend.clone(), "main");
        let other = OrderStore::with_slot(backend.clone(), "other");

        main.save(&sample()).unwrap();
        assert_eq!(main.load().len(), 2);
        assert!(other.load().is_empty());
        assert_eq!(other.slot(), "other");
    }

    struct FailingBackend;

    impl SlotBackend for FailingBackend {
        fn read_slot(&self, _key: &str) -> Result<Option<String>> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            )))
        }

        fn write_slot(&self, _key: &str, _payload: &str) -> Result<()> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        }

        fn remove_slot(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_read_error_degrades_and_write_error_propagates() {
        let store = OrderStore::new(FailingBackend);
        assert!(store.load().is_empty());
        assert!(matches!(store.save(&sample()), Err(StoreError::Io(_))));
    }
}
