//! The OrderBook: the mutation service over the order collection.
//!
//! The book holds the whole collection in memory, loaded once when it is
//! opened. Every mutation is applied in memory and the full collection is
//! then written to the store in one call. If that write fails the in-memory
//! change is rolled back, so memory and storage never disagree.

use repairdesk_core::{
    normalize_draft, stats, validate_draft, view, Clock, Order, OrderDraft, OrderId, Stats,
    StatusFilter, SystemClock,
};
use repairdesk_store::{OrderStore, SlotBackend, DEFAULT_SLOT};
use tracing::{debug, info, warn};

use crate::error::{BookError, Result};

/// Configuration for the OrderBook.
#[derive(Debug, Clone)]
pub struct OrderBookConfig {
    /// Slot key the collection is stored under.
    pub slot: String,
    /// How many identifiers to try before giving up on a collision streak.
    pub max_id_attempts: u32,
}

impl Default for OrderBookConfig {
    fn default() -> Self {
        Self {
            slot: DEFAULT_SLOT.to_string(),
            max_id_attempts: 8,
        }
    }
}

/// Result of [`OrderBook::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateResult {
    /// The order was replaced in place; carries the stored record.
    Updated(Order),
    /// No order has this id. Nothing was changed or written.
    NotFound,
}

/// Result of [`OrderBook::delete`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteResult {
    /// The order was removed; carries the removed record.
    Deleted(Order),
    /// No order had this id (idempotent, not an error).
    Absent,
}

type IdGenerator = Box<dyn FnMut() -> OrderId + Send>;

/// The order book.
///
/// Provides:
/// - Creating, updating and deleting orders
/// - Newest-first filtered views
/// - Aggregate statistics
pub struct OrderBook<B: SlotBackend, C: Clock = SystemClock> {
    /// Persistence for the collection.
    store: OrderStore<B>,
    /// Source of timestamps.
    clock: C,
    /// Source of candidate identifiers.
    next_id: IdGenerator,
    config: OrderBookConfig,
    /// The collection, newest-created first unless edited otherwise.
    orders: Vec<Order>,
}

impl<B: SlotBackend> OrderBook<B, SystemClock> {
    /// Open a book over `backend` using the system clock.
    pub fn open(backend: B, config: OrderBookConfig) -> Self {
        Self::with_clock(backend, SystemClock, config)
    }
}

impl<B: SlotBackend, C: Clock> OrderBook<B, C> {
    /// Open a book with an explicit clock.
    ///
    /// Loads the collection once; a missing or unreadable slot starts empty.
    pub fn with_clock(backend: B, clock: C, config: OrderBookConfig) -> Self {
        let store = OrderStore::with_slot(backend, config.slot.clone());
        let orders = store.load();
        info!(slot = %config.slot, count = orders.len(), "opened order book");
        Self {
            store,
            clock,
            next_id: Box::new(OrderId::generate),
            config,
            orders,
        }
    }

    /// Replace the identifier source.
    pub fn with_id_generator<F>(mut self, generator: F) -> Self
    where
        F: FnMut() -> OrderId + Send + 'static,
    {
        self.next_id = Box::new(generator);
        self
    }

    pub fn config(&self) -> &OrderBookConfig {
        &self.config
    }

    pub fn store(&self) -> &OrderStore<B> {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create an order from a draft.
    ///
    /// Assigns a fresh id, sets `created_at == updated_at == now`, puts the
    /// order first in the collection and persists.
    pub fn create(&mut self, draft: OrderDraft) -> Result<Order> {
        let draft = normalize_draft(draft);
        validate_draft(&draft)?;

        let id = self.fresh_id()?;
        let order = Order::from_draft(id, draft, self.clock.now());

        self.orders.insert(0, order.clone());
        if let Err(e) = self.store.save(&self.orders) {
            self.orders.remove(0);
            return Err(e.into());
        }

        info!(
            id = %order.id,
            tool = %order.tool_name,
            client = %order.client_name,
            "order created"
        );
        Ok(order)
    }

    /// Replace the order that has `order.id`.
    ///
    /// The record keeps its position and its `created_at`; `updated_at` is
    /// set to now. An unknown id changes nothing and writes nothing.
    pub fn update(&mut self, order: Order) -> Result<UpdateResult> {
        let Some(index) = self.position(&order.id) else {
            debug!(id = %order.id, "update of unknown order ignored");
            return Ok(UpdateResult::NotFound);
        };

        let draft = normalize_draft(order.to_draft());
        validate_draft(&draft)?;

        let mut updated = Order::from_draft(order.id, draft, self.clock.now());
        updated.created_at = self.orders[index].created_at;

        let previous = std::mem::replace(&mut self.orders[index], updated.clone());
        if let Err(e) = self.store.save(&self.orders) {
            self.orders[index] = previous;
            return Err(e.into());
        }

        info!(
            id = %updated.id,
            tool = %updated.tool_name,
            client = %updated.client_name,
            "order updated"
        );
        Ok(UpdateResult::Updated(updated))
    }

    /// Remove the order with `id` and persist.
    ///
    /// Deleting an absent id is not an error; the collection is still
    /// rewritten.
    pub fn delete(&mut self, id: &OrderId) -> Result<DeleteResult> {
        let Some(index) = self.position(id) else {
            self.store.save(&self.orders)?;
            debug!(%id, "delete of absent order");
            return Ok(DeleteResult::Absent);
        };

        let removed = self.orders.remove(index);
        if let Err(e) = self.store.save(&self.orders) {
            self.orders.insert(index, removed);
            return Err(e.into());
        }

        info!(
            id = %removed.id,
            tool = %removed.tool_name,
            client = %removed.client_name,
            "order deleted"
        );
        Ok(DeleteResult::Deleted(removed))
    }

    /// Discard the in-memory collection and read it from the store again.
    pub fn reload(&mut self) {
        self.orders = self.store.load();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// The collection in stored order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    pub fn contains(&self, id: &OrderId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Newest-first orders passing `filter` and matching `query`.
    pub fn view(&self, query: &str, filter: StatusFilter) -> Vec<&Order> {
        view(&self.orders, query, filter)
    }

    /// Counts by status and revenue over the whole collection.
    pub fn stats(&self) -> Stats {
        stats(&self.orders)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn position(&self, id: &OrderId) -> Option<usize> {
        self.orders.iter().position(|o| &o.id == id)
    }

    /// Draw identifiers until one is not already in the collection.
    fn fresh_id(&mut self) -> Result<OrderId> {
        for _ in 0..self.config.max_id_attempts {
            let id = (self.next_id)();
            if !self.contains(&id) {
                return Ok(id);
            }
            warn!(%id, "generated order id collides with an existing order, retrying");
        }
        Err(BookError::IdExhausted(self.config.max_id_attempts))
    }
}
