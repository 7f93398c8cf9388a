//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use repairdesk::{OrderBook, OrderBookConfig};
use repairdesk_core::{Clock, Order, OrderDraft, OrderId, Region, Status};
use repairdesk_store::MemoryBackend;

/// 2023-11-14T22:13:20Z, the default starting instant for fixtures.
pub const EPOCH_SECS: i64 = 1_700_000_000;

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep a handle while the
/// book owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Start at [`EPOCH_SECS`].
    pub fn new() -> Self {
        Self::starting_at(at(EPOCH_SECS))
    }

    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    /// Jump to an instant.
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Seconds since the Unix epoch as a UTC instant.
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// A test fixture: an order book over a shared memory backend and a manual
/// clock.
pub struct TestFixture {
    pub backend: Arc<MemoryBackend>,
    pub clock: ManualClock,
    pub book: OrderBook<Arc<MemoryBackend>, ManualClock>,
}

impl TestFixture {
    /// Create an empty fixture.
    pub fn new() -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let clock = ManualClock::new();
        let book = OrderBook::with_clock(backend.clone(), clock.clone(), OrderBookConfig::default());
        Self {
            backend,
            clock,
            book,
        }
    }

    /// Create an order, then advance the clock one minute.
    pub fn add(&mut self, draft: OrderDraft) -> Order {
        let order = self
            .book
            .create(draft)
            .unwrap_or_else(|e| panic!("fixture create failed: {e}"));
        self.clock.advance(Duration::minutes(1));
        order
    }

    /// Reopen a book over the same backend, as a restart would.
    pub fn reopen(&self) -> OrderBook<Arc<MemoryBackend>, ManualClock> {
        OrderBook::with_clock(
            self.backend.clone(),
            self.clock.clone(),
            OrderBookConfig::default(),
        )
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// The worked example: a drill for Ivanov, labor 500, two parts at 100.
pub fn drill_for_ivanov() -> OrderDraft {
    OrderDraft::new("Drill", "Ivanov")
        .labor_price(500.0)
        .part("Carbon brush", 100.0, 2)
}

/// A handful of varied drafts covering every status and optional field.
pub fn workshop_drafts() -> Vec<OrderDraft> {
    vec![
        drill_for_ivanov(),
        OrderDraft::new("Makita 9558 grinder", "Petrov")
            .phone("+7 (912) 555-01-02")
            .region(Region::Sverdlovsk)
            .status(Status::InProgress)
            .labor_price(800.0)
            .part("Bearing 608", 150.0, 2)
            .part("Switch", 420.0, 1),
        OrderDraft::new("Chainsaw Stihl MS 180", "Sidorova")
            .region(Region::Tatarstan)
            .status(Status::Done)
            .comment("chain replaced, carburetor tuned")
            .labor_price(1500.0)
            .part("Chain", 1200.0, 1),
        OrderDraft::new("Bosch GBH 2-26", "Kuznetsov")
            .phone("+7 (495) 000-00-00")
            .region(Region::Moscow)
            .status(Status::Returned)
            .labor_price(2000.0),
    ]
}

/// Build an order directly, bypassing the book.
pub fn order_at(id: &str, created_secs: i64, draft: OrderDraft) -> Order {
    Order::from_draft(OrderId::new(id), draft, at(created_secs))
}
