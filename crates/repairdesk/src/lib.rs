//! # RepairDesk
//!
//! The unified API for RepairDesk, a repair-shop order tracker: create, edit,
//! list, filter and delete service orders kept in a local slot store.
//!
//! ## Overview
//!
//! - **Orders**: one record per repair job, with parts and a labor price
//! - **Store**: the full collection lives in one named slot and is rewritten
//!   on every change
//! - **Views**: newest-first listings filtered by status and free text
//! - **Stats**: counts by status and total revenue
//!
//! ## Usage
//!
//! ```rust,no_run
//! use repairdesk::{OrderBook, OrderBookConfig, OrderDraft, StatusFilter};
//! use repairdesk::store::FileBackend;
//!
//! let backend = FileBackend::open("repairdesk-data").unwrap();
//! let mut book = OrderBook::open(backend, OrderBookConfig::default());
//!
//! let order = book
//!     .create(OrderDraft::new("Bosch GBH 2-26", "Ivanov").labor_price(1500.0))
//!     .unwrap();
//!
//! for order in book.view("bosch", StatusFilter::All) {
//!     println!("{} {}", order.tool_name, order.total());
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `repairdesk::core` - Data model, views and statistics
//! - `repairdesk::store` - Slot backends and the order store

pub mod book;
pub mod error;

pub use repairdesk_core as core;
pub use repairdesk_store as store;

pub use book::{DeleteResult, OrderBook, OrderBookConfig, UpdateResult};
pub use error::{BookError, Result};

pub use repairdesk_core::{
    Clock, Order, OrderDraft, OrderId, Part, PartField, PartId, Region, Stats, Status,
    StatusFilter, SystemClock,
};
