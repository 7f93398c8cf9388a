//! # RepairDesk Store
//!
//! Storage abstraction for RepairDesk. Provides a trait-based interface for
//! named persistent slots with JSON-file, SQLite and in-memory
//! implementations, plus the [`OrderStore`] that keeps the order collection
//! in one slot.
//!
//! ## Key Types
//!
//! - [`SlotBackend`] - The trait for slot reads and writes
//! - [`FileBackend`] - One JSON file per slot, atomic replace on write
//! - [`SqliteBackend`] - SQLite-based persistent storage
//! - [`MemoryBackend`] - In-memory storage for tests
//! - [`OrderStore`] - Load/save of the whole order collection
//!
//! ## Usage
//!
//! ```rust,no_run
//! use repairdesk_store::{FileBackend, OrderStore};
//!
//! let backend = FileBackend::open("repairdesk-data").unwrap();
//! let store = OrderStore::new(backend);
//!
//! let orders = store.load();
//! store.save(&orders).unwrap();
//! ```
//!
//! ## Design Notes
//!
//! - **Reads never fail**: a missing or corrupt slot loads as an empty collection;
//!   a corrupt payload is copied to `<slot>.corrupt` first
//! - **Writes are whole**: every save replaces the slot in one call
//! - **No schema on the payload**: the slot holds a plain JSON array of orders

pub mod error;
pub mod file;
pub mod memory;
pub mod migration;
pub mod orders;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use orders::{OrderStore, DEFAULT_SLOT, QUARANTINE_SUFFIX};
pub use sqlite::SqliteBackend;
pub use traits::SlotBackend;
