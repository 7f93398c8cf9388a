//! Slot backend trait: the abstract interface for persistent key-value slots.
//!
//! This trait keeps the order store backend-agnostic. Implementations
//! include a JSON file per slot, SQLite, and in-memory (for tests).

use crate::error::Result;

/// A persistent key-value store of text payloads.
///
/// # Design Notes
///
/// - **Whole-slot writes**: `write_slot` replaces the previous payload in one
///   call. There is no merge and no partial update.
/// - **Missing is not an error**: reading an absent slot returns `Ok(None)`.
/// - **Idempotent removal**: removing an absent slot succeeds.
pub trait SlotBackend: Send + Sync {
    /// Read the payload stored under `key`.
    fn read_slot(&self, key: &str) -> Result<Option<String>>;

    /// Replace the payload stored under `key`.
    fn write_slot(&self, key: &str, payload: &str) -> Result<()>;

    /// Delete the slot. Succeeds if it does not exist.
    fn remove_slot(&self, key: &str) -> Result<()>;
}

impl<B: SlotBackend + ?Sized> SlotBackend for Box<B> {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, payload: &str) -> Result<()> {
        (**self).write_slot(key, payload)
    }

    fn remove_slot(&self, key: &str) -> Result<()> {
        (**self).remove_slot(key)
    }
}

impl<B: SlotBackend + ?Sized> SlotBackend for std::sync::Arc<B> {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, payload: &str) -> Result<()> {
        (**self).write_slot(key, payload)
    }

    fn remove_slot(&self, key: &str) -> Result<()> {
        (**self).remove_slot(key)
    }
}
