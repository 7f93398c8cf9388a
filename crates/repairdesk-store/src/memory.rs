//! In-memory implementation of the SlotBackend trait.
//!
//! This is primarily for testing. It has the same semantics as the on-disk
//! backends but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::traits::SlotBackend;

/// In-memory slot backend.
///
/// All data is lost when the backend is dropped. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend with one slot already filled.
    ///
    /// Handy for simulating payloads written by other versions.
    pub fn with_slot(key: impl Into<String>, payload: impl Into<String>) -> Self {
        let backend = Self::new();
        if let Ok(mut slots) = backend.slots.write() {
            slots.insert(key.into(), payload.into());
        }
        backend
    }

    /// Number of stored slots.
    pub fn len(&self) -> usize {
        self.slots.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Lock(e.to_string())
}

impl SlotBackend for MemoryBackend {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let slots = self.slots.read().map_err(poisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn write_slot(&self, key: &str, payload: &str) -> Result<()> {
        let mut slots = self.slots.write().map_err(poisoned)?;
        slots.insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> Result<()> {
        let mut slots = self.slots.write().map_err(poisoned)?;
        slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_basic() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.read_slot("orders").unwrap(), None);

        backend.write_slot("orders", "[]").unwrap();
        assert_eq!(backend.read_slot("orders").unwrap().as_deref(), Some("[]"));

        backend.write_slot("orders", "[1]").unwrap();
        assert_eq!(backend.read_slot("orders").unwrap().as_deref(), Some("[1]"));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_memory_backend_remove_idempotent() {
        let backend = MemoryBackend::with_slot("orders", "[]");
        backend.remove_slot("orders").unwrap();
        backend.remove_slot("orders").unwrap();
        assert!(backend.is_empty());
    }
}
