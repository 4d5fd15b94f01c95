//! In-process slot storage.

use super::{SlotError, SlotStore};
use async_trait::async_trait;
use dashmap::DashMap;

/// Slots held in memory for the lifetime of the value.
///
/// Used for session-scoped slots, and as durable storage in tests.
#[derive(Debug, Default)]
pub struct MemorySlots {
    slots: DashMap<String, String>,
}

impl MemorySlots {
    /// Create empty slot storage.
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[async_trait]
impl SlotStore for MemorySlots {
    async fn get(&self, key: &str) -> Result<Option<String>, SlotError> {
        Ok(self.slots.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SlotError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SlotError> {
        self.slots.remove(key);
        Ok(())
    }
}
