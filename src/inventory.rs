//! Fixed-capacity storage for off-duty items.

use crate::core::constants::INVENTORY_CAPACITY;
use crate::items::StoredItem;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<StoredItem>,
    capacity: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(INVENTORY_CAPACITY)
    }
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild from persisted slots, dropping anything past capacity.
    pub fn from_slots(mut slots: Vec<StoredItem>, capacity: usize) -> Self {
        if slots.len() > capacity {
            tracing::warn!(
                stored = slots.len(),
                capacity,
                "inventory over capacity, truncating"
            );
            slots.truncate(capacity);
        }
        Self { slots, capacity }
    }

    pub fn count(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn can_store(&self) -> bool {
        self.slots.len() < self.capacity
    }

    pub fn slot_at(&self, index: usize) -> Option<&StoredItem> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[StoredItem] {
        &self.slots
    }

    /// Append to the first free slot. Returns the slot index.
    pub fn push(&mut self, item: StoredItem) -> Option<usize> {
        if !self.can_store() {
            return None;
        }
        self.slots.push(item);
        Some(self.slots.len() - 1)
    }

    /// Put `item` into slot `index`, returning what was there. Other slots
    /// keep their index.
    pub fn swap(&mut self, index: usize, item: StoredItem) -> Option<StoredItem> {
        let slot = self.slots.get_mut(index)?;
        Some(std::mem::replace(slot, item))
    }

    /// Remove slot `index`; later slots move down by one.
    pub fn remove(&mut self, index: usize) -> Option<StoredItem> {
        if index >= self.slots.len() {
            return None;
        }
        Some(self.slots.remove(index))
    }
}
