use crate::core::constants::MAX_LEVEL;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStats {
    pub attack: u32,
    pub hp: u32,
}

impl ItemStats {
    pub const ZERO: ItemStats = ItemStats { attack: 0, hp: 0 };

    pub fn new(attack: u32, hp: u32) -> Self {
        Self { attack, hp }
    }

    pub fn is_zero(&self) -> bool {
        self.attack == 0 && self.hp == 0
    }
}

/// Lifecycle state of the active item, derived from [`Item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Empty,
    Active(u8),
    MaxLevel,
    Destroyed,
}

/// The single equipment piece on the anvil.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub level: u8,
    pub stats: ItemStats,
    /// Terminal until `reset`. Level and stats are frozen while set.
    pub destroyed: bool,
}

impl Item {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ItemState {
        if self.destroyed {
            ItemState::Destroyed
        } else if self.level == 0 {
            ItemState::Empty
        } else if self.level >= MAX_LEVEL {
            ItemState::MaxLevel
        } else {
            ItemState::Active(self.level)
        }
    }

    /// Holding a live, levelled item (sellable and storable).
    pub fn is_active(&self) -> bool {
        !self.destroyed && self.level > 0
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::empty();
    }
}

/// An off-duty item in an inventory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredItem {
    pub level: u8,
    pub attack: u32,
    pub hp: u32,
}

impl StoredItem {
    pub fn stats(&self) -> ItemStats {
        ItemStats::new(self.attack, self.hp)
    }
}

impl From<&Item> for StoredItem {
    fn from(item: &Item) -> Self {
        Self {
            level: item.level,
            attack: item.stats.attack,
            hp: item.stats.hp,
        }
    }
}

impl From<StoredItem> for Item {
    fn from(stored: StoredItem) -> Self {
        Self {
            level: stored.level.min(MAX_LEVEL),
            stats: stored.stats(),
            destroyed: false,
        }
    }
}
