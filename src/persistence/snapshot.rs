use crate::buffs::BuffSet;
use crate::core::constants::MAX_LEVEL;
use crate::enhancement::Statistics;
use crate::items::{ItemStats, StoredItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything needed to rebuild a forge, as written to a record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub gold: u64,
    #[serde(default)]
    pub total_spent: u64,
    #[serde(default)]
    pub total_earned: u64,
    #[serde(default)]
    pub stats: Statistics,
    pub level: u8,
    #[serde(default)]
    pub item_stats: ItemStats,
    #[serde(default)]
    pub destroyed: bool,
    #[serde(default)]
    pub inventory: Vec<StoredItem>,
    #[serde(default)]
    pub buffs: BuffSet,
    #[serde(default)]
    pub fail_streak: u32,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

impl PlayerSnapshot {
    /// A player with `gold` and nothing else.
    pub fn new(gold: u64) -> Self {
        Self {
            gold,
            total_spent: 0,
            total_earned: 0,
            stats: Statistics::default(),
            level: 0,
            item_stats: ItemStats::ZERO,
            destroyed: false,
            inventory: Vec::new(),
            buffs: BuffSet::default(),
            fail_streak: 0,
            saved_at: Utc::now(),
        }
    }

    /// Repair a snapshot that breaks a forge invariant (hand-edited or from
    /// an older build).
    pub fn sanitized(mut self, inventory_capacity: usize) -> Self {
        if self.level > MAX_LEVEL {
            tracing::warn!(level = self.level, "snapshot level above max, clamping");
            self.level = MAX_LEVEL;
        }
        if self.destroyed {
            self.level = 0;
            self.item_stats = ItemStats::ZERO;
        }
        if self.level == 0 {
            self.item_stats = ItemStats::ZERO;
        }
        let before = self.inventory.len();
        self.inventory.retain(|slot| slot.level > 0);
        if self.inventory.len() != before {
            tracing::warn!(
                dropped = before - self.inventory.len(),
                "snapshot held +0 inventory slots, dropping"
            );
        }
        for slot in &mut self.inventory {
            slot.level = slot.level.min(MAX_LEVEL);
        }
        self.inventory.truncate(inventory_capacity);
        if self.stats.attempts != self.stats.successes + self.stats.failures {
            tracing::warn!(
                attempts = self.stats.attempts,
                successes = self.stats.successes,
                failures = self.stats.failures,
                "snapshot counters disagree, recounting attempts"
            );
            self.stats.attempts = self.stats.successes + self.stats.failures;
        }
        self.stats.destroys = self.stats.destroys.min(self.stats.failures);
        self.stats.max_level = self.stats.max_level.min(MAX_LEVEL).max(self.level);
        self
    }
}
