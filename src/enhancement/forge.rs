//! The forge: one player's active item, buffs, gold, inventory and counters.
//!
//! Every operation checks its preconditions first and returns `None`/`false`
//! without touching state when they fail. When they hold, the full outcome is
//! computed and then committed in one step.

use super::gate::BusyGate;
use super::logic::{quote_sell, resolve_attempt};
use super::types::{AttemptOutcome, Blocker, OutcomeKind, SellOutcome, Statistics};
use crate::buffs::{BuffKind, BuffSet, BuffTransaction};
use crate::core::constants::MAX_LEVEL;
use crate::core::ForgeConfig;
use crate::error::{Result, StoreError};
use crate::inventory::Inventory;
use crate::items::{Item, StoredItem};
use crate::ledger::Ledger;
use crate::persistence::{PlayerSnapshot, RecordStore};
use crate::random::{RandomSource, SecureRandom};
use crate::rates::enhance_cost;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct Forge<R: RandomSource = SecureRandom> {
    item: Item,
    buffs: BuffSet,
    ledger: Ledger,
    inventory: Inventory,
    stats: Statistics,
    fail_streak: u32,
    gate: BusyGate,
    config: ForgeConfig,
    rng: R,
}

impl Forge<SecureRandom> {
    /// A forge backed by the OS random source. Fails if that source is
    /// unavailable.
    pub fn new(gold: u64) -> Result<Self> {
        Self::with_config(gold, ForgeConfig::default())
    }

    pub fn with_config(gold: u64, config: ForgeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_source(SecureRandom::os()?, config, gold))
    }
}

impl<R: RandomSource> Forge<R> {
    /// A forge drawing from `rng`. `config` is assumed valid.
    pub fn with_source(rng: R, config: ForgeConfig, gold: u64) -> Self {
        Self {
            item: Item::empty(),
            buffs: BuffSet::default(),
            ledger: Ledger::new(gold),
            inventory: Inventory::new(config.inventory_capacity),
            stats: Statistics::default(),
            fail_streak: 0,
            gate: BusyGate::new(),
            config,
            rng,
        }
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn level(&self) -> u8 {
        self.item.level
    }

    pub fn buffs(&self) -> &BuffSet {
        &self.buffs
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn gold(&self) -> u64 {
        self.ledger.gold()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn fail_streak(&self) -> u32 {
        self.fail_streak
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Grant a buff from outside the forge (rewards, debugging). Latches.
    pub fn grant_buff(&mut self, kind: BuffKind) {
        self.buffs.grant(kind);
    }

    /// Gold the next attempt would cost, honouring a pending free enhance.
    pub fn next_cost(&self) -> u64 {
        if self.buffs.free_enhance {
            0
        } else {
            enhance_cost(self.item.level)
        }
    }

    /// How long an attempt at the current level is presented.
    pub fn attempt_duration(&self) -> Duration {
        self.config.progress_duration(self.item.level)
    }

    pub fn is_busy(&self, now: Instant) -> bool {
        self.gate.is_busy(now)
    }

    pub fn busy_remaining(&self, now: Instant) -> Duration {
        self.gate.remaining(now)
    }

    /// The first reason an attempt started at `now` would be rejected.
    pub fn enhance_blocker(&self, now: Instant) -> Option<Blocker> {
        if self.gate.is_busy(now) {
            return Some(Blocker::Busy);
        }
        if self.item.destroyed {
            return Some(Blocker::Destroyed);
        }
        if self.item.level >= MAX_LEVEL {
            return Some(Blocker::MaxLevel);
        }
        let cost = self.next_cost();
        if !self.ledger.can_afford(cost) {
            return Some(Blocker::InsufficientGold {
                cost,
                gold: self.ledger.gold(),
            });
        }
        None
    }

    pub fn attempt_enhance(&mut self) -> Option<AttemptOutcome> {
        self.attempt_enhance_at(Instant::now())
    }

    /// One enhancement attempt at monotonic time `now`.
    pub fn attempt_enhance_at(&mut self, now: Instant) -> Option<AttemptOutcome> {
        if let Some(blocker) = self.enhance_blocker(now) {
            debug!(%blocker, "enhance rejected");
            return None;
        }

        let old_level = self.item.level;
        let mut tx = BuffTransaction::begin(&self.buffs);
        let cost = if tx.consume(BuffKind::FreeEnhance) {
            0
        } else {
            enhance_cost(old_level)
        };

        let r = resolve_attempt(
            &self.item,
            self.fail_streak,
            &mut tx,
            &self.config,
            &mut self.rng,
        );

        // Commit
        if !self.ledger.spend(cost) {
            // Affordability was checked above; nothing has been committed yet.
            warn!(cost, gold = self.ledger.gold(), "charge failed after check");
            return None;
        }
        self.item = r.item;
        self.fail_streak = r.fail_streak;
        tx.apply_to(&mut self.buffs);

        let mut new_record = false;
        let kind = if r.success {
            new_record = self.stats.record_success(r.item.level);
            if new_record {
                info!(level = r.item.level, "new max level");
            }
            OutcomeKind::Success
        } else {
            self.stats.record_failure(r.destroyed, r.downgraded);
            if r.destroyed {
                info!(level = old_level, "item destroyed");
                OutcomeKind::Destroyed
            } else {
                OutcomeKind::Fail
            }
        };

        let duration = self.config.progress_duration(old_level);
        self.gate.start(now, duration, self.config.cooldown());

        Some(AttemptOutcome {
            kind,
            old_level,
            new_level: self.item.level,
            roll: r.roll,
            threshold: r.threshold,
            cost,
            lucky: r.lucky,
            new_record,
            downgraded: r.downgraded,
            shield_saved: r.shield_saved,
            blessing_saved: r.blessing_saved,
            destroy_roll: r.destroy_roll,
            downgrade_roll: r.downgrade_roll,
            stats: self.item.stats,
            buffs_consumed: tx.consumed().to_vec(),
            buffs_granted: tx.granted().to_vec(),
            duration,
        })
    }

    /// Sell the active item for gold. No-op on an empty or destroyed item.
    pub fn sell(&mut self) -> Option<SellOutcome> {
        if !self.item.is_active() {
            debug!(level = self.item.level, destroyed = self.item.destroyed, "sell rejected");
            return None;
        }
        let level = self.item.level;
        let quote = quote_sell(&self.item, &self.config, &mut self.rng);
        let free_enhance_granted = self.rng.chance(self.config.free_enhance_chance);

        self.ledger.earn(quote.price);
        self.item.clear();
        if free_enhance_granted {
            self.buffs.grant(BuffKind::FreeEnhance);
        }
        if let Some(m) = quote.golden_multiplier {
            info!(level, multiplier = m, price = quote.price, "golden sell");
        }

        Some(SellOutcome {
            kind: OutcomeKind::Sold,
            level,
            base_price: quote.base_price,
            quality_multiplier: quote.quality_multiplier,
            golden_multiplier: quote.golden_multiplier,
            price: quote.price,
            free_enhance_granted,
        })
    }

    /// Move the active item into the next free slot. Returns the slot index.
    pub fn store(&mut self) -> Option<usize> {
        if !self.item.is_active() || !self.inventory.can_store() {
            debug!(
                active = self.item.is_active(),
                count = self.inventory.count(),
                "store rejected"
            );
            return None;
        }
        let slot = self.inventory.push(StoredItem::from(&self.item))?;
        self.item.clear();
        Some(slot)
    }

    /// Make slot `index` the active item.
    ///
    /// With an active item, the two swap places and the slot keeps its index.
    /// Without one, the slot is removed and later slots move down. Rejected
    /// while the item is destroyed; `reset` first.
    pub fn take(&mut self, index: usize) -> bool {
        if self.item.destroyed || index >= self.inventory.count() {
            debug!(index, destroyed = self.item.destroyed, "take rejected");
            return false;
        }
        let taken = if self.item.is_active() {
            self.inventory.swap(index, StoredItem::from(&self.item))
        } else {
            self.inventory.remove(index)
        };
        let Some(taken) = taken else {
            return false;
        };
        self.item = Item::from(taken);
        self.stats.observe_level(self.item.level);
        true
    }

    /// Clear a destroyed item back to empty. Gold, inventory and statistics
    /// are untouched.
    pub fn reset(&mut self) -> bool {
        if !self.item.destroyed {
            return false;
        }
        self.item.clear();
        true
    }

    /// Credit from a trusted external authority (gift received, battle win).
    pub fn credit_gold(&mut self, amount: u64) {
        self.ledger.credit(amount);
    }

    /// Debit for a trusted external authority. False on overdraft.
    pub fn debit_gold(&mut self, amount: u64) -> bool {
        self.ledger.debit(amount)
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            gold: self.ledger.gold(),
            total_spent: self.ledger.total_spent(),
            total_earned: self.ledger.total_earned(),
            stats: self.stats,
            level: self.item.level,
            item_stats: self.item.stats,
            destroyed: self.item.destroyed,
            inventory: self.inventory.slots().to_vec(),
            buffs: self.buffs,
            fail_streak: self.fail_streak,
            saved_at: chrono::Utc::now(),
        }
    }

    /// Replace state with a persisted snapshot, repairing anything that
    /// breaks an invariant. The busy gate is left as is.
    pub fn restore(&mut self, snapshot: PlayerSnapshot) {
        let snapshot = snapshot.sanitized(self.config.inventory_capacity);
        self.ledger =
            Ledger::from_parts(snapshot.gold, snapshot.total_spent, snapshot.total_earned);
        self.item = Item {
            level: snapshot.level,
            stats: snapshot.item_stats,
            destroyed: snapshot.destroyed,
        };
        self.inventory = Inventory::from_slots(snapshot.inventory, self.config.inventory_capacity);
        self.buffs = snapshot.buffs;
        self.stats = snapshot.stats;
        self.stats.observe_level(self.item.level);
        self.fail_streak = snapshot.fail_streak;
    }

    /// Write a snapshot under `key`. Failures are logged and returned; the
    /// forge keeps running on its in-memory state either way.
    pub fn flush<S: RecordStore + ?Sized>(
        &self,
        store: &mut S,
        key: &str,
    ) -> std::result::Result<(), StoreError> {
        store.write(key, &self.snapshot()).inspect_err(|e| {
            warn!(key, error = %e, "flush failed, keeping in-memory state");
        })
    }

    /// Load the snapshot under `key` if one exists. Returns whether state
    /// was replaced.
    pub fn load<S: RecordStore + ?Sized>(
        &mut self,
        store: &S,
        key: &str,
    ) -> std::result::Result<bool, StoreError> {
        match store.read(key)? {
            Some(snapshot) => {
                self.restore(snapshot);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
