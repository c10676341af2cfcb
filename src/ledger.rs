//! Gold balance and lifetime spend/earn accounting.
//!
//! Enhancement costs and sell proceeds move both the balance and the
//! spent/earned totals. External transfers (gifts, battle payouts) only move
//! the balance, so `total_earned - total_spent` is always forge profit.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    gold: u64,
    total_spent: u64,
    total_earned: u64,
}

impl Ledger {
    pub fn new(gold: u64) -> Self {
        Self {
            gold,
            ..Default::default()
        }
    }

    /// Rebuild from persisted values.
    pub fn from_parts(gold: u64, total_spent: u64, total_earned: u64) -> Self {
        Self {
            gold,
            total_spent,
            total_earned,
        }
    }

    pub fn gold(&self) -> u64 {
        self.gold
    }

    pub fn total_spent(&self) -> u64 {
        self.total_spent
    }

    pub fn total_earned(&self) -> u64 {
        self.total_earned
    }

    /// Forge profit, independent of external transfers.
    pub fn net_profit(&self) -> i128 {
        i128::from(self.total_earned) - i128::from(self.total_spent)
    }

    pub fn can_afford(&self, amount: u64) -> bool {
        self.gold >= amount
    }

    /// Charge an enhancement cost. Fails without side effects on overdraft.
    pub fn spend(&mut self, amount: u64) -> bool {
        if !self.can_afford(amount) {
            return false;
        }
        self.gold -= amount;
        self.total_spent = self.total_spent.saturating_add(amount);
        true
    }

    /// Book sell proceeds.
    pub fn earn(&mut self, amount: u64) {
        self.gold = self.gold.saturating_add(amount);
        self.total_earned = self.total_earned.saturating_add(amount);
    }

    /// Credit from an external authority. Not counted as earnings.
    pub fn credit(&mut self, amount: u64) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Debit for an external authority. Not counted as spending.
    pub fn debit(&mut self, amount: u64) -> bool {
        if !self.can_afford(amount) {
            return false;
        }
        self.gold -= amount;
        true
    }
}
