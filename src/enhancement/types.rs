use crate::buffs::BuffKind;
use crate::items::ItemStats;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifetime attempt counters.
///
/// Gold totals live in [`crate::ledger::Ledger`]; this struct only counts.
/// Invariant: `attempts == successes + failures`, destroys counting as
/// failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub destroys: u64,
    #[serde(default)]
    pub downgrades: u64,
    pub max_level: u8,
}

impl Statistics {
    /// Count a success that reached `level`. Returns true on a new record.
    pub fn record_success(&mut self, level: u8) -> bool {
        self.attempts += 1;
        self.successes += 1;
        self.observe_level(level)
    }

    pub fn record_failure(&mut self, destroyed: bool, downgraded: bool) {
        self.attempts += 1;
        self.failures += 1;
        if destroyed {
            self.destroys += 1;
        }
        if downgraded {
            self.downgrades += 1;
        }
    }

    /// Raise `max_level` if `level` beats it. Never lowers it.
    pub fn observe_level(&mut self, level: u8) -> bool {
        if level > self.max_level {
            self.max_level = level;
            true
        } else {
            false
        }
    }

    pub fn success_ratio(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.successes as f64 / self.attempts as f64
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.attempts == self.successes + self.failures && self.destroys <= self.failures
    }
}

/// Discrete result tag handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Success,
    Fail,
    Destroyed,
    Sold,
}

/// Everything one enhancement attempt did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptOutcome {
    pub kind: OutcomeKind,
    pub old_level: u8,
    pub new_level: u8,
    /// Raw success roll in [0, 100), shown to the player.
    pub roll: f64,
    /// Effective success threshold after passion, capped at 100.
    pub threshold: f64,
    pub cost: u64,
    pub lucky: bool,
    pub new_record: bool,
    pub downgraded: bool,
    /// A pending shield absorbed a destroy.
    pub shield_saved: bool,
    /// A pending blessing absorbed a possible downgrade.
    pub blessing_saved: bool,
    pub destroy_roll: Option<f64>,
    pub downgrade_roll: Option<f64>,
    pub stats: ItemStats,
    pub buffs_consumed: Vec<BuffKind>,
    pub buffs_granted: Vec<BuffKind>,
    /// How long the caller should present the attempt as in progress.
    pub duration: Duration,
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }
}

/// Result of selling the active item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellOutcome {
    pub kind: OutcomeKind,
    pub level: u8,
    pub base_price: u64,
    pub quality_multiplier: f64,
    /// Set on a golden sell.
    pub golden_multiplier: Option<u64>,
    pub price: u64,
    pub free_enhance_granted: bool,
}

/// Why an attempt cannot start right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocker {
    Busy,
    Destroyed,
    MaxLevel,
    InsufficientGold { cost: u64, gold: u64 },
}

impl std::fmt::Display for Blocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Blocker::Busy => write!(f, "an attempt is still in progress"),
            Blocker::Destroyed => write!(f, "the item is destroyed"),
            Blocker::MaxLevel => write!(f, "the item is at max level"),
            Blocker::InsufficientGold { cost, gold } => {
                write!(f, "needs {cost} gold, have {gold}")
            }
        }
    }
}
