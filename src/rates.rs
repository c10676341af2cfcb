//! Per-level rate tables and display tiers.
//!
//! Indexed by the item's *current* level: the entry for level 9 governs an
//! attempt made on a +9 item.

use crate::core::constants::{FALLBACK_COST, FALLBACK_SUCCESS_RATE, MAX_LEVEL};
use serde::{Deserialize, Serialize};

const LEVELS: usize = MAX_LEVEL as usize + 1;

/// Success chance in percent.
pub const SUCCESS_RATES: [f64; LEVELS] = [
    100.0, 95.0, 90.0, 85.0, 80.0, // 0-4
    70.0, 60.0, 50.0, 40.0, 30.0, // 5-9
    25.0, 20.0, 15.0, 12.0, 10.0, // 10-14
    7.0, 5.0, 4.0, 3.0, 2.0, // 15-19
    0.0, // 20: max, cannot be attempted
];

/// Chance in percent that a non-destroying failure drops one level.
pub const DOWNGRADE_RATES: [f64; LEVELS] = [
    0.0, 0.0, 0.0, 0.0, 0.0, // 0-4: safe
    10.0, 20.0, 30.0, 40.0, 50.0, // 5-9
    50.0, 55.0, 55.0, 60.0, 60.0, // 10-14
    65.0, 65.0, 70.0, 70.0, 75.0, // 15-19
    0.0,
];

/// Chance in percent that a failure destroys the item.
pub const DESTROY_RATES: [f64; LEVELS] = [
    0.0, 0.0, 0.0, 0.0, 0.0, // 0-4
    0.0, 0.0, 0.0, 2.0, 5.0, // 5-9
    7.0, 10.0, 12.0, 15.0, 18.0, // 10-14
    20.0, 25.0, 30.0, 35.0, 40.0, // 15-19
    0.0,
];

/// Gold charged per attempt.
pub const ENHANCE_COSTS: [u64; LEVELS] = [
    50, 100, 200, 300, 500, // 0-4
    800, 1_200, 1_800, 2_500, 3_500, // 5-9
    5_000, 7_000, 10_000, 14_000, 20_000, // 10-14
    30_000, 45_000, 65_000, 90_000, 130_000, // 15-19
    0,
];

/// Inclusive (min, max) base sell price. Level 0 cannot be sold.
pub const SELL_PRICE_RANGES: [(u64, u64); LEVELS] = [
    (0, 0),
    (80, 120),
    (250, 350),
    (550, 750),
    (1_000, 1_400),
    (1_800, 2_400),
    (3_000, 4_000),
    (5_000, 6_500),
    (8_000, 10_500),
    (13_000, 17_000),
    (20_000, 26_000),
    (30_000, 40_000),
    (45_000, 60_000),
    (70_000, 90_000),
    (100_000, 130_000),
    (150_000, 200_000),
    (230_000, 300_000),
    (350_000, 450_000),
    (520_000, 680_000),
    (800_000, 1_000_000),
    (1_500_000, 2_000_000),
];

/// Everything the engine needs to know about one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelRates {
    pub success: f64,
    pub downgrade: f64,
    pub destroy: f64,
    pub cost: u64,
    pub sell_min: u64,
    pub sell_max: u64,
}

impl LevelRates {
    /// Entry returned for levels outside the table. Unreachable while level
    /// stays clamped to `MAX_LEVEL`.
    pub const FALLBACK: LevelRates = LevelRates {
        success: FALLBACK_SUCCESS_RATE,
        downgrade: 0.0,
        destroy: 0.0,
        cost: FALLBACK_COST,
        sell_min: 0,
        sell_max: 0,
    };
}

pub fn rates_for(level: u8) -> LevelRates {
    let idx = level as usize;
    if idx >= LEVELS {
        tracing::warn!(level, "rate lookup outside table, using fallback entry");
        return LevelRates::FALLBACK;
    }
    let (sell_min, sell_max) = SELL_PRICE_RANGES[idx];
    LevelRates {
        success: SUCCESS_RATES[idx],
        downgrade: DOWNGRADE_RATES[idx],
        destroy: DESTROY_RATES[idx],
        cost: ENHANCE_COSTS[idx],
        sell_min,
        sell_max,
    }
}

pub fn success_rate(level: u8) -> f64 {
    rates_for(level).success
}

pub fn downgrade_rate(level: u8) -> f64 {
    rates_for(level).downgrade
}

pub fn destroy_rate(level: u8) -> f64 {
    rates_for(level).destroy
}

pub fn enhance_cost(level: u8) -> u64 {
    rates_for(level).cost
}

pub fn sell_price_range(level: u8) -> (u64, u64) {
    let r = rates_for(level);
    (r.sell_min, r.sell_max)
}

/// Cosmetic level grouping. Has no effect on odds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Novice,
    Adept,
    Expert,
    Master,
    Legend,
}

impl Tier {
    pub fn name(&self) -> &'static str {
        match self {
            Tier::Novice => "Novice",
            Tier::Adept => "Adept",
            Tier::Expert => "Expert",
            Tier::Master => "Master",
            Tier::Legend => "Legend",
        }
    }
}

pub fn tier(level: u8) -> Tier {
    match level {
        0..=4 => Tier::Novice,
        5..=9 => Tier::Adept,
        10..=14 => Tier::Expert,
        15..=19 => Tier::Master,
        _ => Tier::Legend,
    }
}

/// Display prefix, e.g. "+7 ", or "" for +0.
pub fn level_prefix(level: u8) -> String {
    if level == 0 {
        String::new()
    } else {
        format!("+{} ", level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_are_percentages() {
        for level in 0..=MAX_LEVEL {
            let r = rates_for(level);
            for p in [r.success, r.downgrade, r.destroy] {
                assert!((0.0..=100.0).contains(&p), "level {level}: {p}");
            }
            assert!(r.sell_min <= r.sell_max);
        }
    }

    #[test]
    fn test_success_rate_non_increasing() {
        for level in 1..MAX_LEVEL {
            assert!(success_rate(level) <= success_rate(level - 1));
        }
    }

    #[test]
    fn test_cost_increasing_below_max() {
        for level in 1..MAX_LEVEL {
            assert!(enhance_cost(level) > enhance_cost(level - 1));
        }
        assert_eq!(enhance_cost(0), 50);
    }

    #[test]
    fn test_low_levels_are_safe() {
        for level in 0..=4 {
            assert_eq!(downgrade_rate(level), 0.0);
            assert_eq!(destroy_rate(level), 0.0);
        }
    }

    #[test]
    fn test_level_nine_entry() {
        assert_eq!(destroy_rate(9), 5.0);
        assert_eq!(downgrade_rate(9), 50.0);
    }

    #[test]
    fn test_fallback_outside_table() {
        assert_eq!(rates_for(MAX_LEVEL + 1), LevelRates::FALLBACK);
        assert_eq!(success_rate(255), 1.0);
        assert_eq!(enhance_cost(21), 100);
        assert_eq!(destroy_rate(21), 0.0);
    }

    #[test]
    fn test_level_zero_has_no_sell_value() {
        assert_eq!(sell_price_range(0), (0, 0));
    }

    #[test]
    fn test_tiers() {
        assert_eq!(tier(0), Tier::Novice);
        assert_eq!(tier(4), Tier::Novice);
        assert_eq!(tier(5), Tier::Adept);
        assert_eq!(tier(14), Tier::Expert);
        assert_eq!(tier(19), Tier::Master);
        assert_eq!(tier(20), Tier::Legend);
        assert_eq!(tier(20).name(), "Legend");
    }

    #[test]
    fn test_level_prefix() {
        assert_eq!(level_prefix(0), "");
        assert_eq!(level_prefix(7), "+7 ");
    }
}
