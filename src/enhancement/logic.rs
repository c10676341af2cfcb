//! Pure resolution of attempts and sells.
//!
//! These functions read the current item and draw from the random source but
//! never mutate forge state. [`super::Forge`] commits what they return.

use crate::buffs::{BuffKind, BuffTransaction};
use crate::core::constants::{LUCKY_LEVEL_GAIN, MAX_LEVEL, PASSION_RATE_MULTIPLIER};
use crate::core::ForgeConfig;
use crate::items::{apply_bonus, expected_stats, generate_stats, scale_down, Item, ItemStats};
use crate::rates::{rates_for, sell_price_range};
use crate::random::RandomSource;

/// State change computed for one attempt, before commit.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptResolution {
    pub success: bool,
    pub item: Item,
    pub fail_streak: u32,
    pub roll: f64,
    pub threshold: f64,
    pub lucky: bool,
    pub downgraded: bool,
    pub destroyed: bool,
    pub shield_saved: bool,
    pub blessing_saved: bool,
    pub destroy_roll: Option<f64>,
    pub downgrade_roll: Option<f64>,
}

/// Success threshold in percent, doubled by passion and capped at 100.
pub fn effective_threshold(success_rate: f64, passion: bool) -> f64 {
    let rate = if passion {
        success_rate * PASSION_RATE_MULTIPLIER
    } else {
        success_rate
    };
    rate.min(100.0)
}

/// Resolve one attempt on `item`.
///
/// The cost has already been settled by the caller. Buff reads and writes
/// go through `buffs` only.
pub fn resolve_attempt<R: RandomSource + ?Sized>(
    item: &Item,
    fail_streak: u32,
    buffs: &mut BuffTransaction,
    config: &ForgeConfig,
    rng: &mut R,
) -> AttemptResolution {
    let level = item.level;
    let rates = rates_for(level);

    let roll = rng.draw_percent();
    let passion = buffs.consume(BuffKind::Passion);
    let threshold = effective_threshold(rates.success, passion);
    let success = roll < threshold;
    tracing::trace!(level, roll, threshold, passion, "enhance roll");

    let mut resolution = AttemptResolution {
        success,
        item: *item,
        fail_streak,
        roll,
        threshold,
        lucky: false,
        downgraded: false,
        destroyed: false,
        shield_saved: false,
        blessing_saved: false,
        destroy_roll: None,
        downgrade_roll: None,
    };

    if success {
        let lucky = rng.chance(config.lucky_chance);
        let gain = if lucky { LUCKY_LEVEL_GAIN } else { 1 };
        let new_level = level.saturating_add(gain).min(MAX_LEVEL);
        let previous = (level > 0).then_some(item.stats);
        let mut stats = generate_stats(new_level, previous, rng);
        if lucky {
            stats = apply_bonus(stats, config.lucky_stat_bonus);
        }
        resolution.item = Item {
            level: new_level,
            stats,
            destroyed: false,
        };
        resolution.lucky = lucky;
        resolution.fail_streak = 0;

        if rng.chance(config.blessing_chance) {
            buffs.grant(BuffKind::Blessing);
        }
        return resolution;
    }

    resolution.fail_streak = fail_streak + 1;
    if resolution.fail_streak >= config.passion_fail_streak {
        buffs.grant(BuffKind::Passion);
        resolution.fail_streak = 0;
    }

    let destroy_roll = rng.draw_percent();
    resolution.destroy_roll = Some(destroy_roll);
    let should_destroy = destroy_roll < rates.destroy;

    if should_destroy && buffs.consume(BuffKind::Shield) {
        resolution.shield_saved = true;
    } else if should_destroy {
        resolution.item = Item {
            level: 0,
            stats: ItemStats::ZERO,
            destroyed: true,
        };
        resolution.destroyed = true;
        if rng.chance(config.shield_grant_chance) {
            buffs.grant(BuffKind::Shield);
        }
    } else if buffs.consume(BuffKind::Blessing) {
        resolution.blessing_saved = true;
    } else {
        let downgrade_roll = rng.draw_percent();
        resolution.downgrade_roll = Some(downgrade_roll);
        if downgrade_roll < rates.downgrade && level > 0 {
            let new_level = level - 1;
            resolution.item = Item {
                level: new_level,
                stats: scale_down(item.stats, level, new_level),
                destroyed: false,
            };
            resolution.downgraded = true;
        }
    }

    resolution
}

/// Price computed for selling an item.
#[derive(Debug, Clone, PartialEq)]
pub struct SellQuote {
    pub base_price: u64,
    pub quality_multiplier: f64,
    pub golden_multiplier: Option<u64>,
    pub price: u64,
}

/// Multiplier rewarding stats above the level baseline, floored at
/// `config.quality_floor`.
pub fn quality_multiplier(level: u8, stats: ItemStats, config: &ForgeConfig) -> f64 {
    let expected = expected_stats(level);
    if expected.attack == 0 || expected.hp == 0 {
        return 1.0;
    }
    let deviation = |actual: u32, expected: u32| {
        (f64::from(actual) - f64::from(expected)) / f64::from(expected)
    };
    let m = 1.0
        + config.quality_weight * deviation(stats.attack, expected.attack)
        + config.quality_weight * deviation(stats.hp, expected.hp);
    m.max(config.quality_floor)
}

pub fn quote_sell<R: RandomSource + ?Sized>(
    item: &Item,
    config: &ForgeConfig,
    rng: &mut R,
) -> SellQuote {
    let (min, max) = sell_price_range(item.level);
    let base_price = rng.draw_range(min as i64, max as i64).max(0) as u64;
    let quality = quality_multiplier(item.level, item.stats, config);
    let mut price = (base_price as f64 * quality).floor() as u64;

    let golden_multiplier = if rng.chance(config.golden_chance) {
        let m = rng.draw_range(
            config.golden_min_multiplier as i64,
            config.golden_max_multiplier as i64,
        ) as u64;
        price = price.saturating_mul(m);
        Some(m)
    } else {
        None
    };

    SellQuote {
        base_price,
        quality_multiplier: quality,
        golden_multiplier,
        price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffs::BuffSet;
    use crate::random::FixedRolls;

    fn item(level: u8, attack: u32, hp: u32) -> Item {
        Item {
            level,
            stats: ItemStats::new(attack, hp),
            destroyed: false,
        }
    }

    #[test]
    fn test_effective_threshold() {
        assert_eq!(effective_threshold(30.0, false), 30.0);
        assert_eq!(effective_threshold(30.0, true), 60.0);
        assert_eq!(effective_threshold(70.0, true), 100.0);
    }

    #[test]
    fn test_success_draw_order() {
        // roll, lucky, attack jitter, hp jitter, blessing
        let mut rolls = FixedRolls::new([0.0, 0.5, 0.0, 0.0, 0.99]);
        let mut tx = BuffTransaction::begin(&BuffSet::default());
        let r = resolve_attempt(&item(3, 150, 300), 2, &mut tx, &ForgeConfig::default(), &mut rolls);
        assert!(r.success);
        assert_eq!(r.item, item(4, 200, 400));
        assert_eq!(r.fail_streak, 0);
        assert!(!r.lucky);
        assert_eq!(rolls.remaining(), 0);
        assert!(tx.granted().is_empty());
    }

    #[test]
    fn test_lucky_success_gains_two_levels_with_bonus() {
        let mut rolls = FixedRolls::new([0.0, 0.01, 0.0, 0.0, 0.99]);
        let mut tx = BuffTransaction::begin(&BuffSet::default());
        let r = resolve_attempt(&item(3, 150, 300), 0, &mut tx, &ForgeConfig::default(), &mut rolls);
        assert!(r.lucky);
        assert_eq!(r.item.level, 5);
        // (150 + 50) * 1.1, (300 + 100) * 1.1
        assert_eq!(r.item.stats, ItemStats::new(220, 440));
    }

    #[test]
    fn test_lucky_at_nineteen_clamps_to_max() {
        let mut rolls = FixedRolls::new([0.0, 0.01]);
        let mut tx = BuffTransaction::begin(&BuffSet::default());
        let r = resolve_attempt(&item(19, 1_000, 2_000), 0, &mut tx, &ForgeConfig::default(), &mut rolls);
        assert_eq!(r.item.level, MAX_LEVEL);
    }

    #[test]
    fn test_blessing_granted_on_success() {
        let mut rolls = FixedRolls::new([0.0, 0.5, 0.5, 0.5, 0.01]);
        let mut tx = BuffTransaction::begin(&BuffSet::default());
        resolve_attempt(&item(1, 50, 100), 0, &mut tx, &ForgeConfig::default(), &mut rolls);
        assert_eq!(tx.granted(), &[BuffKind::Blessing]);
    }

    #[test]
    fn test_passion_consumed_even_on_failure() {
        // 30% at level 9, doubled to 60%; roll 70 still fails
        let mut rolls = FixedRolls::new([0.70, 0.99, 0.99]);
        let buffs = BuffSet {
            passion: true,
            ..Default::default()
        };
        let mut tx = BuffTransaction::begin(&buffs);
        let r = resolve_attempt(&item(9, 450, 900), 0, &mut tx, &ForgeConfig::default(), &mut rolls);
        assert!(!r.success);
        assert_eq!(r.threshold, 60.0);
        assert_eq!(tx.consumed(), &[BuffKind::Passion]);
    }

    #[test]
    fn test_third_failure_grants_passion() {
        let mut rolls = FixedRolls::new([0.99, 0.99, 0.99]);
        let mut tx = BuffTransaction::begin(&BuffSet::default());
        let r = resolve_attempt(&item(9, 450, 900), 2, &mut tx, &ForgeConfig::default(), &mut rolls);
        assert_eq!(r.fail_streak, 0);
        assert_eq!(tx.granted(), &[BuffKind::Passion]);
    }

    #[test]
    fn test_destroy_without_shield() {
        // Fail, destroy roll 1 < 5, shield grant roll misses
        let mut rolls = FixedRolls::new([0.99, 0.01, 0.9]);
        let mut tx = BuffTransaction::begin(&BuffSet::default());
        let r = resolve_attempt(&item(9, 450, 900), 0, &mut tx, &ForgeConfig::default(), &mut rolls);
        assert!(r.destroyed);
        assert!(r.item.destroyed);
        assert_eq!(r.item.level, 0);
        assert!(r.item.stats.is_zero());
        assert!(tx.granted().is_empty());
    }

    #[test]
    fn test_destroy_can_grant_shield() {
        let mut rolls = FixedRolls::new([0.99, 0.01, 0.1]);
        let mut tx = BuffTransaction::begin(&BuffSet::default());
        resolve_attempt(&item(9, 450, 900), 0, &mut tx, &ForgeConfig::default(), &mut rolls);
        assert_eq!(tx.granted(), &[BuffKind::Shield]);
    }

    #[test]
    fn test_shield_absorbs_destroy() {
        let mut rolls = FixedRolls::new([0.99, 0.01]);
        let buffs = BuffSet {
            shield: true,
            ..Default::default()
        };
        let mut tx = BuffTransaction::begin(&buffs);
        let r = resolve_attempt(&item(9, 450, 900), 0, &mut tx, &ForgeConfig::default(), &mut rolls);
        assert!(r.shield_saved);
        assert!(!r.destroyed);
        assert_eq!(r.item, item(9, 450, 900));
        assert_eq!(tx.consumed(), &[BuffKind::Shield]);
        // No downgrade roll after a shield save
        assert_eq!(r.downgrade_roll, None);
    }

    #[test]
    fn test_blessing_absorbs_downgrade() {
        let mut rolls = FixedRolls::new([0.99, 0.99]);
        let buffs = BuffSet {
            blessing: true,
            ..Default::default()
        };
        let mut tx = BuffTransaction::begin(&buffs);
        let r = resolve_attempt(&item(9, 450, 900), 0, &mut tx, &ForgeConfig::default(), &mut rolls);
        assert!(r.blessing_saved);
        assert!(!r.downgraded);
        assert_eq!(r.item.level, 9);
        assert_eq!(rolls.drawn(), 2);
    }

    #[test]
    fn test_shield_untouched_when_no_destroy() {
        let mut rolls = FixedRolls::new([0.99, 0.99, 0.99]);
        let buffs = BuffSet {
            shield: true,
            ..Default::default()
        };
        let mut tx = BuffTransaction::begin(&buffs);
        resolve_attempt(&item(9, 450, 900), 0, &mut tx, &ForgeConfig::default(), &mut rolls);
        assert!(tx.consumed().is_empty());
    }

    #[test]
    fn test_downgrade_scales_stats() {
        let mut rolls = FixedRolls::new([0.99, 0.99, 0.10]);
        let mut tx = BuffTransaction::begin(&BuffSet::default());
        let r = resolve_attempt(&item(9, 450, 900), 0, &mut tx, &ForgeConfig::default(), &mut rolls);
        assert!(r.downgraded);
        assert_eq!(r.item, item(8, 400, 800));
        assert_eq!(r.fail_streak, 1);
    }

    #[test]
    fn test_quality_multiplier_floor_and_bonus() {
        let config = ForgeConfig::default();
        assert!((quality_multiplier(4, ItemStats::new(200, 400), &config) - 1.0).abs() < 1e-12);
        // +20% on both stats -> +0.04
        let m = quality_multiplier(4, ItemStats::new(240, 480), &config);
        assert!((m - 1.04).abs() < 1e-12);
        assert_eq!(quality_multiplier(4, ItemStats::ZERO, &config), 0.9);
    }

    #[test]
    fn test_quote_without_golden() {
        // base roll at range minimum, golden miss
        let mut rolls = FixedRolls::new([0.0, 0.99]);
        let quote = quote_sell(&item(1, 50, 100), &ForgeConfig::default(), &mut rolls);
        assert_eq!(quote.base_price, 80);
        assert_eq!(quote.golden_multiplier, None);
        assert_eq!(quote.price, 80);
    }

    #[test]
    fn test_quote_with_golden() {
        // base min, golden hit, multiplier at top of 2..=5
        let mut rolls = FixedRolls::new([0.0, 0.01, 0.99]);
        let quote = quote_sell(&item(1, 50, 100), &ForgeConfig::default(), &mut rolls);
        assert_eq!(quote.golden_multiplier, Some(5));
        assert_eq!(quote.price, 400);
    }
}
