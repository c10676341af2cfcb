//! Item stat generation.
//!
//! Stats only ever grow on success and shrink proportionally on downgrade;
//! they are generated from scratch only when a level-0 item succeeds.

use super::types::ItemStats;
use crate::core::constants::{
    ATTACK_JITTER_PER_LEVEL, ATTACK_PER_LEVEL, HP_JITTER_PER_LEVEL, HP_PER_LEVEL,
};
use crate::random::RandomSource;

/// Stats for an item that just reached `level`.
///
/// `previous` is `None` (or zero) for an item coming up from level 0, which
/// gets a symmetric jitter around the level baseline. Otherwise each stat
/// gains one fixed per-level increment plus a one-sided jitter.
pub fn generate_stats<R: RandomSource + ?Sized>(
    level: u8,
    previous: Option<ItemStats>,
    rng: &mut R,
) -> ItemStats {
    if level == 0 {
        return ItemStats::ZERO;
    }
    let lvl = i64::from(level);
    let attack_jitter = lvl * ATTACK_JITTER_PER_LEVEL;
    let hp_jitter = lvl * HP_JITTER_PER_LEVEL;

    match previous.filter(|s| !s.is_zero()) {
        None => {
            let attack = lvl * ATTACK_PER_LEVEL + rng.draw_range(-attack_jitter, attack_jitter);
            let hp = lvl * HP_PER_LEVEL + rng.draw_range(-hp_jitter, hp_jitter);
            ItemStats::new(to_stat(attack), to_stat(hp))
        }
        Some(prev) => {
            let attack =
                i64::from(prev.attack) + ATTACK_PER_LEVEL + rng.draw_range(0, attack_jitter);
            let hp = i64::from(prev.hp) + HP_PER_LEVEL + rng.draw_range(0, hp_jitter);
            ItemStats::new(to_stat(attack), to_stat(hp))
        }
    }
}

/// Scale stats by `new_level / old_level`, flooring. Zero at level 0.
pub fn scale_down(stats: ItemStats, old_level: u8, new_level: u8) -> ItemStats {
    if new_level == 0 || old_level == 0 {
        return ItemStats::ZERO;
    }
    if new_level >= old_level {
        return stats;
    }
    let scale = |v: u32| (u64::from(v) * u64::from(new_level) / u64::from(old_level)) as u32;
    ItemStats::new(scale(stats.attack), scale(stats.hp))
}

/// Flat bonus on both stats, e.g. `0.10` for the lucky +10%.
pub fn apply_bonus(stats: ItemStats, bonus: f64) -> ItemStats {
    let boost = |v: u32| to_stat((f64::from(v) * (1.0 + bonus)).floor() as i64);
    ItemStats::new(boost(stats.attack), boost(stats.hp))
}

/// Stat values a freshly generated item of `level` is centred on.
pub fn expected_stats(level: u8) -> ItemStats {
    let lvl = i64::from(level);
    ItemStats::new(to_stat(lvl * ATTACK_PER_LEVEL), to_stat(lvl * HP_PER_LEVEL))
}

fn to_stat(v: i64) -> u32 {
    v.clamp(0, i64::from(u32::MAX)) as u32
}
