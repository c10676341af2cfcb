// Item levels
pub const MAX_LEVEL: u8 = 20;

// Stat generation: baseline per level and jitter half-width per level
pub const ATTACK_PER_LEVEL: i64 = 50;
pub const HP_PER_LEVEL: i64 = 100;
pub const ATTACK_JITTER_PER_LEVEL: i64 = 10;
pub const HP_JITTER_PER_LEVEL: i64 = 20;
pub const LUCKY_STAT_BONUS: f64 = 0.10;

// Independent rolls on an attempt
pub const LUCKY_CHANCE: f64 = 0.05;
pub const LUCKY_LEVEL_GAIN: u8 = 2;
pub const BLESSING_CHANCE: f64 = 0.05;
pub const SHIELD_GRANT_CHANCE: f64 = 0.20;
pub const PASSION_FAIL_STREAK: u32 = 3;
pub const PASSION_RATE_MULTIPLIER: f64 = 2.0;

// Selling
pub const FREE_ENHANCE_GRANT_CHANCE: f64 = 0.15;
pub const GOLDEN_CHANCE: f64 = 0.10;
pub const GOLDEN_MIN_MULTIPLIER: u64 = 2;
pub const GOLDEN_MAX_MULTIPLIER: u64 = 5;
pub const QUALITY_WEIGHT: f64 = 0.1;
pub const QUALITY_FLOOR: f64 = 0.9;

// Inventory
pub const INVENTORY_CAPACITY: usize = 5;

// Busy window: progress = base + per_level * level, then cooldown
pub const PROGRESS_BASE_MS: u64 = 1_000;
pub const PROGRESS_PER_LEVEL_MS: u64 = 200;
pub const COOLDOWN_MS: u64 = 500;
/// Upper bound for any single timing knob and for the whole busy window
pub const MAX_BUSY_WINDOW_MS: u64 = 60 * 60 * 1_000;

// Fallback rate entry for lookups outside 0..=MAX_LEVEL
pub const FALLBACK_SUCCESS_RATE: f64 = 1.0;
pub const FALLBACK_COST: u64 = 100;
