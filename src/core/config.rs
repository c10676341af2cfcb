//! Forge tunables.

use super::constants::*;
use crate::error::{ForgeError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Probabilities, multipliers and timings used by the forge.
///
/// Every field defaults to the matching constant in [`super::constants`], so a
/// partial JSON document only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Chance that a success gains two levels instead of one
    pub lucky_chance: f64,
    /// Flat bonus applied to both stats on a lucky success (0.10 = +10%)
    pub lucky_stat_bonus: f64,
    /// Chance that a success grants the blessing buff
    pub blessing_chance: f64,
    /// Chance that a destroy grants the shield buff for the next item
    pub shield_grant_chance: f64,
    /// Consecutive failures that trigger passion
    pub passion_fail_streak: u32,
    /// Chance that a sell grants the free-enhance buff
    pub free_enhance_chance: f64,
    /// Chance of a golden sell
    pub golden_chance: f64,
    pub golden_min_multiplier: u64,
    pub golden_max_multiplier: u64,
    /// Weight of each stat's deviation in the sell quality multiplier
    pub quality_weight: f64,
    pub quality_floor: f64,
    pub inventory_capacity: usize,
    pub progress_base_ms: u64,
    pub progress_per_level_ms: u64,
    pub cooldown_ms: u64,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            lucky_chance: LUCKY_CHANCE,
            lucky_stat_bonus: LUCKY_STAT_BONUS,
            blessing_chance: BLESSING_CHANCE,
            shield_grant_chance: SHIELD_GRANT_CHANCE,
            passion_fail_streak: PASSION_FAIL_STREAK,
            free_enhance_chance: FREE_ENHANCE_GRANT_CHANCE,
            golden_chance: GOLDEN_CHANCE,
            golden_min_multiplier: GOLDEN_MIN_MULTIPLIER,
            golden_max_multiplier: GOLDEN_MAX_MULTIPLIER,
            quality_weight: QUALITY_WEIGHT,
            quality_floor: QUALITY_FLOOR,
            inventory_capacity: INVENTORY_CAPACITY,
            progress_base_ms: PROGRESS_BASE_MS,
            progress_per_level_ms: PROGRESS_PER_LEVEL_MS,
            cooldown_ms: COOLDOWN_MS,
        }
    }
}

impl ForgeConfig {
    /// Default odds with no busy window, for simulation and tests.
    pub fn instant() -> Self {
        Self {
            progress_base_ms: 0,
            progress_per_level_ms: 0,
            cooldown_ms: 0,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ForgeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        let chances = [
            ("lucky_chance", self.lucky_chance),
            ("blessing_chance", self.blessing_chance),
            ("shield_grant_chance", self.shield_grant_chance),
            ("free_enhance_chance", self.free_enhance_chance),
            ("golden_chance", self.golden_chance),
        ];
        for (name, p) in chances {
            if !(0.0..=1.0).contains(&p) {
                return Err(ForgeError::Config(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }
        if self.lucky_stat_bonus < 0.0 || self.quality_weight < 0.0 || self.quality_floor < 0.0 {
            return Err(ForgeError::Config(
                "stat bonus, quality weight and quality floor must be non-negative".to_string(),
            ));
        }
        if self.golden_min_multiplier == 0 || self.golden_min_multiplier > self.golden_max_multiplier
        {
            return Err(ForgeError::Config(format!(
                "golden multiplier range {}..={} is empty",
                self.golden_min_multiplier, self.golden_max_multiplier
            )));
        }
        if self.inventory_capacity == 0 {
            return Err(ForgeError::Config(
                "inventory_capacity must be at least 1".to_string(),
            ));
        }
        if self.passion_fail_streak == 0 {
            return Err(ForgeError::Config(
                "passion_fail_streak must be at least 1".to_string(),
            ));
        }
        let timings = [
            ("progress_base_ms", self.progress_base_ms),
            ("progress_per_level_ms", self.progress_per_level_ms),
            ("cooldown_ms", self.cooldown_ms),
        ];
        for (name, ms) in timings {
            if ms > MAX_BUSY_WINDOW_MS {
                return Err(ForgeError::Config(format!(
                    "{name} must be at most {MAX_BUSY_WINDOW_MS}, got {ms}"
                )));
            }
        }
        Ok(())
    }

    /// Presentation delay for an attempt started at `level`.
    pub fn progress_duration(&self, level: u8) -> Duration {
        let per_level = self
            .progress_per_level_ms
            .saturating_mul(u64::from(level.min(MAX_LEVEL)));
        Duration::from_millis(self.progress_base_ms.saturating_add(per_level))
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ForgeConfig::default().validate().is_ok());
        assert!(ForgeConfig::instant().validate().is_ok());
    }

    #[test]
    fn test_progress_duration_scales_to_five_seconds() {
        let config = ForgeConfig::default();
        assert_eq!(config.progress_duration(0), Duration::from_secs(1));
        assert_eq!(config.progress_duration(MAX_LEVEL), Duration::from_secs(5));
        assert!(config.progress_duration(10) < config.progress_duration(11));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ForgeConfig::from_json(r#"{ "golden_chance": 0.5 }"#).unwrap();
        assert!((config.golden_chance - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.inventory_capacity, INVENTORY_CAPACITY);
        assert_eq!(config.cooldown_ms, COOLDOWN_MS);
    }

    #[test]
    fn test_rejects_out_of_range_chance() {
        let err = ForgeConfig::from_json(r#"{ "lucky_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ForgeError::Config(_)));
    }

    #[test]
    fn test_rejects_inverted_golden_range() {
        let config = ForgeConfig {
            golden_min_multiplier: 6,
            golden_max_multiplier: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_timings() {
        let err = ForgeConfig::from_json(r#"{ "progress_per_level_ms": 1000000000000000000 }"#)
            .unwrap_err();
        assert!(matches!(err, ForgeError::Config(_)));
        assert!(ForgeConfig::from_json(r#"{ "cooldown_ms": 3600001 }"#).is_err());
        assert!(ForgeConfig::from_json(r#"{ "progress_base_ms": 3600000 }"#).is_ok());
    }

    #[test]
    fn test_progress_duration_saturates() {
        let config = ForgeConfig {
            progress_base_ms: u64::MAX,
            progress_per_level_ms: u64::MAX,
            ..Default::default()
        };
        assert_eq!(config.progress_duration(19), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(ForgeConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ForgeConfig::instant();
        let back = ForgeConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(back, config);
    }
}
