//! Simulation configuration.

use crate::core::constants::MAX_LEVEL;

#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Independent attempts measured at each level
    pub attempts_per_level: u32,

    /// Random seed for reproducibility (None = seeded from OS entropy)
    pub seed: Option<u64>,

    /// Measure every attempt with passion pending
    pub force_passion: bool,

    /// Climbs from level 0 in the ladder run (0 = skip)
    pub ladder_runs: u32,

    /// Level each ladder climb tries to reach
    pub ladder_target: u8,

    /// Attempts after which a ladder climb gives up
    pub ladder_max_attempts: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            attempts_per_level: 10_000,
            seed: None,
            force_passion: false,
            ladder_runs: 200,
            ladder_target: 10,
            ladder_max_attempts: 100_000,
        }
    }
}

impl SimConfig {
    /// Quick config for checking observed rates against the tables
    pub fn rate_check(attempts_per_level: u32, seed: u64) -> Self {
        Self {
            attempts_per_level,
            seed: Some(seed),
            ladder_runs: 0,
            ..Default::default()
        }
    }

    /// Quick config for cost-to-reach analysis
    pub fn ladder(runs: u32, target: u8, seed: u64) -> Self {
        Self {
            attempts_per_level: 0,
            seed: Some(seed),
            ladder_runs: runs,
            ladder_target: target.min(MAX_LEVEL),
            ..Default::default()
        }
    }
}
