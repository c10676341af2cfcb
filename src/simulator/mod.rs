//! Monte Carlo simulator for the forge.
//!
//! Drives real [`crate::enhancement::Forge`] instances with a seeded source to:
//! - Compare observed success, destroy and downgrade rates against the tables
//! - Estimate attempts and gold needed to climb to a target level

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{LadderReport, LevelReport, SimReport};
pub use runner::{measure_level, run_ladder, run_simulation};
