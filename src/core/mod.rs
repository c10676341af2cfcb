//! Constants and configuration shared by every forge component.

pub mod config;
pub mod constants;

pub use config::ForgeConfig;
pub use constants::MAX_LEVEL;
