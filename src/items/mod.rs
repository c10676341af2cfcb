//! The active item, stored items, and stat generation.

pub mod generation;
pub mod types;

pub use generation::*;
pub use types::*;
