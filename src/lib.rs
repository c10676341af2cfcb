//! Forge - Equipment Enhancement Engine
//!
//! A single active item is pushed from +0 toward +20 through randomized
//! attempts. Failures can downgrade or destroy it, buffs soften the odds,
//! and a gold ledger plus a five-slot inventory sit around the core loop.
//!
//! This module exposes the engine for embedding, the simulator and tests.

pub mod buffs;
pub mod build_info;
pub mod core;
pub mod enhancement;
pub mod error;
pub mod inventory;
pub mod items;
pub mod ledger;
pub mod logging;
pub mod persistence;
pub mod random;
pub mod rates;
pub mod simulator;

pub use buffs::{BuffKind, BuffSet};
pub use crate::core::{ForgeConfig, MAX_LEVEL};
pub use enhancement::{AttemptOutcome, Blocker, Forge, OutcomeKind, SellOutcome, Statistics};
pub use error::{ForgeError, Result, StoreError};
pub use inventory::Inventory;
pub use items::{Item, ItemState, ItemStats, StoredItem};
pub use ledger::Ledger;
pub use persistence::{JsonFileStore, MemoryStore, PlayerSnapshot, RecordStore};
pub use random::{FixedRolls, RandomSource, RngSource, SecureRandom};
