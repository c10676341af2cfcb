//! Player snapshots and the record stores they are flushed to.
//!
//! The forge never blocks on a store. Callers decide when to flush and how
//! to retry.

pub mod snapshot;
pub mod store;

pub use snapshot::PlayerSnapshot;
pub use store::{JsonFileStore, MemoryStore, RecordStore};
