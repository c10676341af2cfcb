//! Error types.
//!
//! Only conditions the caller cannot prevent are errors. Precondition
//! violations on forge operations are silent no-ops (see
//! [`crate::enhancement::Blocker`]).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    /// The operating system entropy source failed. There is no weaker fallback.
    #[error("secure random source unavailable: {0}")]
    RandomUnavailable(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("record could not be encoded or decoded: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ForgeError>;
