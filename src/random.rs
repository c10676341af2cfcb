//! Random source for every roll the forge makes.
//!
//! Production draws come from the operating system CSPRNG. The raw roll of
//! each attempt is shown to the player, so the generator must not be
//! predictable or seedable by the client.

use crate::error::{ForgeError, Result};
use rand::rngs::OsRng;
use rand::{CryptoRng, Rng, RngCore};
use std::collections::VecDeque;

/// Uniform draws in fixed ranges. Only `draw_unit` is required; every other
/// draw is derived from it so a scripted source controls all of them.
pub trait RandomSource {
    /// Uniform in [0, 1).
    fn draw_unit(&mut self) -> f64;

    /// Uniform in [0, 100).
    fn draw_percent(&mut self) -> f64 {
        (self.draw_unit() * 100.0).min(100.0 - f64::EPSILON * 100.0)
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.draw_unit() < p
    }

    /// Uniform integer in `min..=max`. Returns `min` when the range is empty.
    fn draw_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min;
        let offset = (self.draw_unit() * (span + 1) as f64).floor() as i64;
        min + offset.clamp(0, span)
    }
}

/// Adapter from any cryptographically secure `rand` generator.
pub struct RngSource<R: RngCore + CryptoRng> {
    rng: R,
}

impl<R: RngCore + CryptoRng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore + CryptoRng> RandomSource for RngSource<R> {
    fn draw_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// The production source, backed by the OS entropy pool.
pub type SecureRandom = RngSource<OsRng>;

impl SecureRandom {
    /// Probes the OS generator once. A failure here is fatal: the forge
    /// refuses to run on anything weaker.
    pub fn os() -> Result<Self> {
        let mut probe = [0u8; 16];
        OsRng.try_fill_bytes(&mut probe).map_err(|e| {
            tracing::error!(error = %e, "OS random source unavailable");
            ForgeError::RandomUnavailable(e.to_string())
        })?;
        Ok(RngSource::new(OsRng))
    }
}

/// Replays a fixed sequence of unit draws, then repeats `fallback`.
///
/// Used to replay recorded rolls and to force specific branches.
#[derive(Debug, Clone)]
pub struct FixedRolls {
    queue: VecDeque<f64>,
    fallback: f64,
    drawn: usize,
}

impl FixedRolls {
    pub fn new<I: IntoIterator<Item = f64>>(rolls: I) -> Self {
        Self {
            queue: rolls.into_iter().collect(),
            fallback: 0.5,
            drawn: 0,
        }
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Queue a draw expressed as a percent roll (`99.0` -> `0.99`).
    pub fn push_percent(&mut self, percent: f64) {
        self.queue.push_back(percent / 100.0);
    }

    pub fn push_unit(&mut self, unit: f64) {
        self.queue.push_back(unit);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl RandomSource for FixedRolls {
    fn draw_unit(&mut self) -> f64 {
        self.drawn += 1;
        let value = self.queue.pop_front().unwrap_or(self.fallback);
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
