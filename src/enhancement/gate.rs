//! Busy gate for the in-progress window of an attempt.
//!
//! An attempt resolves immediately but is presented over a few seconds. The
//! gate stores when that presentation plus a short cooldown ends and refuses
//! new attempts before then.

use crate::core::constants::MAX_BUSY_WINDOW_MS;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default)]
pub struct BusyGate {
    busy_until: Option<Instant>,
}

impl BusyGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self, now: Instant) -> bool {
        self.busy_until.is_some_and(|end| now < end)
    }

    /// Close the gate until `now + progress + cooldown`, capped at
    /// [`MAX_BUSY_WINDOW_MS`].
    pub fn start(&mut self, now: Instant, progress: Duration, cooldown: Duration) -> Instant {
        let window = progress
            .saturating_add(cooldown)
            .min(Duration::from_millis(MAX_BUSY_WINDOW_MS));
        let end = now.checked_add(window).unwrap_or(now);
        self.busy_until = Some(end);
        end
    }

    pub fn busy_until(&self) -> Option<Instant> {
        self.busy_until
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.busy_until
            .map(|end| end.saturating_duration_since(now))
            .unwrap_or_default()
    }
}
