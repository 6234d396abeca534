//! Countdown timers shared by every state machine in the crate.
//!
//! Each timed phase (parry window, dash, weakpoint reveal, flash) is a named
//! `Countdown` field advanced by its owner's `tick`. A countdown never goes
//! below zero, so "expired" and "idle" are the same state.

use serde::{Deserialize, Serialize};

/// Residue below this counts as expired, so fixed-step accumulation
/// (thirty ticks of 0.1 against 3.0) lands on the expected tick.
const EXPIRY_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration.max(0.0),
        }
    }

    /// (Re)arm the countdown, discarding whatever was left
    pub fn start(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn is_expired(&self) -> bool {
        !self.is_running()
    }

    /// Advance by `dt`. Returns true only on the tick the countdown reaches zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= EXPIRY_EPSILON {
            self.remaining = 0.0;
            return true;
        }
        false
    }
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}
