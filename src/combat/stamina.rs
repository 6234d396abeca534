//! Stamina pool gating parry attempts.
//!
//! - Regenerates at a fixed rate while the owner is not parrying
//! - Spent only when a parry actually starts
//! - Invariant: 0 <= current <= max

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaminaPool {
    current: f32,
    max: f32,
    regen_rate: f32,
}

impl StaminaPool {
    /// Full pool
    pub fn new(max: f32, regen_rate: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            max,
            regen_rate: regen_rate.max(0.0),
        }
    }

    /// Pool starting at an arbitrary level (clamped into range)
    pub fn with_current(max: f32, regen_rate: f32, current: f32) -> Self {
        let mut pool = Self::new(max, regen_rate);
        pool.current = current.clamp(0.0, pool.max);
        pool
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn regen_rate(&self) -> f32 {
        self.regen_rate
    }

    /// 0.0..=1.0 for HUD bars
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.current >= cost
    }

    /// Spend `cost` if affordable. Returns false and leaves the pool untouched otherwise.
    pub fn consume(&mut self, cost: f32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.current = (self.current - cost.max(0.0)).max(0.0);
        true
    }

    pub fn regenerate(&mut self, dt: f32) {
        if self.current < self.max {
            self.current = (self.current + self.regen_rate * dt).min(self.max);
        }
    }

    /// Change capacity/rate (tuning reload) without refilling
    pub fn retune(&mut self, max: f32, regen_rate: f32) {
        self.max = max.max(0.0);
        self.regen_rate = regen_rate.max(0.0);
        self.current = self.current.clamp(0.0, self.max);
    }
}
