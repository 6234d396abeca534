//! Weakpoint exposure state machine.
//!
//! A successful parry reveals one weakpoint, picked uniformly at random among
//! the enemy's targets. While revealed the target glides toward its slot.
//! A struck weakpoint loses `exposed` and `hittable` in the same call, so a
//! weakpoint can never be hit twice for one reveal.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::timer::Countdown;

/// One bonus-damage target: where it hides and where it is presented
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeakpointTarget {
    /// Local position when hidden (reset on every reveal)
    pub rest: Vec3,
    /// Predefined slot the target moves toward while exposed
    pub slot: Vec3,
}

impl WeakpointTarget {
    pub fn new(rest: Vec3, slot: Vec3) -> Self {
        Self { rest, slot }
    }
}

/// Default layout: chest, left shoulder, right shoulder
pub fn default_targets() -> Vec<WeakpointTarget> {
    vec![
        WeakpointTarget::new(Vec3::new(0.0, 1.2, 0.0), Vec3::new(0.0, 1.4, 0.5)),
        WeakpointTarget::new(Vec3::new(-0.3, 1.5, 0.0), Vec3::new(-0.5, 1.7, 0.3)),
        WeakpointTarget::new(Vec3::new(0.3, 1.5, 0.0), Vec3::new(0.5, 1.7, 0.3)),
    ]
}

#[derive(Debug, Clone)]
pub struct WeakpointExposure {
    targets: Vec<WeakpointTarget>,
    positions: Vec<Vec3>,
    selected: Option<usize>,
    exposed: bool,
    hittable: bool,
    reveal: Countdown,
    move_rate: f32,
    rng: Xoshiro256PlusPlus,
}

impl WeakpointExposure {
    pub fn new(targets: Vec<WeakpointTarget>, move_rate: f32, seed: u64) -> Self {
        let positions = targets.iter().map(|t| t.rest).collect();
        Self {
            targets,
            positions,
            selected: None,
            exposed: false,
            hittable: false,
            reveal: Countdown::default(),
            move_rate,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    pub fn is_exposed(&self) -> bool {
        self.exposed
    }

    pub fn is_hittable(&self) -> bool {
        self.exposed && self.hittable
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn reveal_remaining(&self) -> f32 {
        self.reveal.remaining()
    }

    pub fn targets(&self) -> &[WeakpointTarget] {
        &self.targets
    }

    /// Current local position of a target
    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied()
    }

    pub fn set_move_rate(&mut self, move_rate: f32) {
        self.move_rate = move_rate;
    }

    /// Swap the target layout. An exposure pointing past the new layout is dropped.
    pub fn set_targets(&mut self, targets: Vec<WeakpointTarget>) {
        self.positions = targets.iter().map(|t| t.rest).collect();
        self.targets = targets;
        if self.selected.is_some_and(|i| i >= self.targets.len()) {
            self.clear();
        }
    }

    /// Reveal a random target for `duration`. Returns the chosen index, or
    /// `None` when the enemy has no targets (timing is still tracked).
    pub fn expose(&mut self, duration: f32, hittable: bool) -> Option<usize> {
        self.exposed = true;
        self.hittable = hittable;
        self.reveal.start(duration);

        self.selected = if self.targets.is_empty() {
            None
        } else {
            let index = self.rng.gen_range(0..self.targets.len());
            self.positions[index] = self.targets[index].rest;
            Some(index)
        };
        self.selected
    }

    /// Player strike. True if it landed (caller applies bonus damage).
    pub fn strike(&mut self) -> bool {
        if !self.is_hittable() {
            return false;
        }
        self.clear();
        true
    }

    /// Advance reveal timer and glide the selected target. Returns true when
    /// the reveal timed out on this tick.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.exposed {
            return false;
        }
        if self.reveal.tick(dt) {
            self.clear();
            return true;
        }
        if let Some(index) = self.selected {
            let slot = self.targets[index].slot;
            let t = (dt * self.move_rate).clamp(0.0, 1.0);
            self.positions[index] = self.positions[index].lerp(slot, t);
        }
        false
    }

    fn clear(&mut self) {
        self.exposed = false;
        self.hittable = false;
        self.selected = None;
        self.reveal.clear();
    }
}
