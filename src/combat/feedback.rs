//! Visual feedback sequences (body flash, weakpoint blink).
//!
//! Rendering is the host's job. These sequences only decide which tint a
//! target should wear and report each change. Starting a sequence on a
//! `Blinker` replaces whatever was running on it, so two sequences can never
//! fight over the same material.

use serde::{Deserialize, Serialize};

use crate::constants::{FLASH_DURATION, FLASH_INTERVAL, WEAKPOINT_BLINK_INTERVAL};
use crate::timer::Countdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    /// The material's own colour
    Original,
    /// Attack telegraph
    Yellow,
    /// Parry success
    Green,
}

/// Which renderer a tint change applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackTarget {
    EnemyBody,
    Weakpoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackTuning {
    pub flash_duration: f32,
    pub flash_interval: f32,
    pub blink_interval: f32,
}

impl Default for FeedbackTuning {
    fn default() -> Self {
        Self {
            flash_duration: FLASH_DURATION,
            flash_interval: FLASH_INTERVAL,
            blink_interval: WEAKPOINT_BLINK_INTERVAL,
        }
    }
}

/// Alternates between a colour and the original colour on a fixed interval.
///
/// Finite sequences (flashes) restore the original colour when their steps run
/// out; infinite ones (blinks) run until `stop`.
#[derive(Debug, Clone, PartialEq)]
pub struct Blinker {
    color: Tint,
    lit: bool,
    interval: f32,
    step: Countdown,
    steps_left: Option<u32>,
    running: bool,
}

impl Default for Blinker {
    fn default() -> Self {
        Self {
            color: Tint::Original,
            lit: false,
            interval: FLASH_INTERVAL,
            step: Countdown::default(),
            steps_left: None,
            running: false,
        }
    }
}

impl Blinker {
    /// Toggle for `duration` seconds, then settle on the original colour.
    /// Returns the tint to apply right now.
    pub fn flash(&mut self, color: Tint, duration: f32, interval: f32) -> Tint {
        let interval = interval.max(f32::EPSILON);
        let steps = (duration / interval).ceil().max(1.0) as u32;
        self.begin(color, interval, Some(steps))
    }

    /// Toggle until stopped. Returns the tint to apply right now.
    pub fn blink(&mut self, color: Tint, interval: f32) -> Tint {
        self.begin(color, interval.max(f32::EPSILON), None)
    }

    /// Cancel the running sequence. Returns `Original` if something was lit or running.
    pub fn stop(&mut self) -> Option<Tint> {
        let was_visible = self.running || self.lit;
        self.running = false;
        self.lit = false;
        self.step.clear();
        was_visible.then_some(Tint::Original)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn color(&self) -> Tint {
        self.color
    }

    pub fn current(&self) -> Tint {
        if self.lit {
            self.color
        } else {
            Tint::Original
        }
    }

    /// Advance; returns the latest tint if it changed during this tick
    pub fn tick(&mut self, dt: f32) -> Option<Tint> {
        let mut changed = None;
        let mut budget = dt;

        while self.running {
            let remaining = self.step.remaining();
            if remaining > budget {
                self.step.tick(budget);
                break;
            }
            budget -= remaining;

            if let Some(steps) = self.steps_left.as_mut() {
                *steps = steps.saturating_sub(1);
                if *steps == 0 {
                    self.running = false;
                    self.lit = false;
                    self.step.clear();
                    changed = Some(Tint::Original);
                    break;
                }
            }
            self.lit = !self.lit;
            self.step.start(self.interval);
            changed = Some(self.current());
        }

        changed
    }

    fn begin(&mut self, color: Tint, interval: f32, steps: Option<u32>) -> Tint {
        self.color = color;
        self.interval = interval;
        self.steps_left = steps;
        self.lit = true;
        self.running = true;
        self.step.start(interval);
        self.current()
    }
}
