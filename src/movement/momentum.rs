use bevy::prelude::*;

use crate::timer::Countdown;

/// Short horizontal shove granted by a successful parry.
///
/// While active it replaces the controller's horizontal velocity; gravity
/// still applies.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParryMomentum {
    direction: Vec3,
    speed: f32,
    timer: Countdown,
}

impl ParryMomentum {
    /// Begin along the planar part of `direction`. Returns false (and leaves
    /// any running momentum alone) when that part is zero.
    pub fn start(&mut self, direction: Vec3, speed: f32, duration: f32) -> bool {
        let Some(direction) = Vec3::new(direction.x, 0.0, direction.z).try_normalize() else {
            return false;
        };
        self.direction = direction;
        self.speed = speed;
        self.timer.start(duration);
        true
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_running()
    }

    pub fn remaining(&self) -> f32 {
        self.timer.remaining()
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Horizontal velocity imposed while active
    pub fn velocity(&self) -> Vec3 {
        if self.is_active() {
            self.direction * self.speed
        } else {
            Vec3::ZERO
        }
    }

    /// Returns true on the tick the momentum runs out
    pub fn tick(&mut self, dt: f32) -> bool {
        let ended = self.timer.tick(dt);
        if ended {
            self.direction = Vec3::ZERO;
        }
        ended
    }

    pub fn cancel(&mut self) {
        self.timer.clear();
        self.direction = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_momentum_runs_for_duration() {
        let mut momentum = ParryMomentum::default();
        assert!(momentum.start(Vec3::new(0.0, 0.0, -3.0), 5.0, 0.5));
        assert_eq!(momentum.velocity(), Vec3::new(0.0, 0.0, -5.0));
        assert!(!momentum.tick(0.3));
        assert!(momentum.tick(0.3));
        assert!(!momentum.is_active());
        assert_eq!(momentum.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_zero_direction_ignored() {
        let mut momentum = ParryMomentum::default();
        assert!(!momentum.start(Vec3::ZERO, 5.0, 0.5));
        assert!(!momentum.start(Vec3::Y, 5.0, 0.5), "straight up has no planar part");
        assert!(!momentum.is_active());
    }

    #[test]
    fn test_vertical_component_dropped() {
        let mut momentum = ParryMomentum::default();
        momentum.start(Vec3::new(1.0, 1.0, 0.0), 5.0, 0.5);
        assert!((momentum.velocity() - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
    }
}
