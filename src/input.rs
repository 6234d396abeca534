//! Per-frame player input.
//!
//! The host fills `Controls` from whatever device layer it uses. Axes persist
//! between frames; the edge flags are true for exactly one tick and are cleared
//! by `clear_edges` after the duel has consumed them.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    /// x = strafe, y = forward
    pub move_axes: Vec2,
    /// Planar facing of the player
    pub forward: Vec3,
    pub right: Vec3,
    /// Camera look direction, used by the punch boost
    pub camera_forward: Option<Vec3>,

    pub jump: bool,
    pub crouch_pressed: bool,
    pub crouch_released: bool,
    pub dash: bool,
    pub hyper_dash: bool,
    pub punch: bool,
    pub attack: bool,
    pub parry: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            move_axes: Vec2::ZERO,
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            camera_forward: None,
            jump: false,
            crouch_pressed: false,
            crouch_released: false,
            dash: false,
            hyper_dash: false,
            punch: false,
            attack: false,
            parry: false,
        }
    }
}

impl Controls {
    /// World-space move direction, normalised (zero when idle)
    pub fn input_direction(&self) -> Vec3 {
        (self.right * self.move_axes.x + self.forward * self.move_axes.y).normalize_or_zero()
    }

    pub fn input_magnitude(&self) -> f32 {
        self.move_axes.length()
    }

    pub fn clear_edges(&mut self) {
        self.jump = false;
        self.crouch_pressed = false;
        self.crouch_released = false;
        self.dash = false;
        self.hyper_dash = false;
        self.punch = false;
        self.attack = false;
        self.parry = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_direction_normalised() {
        let controls = Controls {
            move_axes: Vec2::new(1.0, 1.0),
            ..Default::default()
        };
        let dir = controls.input_direction();
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.x > 0.0 && dir.z < 0.0);
    }

    #[test]
    fn test_idle_direction_is_zero() {
        assert_eq!(Controls::default().input_direction(), Vec3::ZERO);
    }

    #[test]
    fn test_clear_edges_keeps_axes() {
        let mut controls = Controls {
            move_axes: Vec2::Y,
            jump: true,
            parry: true,
            ..Default::default()
        };
        controls.clear_edges();
        assert!(!controls.jump && !controls.parry);
        assert_eq!(controls.move_axes, Vec2::Y);
    }
}
