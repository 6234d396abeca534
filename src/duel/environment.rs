//! What the duel needs to know about the world each tick.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::WallProbe;

/// Host-supplied view of physics and scene state
pub trait Environment: WallProbe {
    fn grounded(&self) -> bool;

    fn player_position(&self) -> Vec3;

    fn enemy_position(&self) -> Vec3;

    /// Player melee currently overlaps the enemy body
    fn enemy_in_reach(&self) -> bool;

    /// Player melee currently overlaps the exposed weakpoint
    fn weakpoint_in_reach(&self) -> bool {
        false
    }
}

/// A wall the player is standing next to, seen from the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallContact {
    /// Unit direction from the player toward the wall
    pub direction: Vec3,
    pub distance: f32,
    /// Surface normal, pointing away from the wall
    pub normal: Vec3,
}

/// Plain-data `Environment`, filled in by the host's physics systems
/// (or by hand in tests and the demo).
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneProbe {
    pub grounded: bool,
    pub player_position: Vec3,
    pub enemy_position: Vec3,
    pub enemy_in_reach: bool,
    pub weakpoint_in_reach: bool,
    pub walls: Vec<WallContact>,
}

impl Default for SceneProbe {
    fn default() -> Self {
        Self {
            grounded: true,
            player_position: Vec3::ZERO,
            enemy_position: Vec3::new(0.0, 0.0, -3.0),
            enemy_in_reach: false,
            weakpoint_in_reach: false,
            walls: Vec::new(),
        }
    }
}

/// Minimum alignment between probe ray and wall direction
const PROBE_ALIGNMENT: f32 = 0.99;

impl WallProbe for SceneProbe {
    fn probe_wall(&self, direction: Vec3, max_distance: f32) -> Option<Vec3> {
        let direction = direction.try_normalize()?;
        self.walls
            .iter()
            .filter(|w| w.distance <= max_distance)
            .find(|w| w.direction.normalize_or_zero().dot(direction) > PROBE_ALIGNMENT)
            .map(|w| w.normal)
    }
}

impl Environment for SceneProbe {
    fn grounded(&self) -> bool {
        self.grounded
    }

    fn player_position(&self) -> Vec3 {
        self.player_position
    }

    fn enemy_position(&self) -> Vec3 {
        self.enemy_position
    }

    fn enemy_in_reach(&self) -> bool {
        self.enemy_in_reach
    }

    fn weakpoint_in_reach(&self) -> bool {
        self.weakpoint_in_reach
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe_with_right_wall(distance: f32) -> SceneProbe {
        SceneProbe {
            walls: vec![WallContact {
                direction: Vec3::X,
                distance,
                normal: Vec3::NEG_X,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_probe_hits_wall_in_range() {
        let probe = probe_with_right_wall(0.5);
        assert_eq!(probe.probe_wall(Vec3::X, 1.0), Some(Vec3::NEG_X));
        assert_eq!(probe.probe_wall(Vec3::NEG_X, 1.0), None);
    }

    #[test]
    fn test_probe_ignores_distant_wall() {
        let probe = probe_with_right_wall(1.5);
        assert_eq!(probe.probe_wall(Vec3::X, 1.0), None);
    }

    #[test]
    fn test_zero_direction_never_hits() {
        let probe = probe_with_right_wall(0.5);
        assert_eq!(probe.probe_wall(Vec3::ZERO, 1.0), None);
    }
}
