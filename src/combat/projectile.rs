//! Player projectiles.
//!
//! Straight-line shots with a fixed lifetime. Collision is reported by the
//! host through `ProjectilePool::resolve_hit`; the pool only tracks flight.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{PROJECTILE_DAMAGE, PROJECTILE_LIFETIME, PROJECTILE_SPEED};
use crate::timer::Countdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(pub u32);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub speed: f32,
    pub lifetime: f32,
    pub damage: i32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: PROJECTILE_SPEED,
            lifetime: PROJECTILE_LIFETIME,
            damage: PROJECTILE_DAMAGE,
        }
    }
}

/// What the host says a projectile touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileHit {
    Enemy,
    Player,
    Obstacle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: ProjectileId,
    pub position: Vec3,
    pub heading: Vec3,
    life: Countdown,
}

impl Projectile {
    pub fn time_left(&self) -> f32 {
        self.life.remaining()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectilePool {
    tuning: ProjectileTuning,
    live: Vec<Projectile>,
    next_id: u32,
}

impl ProjectilePool {
    pub fn new(tuning: ProjectileTuning) -> Self {
        Self {
            tuning,
            live: Vec::new(),
            next_id: 0,
        }
    }

    pub fn retune(&mut self, tuning: ProjectileTuning) {
        self.tuning = tuning;
    }

    /// Fire from `origin` along `direction`. A zero direction fires nothing.
    pub fn spawn(&mut self, origin: Vec3, direction: Vec3) -> Option<ProjectileId> {
        let heading = direction.try_normalize()?;
        let id = ProjectileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.live.push(Projectile {
            id,
            position: origin,
            heading,
            life: Countdown::new(self.tuning.lifetime),
        });
        Some(id)
    }

    /// Move every projectile and return the ids that expired this tick
    pub fn tick(&mut self, dt: f32) -> Vec<ProjectileId> {
        let speed = self.tuning.speed;
        let mut expired = Vec::new();
        self.live.retain_mut(|p| {
            p.position += p.heading * speed * dt;
            if p.life.tick(dt) {
                expired.push(p.id);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Apply a reported hit. Returns the damage owed to the enemy, if any.
    /// The player's own body never stops a projectile.
    pub fn resolve_hit(&mut self, id: ProjectileId, hit: ProjectileHit) -> Option<i32> {
        if hit == ProjectileHit::Player {
            return None;
        }
        let index = self.live.iter().position(|p| p.id == id)?;
        self.live.swap_remove(index);
        (hit == ProjectileHit::Enemy).then_some(self.tuning.damage)
    }

    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.live.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.live.iter()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
