//! Outgoing duel notifications.
//!
//! The host drains these every frame. Visual requests go to the renderer,
//! everything else is for HUD, audio and analytics.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::enemy::AttackOutcome;
use crate::combat::feedback::{FeedbackTarget, Tint};
use crate::combat::parry::ParryRejection;
use crate::combat::projectile::ProjectileId;

#[derive(Event, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DuelEvent {
    // ---- Parry ----
    ParryWindowOpened { duration: f32 },
    ParryWindowClosed,
    ParrySucceeded { boosted: bool },
    ParryRejected { reason: ParryRejection },
    ParryEnded,
    ParryChain { count: u32 },

    // ---- Enemy attack cycle ----
    EnemyAttackStarted { facing: Vec3 },
    HitboxEnabled,
    HitboxDisabled,
    AttackResolved { outcome: AttackOutcome },

    // ---- Player actions ----
    PlayerSwung,

    // ---- Damage ----
    PlayerDamaged { amount: i32, remaining: i32 },
    EnemyDamaged { amount: i32, remaining: i32 },
    PlayerDied,
    EnemyDied,

    // ---- Visual requests ----
    Flash { tint: Tint },
    Tint { target: FeedbackTarget, tint: Tint },
    /// `target: None` telegraphs the whole weakpoint set
    WeakpointShown { target: Option<usize>, tint: Tint },
    WeakpointHidden,
    WeakpointStruck { damage: i32 },

    // ---- Projectiles ----
    ProjectileSpawned { id: ProjectileId },
    ProjectileExpired { id: ProjectileId },
}
