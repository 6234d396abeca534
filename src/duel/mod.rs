//! Duel registry: owns the player and enemy actors and routes messages
//! between them.
//!
//! Tick order:
//! 1. player combat (attack, parry input, parry timers)
//! 2. player movement (parry momentum starts here on a successful parry)
//! 3. message routing
//! 4. enemy (weakpoint, attack cycle, feedback)
//! 5. message routing
//! 6. projectiles
//! 7. dead actors are removed

pub mod environment;
pub mod events;
pub mod messages;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::combat::enemy::Enemy;
use crate::combat::player::PlayerCombat;
use crate::combat::projectile::{ProjectileHit, ProjectileId, ProjectilePool};
use crate::config::Tuning;
use crate::input::Controls;
use crate::movement::{MovementController, MovementFrame};
use environment::Environment;
use events::DuelEvent;
use messages::{EnemyMessage, Outbox, PlayerMessage};

/// Routing passes per tick. Actors never answer a message with another
/// message to the sender more than a couple of times, so this is never hit
/// in practice.
const MAX_ROUTING_PASSES: usize = 8;

/// Who an externally applied effect is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Player,
    Enemy,
}

/// The player actor: combat plus locomotion
#[derive(Debug, Clone)]
pub struct Player {
    pub combat: PlayerCombat,
    pub movement: MovementController,
}

impl Player {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            combat: PlayerCombat::new(tuning.player.clone(), tuning.parry.clone()),
            movement: MovementController::new(tuning.movement.clone()),
        }
    }
}

#[derive(Resource, Debug)]
pub struct Duel {
    tuning: Tuning,
    player: Option<Player>,
    enemy: Option<Enemy>,
    projectiles: ProjectilePool,
    outbox: Outbox,
    events: Vec<DuelEvent>,
    elapsed: f32,
}

impl Default for Duel {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl Duel {
    /// A fresh duel with both actors spawned
    pub fn new(tuning: Tuning) -> Self {
        let player = Player::from_tuning(&tuning);
        let enemy = Enemy::new(tuning.enemy.clone(), tuning.feedback.clone(), tuning.seed);
        Self {
            projectiles: ProjectilePool::new(tuning.projectile.clone()),
            player: Some(player),
            enemy: Some(enemy),
            outbox: Outbox::default(),
            events: Vec::new(),
            elapsed: 0.0,
            tuning,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Swap tuning on the live actors without resetting their state
    pub fn apply_tuning(&mut self, tuning: Tuning) {
        if let Some(player) = self.player.as_mut() {
            player
                .combat
                .retune(tuning.player.clone(), tuning.parry.clone());
            player.movement.retune(tuning.movement.clone());
        }
        if let Some(enemy) = self.enemy.as_mut() {
            enemy.retune(tuning.enemy.clone(), tuning.feedback.clone());
        }
        self.projectiles.retune(tuning.projectile.clone());
        info!("duel tuning applied");
        self.tuning = tuning;
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    pub fn enemy(&self) -> Option<&Enemy> {
        self.enemy.as_ref()
    }

    pub fn enemy_mut(&mut self) -> Option<&mut Enemy> {
        self.enemy.as_mut()
    }

    pub fn projectiles(&self) -> &ProjectilePool {
        &self.projectiles
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn remove_player(&mut self) -> Option<Player> {
        self.player.take()
    }

    pub fn remove_enemy(&mut self) -> Option<Enemy> {
        self.enemy.take()
    }

    /// Respawn the enemy with the current tuning
    pub fn spawn_enemy(&mut self) {
        self.enemy = Some(Enemy::new(
            self.tuning.enemy.clone(),
            self.tuning.feedback.clone(),
            self.tuning.seed,
        ));
    }

    /// Respawn the player with the current tuning
    pub fn spawn_player(&mut self) {
        self.player = Some(Player::from_tuning(&self.tuning));
    }

    /// Advance the whole duel by `dt`. Returns the player's movement for this
    /// frame, or `None` once the player is gone.
    pub fn tick<E: Environment + ?Sized>(
        &mut self,
        dt: f32,
        controls: &Controls,
        env: &E,
    ) -> Option<MovementFrame> {
        self.elapsed += dt;

        let frame = match self.player.as_mut() {
            Some(player) => {
                let parried = player.combat.tick(dt, controls, env, &mut self.outbox);
                if parried {
                    player.movement.start_parry_momentum(controls.forward);
                }
                Some(player.movement.tick(dt, controls, env.grounded(), env))
            }
            None => None,
        };
        self.route();

        let player_position = self.player.as_ref().map(|_| env.player_position());
        if let Some(enemy) = self.enemy.as_mut() {
            enemy.tick(dt, player_position, env.enemy_position(), &mut self.outbox);
        }
        self.route();

        for id in self.projectiles.tick(dt) {
            self.outbox.emit(DuelEvent::ProjectileExpired { id });
        }

        self.reap();
        self.events.append(&mut self.outbox.events);
        frame
    }

    /// Damage from outside the duel (hazards, scripted hits)
    pub fn apply_damage(&mut self, target: Target, amount: i32) {
        match target {
            Target::Player => self.outbox.player(PlayerMessage::Damage { amount }),
            Target::Enemy => self.outbox.enemy(EnemyMessage::Damage { amount }),
        }
        self.settle();
    }

    pub fn enter_boost_zone(&mut self) {
        if let Some(player) = self.player.as_mut() {
            player.combat.enter_boost_zone();
        }
    }

    pub fn exit_boost_zone(&mut self) {
        if let Some(player) = self.player.as_mut() {
            player.combat.exit_boost_zone(&mut self.outbox);
        }
        self.settle();
    }

    /// The host saw the player's weapon touch the weakpoint
    pub fn strike_weakpoint(&mut self) {
        if let Some(player) = self.player.as_ref() {
            player.combat.strike_weakpoint(&mut self.outbox);
        }
        self.settle();
    }

    pub fn spawn_projectile(&mut self, origin: Vec3, direction: Vec3) -> Option<ProjectileId> {
        self.player.as_ref()?;
        let id = self.projectiles.spawn(origin, direction)?;
        self.events.push(DuelEvent::ProjectileSpawned { id });
        Some(id)
    }

    pub fn projectile_hit(&mut self, id: ProjectileId, hit: ProjectileHit) {
        if let Some(amount) = self.projectiles.resolve_hit(id, hit) {
            self.outbox.enemy(EnemyMessage::Damage { amount });
            self.settle();
        }
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<DuelEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[DuelEvent] {
        &self.events
    }

    /// Deliver queued messages, then remove the dead and publish events
    fn settle(&mut self) {
        self.route();
        self.reap();
        self.events.append(&mut self.outbox.events);
    }

    fn route(&mut self) {
        for _ in 0..MAX_ROUTING_PASSES {
            if !self.outbox.has_pending_messages() {
                return;
            }
            let to_player = std::mem::take(&mut self.outbox.to_player);
            let to_enemy = std::mem::take(&mut self.outbox.to_enemy);

            match self.player.as_mut() {
                Some(player) => {
                    for message in to_player {
                        player.combat.handle(message, &mut self.outbox);
                    }
                }
                None if !to_player.is_empty() => {
                    debug!(dropped = to_player.len(), "no player, messages dropped");
                }
                None => {}
            }

            match self.enemy.as_mut() {
                Some(enemy) => {
                    for message in to_enemy {
                        enemy.handle(message, &mut self.outbox);
                    }
                }
                None if !to_enemy.is_empty() => {
                    debug!(dropped = to_enemy.len(), "no enemy, messages dropped");
                }
                None => {}
            }
        }
        if self.outbox.has_pending_messages() {
            debug!("routing pass limit reached, discarding leftover messages");
            self.outbox.to_player.clear();
            self.outbox.to_enemy.clear();
        }
    }

    fn reap(&mut self) {
        if self.player.as_ref().is_some_and(|p| !p.combat.is_alive()) {
            info!("player removed from duel");
            self.player = None;
        }
        if self.enemy.as_ref().is_some_and(|e| !e.is_alive()) {
            info!("enemy removed from duel");
            self.enemy = None;
        }
    }
}
