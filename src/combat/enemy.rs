//! Enemy attack cycle, parry chain and weakpoint ownership.
//!
//! ```text
//! Idle (cooldown) ──expire──▶ attack starts
//!   ├─ face player, IncomingAttack → player (opens parry window)
//!   ├─ hitbox on  ── hitbox_duration ──▶ hitbox off
//!   └─ resolution ── parry_window ──▶ parried? skip : Damage → player
//! cooldown restarts unconditionally at every attack start
//! ```
//!
//! Hitbox and resolution countdowns are independent; only the resolution
//! decides whether the player takes damage. A parry resolves the attack
//! on the spot.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::feedback::{Blinker, FeedbackTarget, FeedbackTuning, Tint};
use super::health::{DamageOutcome, Health};
use super::weakpoint::{default_targets, WeakpointExposure, WeakpointTarget};
use crate::constants::{
    BOOST_ZONE_MULT, ENEMY_ATTACK_COOLDOWN, ENEMY_ATTACK_DAMAGE, ENEMY_HITBOX_DURATION,
    ENEMY_MAX_HEALTH, PARRY_WINDOW, WEAKPOINT_MOVE_RATE, WEAKPOINT_REVEAL_TIME,
};
use crate::duel::events::DuelEvent;
use crate::duel::messages::{EnemyMessage, Outbox, PlayerMessage};
use crate::timer::Countdown;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub max_health: i32,
    pub attack_damage: i32,
    /// Seconds between attack starts
    pub attack_cooldown: f32,
    pub hitbox_duration: f32,
    /// Parry window granted to the player per attack; also the resolution delay
    pub parry_window: f32,
    pub weakpoint_reveal_time: f32,
    /// Reveal multiplier while the player's parry boost is active
    pub boost_reveal_multiplier: f32,
    pub weakpoint_move_rate: f32,
    pub weakpoints: Vec<WeakpointTarget>,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            max_health: ENEMY_MAX_HEALTH,
            attack_damage: ENEMY_ATTACK_DAMAGE,
            attack_cooldown: ENEMY_ATTACK_COOLDOWN,
            hitbox_duration: ENEMY_HITBOX_DURATION,
            parry_window: PARRY_WINDOW,
            weakpoint_reveal_time: WEAKPOINT_REVEAL_TIME,
            boost_reveal_multiplier: BOOST_ZONE_MULT,
            weakpoint_move_rate: WEAKPOINT_MOVE_RATE,
            weakpoints: default_targets(),
        }
    }
}

/// How an attack cycle ended. Exactly one per attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    Landed { damage: i32 },
    Parried,
}

/// An attack waiting for its outcome
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingAttack {
    resolve: Countdown,
    parried: bool,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    tuning: EnemyTuning,
    feedback: FeedbackTuning,
    health: Health,
    attack_timer: Countdown,
    hitbox: Countdown,
    pending: Option<PendingAttack>,
    parry_chain: u32,
    boost: bool,
    facing: Vec3,
    weakpoint: WeakpointExposure,
    body_flash: Blinker,
    weakpoint_blink: Blinker,
    telegraph_shown: bool,
}

impl Enemy {
    pub fn new(tuning: EnemyTuning, feedback: FeedbackTuning, seed: u64) -> Self {
        let weakpoint =
            WeakpointExposure::new(tuning.weakpoints.clone(), tuning.weakpoint_move_rate, seed);
        Self {
            health: Health::new(tuning.max_health),
            // First attack comes after one full cooldown
            attack_timer: Countdown::new(tuning.attack_cooldown),
            hitbox: Countdown::default(),
            pending: None,
            parry_chain: 0,
            boost: false,
            facing: Vec3::NEG_Z,
            weakpoint,
            body_flash: Blinker::default(),
            weakpoint_blink: Blinker::default(),
            telegraph_shown: false,
            tuning,
            feedback,
        }
    }

    pub fn retune(&mut self, tuning: EnemyTuning, feedback: FeedbackTuning) {
        self.weakpoint.set_move_rate(tuning.weakpoint_move_rate);
        if tuning.weakpoints != self.tuning.weakpoints {
            self.weakpoint.set_targets(tuning.weakpoints.clone());
        }
        self.tuning = tuning;
        self.feedback = feedback;
    }

    pub fn tuning(&self) -> &EnemyTuning {
        &self.tuning
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    pub fn parry_chain(&self) -> u32 {
        self.parry_chain
    }

    pub fn boost_active(&self) -> bool {
        self.boost
    }

    pub fn facing(&self) -> Vec3 {
        self.facing
    }

    pub fn weakpoint(&self) -> &WeakpointExposure {
        &self.weakpoint
    }

    pub fn is_hitbox_active(&self) -> bool {
        self.hitbox.is_running()
    }

    /// True while an attack is waiting for its outcome
    pub fn is_attacking(&self) -> bool {
        self.pending.is_some()
    }

    pub fn time_to_next_attack(&self) -> f32 {
        self.attack_timer.remaining()
    }

    /// One frame of enemy logic. `player_position` is `None` when no player is
    /// registered; attacks then fizzle but the cooldown keeps cycling.
    pub fn tick(
        &mut self,
        dt: f32,
        player_position: Option<Vec3>,
        own_position: Vec3,
        outbox: &mut Outbox,
    ) {
        if !self.is_alive() {
            return;
        }

        if self.weakpoint.tick(dt) {
            debug!("weakpoint reveal expired");
            self.hide_weakpoint(outbox);
        }

        if self.attack_timer.tick(dt) {
            self.attack_timer.start(self.tuning.attack_cooldown);
            self.start_attack(player_position, own_position, outbox);
        } else {
            self.advance_attack(dt, outbox);
        }

        self.tick_feedback(dt, outbox);
    }

    pub fn handle(&mut self, message: EnemyMessage, outbox: &mut Outbox) {
        if !self.is_alive() {
            return;
        }
        match message {
            EnemyMessage::ParrySucceeded => self.on_parry_success(outbox),
            EnemyMessage::ParryFailed => {
                if self.parry_chain > 0 {
                    debug!(chain = self.parry_chain, "parry chain broken");
                }
                self.parry_chain = 0;
            }
            EnemyMessage::ParryBoost { active } => self.boost = active,
            EnemyMessage::StrikeWeakpoint { damage } => {
                if self.weakpoint.strike() {
                    info!(damage, "weakpoint struck");
                    outbox.emit(DuelEvent::WeakpointStruck { damage });
                    self.hide_weakpoint(outbox);
                    self.take_damage(damage, outbox);
                }
            }
            EnemyMessage::Damage { amount } => self.take_damage(amount, outbox),
        }
    }

    fn start_attack(&mut self, player_position: Option<Vec3>, own_position: Vec3, outbox: &mut Outbox) {
        // An attack still in flight gets its outcome before the next one begins
        self.resolve_pending(outbox);

        let Some(player_position) = player_position else {
            debug!("attack skipped: no player");
            return;
        };

        let mut to_player = player_position - own_position;
        to_player.y = 0.0;
        if to_player.length_squared() > f32::EPSILON {
            self.facing = to_player.normalize();
        }

        info!(facing = ?self.facing, "enemy attacking");
        outbox.emit(DuelEvent::EnemyAttackStarted {
            facing: self.facing,
        });
        outbox.player(PlayerMessage::IncomingAttack {
            window: self.tuning.parry_window,
        });

        // Telegraph
        if !self.weakpoint.is_exposed() {
            self.telegraph_shown = true;
            outbox.emit(DuelEvent::WeakpointShown {
                target: None,
                tint: Tint::Yellow,
            });
            let tint = self
                .weakpoint_blink
                .blink(Tint::Yellow, self.feedback.blink_interval);
            outbox.emit(DuelEvent::Tint {
                target: FeedbackTarget::Weakpoint,
                tint,
            });
        }
        self.flash_body(Tint::Yellow, outbox);

        if self.hitbox.is_running() {
            outbox.emit(DuelEvent::HitboxDisabled);
        }
        self.hitbox.start(self.tuning.hitbox_duration);
        outbox.emit(DuelEvent::HitboxEnabled);

        self.pending = Some(PendingAttack {
            resolve: Countdown::new(self.tuning.parry_window),
            parried: false,
        });
    }

    fn advance_attack(&mut self, dt: f32, outbox: &mut Outbox) {
        if self.hitbox.tick(dt) {
            debug!("enemy attack ended");
            outbox.emit(DuelEvent::HitboxDisabled);
        }

        let expired = match self.pending.as_mut() {
            Some(pending) => pending.resolve.tick(dt),
            None => false,
        };
        if expired {
            self.resolve_pending(outbox);
        }
    }

    fn resolve_pending(&mut self, outbox: &mut Outbox) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        let outcome = if pending.parried {
            AttackOutcome::Parried
        } else {
            AttackOutcome::Landed {
                damage: self.tuning.attack_damage,
            }
        };

        if let AttackOutcome::Landed { damage } = outcome {
            info!(damage, "enemy attack landed");
            outbox.player(PlayerMessage::Damage { amount: damage });
            if self.telegraph_shown && !self.weakpoint.is_exposed() {
                self.hide_weakpoint(outbox);
            }
        }
        outbox.emit(DuelEvent::AttackResolved { outcome });
    }

    fn on_parry_success(&mut self, outbox: &mut Outbox) {
        self.parry_chain += 1;
        if let Some(pending) = self.pending.as_mut() {
            pending.parried = true;
        }
        info!(chain = self.parry_chain, boosted = self.boost, "parried");
        outbox.emit(DuelEvent::ParryChain {
            count: self.parry_chain,
        });

        let reveal = if self.boost {
            self.tuning.weakpoint_reveal_time * self.tuning.boost_reveal_multiplier
        } else {
            self.tuning.weakpoint_reveal_time
        };
        let target = self.weakpoint.expose(reveal, self.boost);
        self.telegraph_shown = false;

        outbox.emit(DuelEvent::WeakpointShown {
            target,
            tint: Tint::Green,
        });
        let tint = self
            .weakpoint_blink
            .blink(Tint::Green, self.feedback.blink_interval);
        outbox.emit(DuelEvent::Tint {
            target: FeedbackTarget::Weakpoint,
            tint,
        });
        self.flash_body(Tint::Green, outbox);

        // A parried attack has nothing left to decide
        self.resolve_pending(outbox);
    }

    fn take_damage(&mut self, amount: i32, outbox: &mut Outbox) {
        match self.health.take_damage(amount) {
            DamageOutcome::Ignored => {}
            DamageOutcome::Wounded { remaining } => {
                debug!(amount, remaining, "enemy took damage");
                outbox.emit(DuelEvent::EnemyDamaged { amount, remaining });
            }
            DamageOutcome::Killed => {
                info!(amount, "enemy died");
                outbox.emit(DuelEvent::EnemyDamaged {
                    amount,
                    remaining: self.health.current(),
                });
                outbox.emit(DuelEvent::EnemyDied);
            }
        }
    }

    fn flash_body(&mut self, color: Tint, outbox: &mut Outbox) {
        outbox.emit(DuelEvent::Flash { tint: color });
        let tint = self.body_flash.flash(
            color,
            self.feedback.flash_duration,
            self.feedback.flash_interval,
        );
        outbox.emit(DuelEvent::Tint {
            target: FeedbackTarget::EnemyBody,
            tint,
        });
    }

    fn hide_weakpoint(&mut self, outbox: &mut Outbox) {
        self.telegraph_shown = false;
        if let Some(tint) = self.weakpoint_blink.stop() {
            outbox.emit(DuelEvent::Tint {
                target: FeedbackTarget::Weakpoint,
                tint,
            });
        }
        outbox.emit(DuelEvent::WeakpointHidden);
    }

    fn tick_feedback(&mut self, dt: f32, outbox: &mut Outbox) {
        if let Some(tint) = self.body_flash.tick(dt) {
            outbox.emit(DuelEvent::Tint {
                target: FeedbackTarget::EnemyBody,
                tint,
            });
        }
        if let Some(tint) = self.weakpoint_blink.tick(dt) {
            outbox.emit(DuelEvent::Tint {
                target: FeedbackTarget::Weakpoint,
                tint,
            });
        }
    }
}

impl Default for Enemy {
    fn default() -> Self {
        Self::new(EnemyTuning::default(), FeedbackTuning::default(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.1;
    const PLAYER: Vec3 = Vec3::new(0.0, 0.0, 5.0);

    fn run(enemy: &mut Enemy, seconds: f32, outbox: &mut Outbox) {
        let steps = (seconds / DT).round() as usize;
        for _ in 0..steps {
            enemy.tick(DT, Some(PLAYER), Vec3::ZERO, outbox);
        }
    }

    fn damage_messages(outbox: &Outbox) -> usize {
        outbox
            .to_player
            .iter()
            .filter(|m| matches!(m, PlayerMessage::Damage { .. }))
            .count()
    }

    #[test]
    fn test_first_attack_after_cooldown() {
        let mut enemy = Enemy::default();
        let mut outbox = Outbox::default();
        run(&mut enemy, 2.9, &mut outbox);
        assert!(outbox.to_player.is_empty());

        run(&mut enemy, 0.1, &mut outbox);
        assert_eq!(
            outbox.to_player,
            vec![PlayerMessage::IncomingAttack { window: 1.0 }]
        );
        assert!(enemy.is_hitbox_active());
        assert!(outbox.events.contains(&DuelEvent::HitboxEnabled));
    }

    #[test]
    fn test_attack_faces_player_on_plane() {
        let mut enemy = Enemy::default();
        let mut outbox = Outbox::default();
        for _ in 0..30 {
            enemy.tick(DT, Some(Vec3::new(3.0, 2.0, 0.0)), Vec3::ZERO, &mut outbox);
        }
        assert!((enemy.facing() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_unparried_attack_lands_once() {
        let mut enemy = Enemy::default();
        let mut outbox = Outbox::default();
        run(&mut enemy, 3.0, &mut outbox);
        run(&mut enemy, 0.5, &mut outbox);
        assert!(!enemy.is_hitbox_active(), "hitbox lives 0.5s");
        assert_eq!(damage_messages(&outbox), 0, "resolution waits for the window");

        run(&mut enemy, 0.5, &mut outbox);
        assert_eq!(damage_messages(&outbox), 1);
        assert!(outbox.events.contains(&DuelEvent::AttackResolved {
            outcome: AttackOutcome::Landed { damage: 20 }
        }));

        run(&mut enemy, 1.0, &mut outbox);
        assert_eq!(damage_messages(&outbox), 1);
    }

    #[test]
    fn test_parried_attack_deals_no_damage() {
        let mut enemy = Enemy::default();
        let mut outbox = Outbox::default();
        run(&mut enemy, 3.0, &mut outbox);
        run(&mut enemy, 0.3, &mut outbox);
        enemy.handle(EnemyMessage::ParrySucceeded, &mut outbox);
        assert!(outbox.events.contains(&DuelEvent::AttackResolved {
            outcome: AttackOutcome::Parried
        }));
        assert!(!enemy.is_attacking());
        run(&mut enemy, 1.0, &mut outbox);

        assert_eq!(damage_messages(&outbox), 0);
        assert_eq!(enemy.parry_chain(), 1);
    }

    #[test]
    fn test_parried_flag_resets_next_cycle() {
        let mut enemy = Enemy::default();
        let mut outbox = Outbox::default();
        run(&mut enemy, 3.0, &mut outbox);
        enemy.handle(EnemyMessage::ParrySucceeded, &mut outbox);
        // Second attack at t=6 is not parried
        run(&mut enemy, 4.0, &mut outbox);
        assert_eq!(damage_messages(&outbox), 1);
    }

    #[test]
    fn test_parry_chain_counts_and_resets() {
        let mut enemy = Enemy::default();
        let mut outbox = Outbox::default();
        enemy.handle(EnemyMessage::ParrySucceeded, &mut outbox);
        enemy.handle(EnemyMessage::ParrySucceeded, &mut outbox);
        assert_eq!(enemy.parry_chain(), 2);
        enemy.handle(EnemyMessage::ParryFailed, &mut outbox);
        assert_eq!(enemy.parry_chain(), 0);
        enemy.handle(EnemyMessage::ParryFailed, &mut outbox);
        assert_eq!(enemy.parry_chain(), 0);
    }

    #[test]
    fn test_boosted_parry_reveals_longer_and_hittable() {
        let mut enemy = Enemy::default();
        let mut outbox = Outbox::default();
        enemy.handle(EnemyMessage::ParryBoost { active: true }, &mut outbox);
        enemy.handle(EnemyMessage::ParrySucceeded, &mut outbox);

        assert!(enemy.weakpoint().is_hittable());
        assert!((enemy.weakpoint().reveal_remaining() - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_unboosted_parry_reveals_but_not_hittable() {
        let mut enemy = Enemy::default();
        let mut outbox = Outbox::default();
        enemy.handle(EnemyMessage::ParrySucceeded, &mut outbox);

        assert!(enemy.weakpoint().is_exposed());
        assert!(!enemy.weakpoint().is_hittable());
        assert!((enemy.weakpoint().reveal_remaining() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_weakpoint_strike_applies_bonus_once() {
        let mut enemy = Enemy::default();
        let mut outbox = Outbox::default();
        enemy.handle(EnemyMessage::ParryBoost { active: true }, &mut outbox);
        enemy.handle(EnemyMessage::ParrySucceeded, &mut outbox);

        enemy.handle(EnemyMessage::StrikeWeakpoint { damage: 80 }, &mut outbox);
        assert_eq!(enemy.health().current(), 20);
        assert!(!enemy.weakpoint().is_exposed());

        enemy.handle(EnemyMessage::StrikeWeakpoint { damage: 80 }, &mut outbox);
        assert_eq!(enemy.health().current(), 20);
    }

    #[test]
    fn test_weakpoint_hides_after_reveal() {
        let mut enemy = Enemy::default();
        let mut outbox = Outbox::default();
        enemy.handle(EnemyMessage::ParrySucceeded, &mut outbox);
        outbox.events.clear();

        run(&mut enemy, 1.1, &mut outbox);
        assert!(!enemy.weakpoint().is_exposed());
        assert!(outbox.events.contains(&DuelEvent::WeakpointHidden));
    }

    #[test]
    fn test_no_player_skips_attack_but_cycles() {
        let mut enemy = Enemy::default();
        let mut outbox = Outbox::default();
        for _ in 0..30 {
            enemy.tick(DT, None, Vec3::ZERO, &mut outbox);
        }
        assert!(outbox.to_player.is_empty());
        assert!(!enemy.is_attacking());
        assert!((enemy.time_to_next_attack() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_short_cooldown_resolves_previous_attack_first() {
        let tuning = EnemyTuning {
            attack_cooldown: 0.5,
            ..Default::default()
        };
        let mut enemy = Enemy::new(tuning, FeedbackTuning::default(), 0);
        let mut outbox = Outbox::default();
        run(&mut enemy, 1.0, &mut outbox);

        let attacks = outbox
            .to_player
            .iter()
            .filter(|m| matches!(m, PlayerMessage::IncomingAttack { .. }))
            .count();
        assert_eq!(attacks, 2);
        assert_eq!(damage_messages(&outbox), 1, "first attack resolved when second began");
        assert!(enemy.is_attacking());
    }

    #[test]
    fn test_restarted_hitbox_disabled_first() {
        let tuning = EnemyTuning {
            attack_cooldown: 0.3,
            hitbox_duration: 0.5,
            ..Default::default()
        };
        let mut enemy = Enemy::new(tuning, FeedbackTuning::default(), 0);
        let mut outbox = Outbox::default();
        run(&mut enemy, 1.0, &mut outbox);

        let toggles: Vec<&DuelEvent> = outbox
            .events
            .iter()
            .filter(|e| matches!(e, DuelEvent::HitboxEnabled | DuelEvent::HitboxDisabled))
            .collect();
        assert_eq!(
            toggles,
            vec![
                &DuelEvent::HitboxEnabled,
                &DuelEvent::HitboxDisabled,
                &DuelEvent::HitboxEnabled,
                &DuelEvent::HitboxDisabled,
                &DuelEvent::HitboxEnabled,
            ]
        );
        assert!(enemy.is_hitbox_active());
    }

    #[test]
    fn test_death_reported_once() {
        let mut enemy = Enemy::default();
        let mut outbox = Outbox::default();
        enemy.handle(EnemyMessage::Damage { amount: 60 }, &mut outbox);
        enemy.handle(EnemyMessage::Damage { amount: 60 }, &mut outbox);
        enemy.handle(EnemyMessage::Damage { amount: 60 }, &mut outbox);
        let deaths = outbox
            .events
            .iter()
            .filter(|e| **e == DuelEvent::EnemyDied)
            .count();
        assert_eq!(deaths, 1);
        assert!(!enemy.is_alive());
    }

    #[test]
    fn test_attack_flashes_body_yellow() {
        let mut enemy = Enemy::default();
        let mut outbox = Outbox::default();
        run(&mut enemy, 3.0, &mut outbox);
        assert!(outbox.events.contains(&DuelEvent::Flash { tint: Tint::Yellow }));
        assert!(outbox.events.contains(&DuelEvent::Tint {
            target: FeedbackTarget::EnemyBody,
            tint: Tint::Yellow
        }));
    }
}
