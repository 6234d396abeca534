//! Player combat actor: melee swings, parry input, boost zone and damage.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::health::{DamageOutcome, Health};
use super::parry::{ParryController, ParryOutcome, ParryTuning};
use crate::constants::{
    PLAYER_ATTACK_DAMAGE, PLAYER_ATTACK_RATE, PLAYER_MAX_HEALTH, WEAKPOINT_DAMAGE_MULT,
};
use crate::duel::environment::Environment;
use crate::duel::events::DuelEvent;
use crate::duel::messages::{EnemyMessage, Outbox, PlayerMessage};
use crate::input::Controls;
use crate::timer::Countdown;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: i32,
    pub attack_damage: i32,
    /// Swings per second
    pub attack_rate: f32,
    /// Weakpoint strike damage = attack_damage × this
    pub weakpoint_damage_mult: i32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: PLAYER_MAX_HEALTH,
            attack_damage: PLAYER_ATTACK_DAMAGE,
            attack_rate: PLAYER_ATTACK_RATE,
            weakpoint_damage_mult: WEAKPOINT_DAMAGE_MULT,
        }
    }
}

impl PlayerTuning {
    pub fn weakpoint_damage(&self) -> i32 {
        self.attack_damage.saturating_mul(self.weakpoint_damage_mult)
    }

    fn attack_interval(&self) -> f32 {
        1.0 / self.attack_rate
    }
}

#[derive(Component, Debug, Clone)]
pub struct PlayerCombat {
    tuning: PlayerTuning,
    health: Health,
    parry: ParryController,
    attack_ready: Countdown,
}

impl Default for PlayerCombat {
    fn default() -> Self {
        Self::new(PlayerTuning::default(), ParryTuning::default())
    }
}

impl PlayerCombat {
    pub fn new(tuning: PlayerTuning, parry: ParryTuning) -> Self {
        Self {
            health: Health::new(tuning.max_health),
            parry: ParryController::new(parry),
            attack_ready: Countdown::default(),
            tuning,
        }
    }

    pub fn retune(&mut self, tuning: PlayerTuning, parry: ParryTuning) {
        self.parry.retune(parry);
        self.tuning = tuning;
    }

    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    pub fn parry(&self) -> &ParryController {
        &self.parry
    }

    pub fn parry_mut(&mut self) -> &mut ParryController {
        &mut self.parry
    }

    pub fn can_attack(&self) -> bool {
        self.attack_ready.is_expired()
    }

    /// One frame of player combat. Returns true when a parry succeeded this
    /// tick, so the caller can start parry momentum.
    pub fn tick<E: Environment + ?Sized>(
        &mut self,
        dt: f32,
        controls: &Controls,
        env: &E,
        outbox: &mut Outbox,
    ) -> bool {
        if !self.is_alive() {
            return false;
        }

        self.attack_ready.tick(dt);
        if controls.attack && self.can_attack() {
            self.swing(env, outbox);
        }

        let parried = controls.parry && self.attempt_parry(outbox);

        let timers = self.parry.tick(dt);
        if timers.parry_ended {
            debug!("parry ended");
            outbox.enemy(EnemyMessage::ParryBoost { active: false });
            outbox.emit(DuelEvent::ParryEnded);
        }
        if timers.window_closed {
            debug!("parry window closed");
            outbox.emit(DuelEvent::ParryWindowClosed);
        }

        parried
    }

    pub fn handle(&mut self, message: PlayerMessage, outbox: &mut Outbox) {
        if !self.is_alive() {
            return;
        }
        match message {
            PlayerMessage::IncomingAttack { window } => {
                debug!(window, "parry window opened");
                self.parry.open_window(window);
                outbox.emit(DuelEvent::ParryWindowOpened { duration: window });
            }
            PlayerMessage::Damage { amount } => match self.health.take_damage(amount) {
                DamageOutcome::Ignored => {}
                DamageOutcome::Wounded { remaining } => {
                    info!(amount, remaining, "player took damage");
                    outbox.emit(DuelEvent::PlayerDamaged { amount, remaining });
                }
                DamageOutcome::Killed => {
                    info!(amount, "player died");
                    outbox.emit(DuelEvent::PlayerDamaged {
                        amount,
                        remaining: self.health.current(),
                    });
                    outbox.emit(DuelEvent::PlayerDied);
                }
            },
        }
    }

    pub fn enter_boost_zone(&mut self) {
        debug!("entered parry boost zone");
        self.parry.enter_boost_zone();
    }

    pub fn exit_boost_zone(&mut self, outbox: &mut Outbox) {
        debug!("exited parry boost zone");
        self.parry.exit_boost_zone();
        outbox.enemy(EnemyMessage::ParryBoost { active: false });
    }

    /// Host-detected contact with the weakpoint. The enemy decides whether it
    /// was hittable.
    pub fn strike_weakpoint(&self, outbox: &mut Outbox) {
        if self.is_alive() {
            outbox.enemy(EnemyMessage::StrikeWeakpoint {
                damage: self.tuning.weakpoint_damage(),
            });
        }
    }

    fn swing<E: Environment + ?Sized>(&mut self, env: &E, outbox: &mut Outbox) {
        self.attack_ready.start(self.tuning.attack_interval());
        outbox.emit(DuelEvent::PlayerSwung);
        if env.weakpoint_in_reach() {
            self.strike_weakpoint(outbox);
        }
        if env.enemy_in_reach() {
            outbox.enemy(EnemyMessage::Damage {
                amount: self.tuning.attack_damage,
            });
        }
    }

    fn attempt_parry(&mut self, outbox: &mut Outbox) -> bool {
        match self.parry.attempt() {
            ParryOutcome::Success { boosted, duration } => {
                info!(boosted, duration, "parry succeeded");
                outbox.enemy(EnemyMessage::ParryBoost { active: boosted });
                outbox.enemy(EnemyMessage::ParrySucceeded);
                outbox.emit(DuelEvent::ParrySucceeded { boosted });
                true
            }
            ParryOutcome::Rejected(reason) => {
                debug!(?reason, "parry rejected");
                outbox.enemy(EnemyMessage::ParryFailed);
                outbox.emit(DuelEvent::ParryRejected { reason });
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::parry::ParryRejection;
    use crate::duel::environment::SceneProbe;

    fn press(f: impl FnOnce(&mut Controls)) -> Controls {
        let mut controls = Controls::default();
        f(&mut controls);
        controls
    }

    #[test]
    fn test_parry_inside_window_notifies_enemy() {
        let mut player = PlayerCombat::default();
        let mut outbox = Outbox::default();
        player.handle(PlayerMessage::IncomingAttack { window: 1.0 }, &mut outbox);

        let parried = player.tick(0.1, &press(|c| c.parry = true), &SceneProbe::default(), &mut outbox);
        assert!(parried);
        assert_eq!(
            outbox.to_enemy,
            vec![
                EnemyMessage::ParryBoost { active: false },
                EnemyMessage::ParrySucceeded
            ]
        );
    }

    #[test]
    fn test_parry_without_window_resets_chain() {
        let mut player = PlayerCombat::default();
        let mut outbox = Outbox::default();
        let parried = player.tick(0.1, &press(|c| c.parry = true), &SceneProbe::default(), &mut outbox);
        assert!(!parried);
        assert_eq!(outbox.to_enemy, vec![EnemyMessage::ParryFailed]);
        assert!(outbox.events.contains(&DuelEvent::ParryRejected {
            reason: ParryRejection::NoWindow
        }));
    }

    #[test]
    fn test_parry_end_turns_boost_off() {
        let mut player = PlayerCombat::default();
        let mut outbox = Outbox::default();
        player.enter_boost_zone();
        player.handle(PlayerMessage::IncomingAttack { window: 1.0 }, &mut outbox);
        player.tick(0.1, &press(|c| c.parry = true), &SceneProbe::default(), &mut outbox);
        assert_eq!(outbox.to_enemy[0], EnemyMessage::ParryBoost { active: true });
        outbox.to_enemy.clear();

        // Boosted parry: 0.75s total, 0.1s already spent
        for _ in 0..7 {
            player.tick(0.1, &Controls::default(), &SceneProbe::default(), &mut outbox);
        }
        assert_eq!(outbox.to_enemy, vec![EnemyMessage::ParryBoost { active: false }]);
        assert!(outbox.events.contains(&DuelEvent::ParryEnded));
    }

    #[test]
    fn test_swing_rate_limited() {
        let mut player = PlayerCombat::default();
        let mut outbox = Outbox::default();
        let env = SceneProbe {
            enemy_in_reach: true,
            ..Default::default()
        };
        let attack = press(|c| c.attack = true);

        player.tick(0.1, &attack, &env, &mut outbox);
        player.tick(0.1, &attack, &env, &mut outbox);
        assert_eq!(outbox.to_enemy, vec![EnemyMessage::Damage { amount: 40 }]);

        for _ in 0..8 {
            player.tick(0.1, &Controls::default(), &env, &mut outbox);
        }
        player.tick(0.1, &attack, &env, &mut outbox);
        assert_eq!(outbox.to_enemy.len(), 2);
    }

    #[test]
    fn test_swing_out_of_reach_hits_nothing() {
        let mut player = PlayerCombat::default();
        let mut outbox = Outbox::default();
        player.tick(0.1, &press(|c| c.attack = true), &SceneProbe::default(), &mut outbox);
        assert!(outbox.to_enemy.is_empty());
        assert_eq!(outbox.events, vec![DuelEvent::PlayerSwung]);
    }

    #[test]
    fn test_weakpoint_strike_carries_double_damage() {
        let player = PlayerCombat::default();
        let mut outbox = Outbox::default();
        player.strike_weakpoint(&mut outbox);
        assert_eq!(outbox.to_enemy, vec![EnemyMessage::StrikeWeakpoint { damage: 80 }]);
    }

    #[test]
    fn test_exit_zone_tells_enemy() {
        let mut player = PlayerCombat::default();
        let mut outbox = Outbox::default();
        player.enter_boost_zone();
        player.exit_boost_zone(&mut outbox);
        assert!(!player.parry().in_boost_zone());
        assert_eq!(outbox.to_enemy, vec![EnemyMessage::ParryBoost { active: false }]);
    }

    #[test]
    fn test_damage_and_death_events() {
        let mut player = PlayerCombat::default();
        let mut outbox = Outbox::default();
        player.handle(PlayerMessage::Damage { amount: 20 }, &mut outbox);
        assert_eq!(player.health().current(), 80);
        player.handle(PlayerMessage::Damage { amount: 100 }, &mut outbox);
        assert!(!player.is_alive());
        assert_eq!(outbox.events.last(), Some(&DuelEvent::PlayerDied));
    }
}
