//! Messages crossing actor boundaries.
//!
//! Neither actor holds a reference to the other. Each exposes a narrow set of
//! messages it accepts, and `Duel` delivers them. A message for an actor that
//! is gone is dropped.

use super::events::DuelEvent;

/// What the enemy (or the world) can tell the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerMessage {
    /// An attack started: open the parry window for `window` seconds
    IncomingAttack { window: f32 },
    Damage { amount: i32 },
}

/// What the player (or the world) can tell the enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyMessage {
    ParrySucceeded,
    /// Any failed or invalid parry input
    ParryFailed,
    ParryBoost { active: bool },
    StrikeWeakpoint { damage: i32 },
    Damage { amount: i32 },
}

/// Per-tick collection point for messages and events
#[derive(Debug, Default)]
pub struct Outbox {
    pub to_player: Vec<PlayerMessage>,
    pub to_enemy: Vec<EnemyMessage>,
    pub events: Vec<DuelEvent>,
}

impl Outbox {
    pub fn player(&mut self, message: PlayerMessage) {
        self.to_player.push(message);
    }

    pub fn enemy(&mut self, message: EnemyMessage) {
        self.to_enemy.push(message);
    }

    pub fn emit(&mut self, event: DuelEvent) {
        self.events.push(event);
    }

    pub fn has_pending_messages(&self) -> bool {
        !self.to_player.is_empty() || !self.to_enemy.is_empty()
    }
}
