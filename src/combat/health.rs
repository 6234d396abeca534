//! Combatant health shared by the player and the enemy.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Integer hit points. A combatant at or below zero is dead and its owner
/// is removed from the duel.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: i32,
    max: i32,
}

/// What a single damage application did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// Non-positive amount or target already dead
    Ignored,
    Wounded { remaining: i32 },
    /// This hit crossed zero. Reported once per combatant.
    Killed,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if amount <= 0 || !self.is_alive() {
            return DamageOutcome::Ignored;
        }
        self.current = self.current.saturating_sub(amount);
        if self.is_alive() {
            DamageOutcome::Wounded {
                remaining: self.current,
            }
        } else {
            DamageOutcome::Killed
        }
    }
}
