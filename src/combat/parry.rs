//! Parry window and parry attempt state machine.
//!
//! - Window: opened by an incoming attack, closes on timeout or when a parry consumes it
//! - Attempt: succeeds iff window open, cooldown expired, stamina >= cost
//! - Success starts the parry duration (x1.5 inside a boost zone) and the cooldown
//! - Failure changes nothing here; the caller reports it so the attacker can reset its chain

use serde::{Deserialize, Serialize};

use super::stamina::StaminaPool;
use crate::constants::{
    BOOST_ZONE_MULT, MAX_STAMINA, PARRY_COOLDOWN, PARRY_DURATION, PARRY_STAMINA_COST,
    STAMINA_REGEN_RATE,
};
use crate::timer::Countdown;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParryTuning {
    pub max_stamina: f32,
    pub stamina_regen_rate: f32,
    pub stamina_cost: f32,
    pub duration: f32,
    pub cooldown: f32,
    /// Parry duration multiplier while standing in a boost zone
    pub boost_multiplier: f32,
}

impl Default for ParryTuning {
    fn default() -> Self {
        Self {
            max_stamina: MAX_STAMINA,
            stamina_regen_rate: STAMINA_REGEN_RATE,
            stamina_cost: PARRY_STAMINA_COST,
            duration: PARRY_DURATION,
            cooldown: PARRY_COOLDOWN,
            boost_multiplier: BOOST_ZONE_MULT,
        }
    }
}

/// Why a parry input did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParryRejection {
    Cooldown,
    Stamina,
    NoWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParryOutcome {
    Success { boosted: bool, duration: f32 },
    Rejected(ParryRejection),
}

/// Timed window during which a parry input can succeed
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParryWindow {
    timer: Countdown,
}

impl ParryWindow {
    pub fn open(&mut self, duration: f32) {
        self.timer.start(duration);
    }

    /// Single use: a successful parry closes the window immediately
    pub fn consume(&mut self) {
        self.timer.clear();
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_running()
    }

    pub fn remaining(&self) -> f32 {
        self.timer.remaining()
    }

    /// Returns true on the tick the window times out
    pub fn tick(&mut self, dt: f32) -> bool {
        self.timer.tick(dt)
    }
}

/// Transitions reported by `ParryController::tick`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParryTimers {
    pub window_closed: bool,
    pub parry_ended: bool,
}

/// Player-side parry state: stamina, window, active parry, cooldown, boost zone
#[derive(Debug, Clone)]
pub struct ParryController {
    tuning: ParryTuning,
    stamina: StaminaPool,
    window: ParryWindow,
    active: Countdown,
    cooldown: Countdown,
    in_boost_zone: bool,
    boost_active: bool,
}

impl ParryController {
    pub fn new(tuning: ParryTuning) -> Self {
        let stamina = StaminaPool::new(tuning.max_stamina, tuning.stamina_regen_rate);
        Self {
            tuning,
            stamina,
            window: ParryWindow::default(),
            active: Countdown::default(),
            cooldown: Countdown::default(),
            in_boost_zone: false,
            boost_active: false,
        }
    }

    pub fn tuning(&self) -> &ParryTuning {
        &self.tuning
    }

    pub fn retune(&mut self, tuning: ParryTuning) {
        self.stamina
            .retune(tuning.max_stamina, tuning.stamina_regen_rate);
        self.tuning = tuning;
    }

    pub fn stamina(&self) -> &StaminaPool {
        &self.stamina
    }

    pub fn stamina_mut(&mut self) -> &mut StaminaPool {
        &mut self.stamina
    }

    pub fn window(&self) -> &ParryWindow {
        &self.window
    }

    pub fn open_window(&mut self, duration: f32) {
        self.window.open(duration);
    }

    pub fn is_parrying(&self) -> bool {
        self.active.is_running()
    }

    pub fn parry_remaining(&self) -> f32 {
        self.active.remaining()
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown.remaining()
    }

    pub fn in_boost_zone(&self) -> bool {
        self.in_boost_zone
    }

    pub fn boost_active(&self) -> bool {
        self.boost_active
    }

    pub fn enter_boost_zone(&mut self) {
        self.in_boost_zone = true;
    }

    /// Leaving the zone also ends any boost granted by the current parry
    pub fn exit_boost_zone(&mut self) {
        self.in_boost_zone = false;
        self.boost_active = false;
    }

    /// Resolve a parry input against the current window, cooldown and stamina
    pub fn attempt(&mut self) -> ParryOutcome {
        if self.cooldown.is_running() {
            return ParryOutcome::Rejected(ParryRejection::Cooldown);
        }
        if !self.stamina.can_afford(self.tuning.stamina_cost) {
            return ParryOutcome::Rejected(ParryRejection::Stamina);
        }
        if !self.window.is_active() {
            return ParryOutcome::Rejected(ParryRejection::NoWindow);
        }

        self.stamina.consume(self.tuning.stamina_cost);
        self.window.consume();
        self.cooldown.start(self.tuning.cooldown);

        self.boost_active = self.in_boost_zone;
        let duration = if self.boost_active {
            self.tuning.duration * self.tuning.boost_multiplier
        } else {
            self.tuning.duration
        };
        self.active.start(duration);

        ParryOutcome::Success {
            boosted: self.boost_active,
            duration,
        }
    }

    /// Advance parry duration, cooldown, stamina regen and the window, in that order
    pub fn tick(&mut self, dt: f32) -> ParryTimers {
        let mut timers = ParryTimers::default();

        if self.active.tick(dt) {
            self.boost_active = false;
            timers.parry_ended = true;
        }
        self.cooldown.tick(dt);

        if !self.is_parrying() {
            self.stamina.regenerate(dt);
        }

        timers.window_closed = self.window.tick(dt);
        timers
    }
}

impl Default for ParryController {
    fn default() -> Self {
        Self::new(ParryTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller_with_stamina(stamina: f32) -> ParryController {
        let mut parry = ParryController::default();
        *parry.stamina_mut() = StaminaPool::with_current(100.0, 15.0, stamina);
        parry
    }

    #[test]
    fn test_parry_inside_window_succeeds() {
        let mut parry = ParryController::default();
        parry.open_window(1.0);
        parry.tick(0.3);

        match parry.attempt() {
            ParryOutcome::Success { boosted, duration } => {
                assert!(!boosted);
                assert!((duration - PARRY_DURATION).abs() < f32::EPSILON);
            }
            other => panic!("Expected Success, got {:?}", other),
        }
        assert!((parry.stamina().current() - 80.0).abs() < 1e-4);
        assert!(!parry.window().is_active(), "window is single use");
        assert!(parry.is_parrying());
        assert!((parry.cooldown_remaining() - PARRY_COOLDOWN).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parry_without_window_rejected() {
        let mut parry = ParryController::default();
        assert_eq!(
            parry.attempt(),
            ParryOutcome::Rejected(ParryRejection::NoWindow)
        );
        assert_eq!(parry.stamina().current(), 100.0);
        assert_eq!(parry.cooldown_remaining(), 0.0);
    }

    #[test]
    fn test_parry_low_stamina_rejected() {
        let mut parry = controller_with_stamina(10.0);
        parry.open_window(1.0);
        assert_eq!(
            parry.attempt(),
            ParryOutcome::Rejected(ParryRejection::Stamina)
        );
        assert!((parry.stamina().current() - 10.0).abs() < 1e-4);
        assert!(parry.window().is_active(), "rejected attempt keeps the window");
    }

    #[test]
    fn test_parry_on_cooldown_rejected() {
        let mut parry = ParryController::default();
        parry.open_window(1.0);
        assert!(matches!(parry.attempt(), ParryOutcome::Success { .. }));

        parry.open_window(1.0);
        assert_eq!(
            parry.attempt(),
            ParryOutcome::Rejected(ParryRejection::Cooldown)
        );
    }

    #[test]
    fn test_boost_zone_extends_duration() {
        let mut parry = ParryController::default();
        parry.enter_boost_zone();
        parry.open_window(1.0);

        match parry.attempt() {
            ParryOutcome::Success { boosted, duration } => {
                assert!(boosted);
                assert!((duration - PARRY_DURATION * BOOST_ZONE_MULT).abs() < 1e-5);
            }
            other => panic!("Expected boosted Success, got {:?}", other),
        }
        assert!(parry.boost_active());

        parry.exit_boost_zone();
        assert!(!parry.boost_active());
        assert!(!parry.in_boost_zone());
    }

    #[test]
    fn test_parry_ends_and_clears_boost() {
        let mut parry = ParryController::default();
        parry.enter_boost_zone();
        parry.open_window(1.0);
        parry.attempt();

        let timers = parry.tick(0.5);
        assert!(!timers.parry_ended, "boosted parry lasts 0.75s");
        let timers = parry.tick(0.3);
        assert!(timers.parry_ended);
        assert!(!parry.boost_active());
    }

    #[test]
    fn test_no_regen_while_parrying() {
        let mut parry = ParryController::default();
        parry.open_window(1.0);
        parry.attempt();
        parry.tick(0.25);
        assert!((parry.stamina().current() - 80.0).abs() < 1e-4);

        // Parry over: regen resumes
        parry.tick(0.25);
        parry.tick(1.0);
        assert!(parry.stamina().current() > 80.0);
    }

    #[test]
    fn test_window_times_out() {
        let mut parry = ParryController::default();
        parry.open_window(1.0);
        assert!(!parry.tick(0.6).window_closed);
        assert!(parry.tick(0.6).window_closed);
        assert!(!parry.window().is_active());
    }
}
