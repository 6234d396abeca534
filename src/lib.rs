//! Parry Duel - Core Library
//!
//! Deterministic gameplay state machines for a one-on-one parry duel:
//! - Parry window, stamina and parry cooldown (timing-based defence)
//! - Enemy attack cycle with parry chain and weakpoint exposure
//! - Movement controller (dash, hyper-dash, slide, slam, wall-jump, coyote time)
//! - Parry momentum overriding locomotion after a successful parry
//! - Flash and blink feedback sequences for the renderer
//! - RON/JSON tuning with hot reload
//! - Bevy plugin driving the duel from `Time`
//!
//! Everything advances through explicit `tick(dt, ..)` calls; rendering,
//! physics and input polling stay with the host.

pub mod combat;
pub mod config;
pub mod constants;
pub mod duel;
pub mod hotreload;
pub mod input;
pub mod logging;
pub mod movement;
pub mod plugin;
pub mod timer;

pub use config::{Tuning, TuningError};
pub use duel::environment::{Environment, SceneProbe, WallContact};
pub use duel::events::DuelEvent;
pub use duel::{Duel, Player, Target};
pub use input::Controls;
pub use movement::{Locomotion, MovementController, MovementFrame, WallProbe};
pub use plugin::{DuelPlugin, PlayerMotion, TuningReloadPlugin};
