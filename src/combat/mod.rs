//! Combat state machines owned by the two duel actors.
//!
//! The player owns health, stamina and the parry controller. The enemy owns
//! its attack cycle, parry chain, weakpoints and visual feedback. They only
//! talk through `duel::messages`.

pub mod enemy;
pub mod feedback;
pub mod health;
pub mod parry;
pub mod player;
pub mod projectile;
pub mod stamina;
pub mod weakpoint;

pub use enemy::{AttackOutcome, Enemy, EnemyTuning};
pub use feedback::{Blinker, FeedbackTarget, FeedbackTuning, Tint};
pub use health::{DamageOutcome, Health};
pub use parry::{ParryController, ParryOutcome, ParryRejection, ParryTuning};
pub use player::{PlayerCombat, PlayerTuning};
pub use projectile::{ProjectileHit, ProjectileId, ProjectilePool, ProjectileTuning};
pub use stamina::StaminaPool;
pub use weakpoint::{WeakpointExposure, WeakpointTarget};
