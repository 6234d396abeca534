//! Centralized gameplay constants for the parry duel core.
//!
//! These are the shipped defaults. Every value here can be overridden through
//! the tuning document (see `config`); the constants only seed `Default` impls.

// =====================================================
// Player combat
// =====================================================

/// Melee damage of a single player attack
pub const PLAYER_ATTACK_DAMAGE: i32 = 40;

/// Player melee attacks per second
pub const PLAYER_ATTACK_RATE: f32 = 1.0;

/// Player hit points
pub const PLAYER_MAX_HEALTH: i32 = 100;

/// Bonus multiplier applied to the base attack when a weakpoint is struck
pub const WEAKPOINT_DAMAGE_MULT: i32 = 2;

// =====================================================
// Parry
// =====================================================

pub const MAX_STAMINA: f32 = 100.0;

/// Stamina regained per second while not parrying
pub const STAMINA_REGEN_RATE: f32 = 15.0;

pub const PARRY_STAMINA_COST: f32 = 20.0;

/// How long a parry stays active after a successful start (seconds)
pub const PARRY_DURATION: f32 = 0.5;

pub const PARRY_COOLDOWN: f32 = 2.0;

/// Parry window opened by an incoming attack (seconds)
pub const PARRY_WINDOW: f32 = 1.0;

/// Parry duration and weakpoint reveal multiplier inside a boost zone
pub const BOOST_ZONE_MULT: f32 = 1.5;

// =====================================================
// Enemy
// =====================================================

pub const ENEMY_MAX_HEALTH: i32 = 100;

pub const ENEMY_ATTACK_DAMAGE: i32 = 20;

/// Seconds between attack starts
pub const ENEMY_ATTACK_COOLDOWN: f32 = 3.0;

/// Damage hitbox lifetime per attack (seconds)
pub const ENEMY_HITBOX_DURATION: f32 = 0.5;

/// Weakpoint reveal time after a parry (seconds, before boost)
pub const WEAKPOINT_REVEAL_TIME: f32 = 1.0;

/// Weakpoint lerp rate toward its slot (fraction per second)
pub const WEAKPOINT_MOVE_RATE: f32 = 2.0;

// =====================================================
// Feedback
// =====================================================

/// Total body flash time (seconds)
pub const FLASH_DURATION: f32 = 1.0;

/// Body flash toggle interval (seconds)
pub const FLASH_INTERVAL: f32 = 0.2;

/// Weakpoint blink half-period (seconds)
pub const WEAKPOINT_BLINK_INTERVAL: f32 = 0.3;

// =====================================================
// Projectile
// =====================================================

pub const PROJECTILE_SPEED: f32 = 15.0;

pub const PROJECTILE_DAMAGE: i32 = 10;

pub const PROJECTILE_LIFETIME: f32 = 5.0;

// =====================================================
// Movement
// =====================================================

pub const WALK_SPEED: f32 = 10.0;
pub const AIR_ACCELERATION: f32 = 20.0;
pub const GROUND_ACCELERATION: f32 = 50.0;
pub const MAX_AIR_SPEED: f32 = 20.0;
pub const JUMP_FORCE: f32 = 12.0;
pub const GRAVITY: f32 = -24.0;

/// Vertical velocity held while grounded so the character controller stays snapped
pub const GROUNDED_REST_VELOCITY: f32 = -2.0;

pub const DASH_SPEED: f32 = 30.0;
pub const DASH_DURATION: f32 = 0.2;
pub const DASH_COOLDOWN: f32 = 0.5;

pub const HYPER_DASH_SPEED: f32 = 60.0;
pub const HYPER_DASH_DURATION: f32 = 0.2;
pub const HYPER_DASH_COOLDOWN: f32 = 1.0;

pub const SLIDE_SPEED: f32 = 20.0;
pub const SLIDE_DURATION: f32 = 0.5;

/// Minimum input magnitude that can start a slide
pub const SLIDE_INPUT_THRESHOLD: f32 = 0.1;

pub const SLAM_FORCE: f32 = -50.0;

pub const WALL_SLIDE_SPEED: f32 = -2.0;
pub const WALL_JUMP_FORCE: f32 = 12.0;
pub const WALL_JUMP_SIDE_FORCE: f32 = 8.0;
pub const WALL_CHECK_DISTANCE: f32 = 1.0;
pub const MAX_WALL_JUMPS_PER_WALL: u32 = 2;

pub const JUMP_BUFFER_TIME: f32 = 0.2;
pub const COYOTE_TIME: f32 = 0.2;

pub const PUNCH_BOOST_FORCE: f32 = 25.0;

pub const PARRY_MOMENTUM_SPEED: f32 = 5.0;
pub const PARRY_MOMENTUM_DURATION: f32 = 0.5;
