//! Player movement controller.
//!
//! Composes one frame of velocity from ground/air locomotion, the dash,
//! hyper-dash, slide, slam and wall-slide modes, jump buffering, coyote time
//! and parry momentum. Collision is the host's: it reports `grounded` and
//! answers wall probes, then moves the character by the returned displacement.

pub mod momentum;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{
    AIR_ACCELERATION, COYOTE_TIME, DASH_COOLDOWN, DASH_DURATION, DASH_SPEED, GRAVITY,
    GROUNDED_REST_VELOCITY, GROUND_ACCELERATION, HYPER_DASH_COOLDOWN, HYPER_DASH_DURATION,
    HYPER_DASH_SPEED, JUMP_BUFFER_TIME, JUMP_FORCE, MAX_AIR_SPEED, MAX_WALL_JUMPS_PER_WALL,
    PARRY_MOMENTUM_DURATION, PARRY_MOMENTUM_SPEED, PUNCH_BOOST_FORCE, SLAM_FORCE,
    SLIDE_DURATION, SLIDE_INPUT_THRESHOLD, SLIDE_SPEED, WALK_SPEED, WALL_CHECK_DISTANCE,
    WALL_JUMP_FORCE, WALL_JUMP_SIDE_FORCE, WALL_SLIDE_SPEED,
};
use crate::input::Controls;
use crate::timer::{move_towards, Countdown};
use momentum::ParryMomentum;

/// Two wall normals closer than this are the same wall
const SAME_WALL_TOLERANCE: f32 = 1e-3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    pub walk_speed: f32,
    pub air_acceleration: f32,
    pub ground_acceleration: f32,
    pub max_air_speed: f32,
    pub jump_force: f32,
    pub gravity: f32,
    /// Vertical velocity held while standing
    pub grounded_rest_velocity: f32,

    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    pub hyper_dash_speed: f32,
    pub hyper_dash_duration: f32,
    pub hyper_dash_cooldown: f32,

    pub slide_speed: f32,
    pub slide_duration: f32,
    /// Minimum input magnitude to start a slide
    pub slide_input_threshold: f32,
    pub slam_force: f32,

    pub wall_slide_speed: f32,
    pub wall_jump_force: f32,
    pub wall_jump_side_force: f32,
    pub wall_check_distance: f32,
    pub max_wall_jumps_per_wall: u32,

    pub jump_buffer_time: f32,
    pub coyote_time: f32,
    pub punch_boost_force: f32,

    pub parry_momentum_speed: f32,
    pub parry_momentum_duration: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED,
            air_acceleration: AIR_ACCELERATION,
            ground_acceleration: GROUND_ACCELERATION,
            max_air_speed: MAX_AIR_SPEED,
            jump_force: JUMP_FORCE,
            gravity: GRAVITY,
            grounded_rest_velocity: GROUNDED_REST_VELOCITY,
            dash_speed: DASH_SPEED,
            dash_duration: DASH_DURATION,
            dash_cooldown: DASH_COOLDOWN,
            hyper_dash_speed: HYPER_DASH_SPEED,
            hyper_dash_duration: HYPER_DASH_DURATION,
            hyper_dash_cooldown: HYPER_DASH_COOLDOWN,
            slide_speed: SLIDE_SPEED,
            slide_duration: SLIDE_DURATION,
            slide_input_threshold: SLIDE_INPUT_THRESHOLD,
            slam_force: SLAM_FORCE,
            wall_slide_speed: WALL_SLIDE_SPEED,
            wall_jump_force: WALL_JUMP_FORCE,
            wall_jump_side_force: WALL_JUMP_SIDE_FORCE,
            wall_check_distance: WALL_CHECK_DISTANCE,
            max_wall_jumps_per_wall: MAX_WALL_JUMPS_PER_WALL,
            jump_buffer_time: JUMP_BUFFER_TIME,
            coyote_time: COYOTE_TIME,
            punch_boost_force: PUNCH_BOOST_FORCE,
            parry_momentum_speed: PARRY_MOMENTUM_SPEED,
            parry_momentum_duration: PARRY_MOMENTUM_DURATION,
        }
    }
}

/// Lateral wall detection, answered by the host's physics
pub trait WallProbe {
    /// Surface normal of a wall hit within `max_distance` along `direction`
    fn probe_wall(&self, direction: Vec3, max_distance: f32) -> Option<Vec3>;
}

/// Open space: no walls anywhere
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWalls;

impl WallProbe for NoWalls {
    fn probe_wall(&self, _direction: Vec3, _max_distance: f32) -> Option<Vec3> {
        None
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locomotion {
    #[default]
    Walk,
    Dash,
    HyperDash,
    Slide,
    Slam,
    WallSlide,
}

impl Locomotion {
    /// Modes that set velocity outright and skip normal locomotion
    pub fn overrides_velocity(self) -> bool {
        matches!(self, Self::Dash | Self::HyperDash | Self::Slide)
    }
}

/// Result of one movement tick for the host character controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementFrame {
    pub velocity: Vec3,
    /// Move the character by this much this frame
    pub displacement: Vec3,
    pub mode: Locomotion,
}

#[derive(Component, Debug, Clone)]
pub struct MovementController {
    tuning: MovementTuning,
    velocity: Vec3,
    grounded: bool,
    mode: Locomotion,
    mode_timer: Countdown,
    dash_cooldown: Countdown,
    hyper_dash_cooldown: Countdown,
    jump_buffer: Countdown,
    coyote: Countdown,
    wall_jump_count: u32,
    last_wall_normal: Option<Vec3>,
    can_punch: bool,
    /// Set by a slam, cleared only on landing
    slamming: bool,
    momentum: ParryMomentum,
}

impl Default for MovementController {
    fn default() -> Self {
        Self::new(MovementTuning::default())
    }
}

impl MovementController {
    pub fn new(tuning: MovementTuning) -> Self {
        Self {
            tuning,
            velocity: Vec3::ZERO,
            grounded: false,
            mode: Locomotion::Walk,
            mode_timer: Countdown::default(),
            dash_cooldown: Countdown::default(),
            hyper_dash_cooldown: Countdown::default(),
            jump_buffer: Countdown::default(),
            coyote: Countdown::default(),
            wall_jump_count: 0,
            last_wall_normal: None,
            can_punch: true,
            slamming: false,
            momentum: ParryMomentum::default(),
        }
    }

    pub fn tuning(&self) -> &MovementTuning {
        &self.tuning
    }

    pub fn retune(&mut self, tuning: MovementTuning) {
        self.tuning = tuning;
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Planar speed, as shown on the speed readout
    pub fn horizontal_speed(&self) -> f32 {
        Vec2::new(self.velocity.x, self.velocity.z).length()
    }

    pub fn mode(&self) -> Locomotion {
        self.mode
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn wall_jump_count(&self) -> u32 {
        self.wall_jump_count
    }

    pub fn momentum(&self) -> &ParryMomentum {
        &self.momentum
    }

    pub fn is_momentum_active(&self) -> bool {
        self.momentum.is_active()
    }

    /// True from a slam start until the next landing, even if another mode
    /// (wall slide, dash) has taken over meanwhile
    pub fn is_slamming(&self) -> bool {
        self.slamming
    }

    pub fn can_punch(&self) -> bool {
        self.can_punch
    }

    pub fn jump_buffered(&self) -> bool {
        self.jump_buffer.is_running()
    }

    pub fn coyote_remaining(&self) -> f32 {
        self.coyote.remaining()
    }

    /// Kick off parry momentum along `direction`. Cancels dash, hyper-dash and
    /// slide. A direction with no planar part does nothing.
    pub fn start_parry_momentum(&mut self, direction: Vec3) -> bool {
        let started = self.momentum.start(
            direction,
            self.tuning.parry_momentum_speed,
            self.tuning.parry_momentum_duration,
        );
        if started && self.mode.overrides_velocity() {
            self.end_mode();
        }
        started
    }

    pub fn tick<P: WallProbe + ?Sized>(
        &mut self,
        dt: f32,
        controls: &Controls,
        grounded: bool,
        probe: &P,
    ) -> MovementFrame {
        self.grounded = grounded;
        let input_dir = controls.input_direction();

        self.read_input(dt, controls);

        if grounded {
            self.wall_jump_count = 0;
            self.last_wall_normal = None;
            self.can_punch = true;
        }

        self.update_dashes(dt, controls, input_dir);
        self.update_slide(dt, controls, input_dir);

        if grounded && self.slamming {
            self.slamming = false;
            if self.mode == Locomotion::Slam {
                self.end_mode();
            }
            self.velocity.y = 0.0;
        }

        self.update_wall(controls, probe);

        if self.jump_buffer.is_running()
            && self.coyote.is_running()
            && self.mode != Locomotion::WallSlide
        {
            self.velocity.y = self.tuning.jump_force;
            self.jump_buffer.clear();
            self.coyote.clear();
        }

        if self.momentum.is_active() {
            let push = self.momentum.velocity();
            self.velocity.x = push.x;
            self.velocity.z = push.z;
            self.velocity.y += self.tuning.gravity * dt;
            self.momentum.tick(dt);
        } else if !self.mode.overrides_velocity() {
            self.walk(dt, input_dir);
            self.velocity.y += self.tuning.gravity * dt;
        }

        let displacement = self.velocity * dt;

        if grounded && self.velocity.y < 0.0 {
            self.velocity.y = self.tuning.grounded_rest_velocity;
        }

        MovementFrame {
            velocity: self.velocity,
            displacement,
            mode: self.mode,
        }
    }

    fn read_input(&mut self, dt: f32, controls: &Controls) {
        if self.grounded {
            self.coyote.start(self.tuning.coyote_time);
        } else {
            self.coyote.tick(dt);
        }

        if controls.jump {
            self.jump_buffer.start(self.tuning.jump_buffer_time);
            self.can_punch = true;
        } else {
            self.jump_buffer.tick(dt);
        }

        let locked = self.momentum.is_active();

        if controls.crouch_pressed {
            if self.grounded {
                if !locked && controls.input_magnitude() > self.tuning.slide_input_threshold {
                    self.begin_mode(Locomotion::Slide, self.tuning.slide_duration);
                }
            } else if !self.slamming && self.velocity.y < 0.0 {
                self.slamming = true;
                self.mode = Locomotion::Slam;
                self.mode_timer.clear();
                self.velocity.y = self.tuning.slam_force;
            }
        }

        // Later starts win: slide < dash < hyper-dash
        if !locked && controls.dash && self.dash_cooldown.is_expired() {
            self.begin_mode(Locomotion::Dash, self.tuning.dash_duration);
            self.dash_cooldown.start(self.tuning.dash_cooldown);
        }
        if !locked && controls.hyper_dash && self.hyper_dash_cooldown.is_expired() {
            self.begin_mode(Locomotion::HyperDash, self.tuning.hyper_dash_duration);
            self.hyper_dash_cooldown.start(self.tuning.hyper_dash_cooldown);
        }

        if controls.punch && self.can_punch {
            if let Some(look) = controls.camera_forward.and_then(Vec3::try_normalize) {
                self.velocity += -look * self.tuning.punch_boost_force;
                self.can_punch = false;
            }
        }
    }

    fn update_dashes(&mut self, dt: f32, controls: &Controls, input_dir: Vec3) {
        if self.mode == Locomotion::HyperDash {
            self.velocity = controls.forward.normalize_or_zero() * self.tuning.hyper_dash_speed;
            if self.mode_timer.tick(dt) {
                self.end_mode();
            }
        } else {
            self.hyper_dash_cooldown.tick(dt);
        }

        if self.mode == Locomotion::Dash {
            self.velocity = input_dir * self.tuning.dash_speed;
            if self.mode_timer.tick(dt) {
                self.end_mode();
            }
        } else {
            self.dash_cooldown.tick(dt);
        }
    }

    fn update_slide(&mut self, dt: f32, controls: &Controls, input_dir: Vec3) {
        if self.mode != Locomotion::Slide {
            return;
        }
        self.velocity = input_dir * self.tuning.slide_speed;
        if self.mode_timer.tick(dt) || controls.crouch_released {
            self.end_mode();
        }
    }

    fn update_wall<P: WallProbe + ?Sized>(&mut self, controls: &Controls, probe: &P) {
        if self.mode == Locomotion::WallSlide {
            self.end_mode();
        }
        if self.grounded || self.velocity.y >= 0.0 || self.mode.overrides_velocity() {
            return;
        }

        let distance = self.tuning.wall_check_distance;
        let right = controls.right.normalize_or_zero();
        let Some(normal) = probe
            .probe_wall(right, distance)
            .or_else(|| probe.probe_wall(-right, distance))
        else {
            return;
        };

        self.mode = Locomotion::WallSlide;
        self.mode_timer.clear();

        let same_wall = self
            .last_wall_normal
            .is_some_and(|last| last.abs_diff_eq(normal, SAME_WALL_TOLERANCE));
        if !same_wall {
            self.wall_jump_count = 0;
            self.last_wall_normal = Some(normal);
        }

        self.velocity.y = self.velocity.y.max(self.tuning.wall_slide_speed);

        if self.jump_buffer.is_running() && self.wall_jump_count < self.tuning.max_wall_jumps_per_wall
        {
            self.jump_buffer.clear();
            self.velocity = normal.normalize_or_zero() * self.tuning.wall_jump_side_force;
            self.velocity.y = self.tuning.wall_jump_force;
            self.wall_jump_count += 1;
            self.end_mode();
        }
    }

    fn walk(&mut self, dt: f32, input_dir: Vec3) {
        let (top_speed, acceleration) = if self.grounded {
            (self.tuning.walk_speed, self.tuning.ground_acceleration)
        } else {
            (self.tuning.max_air_speed, self.tuning.air_acceleration)
        };
        let desired = input_dir * top_speed;
        let step = acceleration * dt;
        self.velocity.x = move_towards(self.velocity.x, desired.x, step);
        self.velocity.z = move_towards(self.velocity.z, desired.z, step);
    }

    fn begin_mode(&mut self, mode: Locomotion, duration: f32) {
        self.mode = mode;
        self.mode_timer.start(duration);
    }

    fn end_mode(&mut self) {
        self.mode = Locomotion::Walk;
        self.mode_timer.clear();
    }
}
