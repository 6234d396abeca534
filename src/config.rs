//! Tuning document for the whole duel.
//!
//! One serde tree holding every tunable, with defaults from `constants`.
//! RON is the primary on-disk format; `.json` files are accepted too. Missing
//! fields fall back to their defaults, so a tuning file only needs the values
//! it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::combat::enemy::EnemyTuning;
use crate::combat::feedback::FeedbackTuning;
use crate::combat::parry::ParryTuning;
use crate::combat::player::PlayerTuning;
use crate::combat::projectile::ProjectileTuning;
use crate::movement::MovementTuning;

/// Error type for loading and validating tuning
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("RON write error: {0}")]
    RonWrite(#[from] ron::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported tuning format: {0:?}")]
    UnsupportedFormat(PathBuf),
    #[error("Invalid tuning value {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TuningFormat {
    Ron,
    Json,
}

impl TuningFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "ron" => Some(Self::Ron),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Seed for weakpoint selection
    pub seed: u64,
    pub player: PlayerTuning,
    pub parry: ParryTuning,
    pub enemy: EnemyTuning,
    pub feedback: FeedbackTuning,
    pub movement: MovementTuning,
    pub projectile: ProjectileTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: 42,
            player: PlayerTuning::default(),
            parry: ParryTuning::default(),
            enemy: EnemyTuning::default(),
            feedback: FeedbackTuning::default(),
            movement: MovementTuning::default(),
            projectile: ProjectileTuning::default(),
        }
    }
}

impl Tuning {
    pub fn from_ron_str(text: &str) -> Result<Self, TuningError> {
        let tuning: Self = ron::from_str(text)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn from_json_str(text: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(text)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read and validate a tuning file; the format follows the extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let format = TuningFormat::from_path(path)
            .ok_or_else(|| TuningError::UnsupportedFormat(path.to_path_buf()))?;
        let text = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match format {
            TuningFormat::Ron => Self::from_ron_str(&text),
            TuningFormat::Json => Self::from_json_str(&text),
        }
    }

    pub fn to_ron_string(&self) -> Result<String, TuningError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    pub fn to_json_string(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would stall or break the state machines
    pub fn validate(&self) -> Result<(), TuningError> {
        let p = &self.player;
        positive_i32("player.max_health", p.max_health)?;
        non_negative_i32("player.attack_damage", p.attack_damage)?;
        positive("player.attack_rate", p.attack_rate)?;
        non_negative_i32("player.weakpoint_damage_mult", p.weakpoint_damage_mult)?;

        let parry = &self.parry;
        positive("parry.max_stamina", parry.max_stamina)?;
        non_negative("parry.stamina_regen_rate", parry.stamina_regen_rate)?;
        non_negative("parry.stamina_cost", parry.stamina_cost)?;
        positive("parry.duration", parry.duration)?;
        non_negative("parry.cooldown", parry.cooldown)?;
        positive("parry.boost_multiplier", parry.boost_multiplier)?;

        let e = &self.enemy;
        positive_i32("enemy.max_health", e.max_health)?;
        non_negative_i32("enemy.attack_damage", e.attack_damage)?;
        positive("enemy.attack_cooldown", e.attack_cooldown)?;
        positive("enemy.hitbox_duration", e.hitbox_duration)?;
        positive("enemy.parry_window", e.parry_window)?;
        positive("enemy.weakpoint_reveal_time", e.weakpoint_reveal_time)?;
        positive("enemy.boost_reveal_multiplier", e.boost_reveal_multiplier)?;
        non_negative("enemy.weakpoint_move_rate", e.weakpoint_move_rate)?;

        let f = &self.feedback;
        non_negative("feedback.flash_duration", f.flash_duration)?;
        positive("feedback.flash_interval", f.flash_interval)?;
        positive("feedback.blink_interval", f.blink_interval)?;

        let m = &self.movement;
        positive("movement.walk_speed", m.walk_speed)?;
        positive("movement.max_air_speed", m.max_air_speed)?;
        non_negative("movement.ground_acceleration", m.ground_acceleration)?;
        non_negative("movement.air_acceleration", m.air_acceleration)?;
        positive("movement.dash_duration", m.dash_duration)?;
        positive("movement.hyper_dash_duration", m.hyper_dash_duration)?;
        positive("movement.slide_duration", m.slide_duration)?;
        non_negative("movement.dash_cooldown", m.dash_cooldown)?;
        non_negative("movement.hyper_dash_cooldown", m.hyper_dash_cooldown)?;
        non_negative("movement.jump_buffer_time", m.jump_buffer_time)?;
        non_negative("movement.coyote_time", m.coyote_time)?;
        positive("movement.wall_check_distance", m.wall_check_distance)?;
        positive("movement.parry_momentum_duration", m.parry_momentum_duration)?;
        if m.max_wall_jumps_per_wall == 0 {
            return Err(invalid("movement.max_wall_jumps_per_wall", "must be at least 1"));
        }

        let pr = &self.projectile;
        positive("projectile.speed", pr.speed)?;
        positive("projectile.lifetime", pr.lifetime)?;
        non_negative_i32("projectile.damage", pr.damage)?;

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be > 0, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be >= 0, got {value}")))
    }
}

fn positive_i32(field: &'static str, value: i32) -> Result<(), TuningError> {
    if value > 0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be > 0, got {value}")))
    }
}

fn non_negative_i32(field: &'static str, value: i32) -> Result<(), TuningError> {
    if value >= 0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be >= 0, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_ron_fills_defaults() {
        let tuning = Tuning::from_ron_str("(enemy: (attack_cooldown: 1.5), seed: 7)").unwrap();
        assert_eq!(tuning.seed, 7);
        assert!((tuning.enemy.attack_cooldown - 1.5).abs() < f32::EPSILON);
        assert_eq!(tuning.enemy.attack_damage, 20);
        assert_eq!(tuning.parry, ParryTuning::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json_str(r#"{"parry": {"cooldown": 0.5}}"#).unwrap();
        assert!((tuning.parry.cooldown - 0.5).abs() < f32::EPSILON);
        assert_eq!(tuning.movement, MovementTuning::default());
    }

    #[test]
    fn test_ron_output_reloads() {
        let mut tuning = Tuning::default();
        tuning.movement.dash_speed = 33.0;
        let text = tuning.to_ron_string().unwrap();
        assert_eq!(Tuning::from_ron_str(&text).unwrap(), tuning);
    }

    #[test]
    fn test_zero_window_rejected() {
        let err = Tuning::from_ron_str("(enemy: (parry_window: 0.0))").unwrap_err();
        match err {
            TuningError::Invalid { field, .. } => assert_eq!(field, "enemy.parry_window"),
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_wall_jump_cap_rejected() {
        let mut tuning = Tuning::default();
        tuning.movement.max_wall_jumps_per_wall = 0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid {
                field: "movement.max_wall_jumps_per_wall",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_cost_rejected() {
        let mut tuning = Tuning::default();
        tuning.parry.stamina_cost = -1.0;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_malformed_ron_is_parse_error() {
        assert!(matches!(
            Tuning::from_ron_str("(enemy: "),
            Err(TuningError::Ron(_))
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            TuningFormat::from_path(Path::new("duel.ron")),
            Some(TuningFormat::Ron)
        );
        assert_eq!(
            TuningFormat::from_path(Path::new("duel.JSON")),
            Some(TuningFormat::Json)
        );
        assert_eq!(TuningFormat::from_path(Path::new("duel.toml")), None);
        assert_eq!(TuningFormat::from_path(Path::new("duel")), None);
    }
}
