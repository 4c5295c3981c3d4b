//! Data-driven gameplay constants
//!
//! Every field has a default so a partial JSON file only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::SIM_DT;
use crate::error::{Error, Result};

/// Gameplay tuning loaded from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Movement ===
    /// Target horizontal speed while a movement key is held (units/s)
    pub move_speed: f32,
    /// Each frame the velocity closes 1/smoothing of the gap to the target
    pub move_smoothing: f32,
    /// Upward impulse applied on jump
    pub jump_impulse: f32,
    /// Vertical speed below which the player counts as resting
    pub jump_velocity_epsilon: f32,
    /// Player centre height at or below which a jump is allowed
    pub ground_height: f32,

    // === Teleport ===
    /// Seconds between two accepted teleport key presses
    pub teleport_cooldown: f64,

    // === Level flow ===
    /// Delay between touching the goal and loading the next level (s)
    pub level_clear_delay: f64,
    /// Delay before the player is put back on the spawn point after a load (s)
    pub respawn_delay: f64,

    // === Camera ===
    /// Eye height above the player's centre
    pub camera_eye_offset: f32,
    /// Radians of yaw/pitch per pixel of pointer movement
    pub mouse_sensitivity: f32,
    /// Pitch is clamped to [-limit, limit]
    pub pitch_limit: f32,

    // === Physics ===
    /// Length of one tick (s); drives both the physics step and the game clock
    pub physics_dt: f32,
    /// Vertical gravity (units/s²)
    pub gravity: f32,
    /// Half the side length of the player cube
    pub player_half_extent: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_speed: 6.0,
            move_smoothing: 20.0,
            jump_impulse: 8.0,
            jump_velocity_epsilon: 0.05,
            ground_height: 1.5,

            teleport_cooldown: 0.5,

            level_clear_delay: 0.05,
            respawn_delay: 0.0,

            camera_eye_offset: 0.5,
            mouse_sensitivity: 0.002,
            pitch_limit: std::f32::consts::FRAC_PI_2,

            physics_dt: SIM_DT,
            gravity: -9.81,
            player_half_extent: 0.5,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("move_smoothing", self.move_smoothing as f64),
            ("physics_dt", self.physics_dt as f64),
            ("player_half_extent", self.player_half_extent as f64),
            ("teleport_cooldown", self.teleport_cooldown),
        ];
        for (field, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(Error::InvalidTuning { field, value });
            }
        }

        let non_negative = [
            ("move_speed", self.move_speed as f64),
            ("jump_impulse", self.jump_impulse as f64),
            ("jump_velocity_epsilon", self.jump_velocity_epsilon as f64),
            ("level_clear_delay", self.level_clear_delay),
            ("respawn_delay", self.respawn_delay),
            ("mouse_sensitivity", self.mouse_sensitivity as f64),
            ("pitch_limit", self.pitch_limit as f64),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(Error::InvalidTuning { field, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides_named_fields() {
        let tuning = Tuning::from_json(r#"{ "teleport_cooldown": 1.25, "move_speed": 4.0 }"#)
            .expect("valid tuning");
        assert_eq!(tuning.teleport_cooldown, 1.25);
        assert_eq!(tuning.move_speed, 4.0);
        assert_eq!(tuning.jump_impulse, Tuning::default().jump_impulse);
    }

    #[test]
    fn test_rejects_zero_smoothing() {
        let err = Tuning::from_json(r#"{ "move_smoothing": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTuning {
                field: "move_smoothing",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(Error::Json(_))));
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = Tuning::load("/definitely/not/here.json").unwrap_err();
        match err {
            Error::Io { path, .. } => assert!(path.ends_with("here.json")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
