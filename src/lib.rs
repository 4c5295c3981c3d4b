//! Translocator - a first-person teleport puzzle platformer
//!
//! Core modules:
//! - `sim`: Level state machine, blocks, physics world and per-frame tick
//! - `scene`: Render-side scene graph handed to whatever renderer hosts the game
//! - `ui`: HUD model (overlays, cooldown bar) derived from game state
//! - `audio`: Sound effects keyed off game events
//! - `platform`: Keyboard mapping and browser glue
//! - `tuning` / `settings`: Data-driven gameplay constants and player preferences

pub mod audio;
pub mod error;
pub mod platform;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use error::{Error, Result};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Default fixed timestep (one physics step per frame at 60 Hz).
    /// The running game steps by `Tuning::physics_dt`.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Number of playable stages between title and ending
    pub const STAGE_COUNT: u8 = 5;
    /// Index of the ending screen
    pub const ENDING_INDEX: u8 = STAGE_COUNT + 1;

    /// Where the player is parked after touching a hazard
    pub const EXILE_POSITION: Vec3 = Vec3::splat(9999.0);

    /// Slack when comparing scheduled times against the clock
    pub const TIME_EPSILON: f64 = 1e-9;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit look direction for a yaw/pitch pair (yaw 0 looks down +Z)
#[inline]
pub fn look_direction(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(
        yaw.sin() * pitch.cos(),
        pitch.sin(),
        yaw.cos() * pitch.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_normalize_angle_wraps() {
        // 3π lands on the ±π seam; rounding decides which side
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 1e-5);
        assert!((normalize_angle(2.5 * PI) - FRAC_PI_2).abs() < 1e-5);
        assert!((normalize_angle(-2.5 * PI) + FRAC_PI_2).abs() < 1e-5);
        assert!((normalize_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < 1e-6);
        assert!(normalize_angle(PI) < PI);
    }

    #[test]
    fn test_look_direction_is_unit() {
        let forward = look_direction(0.0, 0.0);
        assert!((forward - Vec3::Z).length() < 1e-6);

        let up = look_direction(1.2, FRAC_PI_2);
        assert!((up.y - 1.0).abs() < 1e-6);
        assert!((look_direction(0.7, -0.3).length() - 1.0).abs() < 1e-5);
    }
}
