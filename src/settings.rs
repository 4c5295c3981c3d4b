//! Player preferences
//!
//! Kept apart from tuning. On web they are read once from LocalStorage at
//! startup; nothing in the game writes them back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence everything
    pub muted: bool,

    // === Controls ===
    /// Multiplier on the tuned pointer sensitivity
    pub look_sensitivity: f32,
    /// Invert vertical look
    pub invert_y: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            look_sensitivity: 1.0,
            invert_y: false,
        }
    }
}

impl Settings {
    /// Combined volume for sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    /// Apply sensitivity and inversion to a raw pointer delta (pixels)
    pub fn scale_look(&self, delta: Vec2) -> Vec2 {
        let y_sign = if self.invert_y { -1.0 } else { 1.0 };
        Vec2::new(delta.x, delta.y * y_sign) * self.look_sensitivity
    }

    /// Parse preferences, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "translocator_settings";

    /// Read preferences from LocalStorage (WASM only). The game never writes them.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());

        match stored.map(|json| Self::from_json(&json)) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Ignoring stored settings: {e}");
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_volume_is_zero() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effective_volume(), 0.0);
        assert!((Settings::default().effective_volume() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_scale_look_inverts_y() {
        let settings = Settings {
            look_sensitivity: 2.0,
            invert_y: true,
            ..Default::default()
        };
        assert_eq!(settings.scale_look(Vec2::new(3.0, 4.0)), Vec2::new(6.0, -8.0));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "sfx_volume": 0.25, "invert_y": true }"#).expect("valid json");
        assert_eq!(settings.sfx_volume, 0.25);
        assert!(settings.invert_y);
        assert_eq!(settings.master_volume, Settings::default().master_volume);
        assert!(!settings.muted);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(Settings::from_json("{ not json"), Err(crate::Error::Json(_))));
    }
}
