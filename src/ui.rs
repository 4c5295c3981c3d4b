//! Heads-up display model
//!
//! [`Hud::from_state`] derives everything the overlay shows from the game
//! state each frame. Hosts only apply it; nothing here touches the DOM.

use crate::sim::{GameState, LevelId};

/// Fill colour of the cooldown bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarColor {
    /// No target stored: the next press marks
    Blue,
    /// Target stored: the next press teleports
    Red,
}

impl BarColor {
    pub fn css(self) -> &'static str {
        match self {
            BarColor::Blue => "blue",
            BarColor::Red => "red",
        }
    }
}

/// Teleport cooldown indicator
#[derive(Debug, Clone, PartialEq)]
pub struct CooldownBar {
    /// Fill fraction in [0, 1]
    pub ratio: f32,
    pub label: String,
    pub color: BarColor,
}

impl CooldownBar {
    pub fn width_percent(&self) -> String {
        format!("{}%", self.ratio * 100.0)
    }
}

/// Overlay state for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub title_screen: bool,
    /// Stage name, when a stage is loaded
    pub banner: Option<&'static str>,
    pub game_over_overlay: bool,
    pub cleared_overlay: bool,
    pub cooldown: CooldownBar,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        let level = state.level();
        let cooldown = state.tuning.teleport_cooldown;
        let teleport = &state.teleport;

        let ratio = teleport.cooldown_ratio(state.time, cooldown);
        let label = if ratio < 1.0 {
            format!("Cooling... {:.1}s", teleport.cooldown_remaining(state.time, cooldown))
        } else {
            "READY".to_string()
        };
        let color = if teleport.is_marked() {
            BarColor::Red
        } else {
            BarColor::Blue
        };

        Self {
            title_screen: level == LevelId::Title,
            banner: state.live_level().and_then(|l| l.banner()),
            game_over_overlay: state.is_game_over(),
            cleared_overlay: level == LevelId::Ending,
            cooldown: CooldownBar { ratio, label, color },
        }
    }
}
