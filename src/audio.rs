//! Sound effects
//!
//! Effects are chosen from [`GameEvent`]s on every platform. Playback uses the
//! Web Audio API on wasm32 and synthesizes each clip with oscillators, so no
//! sound files ship with the game.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Teleport target stored
    TeleportSet,
    /// Player translocated to the stored target
    TeleportJump,
    Jump,
    /// Player hit a hazard
    Collision,
    /// Goal reached
    Clear,
}

impl SoundEffect {
    /// Effect to play for an event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::TeleportMarked(_) => Some(SoundEffect::TeleportSet),
            GameEvent::Teleported { .. } => Some(SoundEffect::TeleportJump),
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::GameOver => Some(SoundEffect::Collision),
            GameEvent::LevelCleared(_) => Some(SoundEffect::Clear),
            GameEvent::LevelLoaded(_) | GameEvent::Restarted(_) => None,
        }
    }

    /// Per-effect gain on top of the player's volume
    pub fn gain(self) -> f32 {
        match self {
            SoundEffect::Collision => 0.3,
            _ => 1.0,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Play from the start; overlapping plays of the same effect are fine
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume * effect.gain();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::TeleportSet => self.blop(ctx, vol, 520.0, 780.0),
                SoundEffect::TeleportJump => self.blop(ctx, vol, 780.0, 390.0),
                SoundEffect::Jump => self.play_jump(ctx, vol),
                SoundEffect::Collision => self.play_collision(ctx, vol),
                SoundEffect::Clear => self.play_clear(ctx, vol),
            }
        }

        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Short pitch-swept bubble
        fn blop(&self, ctx: &AudioContext, vol: f32, from: f32, to: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, from, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Rising whoop
        fn play_jump(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(200.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(600.0, t + 0.15)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        /// Low crunch
        fn play_collision(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [180.0, 120.0, 70.0].iter().enumerate() {
                let delay = i as f64 * 0.04;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sawtooth) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.6, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }

        /// Ascending fanfare
        fn play_clear(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
                let delay = i as f64 * 0.1;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.5).ok();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::LevelId;
    use glam::Vec3;

    #[test]
    fn test_events_map_to_effects() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::TeleportMarked(Vec3::ZERO)),
            Some(SoundEffect::TeleportSet)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Teleported {
                from: Vec3::ZERO,
                to: Vec3::ONE
            }),
            Some(SoundEffect::TeleportJump)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::Jumped), Some(SoundEffect::Jump));
        assert_eq!(SoundEffect::for_event(&GameEvent::GameOver), Some(SoundEffect::Collision));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::LevelCleared(LevelId::Stage(1))),
            Some(SoundEffect::Clear)
        );
    }

    #[test]
    fn test_loads_are_silent() {
        assert_eq!(SoundEffect::for_event(&GameEvent::LevelLoaded(LevelId::Title)), None);
        assert_eq!(SoundEffect::for_event(&GameEvent::Restarted(LevelId::Stage(3))), None);
    }

    #[test]
    fn test_collision_is_quieter() {
        assert!(SoundEffect::Collision.gain() < SoundEffect::Clear.gain());
    }
}
