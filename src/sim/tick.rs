//! Fixed timestep simulation tick
//!
//! One call is one frame: input, deferred work, hazards, collision polling,
//! player control and a single physics step, always in that order.

use glam::{Vec2, Vec3};

use super::level::LevelId;
use super::state::{GameEvent, GameState};
use crate::tuning::Tuning;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Movement keys, held
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Jump key, held
    pub jump: bool,
    /// Leave the title screen (one-shot)
    pub confirm: bool,
    /// Teleport key pressed this frame (one-shot)
    pub teleport: bool,
    /// Restart key pressed this frame (one-shot)
    pub restart: bool,
    /// Pointer movement since the last tick, in pixels
    pub look_delta: Vec2,
}

impl TickInput {
    /// Movement axis in player space: x is left (+) / right (-), y is forward (+) / back (-)
    pub fn move_axis(&self) -> Vec2 {
        let axis = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.forward, self.back))
    }
}

/// Advance the game state by one physics step
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.is_game_over() {
        // Only restart gets through while the game-over screen is up
        if input.restart {
            state.restart();
        }
    } else {
        let tuning = &state.tuning;
        let (sensitivity, limit) = (tuning.mouse_sensitivity, tuning.pitch_limit);
        state.look.turn(input.look_delta, sensitivity, limit);

        if input.confirm && state.level() == LevelId::Title {
            state.load_level(LevelId::Stage(1));
        }
        if input.teleport {
            state.activate_teleport();
        }
        if input.restart {
            state.restart();
        }
    }

    state.run_due_actions();
    state.animate_hazards();
    state.poll_goal();
    state.poll_hazards();
    state.handle_game_over();

    if !state.is_game_over() {
        drive_player(state, input);
    }

    state.world.step();
    state.sync_player();

    state.time += state.world.dt() as f64;
    state.time_ticks += 1;
}

/// Steer the player toward the held direction and jump when grounded
fn drive_player(state: &mut GameState, input: &TickInput) {
    let Some(body) = state.player().and_then(|p| p.body()) else {
        return;
    };
    let (Some(position), Some(velocity)) = (state.world.translation(body), state.world.linvel(body)) else {
        return;
    };

    let steered = steer_velocity(velocity, input.move_axis(), state.look.yaw, &state.tuning);
    state.world.set_linvel(body, steered);

    if input.jump && can_jump(steered.y, position.y, &state.tuning) {
        let impulse = Vec3::Y * state.tuning.jump_impulse;
        if state.world.apply_impulse(body, impulse) {
            state.push_event(GameEvent::Jumped);
        }
    }
}

/// New velocity after one frame of steering.
///
/// The horizontal components close `1 / move_smoothing` of the gap to the
/// target each frame; the vertical component is left to gravity.
pub fn steer_velocity(current: Vec3, axis: Vec2, yaw: f32, tuning: &Tuning) -> Vec3 {
    let (sin, cos) = yaw.sin_cos();
    let dir_x = axis.x * cos + axis.y * sin;
    let dir_z = axis.y * cos - axis.x * sin;
    let target = Vec2::new(dir_x, dir_z) * tuning.move_speed;

    let k = 1.0 / tuning.move_smoothing;
    Vec3::new(
        current.x + (target.x - current.x) * k,
        current.y,
        current.z + (target.y - current.z) * k,
    )
}

/// Grounded check: nearly no vertical motion and low enough to be on the floor
pub fn can_jump(vel_y: f32, height: f32, tuning: &Tuning) -> bool {
    vel_y.abs() < tuning.jump_velocity_epsilon && height <= tuning.ground_height
}
