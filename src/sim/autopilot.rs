//! Demo player
//!
//! Produces [`TickInput`] from the current state: leaves the title, faces the
//! goal pad and walks at it, hops hazards it can clear, brakes in the air when
//! it would land on one, backs off from walls it can't, and chains teleports
//! off the top of jumps to climb what a jump can't.

use glam::{Vec2, Vec3};

use super::level::{LevelId, LiveLevel};
use super::levels::GOAL;
use super::state::GameState;
use super::tick::{TickInput, can_jump};
use crate::normalize_angle;
use crate::tuning::Tuning;

/// Frames without progress before the autopilot counts as stuck
const STALL_FRAMES: u32 = 12;
/// Frames stuck before it starts chaining teleports
const CHAIN_FRAMES: u32 = 45;
/// Distance (x) from a hazard's danger zone that triggers a hop
const HOP_DISTANCE: f32 = 0.6;
/// Extra clearance around a hazard when judging a landing
const HAZARD_MARGIN: f32 = 0.4;
/// Look-ahead times (s) for hazards that move toward a standing player
const HAZARD_HORIZON: [f64; 3] = [0.0, 0.15, 0.3];
/// Distance at which a wall too tall to hop makes it stop, then back off
const WALL_STOP: f32 = 2.5;
const WALL_RETREAT: f32 = 1.0;

/// Range of player-centre x that would touch a hazard at `center`
fn danger_zone(hazard_half: Vec3, center: Vec3, tuning: &Tuning) -> (f32, f32) {
    let reach = hazard_half.x + tuning.player_half_extent + HAZARD_MARGIN;
    (center.x - reach, center.x + reach)
}

fn distance_to(x: f32, (lo, hi): (f32, f32)) -> f32 {
    if x < lo {
        lo - x
    } else if x > hi {
        x - hi
    } else {
        0.0
    }
}

/// Hazards reaching the player's z lane, as (hazard half extents, position at `now`)
fn lane_hazards<'a>(
    level: &'a LiveLevel,
    lane_z: f32,
    now: f64,
    tuning: &'a Tuning,
) -> impl Iterator<Item = (Vec3, Vec3)> + 'a {
    level
        .hazards_at(now)
        .map(|(block, position)| (block.half_extents(), position))
        .filter(move |(half, position)| (position.z - lane_z).abs() < half.z + tuning.player_half_extent)
}

/// Highest a hazard's top can be for a jump to clear it
fn hop_ceiling(tuning: &Tuning) -> f32 {
    let rise = tuning.jump_impulse * tuning.jump_impulse / (2.0 * tuning.gravity.abs().max(f32::EPSILON));
    tuning.ground_height - tuning.player_half_extent + rise
}

/// Seconds until a body at `height` moving up at `vel_y` is back on the ground
fn time_to_land(height: f32, vel_y: f32, tuning: &Tuning) -> f32 {
    let g = tuning.gravity.abs().max(f32::EPSILON);
    let drop = (height - tuning.ground_height).max(0.0);
    (vel_y + (vel_y * vel_y + 2.0 * g * drop).sqrt()) / g
}

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    stalled_frames: u32,
    last_distance: Option<f32>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stalled_frames(&self) -> u32 {
        self.stalled_frames
    }

    pub fn next_input(&mut self, state: &GameState) -> TickInput {
        match state.level() {
            LevelId::Title => {
                return TickInput {
                    confirm: true,
                    ..Default::default()
                };
            }
            LevelId::Ending => return TickInput::default(),
            LevelId::Stage(_) => {}
        }

        if state.is_game_over() {
            self.stalled_frames = 0;
            self.last_distance = None;
            return TickInput {
                restart: true,
                ..Default::default()
            };
        }

        let (Some(position), Some(velocity)) = (state.player_position(), state.player_velocity()) else {
            return TickInput::default();
        };
        let tuning = &state.tuning;

        let to_goal = Vec2::new(GOAL.x - position.x, GOAL.z - position.z);
        let distance = to_goal.length();
        match self.last_distance {
            Some(last) if last - distance < 0.01 => self.stalled_frames += 1,
            _ => self.stalled_frames = 0,
        }
        self.last_distance = Some(distance);

        // turn() subtracts delta * sensitivity from yaw
        let desired_yaw = to_goal.x.atan2(to_goal.y);
        let turn = normalize_angle(state.look.yaw - desired_yaw);
        let look_delta = Vec2::new(turn / tuning.mouse_sensitivity, 0.0);

        let grounded = can_jump(velocity.y, position.y, tuning);
        let ceiling = hop_ceiling(tuning);
        let heading = (GOAL.x - position.x).signum();
        let (mut forward, mut back, mut hop) = (true, false, false);

        if let Some(level) = state.live_level() {
            if grounded {
                hop = HAZARD_HORIZON.iter().any(|&lead| {
                    lane_hazards(level, position.z, state.time + lead, tuning)
                        .filter(|(half, at)| at.y + half.y < ceiling)
                        .any(|(half, at)| distance_to(position.x, danger_zone(half, at, tuning)) <= HOP_DISTANCE)
                });

                // Walls too tall to hop: nearest gap ahead, toward the goal
                let wall_gap = lane_hazards(level, position.z, state.time, tuning)
                    .filter(|(half, at)| at.y + half.y >= ceiling)
                    .filter_map(|(half, at)| {
                        let (lo, hi) = danger_zone(half, at, tuning);
                        let gap = if heading < 0.0 { position.x - hi } else { lo - position.x };
                        (gap >= 0.0).then_some(gap)
                    })
                    .fold(f32::INFINITY, f32::min);
                if wall_gap < WALL_RETREAT {
                    forward = false;
                    back = true;
                } else if wall_gap < WALL_STOP {
                    forward = false;
                }
            } else {
                // Brake if the current arc would come down on a hazard
                let airtime = time_to_land(position.y, velocity.y, tuning);
                let landing_x = position.x + velocity.x * airtime;
                let landing_time = state.time + airtime as f64;
                let unsafe_landing = lane_hazards(level, position.z, landing_time, tuning)
                    .any(|(half, at)| distance_to(landing_x, danger_zone(half, at, tuning)) == 0.0);
                if unsafe_landing {
                    forward = false;
                    back = true;
                }
            }
        }

        let stuck = self.stalled_frames >= STALL_FRAMES;
        let teleport = if self.stalled_frames >= CHAIN_FRAMES {
            let ready = state.teleport.is_ready(state.time, tuning.teleport_cooldown);
            let apex = velocity.y.abs() < 0.5 && position.y > tuning.ground_height + 0.5;
            let launching = velocity.y > 0.75 * tuning.jump_impulse;
            ready && if state.teleport.is_marked() { launching } else { apex }
        } else {
            false
        };

        TickInput {
            forward,
            back,
            jump: stuck || hop,
            teleport,
            look_delta,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::tick;

    #[test]
    fn test_confirms_title() {
        let state = GameState::new(Tuning::default());
        let input = Autopilot::new().next_input(&state);
        assert!(input.confirm);
        assert!(!input.forward);
    }

    #[test]
    fn test_restarts_after_game_over() {
        let mut state = GameState::starting_at(Tuning::default(), LevelId::Stage(2));
        tick(&mut state, &TickInput::default());
        state.place_player(glam::Vec3::new(3.0, 1.5, 0.0));
        for _ in 0..3 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.is_game_over());
        assert!(Autopilot::new().next_input(&state).restart);
    }

    #[test]
    fn test_turns_to_face_goal() {
        let mut state = GameState::starting_at(Tuning::default(), LevelId::Stage(1));
        tick(&mut state, &TickInput::default());

        let input = Autopilot::new().next_input(&state);
        assert!(input.forward);
        let tuning = state.tuning.clone();
        state.look.turn(input.look_delta, tuning.mouse_sensitivity, tuning.pitch_limit);

        // Spawn and goal share z, so the goal is straight down -x
        let direction = state.look.direction();
        assert!(direction.x < -0.99);
    }

    #[test]
    fn test_hops_when_no_progress() {
        let mut state = GameState::starting_at(Tuning::default(), LevelId::Stage(1));
        tick(&mut state, &TickInput::default());
        let mut pilot = Autopilot::new();

        // Same state every call: the distance never shrinks
        let mut input = pilot.next_input(&state);
        for _ in 0..STALL_FRAMES {
            assert!(!input.jump);
            input = pilot.next_input(&state);
        }
        assert_eq!(pilot.stalled_frames(), STALL_FRAMES);
        assert!(input.jump);
        assert!(!input.teleport);
    }

    #[test]
    fn test_walks_from_title_into_stage_one() {
        let mut state = GameState::new(Tuning::default());
        let mut pilot = Autopilot::new();
        for _ in 0..60 {
            let input = pilot.next_input(&state);
            tick(&mut state, &input);
        }
        assert_eq!(state.level(), LevelId::Stage(1));
        let position = state.player_position().expect("player");
        assert!(position.x < 9.0);
    }

    #[test]
    fn test_hops_both_floor_strips() {
        let mut state = GameState::starting_at(Tuning::default(), LevelId::Stage(2));
        let mut pilot = Autopilot::new();
        let mut overs = 0;
        for _ in 0..900 {
            let input = pilot.next_input(&state);
            tick(&mut state, &input);
            overs += state
                .drain_events()
                .into_iter()
                .filter(|e| *e == crate::sim::GameEvent::GameOver)
                .count();
            if state.level() != LevelId::Stage(2) {
                break;
            }
        }
        assert_eq!(overs, 0);
        assert_eq!(state.level(), LevelId::Stage(3));
    }

    #[test]
    fn test_brakes_when_landing_on_a_strip() {
        let mut state = GameState::starting_at(Tuning::default(), LevelId::Stage(2));
        tick(&mut state, &TickInput::default());
        // Mid-air over the gap, drifting toward the far strip
        state.place_player(glam::Vec3::new(0.0, 3.0, -3.5));
        let body = state.player().and_then(|p| p.body()).expect("player body");
        state.world.set_linvel(body, glam::Vec3::new(-3.0, 2.0, 0.0));

        let input = Autopilot::new().next_input(&state);
        assert!(input.back);
        assert!(!input.forward);
    }

    #[test]
    fn test_hop_ceiling_matches_jump_rise() {
        let tuning = Tuning::default();
        // 8² / (2 · 9.81) above the resting bottom of the cube
        assert!((hop_ceiling(&tuning) - (1.0 + 64.0 / 19.62)).abs() < 1e-4);
        assert!(time_to_land(tuning.ground_height, tuning.jump_impulse, &tuning) > 1.5);
    }
}
