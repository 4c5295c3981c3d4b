//! Game state and level orchestration
//!
//! One struct holds everything the frame loop touches: the scene, the physics
//! world, the live level, the player and the one-shot latches. Host callbacks
//! and the frame tick all run on one thread and mutate it in turn.

use glam::{Vec2, Vec3};

use super::block::Block;
use super::level::{LevelId, LiveLevel, init_level};
use super::physics::PhysicsWorld;
use super::teleport::{Teleport, TeleportAction};
use crate::consts::{EXILE_POSITION, TIME_EPSILON};
use crate::scene::Scene;
use crate::tuning::Tuning;
use crate::{look_direction, normalize_angle};

/// Something observable that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    LevelLoaded(LevelId),
    /// Player touched the goal; the next level loads shortly after
    LevelCleared(LevelId),
    TeleportMarked(Vec3),
    Teleported { from: Vec3, to: Vec3 },
    Jumped,
    /// Player touched a hazard
    GameOver,
    Restarted(LevelId),
}

/// Work deferred to a later tick. Fire-and-forget: never cancelled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deferred {
    LoadLevel(LevelId),
    /// Put the player on `spawn` with zero velocity
    ResetPlayer(Vec3),
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due: f64,
    action: Deferred,
}

/// First-person look angles
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Look {
    pub yaw: f32,
    pub pitch: f32,
}

impl Look {
    /// Apply a pointer delta (pixels)
    pub fn turn(&mut self, delta: Vec2, sensitivity: f32, pitch_limit: f32) {
        self.yaw = normalize_angle(self.yaw - delta.x * sensitivity);
        self.pitch = (self.pitch - delta.y * sensitivity).clamp(-pitch_limit, pitch_limit);
    }

    pub fn direction(&self) -> Vec3 {
        look_direction(self.yaw, self.pitch)
    }
}

/// Camera placement for the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 5.0, 10.0),
            target: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

/// Complete game state
pub struct GameState {
    pub tuning: Tuning,
    pub scene: Scene,
    pub world: PhysicsWorld,
    level: LevelId,
    live: Option<LiveLevel>,
    player: Option<Block>,
    /// Goal touched; blocks further clears until the next load
    level_clear: bool,
    /// Hazard touched; only restart is accepted until cleared
    game_over: bool,
    /// The game-over consequences have been applied for this life
    game_over_handled: bool,
    pub teleport: Teleport,
    pub look: Look,
    pub camera: CameraPose,
    /// Seconds since the game started
    pub time: f64,
    pub time_ticks: u64,
    scheduled: Vec<Scheduled>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create the world and load the title screen
    pub fn new(tuning: Tuning) -> Self {
        Self::starting_at(tuning, LevelId::Title)
    }

    /// Create the world and load `level` directly
    pub fn starting_at(tuning: Tuning, level: LevelId) -> Self {
        let world = PhysicsWorld::new(tuning.gravity, tuning.physics_dt);
        let mut state = Self {
            tuning,
            scene: Scene::new(),
            world,
            level,
            live: None,
            player: None,
            level_clear: false,
            game_over: false,
            game_over_handled: false,
            teleport: Teleport::new(),
            look: Look::default(),
            camera: CameraPose::default(),
            time: 0.0,
            time_ticks: 0,
            scheduled: Vec::new(),
            events: Vec::new(),
        };
        state.load_level(level);
        state
    }

    pub fn level(&self) -> LevelId {
        self.level
    }

    pub fn live_level(&self) -> Option<&LiveLevel> {
        self.live.as_ref()
    }

    pub fn player(&self) -> Option<&Block> {
        self.player.as_ref()
    }

    pub fn player_position(&self) -> Option<Vec3> {
        self.player
            .as_ref()
            .and_then(|p| p.body())
            .and_then(|b| self.world.translation(b))
    }

    pub fn player_velocity(&self) -> Option<Vec3> {
        self.player
            .as_ref()
            .and_then(|p| p.body())
            .and_then(|b| self.world.linvel(b))
    }

    pub fn is_level_clear(&self) -> bool {
        self.level_clear
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Events emitted since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of deferred actions still waiting
    pub fn pending_actions(&self) -> usize {
        self.scheduled.len()
    }

    /// Tear down the current level and build `id` in its place.
    ///
    /// On stages the player is created once and afterwards only repositioned.
    /// The reset to spawn runs after the respawn delay.
    pub fn load_level(&mut self, id: LevelId) {
        if let Some(previous) = self.live.take() {
            previous.dispose(&mut self.scene, &mut self.world);
        }

        self.level = id;
        let level = init_level(id, &mut self.scene, &mut self.world, self.time);

        if let Some(spawn) = level.spawn().filter(|_| id.is_playable()) {
            if self.player.is_none() {
                self.player = Some(Block::player(
                    &mut self.scene,
                    &mut self.world,
                    spawn,
                    self.tuning.player_half_extent,
                ));
                log::debug!("Player created at {spawn}");
            }
            self.schedule(self.tuning.respawn_delay, Deferred::ResetPlayer(spawn));
        }

        self.live = Some(level);
        self.level_clear = false;
        self.events.push(GameEvent::LevelLoaded(id));
        log::info!("Loaded {id}");
    }

    /// Reload the current level and clear game-over and teleport state.
    ///
    /// From the ending this loads the title and then reloads the current
    /// level, which by then is the title again, so the title is built twice.
    pub fn restart(&mut self) {
        self.game_over = false;
        self.game_over_handled = false;
        self.teleport.clear(&mut self.scene);
        self.events.push(GameEvent::Restarted(self.level));
        log::info!("Restarting {}", self.level);

        if self.level == LevelId::Ending {
            self.load_level(LevelId::Title);
            log::warn!("Restart from ending reloads the title twice");
        }
        self.load_level(self.level);
    }

    /// Queue `action` to run `delay` seconds from now
    pub fn schedule(&mut self, delay: f64, action: Deferred) {
        self.scheduled.push(Scheduled {
            due: self.time + delay,
            action,
        });
    }

    /// Run every deferred action that has come due, in scheduling order.
    ///
    /// Zero-delay actions queued by a load run in the same pass, so the player
    /// is back on the spawn point before the next physics step.
    pub fn run_due_actions(&mut self) {
        let now = self.time;
        loop {
            let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.scheduled)
                .into_iter()
                .partition(|s| s.due <= now + TIME_EPSILON);
            self.scheduled = pending;
            if due.is_empty() {
                break;
            }

            for scheduled in due {
                match scheduled.action {
                    Deferred::LoadLevel(id) => self.load_level(id),
                    Deferred::ResetPlayer(spawn) => self.reset_player(spawn),
                }
            }
        }
    }

    fn reset_player(&mut self, spawn: Vec3) {
        if let Some(player) = self.player.as_mut() {
            player.set_position(&mut self.scene, &mut self.world, spawn);
            if let Some(body) = player.body() {
                self.world.set_linvel(body, Vec3::ZERO);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn place_player(&mut self, position: Vec3) {
        self.reset_player(position);
    }

    /// Handle one press of the teleport key
    pub fn activate_teleport(&mut self) -> Option<TeleportAction> {
        let Some(body) = self.player.as_ref().and_then(|p| p.body()) else {
            log::warn!("Teleport pressed with no player");
            return None;
        };
        let action = self.teleport.activate(
            self.time,
            self.tuning.teleport_cooldown,
            &mut self.scene,
            &mut self.world,
            body,
        )?;
        self.events.push(match action {
            TeleportAction::Marked(at) => GameEvent::TeleportMarked(at),
            TeleportAction::Executed { from, to } => GameEvent::Teleported { from, to },
        });
        Some(action)
    }

    /// Slide moving hazards to their position for the current time
    pub fn animate_hazards(&mut self) {
        if let Some(level) = self.live.as_mut() {
            level.animate(&mut self.scene, &mut self.world, self.time);
        }
    }

    /// Latch a level clear when the player overlaps the goal
    pub fn poll_goal(&mut self) {
        if self.level_clear {
            return;
        }
        let Some(player) = self.player.as_ref().and_then(|p| p.collider()) else {
            return;
        };
        let Some(goal) = self
            .live
            .as_ref()
            .and_then(|l| l.goal())
            .and_then(|g| g.collider())
        else {
            return;
        };

        if self.world.intersecting(goal, player) {
            self.level_clear = true;
            self.events.push(GameEvent::LevelCleared(self.level));
            log::info!("{} cleared", self.level);
            self.schedule(
                self.tuning.level_clear_delay,
                Deferred::LoadLevel(self.level.next()),
            );
        }
    }

    /// Latch game over when the player overlaps any hazard
    pub fn poll_hazards(&mut self) {
        if self.game_over {
            return;
        }
        let Some(player) = self.player.as_ref().and_then(|p| p.collider()) else {
            return;
        };
        let Some(level) = self.live.as_ref() else {
            return;
        };

        let hit = level
            .hazards()
            .filter_map(|h| h.collider())
            .any(|hazard| self.world.intersecting(hazard, player));
        if hit {
            self.game_over = true;
        }
    }

    /// Apply the consequences of a game over, once per life
    pub fn handle_game_over(&mut self) {
        if !self.game_over || self.game_over_handled {
            return;
        }
        self.game_over_handled = true;

        if let Some(player) = self.player.as_mut() {
            player.set_position(&mut self.scene, &mut self.world, EXILE_POSITION);
            if let Some(body) = player.body() {
                self.world.set_linvel(body, Vec3::ZERO);
            }
        }
        self.teleport.clear(&mut self.scene);
        self.events.push(GameEvent::GameOver);
        log::info!("Game over on {}", self.level);
    }

    /// Copy the simulated player position to its mesh and place the camera
    pub fn sync_player(&mut self) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        player.sync_with_physics(&mut self.scene, &self.world);

        let eye = player.position() + Vec3::Y * self.tuning.camera_eye_offset;
        self.camera = CameraPose {
            eye,
            target: eye + self.look.direction(),
        };
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::levels::SPAWN;

    fn stage(n: u8) -> GameState {
        GameState::starting_at(Tuning::default(), LevelId::Stage(n))
    }

    #[test]
    fn test_new_game_starts_on_title_without_player() {
        let state = GameState::new(Tuning::default());
        assert_eq!(state.level(), LevelId::Title);
        assert!(state.player().is_none());
        assert_eq!(state.events(), &[GameEvent::LevelLoaded(LevelId::Title)]);
    }

    #[test]
    fn test_player_created_once_and_reused() {
        let mut state = stage(1);
        let body = state.player().and_then(|p| p.body()).expect("player body");
        let meshes = state.scene.len();

        state.load_level(LevelId::Stage(2));
        assert_eq!(state.player().and_then(|p| p.body()), Some(body));
        assert_eq!(state.live_level().map(|l| l.id()), Some(LevelId::Stage(2)));
        // Stage 2 swaps the ridge for two strips
        assert_eq!(state.scene.len(), meshes + 1);
    }

    #[test]
    fn test_only_one_level_live_across_loads() {
        let mut state = stage(1);
        let bodies_on_stage_one = state.world.body_count();
        state.load_level(LevelId::Stage(1));
        state.load_level(LevelId::Stage(1));
        assert_eq!(state.world.body_count(), bodies_on_stage_one);
    }

    #[test]
    fn test_reset_player_is_deferred() {
        let mut state = stage(1);
        state.place_player(Vec3::new(0.0, 8.0, 0.0));
        state.load_level(LevelId::Stage(1));
        assert_eq!(state.player_position(), Some(Vec3::new(0.0, 8.0, 0.0)));
        assert_eq!(state.pending_actions(), 2);

        state.run_due_actions();
        assert_eq!(state.player_position(), Some(SPAWN));
        assert_eq!(state.player_velocity(), Some(Vec3::ZERO));
        assert_eq!(state.pending_actions(), 0);
    }

    #[test]
    fn test_scheduled_load_waits_for_its_time() {
        let mut state = stage(1);
        state.run_due_actions();
        state.schedule(0.05, Deferred::LoadLevel(LevelId::Stage(2)));

        state.run_due_actions();
        assert_eq!(state.level(), LevelId::Stage(1));

        state.time += 0.05;
        state.run_due_actions();
        assert_eq!(state.level(), LevelId::Stage(2));
    }

    #[test]
    fn test_reset_queued_by_due_load_runs_in_same_pass() {
        let mut state = stage(1);
        state.run_due_actions();
        state.place_player(Vec3::new(-9.0, 1.5, -3.5));
        state.schedule(0.0, Deferred::LoadLevel(LevelId::Stage(2)));

        state.run_due_actions();
        assert_eq!(state.level(), LevelId::Stage(2));
        assert_eq!(state.player_position(), Some(SPAWN));
        assert_eq!(state.pending_actions(), 0);
    }

    #[test]
    fn test_restart_from_ending_loads_title_twice() {
        let mut state = GameState::starting_at(Tuning::default(), LevelId::Ending);
        state.drain_events();

        state.restart();
        assert_eq!(state.level(), LevelId::Title);
        let loads: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LevelLoaded(_)))
            .collect();
        assert_eq!(
            loads,
            vec![
                GameEvent::LevelLoaded(LevelId::Title),
                GameEvent::LevelLoaded(LevelId::Title)
            ]
        );
        // The first title was disposed before the second was built
        assert_eq!(state.scene.len(), 1);
    }

    #[test]
    fn test_teleport_without_player_is_ignored() {
        let mut state = GameState::new(Tuning::default());
        assert_eq!(state.activate_teleport(), None);
        assert!(state.teleport.last_activation().is_none());
    }

    #[test]
    fn test_handle_game_over_exiles_player_once() {
        let mut state = stage(2);
        state.run_due_actions();
        state.teleport.mark(&mut state.scene, Vec3::ONE);
        state.drain_events();

        state.game_over = true;
        state.handle_game_over();
        state.handle_game_over();

        assert_eq!(state.player_position(), Some(EXILE_POSITION));
        assert!(!state.teleport.is_marked());
        assert_eq!(state.drain_events(), vec![GameEvent::GameOver]);
    }

    #[test]
    fn test_look_clamps_pitch() {
        let mut look = Look::default();
        look.turn(Vec2::new(0.0, -10_000.0), 0.002, std::f32::consts::FRAC_PI_2);
        assert!((look.pitch - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        look.turn(Vec2::new(100.0, 0.0), 0.002, std::f32::consts::FRAC_PI_2);
        assert!((look.yaw + 0.2).abs() < 1e-6);
    }
}
