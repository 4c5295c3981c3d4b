//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Fixed timestep only
//! - Deferred work runs on the simulation clock, never wall time
//! - Stable iteration order (blocks in the order a level declares them)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod block;
pub mod level;
mod levels;
pub mod physics;
pub mod state;
pub mod teleport;
pub mod tick;

pub use autopilot::Autopilot;
pub use block::{Block, BlockDesc, BlockKind};
pub use level::{HazardMotion, LevelBuilder, LevelId, LiveLevel, init_level};
pub use levels::{GOAL, SPAWN};
pub use physics::{BodyDesc, Motion, PhysicsWorld, Surface};
pub use state::{CameraPose, Deferred, GameEvent, GameState, Look};
pub use teleport::{Teleport, TeleportAction};
pub use tick::{TickInput, can_jump, steer_velocity, tick};
