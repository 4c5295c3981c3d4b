//! Level identity and the live level descriptor
//!
//! [`init_level`] populates the scene and world and hands back a [`LiveLevel`]
//! that owns every block it created. [`LiveLevel::dispose`] consumes it, so a
//! level can only be torn down once and a second init always goes through the
//! owner dropping the previous descriptor first.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::block::{Block, BlockDesc, BlockKind};
use super::levels;
use super::physics::PhysicsWorld;
use crate::consts::{ENDING_INDEX, STAGE_COUNT};
use crate::error::{Error, Result};
use crate::scene::Scene;

/// Which screen or stage is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelId {
    Title,
    /// Playable stage, 1-based
    Stage(u8),
    Ending,
}

impl LevelId {
    /// 0 = title, 1..=5 = stages, 6 = ending
    pub fn from_index(index: u8) -> Result<Self> {
        match index {
            0 => Ok(LevelId::Title),
            i if i <= STAGE_COUNT => Ok(LevelId::Stage(i)),
            i if i == ENDING_INDEX => Ok(LevelId::Ending),
            i => Err(Error::UnknownLevel(i)),
        }
    }

    pub fn index(self) -> u8 {
        match self {
            LevelId::Title => 0,
            LevelId::Stage(n) => n,
            LevelId::Ending => ENDING_INDEX,
        }
    }

    /// Level loaded after this one is cleared
    pub fn next(self) -> LevelId {
        match self {
            LevelId::Title => LevelId::Stage(1),
            LevelId::Stage(n) if n < STAGE_COUNT => LevelId::Stage(n + 1),
            LevelId::Stage(_) | LevelId::Ending => LevelId::Ending,
        }
    }

    /// Stages have a player, a goal and hazards; title and ending do not
    pub fn is_playable(self) -> bool {
        matches!(self, LevelId::Stage(_))
    }

    /// Every level in play order
    pub fn all() -> impl Iterator<Item = LevelId> {
        (0..=ENDING_INDEX).filter_map(|i| LevelId::from_index(i).ok())
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelId::Title => write!(f, "title"),
            LevelId::Stage(n) => write!(f, "stage {n}"),
            LevelId::Ending => write!(f, "ending"),
        }
    }
}

/// Sinusoidal slide along x: `x = center + amplitude * sin(angular_speed * t)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardMotion {
    pub center: f32,
    pub amplitude: f32,
    pub angular_speed: f32,
}

impl HazardMotion {
    pub fn along_x(amplitude: f32, angular_speed: f32) -> Self {
        Self {
            center: 0.0,
            amplitude,
            angular_speed,
        }
    }

    /// X coordinate `t` seconds after the level loaded
    pub fn coordinate(&self, t: f32) -> f32 {
        self.center + self.amplitude * (self.angular_speed * t).sin()
    }

    /// `base` with its x replaced
    pub fn apply(&self, base: Vec3, t: f32) -> Vec3 {
        Vec3::new(self.coordinate(t), base.y, base.z)
    }
}

/// A loaded level: owns its blocks until disposed
#[derive(Debug)]
pub struct LiveLevel {
    id: LevelId,
    banner: Option<&'static str>,
    blocks: Vec<Block>,
    spawn: Option<Vec3>,
    goal: Option<usize>,
    hazards: Vec<usize>,
    motions: Vec<(usize, HazardMotion)>,
    loaded_at: f64,
}

impl LiveLevel {
    pub fn id(&self) -> LevelId {
        self.id
    }

    /// Stage name shown above the play area
    pub fn banner(&self) -> Option<&'static str> {
        self.banner
    }

    pub fn spawn(&self) -> Option<Vec3> {
        self.spawn
    }

    pub fn goal(&self) -> Option<&Block> {
        self.goal.map(|i| &self.blocks[i])
    }

    /// Hazards in the order the level declared them
    pub fn hazards(&self) -> impl Iterator<Item = &Block> {
        self.hazards.iter().map(|&i| &self.blocks[i])
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Clock time at which this level was loaded
    pub fn loaded_at(&self) -> f64 {
        self.loaded_at
    }

    /// Each hazard with the position it has (or will have) at clock time `now`
    pub fn hazards_at(&self, now: f64) -> impl Iterator<Item = (&Block, Vec3)> {
        let t = (now - self.loaded_at) as f32;
        self.hazards.iter().map(move |&i| {
            let block = &self.blocks[i];
            let position = self
                .motions
                .iter()
                .find(|(index, _)| *index == i)
                .map_or(block.position(), |(_, motion)| motion.apply(block.position(), t));
            (block, position)
        })
    }

    /// Move every animated hazard to its position at clock time `now`
    pub fn animate(&mut self, scene: &mut Scene, world: &mut PhysicsWorld, now: f64) {
        let t = (now - self.loaded_at) as f32;
        for &(index, motion) in &self.motions {
            let block = &mut self.blocks[index];
            let position = motion.apply(block.position(), t);
            block.set_position(scene, world, position);
        }
    }

    /// Release every block this level created
    pub fn dispose(mut self, scene: &mut Scene, world: &mut PhysicsWorld) {
        for block in &mut self.blocks {
            block.dispose(scene, world);
        }
        log::debug!("Disposed {} ({} blocks)", self.id, self.blocks.len());
    }
}

/// Collects blocks and markers while a level layout is built
pub struct LevelBuilder<'a> {
    scene: &'a mut Scene,
    world: &'a mut PhysicsWorld,
    level: LiveLevel,
}

impl<'a> LevelBuilder<'a> {
    fn new(id: LevelId, scene: &'a mut Scene, world: &'a mut PhysicsWorld, now: f64) -> Self {
        Self {
            scene,
            world,
            level: LiveLevel {
                id,
                banner: None,
                blocks: Vec::new(),
                spawn: None,
                goal: None,
                hazards: Vec::new(),
                motions: Vec::new(),
                loaded_at: now,
            },
        }
    }

    fn add(&mut self, kind: BlockKind, desc: &BlockDesc) -> usize {
        let block = Block::spawn(self.scene, self.world, kind, desc);
        self.level.blocks.push(block);
        self.level.blocks.len() - 1
    }

    /// Drawn-only prop
    pub fn scenery(&mut self, desc: BlockDesc) -> usize {
        self.add(BlockKind::RenderOnly, &desc)
    }

    /// Fixed collidable geometry
    pub fn solid(&mut self, desc: BlockDesc) -> usize {
        self.add(BlockKind::Static, &desc)
    }

    /// Gravity-affected prop
    pub fn loose(&mut self, desc: BlockDesc) -> usize {
        self.add(BlockKind::Dynamic, &desc)
    }

    /// Goal marker (always a sensor)
    pub fn goal(&mut self, desc: BlockDesc) -> usize {
        let index = self.add(BlockKind::Static, &desc.sensor());
        self.level.goal = Some(index);
        index
    }

    /// Hazard that ends the run on contact (always a sensor)
    pub fn hazard(&mut self, desc: BlockDesc) -> usize {
        let index = self.add(BlockKind::Static, &desc.sensor());
        self.level.hazards.push(index);
        index
    }

    /// Hazard that slides every frame
    pub fn moving_hazard(&mut self, desc: BlockDesc, motion: HazardMotion) -> usize {
        let index = self.hazard(desc);
        self.level.motions.push((index, motion));
        index
    }

    pub fn spawn_at(&mut self, position: Vec3) {
        self.level.spawn = Some(position);
    }

    pub fn banner(&mut self, text: &'static str) {
        self.level.banner = Some(text);
    }

    fn finish(self) -> LiveLevel {
        self.level
    }
}

/// Build a level's content into the scene and world
pub fn init_level(id: LevelId, scene: &mut Scene, world: &mut PhysicsWorld, now: f64) -> LiveLevel {
    let mut builder = LevelBuilder::new(id, scene, world, now);
    levels::build(id, &mut builder);
    let level = builder.finish();
    log::debug!("Initialized {} ({} blocks)", id, level.blocks.len());
    level
}
