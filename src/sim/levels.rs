//! Level layouts
//!
//! Every stage sits in the same walled 20×20 arena: spawn pad at +x, goal pad
//! at -x, something in between that needs a jump or a translocation to pass.

use glam::Vec3;

use super::block::BlockDesc;
use super::level::{HazardMotion, LevelBuilder, LevelId};
use crate::scene::TextureSet;

const GREY: u32 = 0x888888;
const PAD: u32 = 0xffffff;
const HAZARD: u32 = 0xff0000;

/// Player spawn for every stage (above the start pad so it never starts embedded)
pub const SPAWN: Vec3 = Vec3::new(9.0, 3.0, -3.5);
/// Centre of the goal pad
pub const GOAL: Vec3 = Vec3::new(-9.0, 1.0, -3.5);

pub(super) fn build(id: LevelId, b: &mut LevelBuilder<'_>) {
    match id {
        LevelId::Title => title(b),
        LevelId::Stage(1) => stage_one(b),
        LevelId::Stage(2) => stage_two(b),
        LevelId::Stage(3) => stage_three(b),
        LevelId::Stage(4) => stage_four(b),
        LevelId::Stage(_) => stage_five(b),
        LevelId::Ending => ending(b),
    }
}

fn title(b: &mut LevelBuilder<'_>) {
    b.scenery(BlockDesc::cuboid(5.0, 5.0, 5.0, 0x3366ff, 0.0, 3.0, -10.0).opacity(0.7));
}

fn ending(b: &mut LevelBuilder<'_>) {
    b.scenery(BlockDesc::sphere(30.0, 0x000000, Vec3::ZERO).back_face());
}

/// Floor, four walls, start pad, goal pad and spawn point
fn arena(b: &mut LevelBuilder<'_>) {
    b.solid(BlockDesc::cuboid(20.0, 1.0, 20.0, GREY, 0.0, 0.5, 0.0).textured(TextureSet::Wall));

    b.solid(BlockDesc::cuboid(20.0, 20.0, 1.0, GREY, 0.0, 10.0, -10.0).textured(TextureSet::Wall));
    b.solid(BlockDesc::cuboid(20.0, 20.0, 1.0, GREY, 0.0, 10.0, 10.0).textured(TextureSet::Wall));
    b.solid(BlockDesc::cuboid(1.0, 20.0, 20.0, GREY, -10.0, 10.0, 0.0).textured(TextureSet::Wall));
    b.solid(BlockDesc::cuboid(1.0, 20.0, 20.0, GREY, 10.0, 10.0, 0.0).textured(TextureSet::Wall));

    b.solid(BlockDesc::cuboid(1.0, 0.5, 1.0, PAD, SPAWN.x, 1.0, SPAWN.z).sensor().textured(TextureSet::Wall));
    b.goal(BlockDesc::cuboid(1.0, 0.5, 1.0, PAD, GOAL.x, GOAL.y, GOAL.z).textured(TextureSet::Wall));

    b.spawn_at(SPAWN);
}

/// A ridge taller than a single jump
fn stage_one(b: &mut LevelBuilder<'_>) {
    arena(b);
    b.solid(BlockDesc::cuboid(10.0, 5.0, 20.0, GREY, 0.0, 2.3, 0.0).textured(TextureSet::Ridge));
    b.banner("Level 1. Jump high!");
}

/// Two floor strips to hop over
fn stage_two(b: &mut LevelBuilder<'_>) {
    arena(b);
    b.hazard(BlockDesc::cuboid(2.0, 0.2, 19.0, HAZARD, 3.0, 1.1, 0.0).textured(TextureSet::HazardStrip));
    b.hazard(BlockDesc::cuboid(2.0, 0.2, 19.0, HAZARD, -4.0, 1.1, 0.0).textured(TextureSet::HazardStrip));
    b.banner("Level 2. Watch your step!");
}

/// Two bars sweeping across the floor in opposite directions
fn stage_three(b: &mut LevelBuilder<'_>) {
    arena(b);
    let bar = BlockDesc::cuboid(1.0, 1.0, 30.0, HAZARD, 5.0, 1.0, -3.5).textured(TextureSet::HazardBar);
    b.moving_hazard(bar.clone(), HazardMotion::along_x(7.0, 1.0));
    b.moving_hazard(bar, HazardMotion::along_x(-7.0, 1.0));
    b.banner("Level 3. It moves!");
}

/// A full-height wall sweeping back and forth between spawn and goal
fn stage_four(b: &mut LevelBuilder<'_>) {
    arena(b);
    b.moving_hazard(
        BlockDesc::cuboid(0.5, 20.0, 20.0, HAZARD, -10.0, 10.0, 0.0).textured(TextureSet::HazardWall),
        HazardMotion::along_x(-8.0, 0.5),
    );
    b.banner("Level 4. It's approaching!");
}

/// Ridge, a fast bar and the sweeping wall together
fn stage_five(b: &mut LevelBuilder<'_>) {
    arena(b);
    b.solid(BlockDesc::cuboid(4.0, 2.0, 20.0, GREY, 0.0, 2.0, 0.0).textured(TextureSet::Ridge));
    b.moving_hazard(
        BlockDesc::cuboid(1.0, 1.0, 30.0, HAZARD, 5.0, 1.0, -3.5).textured(TextureSet::HazardBar),
        HazardMotion::along_x(7.0, 1.5),
    );
    b.moving_hazard(
        BlockDesc::cuboid(0.5, 20.0, 20.0, HAZARD, -10.0, 10.0, 0.0).textured(TextureSet::HazardWall),
        HazardMotion::along_x(-8.0, 0.5),
    );
    b.banner("Level 5. Everything at once!");
}
