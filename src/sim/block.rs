//! Blocks: one mesh plus an optional rigid body and collider
//!
//! A single record tagged with its [`BlockKind`] covers render-only props,
//! fixed collidable geometry and gravity-affected boxes. Construction fully
//! initializes both the render and physics side; [`Block::dispose`] releases
//! them and may be called any number of times.

use glam::Vec3;

use super::physics::{BodyDesc, ColliderHandle, Motion, PhysicsWorld, RigidBodyHandle, Surface};
use crate::scene::{Material, MeshId, Scene, Shape, TextureSet};

/// What a block takes part in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Drawn only
    RenderOnly,
    /// Fixed body, collidable, never moved by the solver
    Static,
    /// Dynamic body affected by gravity
    Dynamic,
}

impl BlockKind {
    fn motion(self) -> Option<Motion> {
        match self {
            BlockKind::RenderOnly => None,
            BlockKind::Static => Some(Motion::Fixed),
            BlockKind::Dynamic => Some(Motion::Dynamic),
        }
    }
}

/// Placement, size, look and contact material of a block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDesc {
    pub shape: Shape,
    pub position: Vec3,
    pub material: Material,
    pub surface: Surface,
    /// Overlap-only collider (spawn, goal and hazard markers)
    pub sensor: bool,
}

impl BlockDesc {
    /// Box of the given size and colour centred at (x, y, z)
    pub fn cuboid(width: f32, height: f32, depth: f32, color: u32, x: f32, y: f32, z: f32) -> Self {
        Self {
            shape: Shape::cuboid(width, height, depth),
            position: Vec3::new(x, y, z),
            material: Material::color(color),
            surface: Surface::default(),
            sensor: false,
        }
    }

    pub fn sphere(radius: f32, color: u32, position: Vec3) -> Self {
        Self {
            shape: Shape::Sphere { radius },
            position,
            material: Material::color(color),
            surface: Surface::default(),
            sensor: false,
        }
    }

    pub fn sensor(mut self) -> Self {
        self.sensor = true;
        self
    }

    pub fn textured(mut self, texture: TextureSet) -> Self {
        self.material.texture = Some(texture);
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.material.opacity = opacity;
        self
    }

    pub fn back_face(mut self) -> Self {
        self.material.back_face = true;
        self
    }

    pub fn surface(mut self, surface: Surface) -> Self {
        self.surface = surface;
        self
    }
}

/// A live block. Handles are `None` once released (or never created).
#[derive(Debug)]
pub struct Block {
    kind: BlockKind,
    shape: Shape,
    position: Vec3,
    mesh: Option<MeshId>,
    body: Option<RigidBodyHandle>,
    collider: Option<ColliderHandle>,
}

impl Block {
    /// Create a block in both the scene and (unless render-only) the world
    pub fn spawn(scene: &mut Scene, world: &mut PhysicsWorld, kind: BlockKind, desc: &BlockDesc) -> Self {
        Self::spawn_with(scene, world, kind, desc, |_| {})
    }

    /// The player: a rotation-locked dynamic cube that never sleeps
    pub fn player(scene: &mut Scene, world: &mut PhysicsWorld, position: Vec3, half_extent: f32) -> Self {
        let side = half_extent * 2.0;
        let desc = BlockDesc::cuboid(side, side, side, 0x00ff00, position.x, position.y, position.z);
        Self::spawn_with(scene, world, BlockKind::Dynamic, &desc, |body| {
            body.lock_rotations = true;
            body.keep_awake = true;
        })
    }

    fn spawn_with(
        scene: &mut Scene,
        world: &mut PhysicsWorld,
        kind: BlockKind,
        desc: &BlockDesc,
        configure: impl FnOnce(&mut BodyDesc),
    ) -> Self {
        let mesh = scene.add(desc.shape, desc.position, desc.material.clone());

        let (body, collider) = match kind.motion() {
            Some(motion) => {
                let mut body = BodyDesc::new(motion, desc.position, desc.shape);
                body.surface = desc.surface;
                body.sensor = desc.sensor;
                configure(&mut body);
                let (b, c) = world.insert(&body);
                (Some(b), Some(c))
            }
            None => (None, None),
        };

        Self {
            kind,
            shape: desc.shape,
            position: desc.position,
            mesh: Some(mesh),
            body,
            collider,
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn mesh(&self) -> Option<MeshId> {
        self.mesh
    }

    pub fn body(&self) -> Option<RigidBodyHandle> {
        self.body
    }

    pub fn collider(&self) -> Option<ColliderHandle> {
        self.collider
    }

    /// Last position written to the mesh
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn half_extents(&self) -> Vec3 {
        self.shape.half_extents()
    }

    /// Move mesh and body together
    pub fn set_position(&mut self, scene: &mut Scene, world: &mut PhysicsWorld, position: Vec3) {
        self.position = position;
        if let Some(mesh) = self.mesh {
            scene.set_position(mesh, position);
        }
        if let Some(body) = self.body {
            world.set_translation(body, position);
        }
    }

    /// Copy the body's simulated position onto the mesh
    pub fn sync_with_physics(&mut self, scene: &mut Scene, world: &PhysicsWorld) {
        let Some(position) = self.body.and_then(|b| world.translation(b)) else {
            return;
        };
        self.position = position;
        if let Some(mesh) = self.mesh {
            scene.set_position(mesh, position);
        }
    }

    /// Release mesh, body and collider. Safe to repeat.
    pub fn dispose(&mut self, scene: &mut Scene, world: &mut PhysicsWorld) {
        if let Some(mesh) = self.mesh.take() {
            scene.remove(mesh);
        }
        // Removing the body also removes its attached collider
        if let Some(body) = self.body.take() {
            world.remove_body(body);
        }
        if let Some(collider) = self.collider.take() {
            world.remove_collider(collider);
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.mesh.is_none() && self.body.is_none() && self.collider.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(-9.81, 1.0 / 60.0)
    }

    #[test]
    fn test_render_only_has_no_physics() {
        let mut scene = Scene::new();
        let mut world = world();
        let desc = BlockDesc::cuboid(5.0, 5.0, 5.0, 0x3366ff, 0.0, 3.0, -10.0).opacity(0.7);
        let block = Block::spawn(&mut scene, &mut world, BlockKind::RenderOnly, &desc);

        assert!(block.mesh().is_some());
        assert!(block.body().is_none());
        assert!(block.collider().is_none());
        assert_eq!(scene.len(), 1);
        assert_eq!(world.body_count(), 0);
        assert!(scene.iter().all(|m| m.material.is_transparent()));
    }

    #[test]
    fn test_static_block_dispose_releases_everything_once() {
        let mut scene = Scene::new();
        let mut world = world();
        let desc = BlockDesc::cuboid(1.0, 0.5, 1.0, 0xffffff, -9.0, 1.0, -3.5).sensor();
        let mut block = Block::spawn(&mut scene, &mut world, BlockKind::Static, &desc);
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.collider_count(), 1);

        block.dispose(&mut scene, &mut world);
        assert!(block.is_disposed());
        assert!(scene.is_empty());
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);

        // Second call is a no-op
        block.dispose(&mut scene, &mut world);
        assert!(block.is_disposed());
    }

    #[test]
    fn test_dispose_leaves_other_blocks_alone() {
        let mut scene = Scene::new();
        let mut world = world();
        let a = BlockDesc::cuboid(1.0, 1.0, 1.0, 0, 0.0, 0.0, 0.0);
        let b = BlockDesc::cuboid(1.0, 1.0, 1.0, 0, 5.0, 0.0, 0.0);
        let mut first = Block::spawn(&mut scene, &mut world, BlockKind::Static, &a);
        let second = Block::spawn(&mut scene, &mut world, BlockKind::Static, &b);

        first.dispose(&mut scene, &mut world);
        assert_eq!(scene.len(), 1);
        assert_eq!(world.body_count(), 1);
        assert!(scene.get(second.mesh().expect("mesh")).is_some());
    }

    #[test]
    fn test_set_position_moves_mesh_and_body() {
        let mut scene = Scene::new();
        let mut world = world();
        let desc = BlockDesc::cuboid(1.0, 1.0, 30.0, 0xff0000, 5.0, 1.0, -3.5).sensor();
        let mut block = Block::spawn(&mut scene, &mut world, BlockKind::Static, &desc);

        let target = Vec3::new(-2.0, 1.0, -3.5);
        block.set_position(&mut scene, &mut world, target);
        assert_eq!(block.position(), target);
        assert_eq!(scene.get(block.mesh().expect("mesh")).map(|m| m.position), Some(target));
        assert_eq!(world.translation(block.body().expect("body")), Some(target));
    }

    #[test]
    fn test_dynamic_block_falls_and_syncs_mesh() {
        let mut scene = Scene::new();
        let mut world = world();
        let desc = BlockDesc::cuboid(1.0, 1.0, 1.0, 0x00ff00, 0.0, 5.0, 0.0);
        let mut block = Block::spawn(&mut scene, &mut world, BlockKind::Dynamic, &desc);
        for _ in 0..20 {
            world.step();
        }
        block.sync_with_physics(&mut scene, &world);
        assert!(block.position().y < 5.0);
        let mesh_y = scene.get(block.mesh().expect("mesh")).map(|m| m.position.y);
        assert_eq!(mesh_y, Some(block.position().y));
    }

    #[test]
    fn test_player_block_is_dynamic_cube() {
        let mut scene = Scene::new();
        let mut world = world();
        let player = Block::player(&mut scene, &mut world, Vec3::new(9.0, 3.0, -3.5), 0.5);
        assert_eq!(player.kind(), BlockKind::Dynamic);
        assert_eq!(player.half_extents(), Vec3::splat(0.5));
        assert_eq!(world.translation(player.body().expect("body")), Some(Vec3::new(9.0, 3.0, -3.5)));
    }
}
