//! Rigid-body physics world
//!
//! Owns every rapier set plus the pipeline. The rest of the game talks to it
//! through handles and glam vectors; nalgebra types stay inside this module.

use glam::Vec3;
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::scene::Shape;

pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

/// How a body responds to the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Never moved by the solver (can still be repositioned by hand)
    Fixed,
    /// Affected by gravity, impulses and contacts
    Dynamic,
}

/// Contact material of a collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub friction: f32,
    pub restitution: f32,
    pub density: f32,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            friction: 0.2,
            restitution: 0.0,
            density: 1.0,
        }
    }
}

/// Everything needed to insert one body with one collider
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc {
    pub motion: Motion,
    pub position: Vec3,
    pub shape: Shape,
    pub surface: Surface,
    /// Report overlaps without producing contact forces
    pub sensor: bool,
    pub lock_rotations: bool,
    /// Exclude from island sleeping
    pub keep_awake: bool,
}

impl BodyDesc {
    pub fn new(motion: Motion, position: Vec3, shape: Shape) -> Self {
        Self {
            motion,
            position,
            shape,
            surface: Surface::default(),
            sensor: false,
            lock_rotations: false,
            keep_awake: false,
        }
    }
}

#[inline]
fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

#[inline]
fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// The physics world: bodies, colliders and the stepping pipeline
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create an empty world with vertical gravity and a fixed step length
    pub fn new(gravity: f32, dt: f32) -> Self {
        let integration_parameters = IntegrationParameters {
            dt,
            ..Default::default()
        };
        Self {
            gravity: vector![0.0, gravity, 0.0],
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Insert a body with a single attached collider
    pub fn insert(&mut self, desc: &BodyDesc) -> (RigidBodyHandle, ColliderHandle) {
        let builder = match desc.motion {
            Motion::Fixed => RigidBodyBuilder::fixed(),
            Motion::Dynamic => RigidBodyBuilder::dynamic(),
        };
        let mut builder = builder
            .translation(to_vector(desc.position))
            .can_sleep(!desc.keep_awake);
        if desc.lock_rotations {
            builder = builder.lock_rotations();
        }

        let collider = match desc.shape {
            Shape::Cuboid { size } => ColliderBuilder::cuboid(size.x / 2.0, size.y / 2.0, size.z / 2.0),
            Shape::Sphere { radius } => ColliderBuilder::ball(radius),
        }
        .friction(desc.surface.friction)
        .restitution(desc.surface.restitution)
        .density(desc.surface.density)
        .sensor(desc.sensor)
        .build();

        let body = self.bodies.insert(builder.build());
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        (body, collider)
    }

    /// Remove a body and every collider attached to it; false if already gone
    pub fn remove_body(&mut self, body: RigidBodyHandle) -> bool {
        self.bodies
            .remove(
                body,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    /// Remove a lone collider; false if already gone
    pub fn remove_collider(&mut self, collider: ColliderHandle) -> bool {
        self.colliders
            .remove(collider, &mut self.islands, &mut self.bodies, true)
            .is_some()
    }

    /// Advance the world by one fixed step
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    pub fn translation(&self, body: RigidBodyHandle) -> Option<Vec3> {
        self.bodies.get(body).map(|b| from_vector(b.translation()))
    }

    pub fn linvel(&self, body: RigidBodyHandle) -> Option<Vec3> {
        self.bodies.get(body).map(|b| from_vector(b.linvel()))
    }

    /// Teleport a body (wakes it); false if the handle is stale
    pub fn set_translation(&mut self, body: RigidBodyHandle, position: Vec3) -> bool {
        match self.bodies.get_mut(body) {
            Some(b) => {
                b.set_translation(to_vector(position), true);
                true
            }
            None => false,
        }
    }

    pub fn set_linvel(&mut self, body: RigidBodyHandle, velocity: Vec3) -> bool {
        match self.bodies.get_mut(body) {
            Some(b) => {
                b.set_linvel(to_vector(velocity), true);
                true
            }
            None => false,
        }
    }

    pub fn apply_impulse(&mut self, body: RigidBodyHandle, impulse: Vec3) -> bool {
        match self.bodies.get_mut(body) {
            Some(b) => {
                b.apply_impulse(to_vector(impulse), true);
                true
            }
            None => false,
        }
    }

    /// Whether two colliders overlapped during the last step.
    ///
    /// Only meaningful when at least one of them is a sensor.
    pub fn intersecting(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        matches!(self.narrow_phase.intersection_pair(a, b), Some(true))
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn dt(&self) -> f32 {
        self.integration_parameters.dt
    }
}
