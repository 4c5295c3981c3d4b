//! Two-phase translocation
//!
//! The first accepted press stores the player's position and drops a marker;
//! the second moves the player back there, keeping its velocity. Presses
//! closer together than the cooldown are dropped entirely.

use glam::Vec3;

use super::physics::{PhysicsWorld, RigidBodyHandle};
use crate::scene::{Material, MeshId, Scene, Shape};

/// Marker sphere radius
const MARKER_RADIUS: f32 = 0.3;

/// Result of an accepted teleport press
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TeleportAction {
    /// Position stored
    Marked(Vec3),
    /// Player moved from `from` to the stored position `to`
    Executed { from: Vec3, to: Vec3 },
}

/// Pending target, its marker mesh and the cooldown clock
#[derive(Debug, Clone, Default)]
pub struct Teleport {
    target: Option<Vec3>,
    marker: Option<MeshId>,
    last_activation: Option<f64>,
}

impl Teleport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    pub fn is_marked(&self) -> bool {
        self.target.is_some()
    }

    pub fn marker(&self) -> Option<MeshId> {
        self.marker
    }

    /// Clock time of the last accepted press
    pub fn last_activation(&self) -> Option<f64> {
        self.last_activation
    }

    /// Whether a press at `now` would be accepted
    pub fn is_ready(&self, now: f64, cooldown: f64) -> bool {
        match self.last_activation {
            Some(last) => now - last >= cooldown,
            None => true,
        }
    }

    /// Cooldown progress in [0, 1]; 1 means ready
    pub fn cooldown_ratio(&self, now: f64, cooldown: f64) -> f32 {
        match self.last_activation {
            Some(last) => ((now - last) / cooldown).clamp(0.0, 1.0) as f32,
            None => 1.0,
        }
    }

    /// Seconds until the next press is accepted
    pub fn cooldown_remaining(&self, now: f64, cooldown: f64) -> f64 {
        match self.last_activation {
            Some(last) => (cooldown - (now - last)).max(0.0),
            None => 0.0,
        }
    }

    /// Handle one press of the teleport key. `None` when gated by the cooldown
    /// or when the body no longer exists.
    pub fn activate(
        &mut self,
        now: f64,
        cooldown: f64,
        scene: &mut Scene,
        world: &mut PhysicsWorld,
        body: RigidBodyHandle,
    ) -> Option<TeleportAction> {
        if !self.is_ready(now, cooldown) {
            log::debug!("Teleport ignored: cooling down");
            return None;
        }
        let position = world.translation(body)?;
        self.last_activation = Some(now);

        if self.target.is_none() {
            self.mark(scene, position);
            Some(TeleportAction::Marked(position))
        } else {
            let to = self.execute(scene, world, body)?;
            Some(TeleportAction::Executed { from: position, to })
        }
    }

    /// Store `position` as the target and show the marker
    pub fn mark(&mut self, scene: &mut Scene, position: Vec3) {
        self.remove_marker(scene);
        self.target = Some(position);
        let material = Material {
            opacity: 0.8,
            ..Material::color(0x000000)
        };
        self.marker = Some(scene.add(Shape::Sphere { radius: MARKER_RADIUS }, position, material));
        log::debug!("Teleport target set at {position}");
    }

    /// Move the body to the stored target, keeping its velocity.
    /// No-op returning `None` when nothing is marked.
    pub fn execute(&mut self, scene: &mut Scene, world: &mut PhysicsWorld, body: RigidBodyHandle) -> Option<Vec3> {
        let target = self.target?;
        let velocity = world.linvel(body)?;
        world.set_translation(body, target);
        world.set_linvel(body, velocity);
        self.clear(scene);
        log::debug!("Teleported to {target}");
        Some(target)
    }

    /// Forget the target and remove the marker (cooldown clock is kept)
    pub fn clear(&mut self, scene: &mut Scene) {
        self.target = None;
        self.remove_marker(scene);
    }

    fn remove_marker(&mut self, scene: &mut Scene) {
        if let Some(marker) = self.marker.take() {
            scene.remove(marker);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::{BodyDesc, Motion};

    const COOLDOWN: f64 = 0.5;

    fn setup() -> (Scene, PhysicsWorld, RigidBodyHandle) {
        let scene = Scene::new();
        let mut world = PhysicsWorld::new(-9.81, 1.0 / 60.0);
        let (body, _) = world.insert(&BodyDesc::new(
            Motion::Dynamic,
            Vec3::new(1.0, 2.0, 3.0),
            Shape::cuboid(1.0, 1.0, 1.0),
        ));
        (scene, world, body)
    }

    #[test]
    fn test_mark_then_execute_returns_to_mark_with_velocity() {
        let (mut scene, mut world, body) = setup();
        let mut teleport = Teleport::new();

        let action = teleport.activate(0.0, COOLDOWN, &mut scene, &mut world, body);
        assert_eq!(action, Some(TeleportAction::Marked(Vec3::new(1.0, 2.0, 3.0))));
        assert!(teleport.marker().is_some());
        assert_eq!(scene.len(), 1);

        let velocity = Vec3::new(4.0, -1.5, 0.25);
        world.set_translation(body, Vec3::new(-6.0, 8.0, 2.0));
        world.set_linvel(body, velocity);

        let action = teleport.activate(1.0, COOLDOWN, &mut scene, &mut world, body);
        assert_eq!(
            action,
            Some(TeleportAction::Executed {
                from: Vec3::new(-6.0, 8.0, 2.0),
                to: Vec3::new(1.0, 2.0, 3.0),
            })
        );
        assert_eq!(world.translation(body), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(world.linvel(body), Some(velocity));
        assert!(!teleport.is_marked());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_execute_without_mark_is_noop() {
        let (mut scene, mut world, body) = setup();
        let mut teleport = Teleport::new();
        world.set_linvel(body, Vec3::X);

        assert_eq!(teleport.execute(&mut scene, &mut world, body), None);
        assert_eq!(world.translation(body), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(world.linvel(body), Some(Vec3::X));
        assert!(teleport.last_activation().is_none());
    }

    #[test]
    fn test_second_press_inside_cooldown_is_dropped() {
        let (mut scene, mut world, body) = setup();
        let mut teleport = Teleport::new();

        assert!(teleport.activate(0.0, COOLDOWN, &mut scene, &mut world, body).is_some());
        world.set_translation(body, Vec3::new(5.0, 5.0, 5.0));

        assert_eq!(teleport.activate(0.3, COOLDOWN, &mut scene, &mut world, body), None);
        assert_eq!(world.translation(body), Some(Vec3::new(5.0, 5.0, 5.0)));
        assert!(teleport.is_marked());
        assert_eq!(teleport.last_activation(), Some(0.0));
    }

    #[test]
    fn test_cooldown_ratio_and_remaining() {
        let (mut scene, mut world, body) = setup();
        let mut teleport = Teleport::new();
        assert_eq!(teleport.cooldown_ratio(0.0, COOLDOWN), 1.0);

        teleport.activate(2.0, COOLDOWN, &mut scene, &mut world, body);
        assert!((teleport.cooldown_ratio(2.25, COOLDOWN) - 0.5).abs() < 1e-6);
        assert!((teleport.cooldown_remaining(2.25, COOLDOWN) - 0.25).abs() < 1e-9);
        assert_eq!(teleport.cooldown_ratio(9.0, COOLDOWN), 1.0);
        assert_eq!(teleport.cooldown_remaining(9.0, COOLDOWN), 0.0);
    }

    #[test]
    fn test_clear_removes_marker_keeps_clock() {
        let (mut scene, mut world, body) = setup();
        let mut teleport = Teleport::new();
        teleport.activate(1.0, COOLDOWN, &mut scene, &mut world, body);

        teleport.clear(&mut scene);
        assert!(!teleport.is_marked());
        assert!(scene.is_empty());
        assert_eq!(teleport.last_activation(), Some(1.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn accepted_presses_are_a_cooldown_apart(
                mut times in proptest::collection::vec(0.0f64..10.0, 1..40),
            ) {
                times.sort_by(|a, b| a.partial_cmp(b).unwrap());
                let (mut scene, mut world, body) = setup();
                let mut teleport = Teleport::new();
                let mut accepted = Vec::new();
                for t in times {
                    if teleport.activate(t, COOLDOWN, &mut scene, &mut world, body).is_some() {
                        accepted.push(t);
                    }
                }
                prop_assert!(!accepted.is_empty());
                for pair in accepted.windows(2) {
                    prop_assert!(pair[1] - pair[0] >= COOLDOWN);
                }
            }
        }
    }
}
