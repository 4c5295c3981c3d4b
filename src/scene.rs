//! Render-side scene graph
//!
//! A flat list of meshes with transforms and materials. The host renderer
//! draws whatever is in here each frame and resolves texture sets through its
//! own loader; nothing in this module touches the GPU.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Mesh identifier (never reused within a scene)
pub type MeshId = u32;

/// Geometry of a mesh or collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned box with full side lengths
    Cuboid { size: Vec3 },
    Sphere { radius: f32 },
}

impl Shape {
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Shape::Cuboid {
            size: Vec3::new(width, height, depth),
        }
    }

    /// Half extents of the shape's bounding box
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            Shape::Cuboid { size } => size * 0.5,
            Shape::Sphere { radius } => Vec3::splat(radius),
        }
    }
}

/// Named PBR texture sets resolved by the renderer's texture loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureSet {
    /// Arena walls, floor and pads
    Wall,
    /// Stage 1 ridge
    Ridge,
    /// Static hazard strips
    HazardStrip,
    /// Sliding hazard bars
    HazardBar,
    /// Approaching hazard wall (emissive)
    HazardWall,
}

impl TextureSet {
    /// Asset directory holding the set's maps
    pub fn asset_dir(&self) -> &'static str {
        match self {
            TextureSet::Wall => "texture/wall",
            TextureSet::Ridge => "texture/level1",
            TextureSet::HazardStrip => "texture/level2",
            TextureSet::HazardBar => "texture/level3",
            TextureSet::HazardWall => "texture/level4",
        }
    }

    /// Texture repeat across a face
    pub fn repeat(&self) -> (f32, f32) {
        match self {
            TextureSet::Wall => (4.0, 4.0),
            TextureSet::HazardBar => (0.1, 1.0),
            _ => (1.0, 1.0),
        }
    }
}

/// Surface appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// 0xRRGGBB
    pub color: u32,
    pub roughness: f32,
    pub metalness: f32,
    /// 1.0 is opaque
    pub opacity: f32,
    pub texture: Option<TextureSet>,
    /// Render inside faces (backdrop spheres)
    pub back_face: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: 0x888888,
            roughness: 0.5,
            metalness: 0.1,
            opacity: 1.0,
            texture: None,
            back_face: false,
        }
    }
}

impl Material {
    pub fn color(color: u32) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// A drawable mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub id: MeshId,
    pub shape: Shape,
    pub position: Vec3,
    pub material: Material,
}

/// All meshes currently in the world
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Kept sorted by id (ids are allocated monotonically)
    meshes: Vec<Mesh>,
    next_id: MeshId,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            next_id: 1,
        }
    }

    /// Add a mesh and return its id
    pub fn add(&mut self, shape: Shape, position: Vec3, material: Material) -> MeshId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.meshes.push(Mesh {
            id,
            shape,
            position,
            material,
        });
        id
    }

    /// Remove a mesh; false if it was already gone
    pub fn remove(&mut self, id: MeshId) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.meshes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: MeshId) -> Option<&Mesh> {
        self.index_of(id).map(|i| &self.meshes[i])
    }

    /// Move a mesh; false if it no longer exists
    pub fn set_position(&mut self, id: MeshId, position: Vec3) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.meshes[index].position = position;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mesh> {
        self.meshes.iter()
    }

    fn index_of(&self, id: MeshId) -> Option<usize> {
        self.meshes.binary_search_by_key(&id, |m| m.id).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove() {
        let mut scene = Scene::new();
        let a = scene.add(Shape::cuboid(1.0, 1.0, 1.0), Vec3::ZERO, Material::default());
        let b = scene.add(Shape::Sphere { radius: 0.3 }, Vec3::ONE, Material::color(0));
        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);

        assert!(scene.remove(a));
        assert!(!scene.remove(a));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.get(b).map(|m| m.position), Some(Vec3::ONE));
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut scene = Scene::new();
        let a = scene.add(Shape::cuboid(1.0, 1.0, 1.0), Vec3::ZERO, Material::default());
        scene.remove(a);
        let b = scene.add(Shape::cuboid(1.0, 1.0, 1.0), Vec3::ZERO, Material::default());
        assert!(b > a);
    }

    #[test]
    fn test_set_position_on_missing_mesh() {
        let mut scene = Scene::new();
        assert!(!scene.set_position(42, Vec3::X));
    }

    #[test]
    fn test_shape_half_extents() {
        assert_eq!(
            Shape::cuboid(2.0, 4.0, 6.0).half_extents(),
            Vec3::new(1.0, 2.0, 3.0)
        );
        assert_eq!(Shape::Sphere { radius: 2.0 }.half_extents(), Vec3::splat(2.0));
    }
}
