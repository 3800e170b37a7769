//! Scene representation consumed by the shading models.
//!
//! The scene is a flat list of mesh prototypes placed in the world by
//! instances. Every edit assigns a fresh value to one of two version ids so
//! that consumers holding derived acceleration structures can tell when
//! they are stale. Version ids come from a process-wide counter, so two
//! distinct scenes never share one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use shadekit_math::{Aabb, Mat4, Mat4Ext, Quat, Vec3};

use crate::mesh::Mesh;

/// Identifies one state of a scene's geometry or instances.
pub type VersionId = u64;

static NEXT_VERSION_ID: AtomicU64 = AtomicU64::new(1);

/// A version id that no scene has used before.
fn new_version_id() -> VersionId {
    NEXT_VERSION_ID.fetch_add(1, Ordering::Relaxed)
}

/// A mesh shared by any number of instances.
#[derive(Clone, Debug)]
pub struct Prototype {
    /// Unique identifier within the scene
    pub id: usize,

    /// Prototype name
    pub name: String,

    /// Shared mesh geometry
    pub mesh: Arc<Mesh>,
}

/// Transform components that can be composed into a matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with only translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// An instance of a prototype with a transform.
#[derive(Clone, Debug)]
pub struct Instance {
    /// Index of the prototype this instance references
    pub prototype_id: usize,

    /// Instance transform
    pub transform: Transform,
}

/// A complete scene containing prototypes and their instances.
#[derive(Clone, Debug)]
pub struct Scene {
    name: String,
    prototypes: Vec<Arc<Prototype>>,
    instances: Vec<Instance>,
    geometry_version_id: VersionId,
    assembly_instances_version_id: VersionId,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            name: String::new(),
            prototypes: Vec::new(),
            instances: Vec::new(),
            geometry_version_id: new_version_id(),
            assembly_instances_version_id: new_version_id(),
        }
    }
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version of the scene geometry; bumped whenever a prototype is added.
    pub fn geometry_version_id(&self) -> VersionId {
        self.geometry_version_id
    }

    /// Version of the instance placements; bumped whenever an instance is
    /// added, removed or moved.
    pub fn assembly_instances_version_id(&self) -> VersionId {
        self.assembly_instances_version_id
    }

    /// Add a prototype to the scene and return its ID.
    pub fn add_prototype(&mut self, mesh: Arc<Mesh>, name: impl Into<String>) -> usize {
        let id = self.prototypes.len();
        self.prototypes.push(Arc::new(Prototype {
            id,
            name: name.into(),
            mesh,
        }));
        self.geometry_version_id = new_version_id();
        id
    }

    /// Add an instance of a prototype and return its index.
    pub fn add_instance(&mut self, prototype_id: usize, transform: Transform) -> usize {
        debug_assert!(prototype_id < self.prototypes.len());
        self.instances.push(Instance {
            prototype_id,
            transform,
        });
        self.assembly_instances_version_id = new_version_id();
        self.instances.len() - 1
    }

    /// Convenience: add a mesh as its own prototype with a single instance.
    pub fn add_mesh(&mut self, mesh: Mesh, name: impl Into<String>) -> usize {
        let prototype_id = self.add_prototype(Arc::new(mesh), name);
        self.add_instance(prototype_id, Transform::default())
    }

    /// Replace the transform of an existing instance.
    ///
    /// Returns false if `index` is out of range.
    pub fn set_instance_transform(&mut self, index: usize, transform: Transform) -> bool {
        match self.instances.get_mut(index) {
            Some(instance) => {
                instance.transform = transform;
                self.assembly_instances_version_id = new_version_id();
                true
            }
            None => false,
        }
    }

    pub fn prototypes(&self) -> &[Arc<Prototype>] {
        &self.prototypes
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Get total instance count.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Get total triangle count across all instances.
    pub fn total_triangle_count(&self) -> usize {
        self.instances
            .iter()
            .filter_map(|instance| self.prototypes.get(instance.prototype_id))
            .map(|proto| proto.mesh.triangle_count())
            .sum()
    }

    /// All instanced triangles, transformed to world space.
    pub fn world_triangles(&self) -> Vec<[Vec3; 3]> {
        let mut triangles = Vec::with_capacity(self.total_triangle_count());

        for instance in &self.instances {
            let Some(proto) = self.prototypes.get(instance.prototype_id) else {
                continue;
            };
            let matrix = instance.transform.to_matrix();
            triangles.extend(
                proto
                    .mesh
                    .extract_triangle_vertices()
                    .into_iter()
                    .map(|tri| tri.map(|v| matrix.transform_point3(v))),
            );
        }

        triangles
    }

    /// Compute the world-space bounding box of all instances.
    pub fn world_bounds(&self) -> Aabb {
        self.instances
            .iter()
            .filter_map(|instance| {
                self.prototypes
                    .get(instance.prototype_id)
                    .map(|proto| instance.transform.to_matrix().transform_aabb(&proto.mesh.bounds))
            })
            .fold(Aabb::EMPTY, |acc, b| Aabb::surrounding(&acc, &b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh() -> Arc<Mesh> {
        Arc::new(Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2]))
    }

    #[test]
    fn test_scene_creation() {
        let mut scene = Scene::new("test");

        let proto_id = scene.add_prototype(triangle_mesh(), "triangle");
        assert_eq!(proto_id, 0);

        scene.add_instance(proto_id, Transform::default());
        scene.add_instance(proto_id, Transform::from_translation(Vec3::X));

        assert_eq!(scene.instance_count(), 2);
        assert_eq!(scene.total_triangle_count(), 2);
        assert_eq!(scene.world_triangles().len(), 2);
    }

    #[test]
    fn test_version_ids_track_edits() {
        let mut scene = Scene::new("versions");
        let (g0, i0) = (scene.geometry_version_id(), scene.assembly_instances_version_id());

        let proto_id = scene.add_prototype(triangle_mesh(), "triangle");
        assert!(scene.geometry_version_id() > g0);
        assert_eq!(scene.assembly_instances_version_id(), i0);

        let g1 = scene.geometry_version_id();
        let index = scene.add_instance(proto_id, Transform::default());
        let i1 = scene.assembly_instances_version_id();
        assert!(i1 > i0);

        assert!(scene.set_instance_transform(index, Transform::from_translation(Vec3::Y)));
        assert!(scene.assembly_instances_version_id() > i1);
        assert_eq!(scene.geometry_version_id(), g1);

        // Out-of-range edits leave the versions alone
        let i2 = scene.assembly_instances_version_id();
        assert!(!scene.set_instance_transform(42, Transform::default()));
        assert_eq!(scene.assembly_instances_version_id(), i2);
    }

    #[test]
    fn test_distinct_scenes_never_share_versions() {
        let mut a = Scene::new("a");
        let mut b = Scene::new("b");
        assert_ne!(a.geometry_version_id(), b.geometry_version_id());
        assert_ne!(a.assembly_instances_version_id(), b.assembly_instances_version_id());

        // Same edits on both scenes still give different ids.
        a.add_prototype(triangle_mesh(), "triangle");
        b.add_prototype(triangle_mesh(), "triangle");
        assert_ne!(a.geometry_version_id(), b.geometry_version_id());

        a.add_instance(0, Transform::default());
        b.add_instance(0, Transform::default());
        assert_ne!(a.assembly_instances_version_id(), b.assembly_instances_version_id());
    }

    #[test]
    fn test_world_triangles_are_transformed() {
        let mut scene = Scene::new("moved");
        let proto_id = scene.add_prototype(triangle_mesh(), "triangle");
        scene.add_instance(proto_id, Transform::from_translation(Vec3::new(0.0, 0.0, 5.0)));

        let triangles = scene.world_triangles();
        assert_eq!(triangles[0][0], Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(triangles[0][1], Vec3::new(1.0, 0.0, 5.0));

        let bounds = scene.world_bounds();
        assert_eq!(bounds.z.min, 5.0);
        assert_eq!(bounds.x.max, 1.0);
    }

    #[test]
    fn test_empty_scene_bounds() {
        assert!(Scene::new("empty").world_bounds().is_empty());
    }
}
