use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::info;
use shadekit_core::Scene;
use shadekit_math::{Aabb, Vec3};

use super::VoxelTreeIntersector;

/// Subdivision stops at this depth even if leaves are still too large.
const MAX_DEPTH: u32 = 12;

/// Voxel size used when the requested one is not a positive finite fraction.
pub const DEFAULT_MAX_EXTENT_FRACTION: f32 = 0.01;

/// Relative enlargement of the root cube so that geometry lying on the
/// scene bounds is strictly inside it.
const ROOT_PADDING: f32 = 1.0e-4;

/// Node of the voxel octree.
#[derive(Debug, Clone)]
pub enum VoxelNode {
    /// Children are indexed by octant, see [`Aabb::octant`].
    Interior {
        bbox: Aabb,
        children: Box<[VoxelNode; 8]>,
    },
    Leaf {
        bbox: Aabb,
        solid: bool,
    },
}

impl VoxelNode {
    pub fn bbox(&self) -> &Aabb {
        match self {
            VoxelNode::Interior { bbox, .. } | VoxelNode::Leaf { bbox, .. } => bbox,
        }
    }

    fn visit_leaves<'a>(&'a self, f: &mut impl FnMut(&'a Aabb, bool)) {
        match self {
            VoxelNode::Interior { children, .. } => {
                for child in children.iter() {
                    child.visit_leaves(f);
                }
            }
            VoxelNode::Leaf { bbox, solid } => f(bbox, *solid),
        }
    }
}

/// Octree voxelization of the triangles of a scene.
#[derive(Debug, Clone, Default)]
pub struct VoxelTree {
    root: Option<VoxelNode>,
    leaf_count: usize,
    solid_leaf_count: usize,
    max_diag_length: f32,
}

impl VoxelTree {
    /// Voxelize `scene` until solid leaves are no larger than
    /// `max_extent_fraction` times the longest side of the scene bounds.
    pub fn new(scene: &Scene, max_extent_fraction: f32) -> Self {
        let triangles = scene.world_triangles();
        let bounds = scene.world_bounds();
        if triangles.is_empty() || bounds.is_empty() {
            info!("Scene {} has no geometry, voxel tree is empty", scene.name());
            return Self::default();
        }

        let longest_extent = bounds.extent().max_element();
        let half_extent = (0.5 * longest_extent * (1.0 + ROOT_PADDING)).max(ROOT_PADDING);
        let root_bbox = Aabb::cube(bounds.centroid(), half_extent);

        let max_extent_fraction = if max_extent_fraction.is_finite() && max_extent_fraction > 0.0 {
            max_extent_fraction
        } else {
            log::warn!(
                "Invalid maximum voxel extent {}, using {}",
                max_extent_fraction,
                DEFAULT_MAX_EXTENT_FRACTION
            );
            DEFAULT_MAX_EXTENT_FRACTION
        };
        let max_extent = max_extent_fraction * longest_extent;

        let candidates: Vec<usize> = (0..triangles.len()).collect();
        let root = build_node(root_bbox, &triangles, &candidates, max_extent, 0);

        let mut tree = Self {
            root: Some(root),
            ..Self::default()
        };
        tree.update_statistics();

        info!(
            "Built voxel tree for scene {}: {} leaves ({} solid), max voxel diagonal {:.6}",
            scene.name(),
            tree.leaf_count,
            tree.solid_leaf_count,
            tree.max_diag_length
        );

        tree
    }

    fn update_statistics(&mut self) {
        let mut leaf_count = 0;
        let mut solid_leaf_count = 0;
        let mut max_diag_length = 0.0_f32;
        if let Some(root) = &self.root {
            root.visit_leaves(&mut |bbox, solid| {
                leaf_count += 1;
                if solid {
                    solid_leaf_count += 1;
                    max_diag_length = max_diag_length.max(bbox.diagonal_length());
                }
            });
        }
        self.leaf_count = leaf_count;
        self.solid_leaf_count = solid_leaf_count;
        self.max_diag_length = max_diag_length;
    }

    pub fn root(&self) -> Option<&VoxelNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.solid_leaf_count == 0
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn solid_leaf_count(&self) -> usize {
        self.solid_leaf_count
    }

    /// Length of the diagonal of the largest solid leaf, 0 if there is none.
    pub fn max_diag_length(&self) -> f32 {
        self.max_diag_length
    }

    /// Intersector bound to this tree.
    pub fn intersector(&self) -> VoxelTreeIntersector<'_> {
        VoxelTreeIntersector::new(self)
    }

    /// Write the solid leaves as cubes to a Wavefront OBJ file.
    pub fn dump_solid_leaves_to_disk(&self, path: &Path) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(
            writer,
            "# {} solid voxels out of {} leaves",
            self.solid_leaf_count, self.leaf_count
        )?;

        let mut result = Ok(());
        let mut base = 1;
        if let Some(root) = &self.root {
            root.visit_leaves(&mut |bbox, solid| {
                if solid && result.is_ok() {
                    result = write_cube(&mut writer, bbox, base);
                    base += 8;
                }
            });
        }
        result?;

        writer.flush()?;
        info!("Wrote {} solid voxels to {}", self.solid_leaf_count, path.display());
        Ok(())
    }
}

fn build_node(
    bbox: Aabb,
    triangles: &[[Vec3; 3]],
    candidates: &[usize],
    max_extent: f32,
    depth: u32,
) -> VoxelNode {
    let overlapping: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&i| triangle_overlaps_box(&triangles[i], &bbox))
        .collect();

    if overlapping.is_empty() {
        return VoxelNode::Leaf { bbox, solid: false };
    }

    if bbox.extent().max_element() <= max_extent || depth >= MAX_DEPTH {
        return VoxelNode::Leaf { bbox, solid: true };
    }

    let children = std::array::from_fn(|octant| {
        build_node(bbox.octant(octant), triangles, &overlapping, max_extent, depth + 1)
    });

    VoxelNode::Interior {
        bbox,
        children: Box::new(children),
    }
}

/// Separating axis test between a triangle and a box.
///
/// Touching counts as overlapping.
fn triangle_overlaps_box(triangle: &[Vec3; 3], bbox: &Aabb) -> bool {
    let center = bbox.centroid();
    let half = 0.5 * bbox.extent();
    let v = [
        triangle[0] - center,
        triangle[1] - center,
        triangle[2] - center,
    ];
    let edges = [v[1] - v[0], v[2] - v[1], v[0] - v[2]];

    let separated = |axis: Vec3| {
        let p0 = v[0].dot(axis);
        let p1 = v[1].dot(axis);
        let p2 = v[2].dot(axis);
        let r = half.dot(axis.abs());
        p0.min(p1).min(p2) > r || p0.max(p1).max(p2) < -r
    };

    // Box face normals, then the triangle normal, then the nine edge axes.
    // Degenerate axes project everything to zero and never separate.
    if [Vec3::X, Vec3::Y, Vec3::Z].into_iter().any(separated) {
        return false;
    }
    if separated(edges[0].cross(edges[1])) {
        return false;
    }
    for edge in edges {
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            if separated(edge.cross(axis)) {
                return false;
            }
        }
    }
    true
}

fn write_cube(writer: &mut impl Write, bbox: &Aabb, base: usize) -> io::Result<()> {
    let lo = bbox.min_point();
    let hi = bbox.max_point();
    for i in 0..8 {
        let x = if i & 1 != 0 { hi.x } else { lo.x };
        let y = if i & 2 != 0 { hi.y } else { lo.y };
        let z = if i & 4 != 0 { hi.z } else { lo.z };
        writeln!(writer, "v {} {} {}", x, y, z)?;
    }

    // Corner bits: 1 = +X, 2 = +Y, 4 = +Z. Faces wound counter-clockwise
    // when seen from outside.
    const FACES: [[usize; 4]; 6] = [
        [0, 4, 6, 2], // -X
        [1, 3, 7, 5], // +X
        [0, 1, 5, 4], // -Y
        [2, 6, 7, 3], // +Y
        [0, 2, 3, 1], // -Z
        [4, 5, 7, 6], // +Z
    ];
    for face in FACES {
        writeln!(
            writer,
            "f {} {} {} {}",
            base + face[0],
            base + face[1],
            base + face[2],
            base + face[3]
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadekit_core::{Mesh, Transform};

    fn plane_scene() -> Scene {
        let mut scene = Scene::new("plane");
        scene.add_mesh(Mesh::plane(0.0, 2.0), "ground");
        scene
    }

    #[test]
    fn test_triangle_box_overlap() {
        let bbox = Aabb::cube(Vec3::ZERO, 1.0);
        let inside = [Vec3::new(-0.5, 0.0, 0.0), Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.0, 0.5, 0.0)];
        let far = [Vec3::new(5.0, 0.0, 0.0), Vec3::new(6.0, 0.0, 0.0), Vec3::new(5.0, 1.0, 0.0)];
        let crossing = [Vec3::new(-3.0, 0.0, -3.0), Vec3::new(3.0, 0.0, -3.0), Vec3::new(0.0, 0.0, 3.0)];
        // Bounding boxes overlap but the triangle passes beside the corner.
        let diagonal = [Vec3::new(2.2, 0.0, -0.5), Vec3::new(0.0, 2.2, -0.5), Vec3::new(2.2, 0.0, 0.5)];
        let touching = [Vec3::new(1.0, -2.0, -2.0), Vec3::new(1.0, 2.0, -2.0), Vec3::new(1.0, 0.0, 2.0)];

        assert!(triangle_overlaps_box(&inside, &bbox));
        assert!(!triangle_overlaps_box(&far, &bbox));
        assert!(triangle_overlaps_box(&crossing, &bbox));
        assert!(!triangle_overlaps_box(&diagonal, &bbox));
        assert!(triangle_overlaps_box(&touching, &bbox));
    }

    #[test]
    fn test_empty_scene() {
        let tree = VoxelTree::new(&Scene::new("empty"), 0.1);

        assert!(tree.root().is_none());
        assert!(tree.is_empty());
        assert_eq!(tree.max_diag_length(), 0.0);
    }

    #[test]
    fn test_plane_voxelization() {
        let tree = VoxelTree::new(&plane_scene(), 0.1);

        assert!(!tree.is_empty());
        assert!(tree.solid_leaf_count() < tree.leaf_count());

        // Leaves stop subdividing once they are at most 0.4 across.
        let edge = 4.0 * (1.0 + ROOT_PADDING) / 16.0;
        assert!((tree.max_diag_length() - edge * 3.0_f32.sqrt()).abs() < 1e-4);

        let mut solid_leaves = Vec::new();
        tree.root().unwrap().visit_leaves(&mut |bbox, solid| {
            if solid {
                solid_leaves.push(*bbox);
            }
        });
        for bbox in &solid_leaves {
            assert!(bbox.y.min <= 0.0 && bbox.y.max >= 0.0);
            assert!(bbox.extent().max_element() <= 0.4);
        }
    }

    #[test]
    fn test_invalid_extent_uses_default() {
        let scene = plane_scene();
        let reference = VoxelTree::new(&scene, DEFAULT_MAX_EXTENT_FRACTION);

        for fraction in [0.0, -0.5, f32::NAN, f32::INFINITY] {
            let tree = VoxelTree::new(&scene, fraction);
            assert_eq!(tree.leaf_count(), reference.leaf_count());
            assert_eq!(tree.solid_leaf_count(), reference.solid_leaf_count());
            assert_eq!(tree.max_diag_length(), reference.max_diag_length());
        }

        let edge = 4.0 * (1.0 + ROOT_PADDING) / 128.0;
        assert!((reference.max_diag_length() - edge * 3.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_solid_leaves_cover_geometry() {
        let mut scene = Scene::new("box");
        scene.add_mesh(Mesh::cuboid(Vec3::splat(-1.0), Vec3::splat(1.0)), "box");
        scene.set_instance_transform(0, Transform::from_translation(Vec3::new(3.0, 0.0, 0.0)));
        let tree = VoxelTree::new(&scene, 0.2);

        let mut solid_leaves = Vec::new();
        tree.root().unwrap().visit_leaves(&mut |bbox, solid| {
            if solid {
                solid_leaves.push(*bbox);
            }
        });

        for triangle in scene.world_triangles() {
            let centroid = (triangle[0] + triangle[1] + triangle[2]) / 3.0;
            assert!(solid_leaves.iter().any(|b| b.contains(centroid)));
        }
        // The interior of the box is not solid.
        assert!(!solid_leaves.iter().any(|b| b.contains(Vec3::new(3.0, 0.0, 0.0))));
    }

    #[test]
    fn test_dump_solid_leaves() {
        let tree = VoxelTree::new(&plane_scene(), 0.25);
        let path = std::env::temp_dir().join("shadekit_voxel_tree_dump_test.obj");
        tree.dump_solid_leaves_to_disk(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let vertex_lines = contents.lines().filter(|l| l.starts_with("v ")).count();
        let face_lines = contents.lines().filter(|l| l.starts_with("f ")).count();
        assert_eq!(vertex_lines, 8 * tree.solid_leaf_count());
        assert_eq!(face_lines, 6 * tree.solid_leaf_count());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_dump_to_missing_directory_fails() {
        let tree = VoxelTree::new(&plane_scene(), 0.25);
        let path = std::env::temp_dir()
            .join("shadekit_missing_dir")
            .join("nested")
            .join("tree.obj");

        assert!(tree.dump_solid_leaves_to_disk(&path).is_err());
    }
}
