//! Triangle mesh geometry for the shading scene.
//!
//! Meshes are stored in their local space; the scene places them in the
//! world through instance transforms.

use shadekit_math::{Aabb, Vec3};

/// A mesh consisting of vertex positions and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh from positions and indices.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            indices,
            bounds,
        }
    }

    /// Square in the XZ plane at height `y`, facing +Y.
    pub fn plane(y: f32, half_size: f32) -> Self {
        let h = half_size;
        Self::new(
            vec![
                Vec3::new(-h, y, -h),
                Vec3::new(-h, y, h),
                Vec3::new(h, y, h),
                Vec3::new(h, y, -h),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    /// Closed box spanning `min..max`, 12 outward-facing triangles.
    pub fn cuboid(min: Vec3, max: Vec3) -> Self {
        let positions = (0..8)
            .map(|i| {
                Vec3::new(
                    if i & 1 != 0 { max.x } else { min.x },
                    if i & 2 != 0 { max.y } else { min.y },
                    if i & 4 != 0 { max.z } else { min.z },
                )
            })
            .collect();

        #[rustfmt::skip]
        let indices = vec![
            0, 4, 6,  0, 6, 2, // -X
            1, 3, 7,  1, 7, 5, // +X
            0, 1, 5,  0, 5, 4, // -Y
            2, 6, 7,  2, 7, 3, // +Y
            0, 2, 3,  0, 3, 1, // -Z
            4, 5, 7,  4, 7, 6, // +Z
        ];

        Self::new(positions, indices)
    }

    /// Compute axis-aligned bounding box from positions.
    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        positions
            .iter()
            .fold(Aabb::EMPTY, |bounds, p| bounds.insert(*p))
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Extract triangle vertices as [v0, v1, v2] triplets.
    ///
    /// Triangles referencing out-of-range vertices are skipped with a warning.
    pub fn extract_triangle_vertices(&self) -> Vec<[Vec3; 3]> {
        let mut triangles = Vec::with_capacity(self.triangle_count());

        for chunk in self.indices.chunks_exact(3) {
            let i0 = chunk[0] as usize;
            let i1 = chunk[1] as usize;
            let i2 = chunk[2] as usize;

            if i0 >= self.positions.len()
                || i1 >= self.positions.len()
                || i2 >= self.positions.len()
            {
                log::warn!(
                    "Invalid triangle indices: [{}, {}, {}], vertex count: {}",
                    i0,
                    i1,
                    i2,
                    self.positions.len()
                );
                continue;
            }

            triangles.push([self.positions[i0], self.positions[i1], self.positions[i2]]);
        }

        triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2]);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.bounds.max_point(), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_cuboid_faces_point_outward() {
        let mesh = Mesh::cuboid(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(mesh.triangle_count(), 12);

        for [a, b, c] in mesh.extract_triangle_vertices() {
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "face at {centroid:?} points inward");
        }
    }

    #[test]
    fn test_plane_faces_up() {
        let mesh = Mesh::plane(0.5, 2.0);
        for [a, b, c] in mesh.extract_triangle_vertices() {
            assert!((b - a).cross(c - a).y > 0.0);
        }
        assert_eq!(mesh.bounds.y.min, 0.5);
    }

    #[test]
    fn test_extract_skips_invalid_indices() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2, 0, 1, 7]);
        assert_eq!(mesh.extract_triangle_vertices().len(), 1);
    }
}
