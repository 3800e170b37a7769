//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::hittable::{HitRecord, Hittable};
use shadekit_math::{Aabb, Interval, Ray, Vec3};

/// A world-space triangle.
pub struct Triangle {
    v0: Vec3,
    edge1: Vec3,
    edge2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let normal = edge1.cross(edge2).normalize_or_zero();

        // Pad thin dimensions to avoid degenerate AABBs
        let delta = Vec3::splat(0.0001);
        let min = v0.min(v1).min(v2) - delta;
        let max = v0.max(v1).max(v2) + delta;

        Self {
            v0,
            edge1,
            edge2,
            normal,
            bbox: Aabb::from_points(min, max),
        }
    }

    pub fn from_vertices([v0, v1, v2]: [Vec3; 3]) -> Self {
        Self::new(v0, v1, v2)
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let h = ray.direction.cross(self.edge2);
        let a = self.edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return false;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return false;
        }

        let q = s.cross(self.edge1);
        let v = f * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return false;
        }

        let t = f * self.edge2.dot(q);
        if !ray_t.contains(t) {
            return false;
        }

        rec.t = t;
        rec.p = ray.at(t);
        rec.set_face_normal(ray, self.normal);
        rec.u = u;
        rec.v = v;

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_triangle() -> Triangle {
        // Triangle in XY plane at z=-1
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(test_triangle().hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 1.0).abs() < 0.001);
        assert_eq!(rec.normal, Vec3::Z);
        assert!(rec.front_face);
    }

    #[test]
    fn test_triangle_miss() {
        let mut rec = HitRecord::default();

        // Pointing away
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(!test_triangle().hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));

        // Beyond the interval
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert!(!test_triangle().hit(&ray, Interval::new(0.001, 0.5), &mut rec));
    }
}
