// Transform utilities for Mat4
//
// Extends glam::Mat4 with the bounding-box transform the scene needs.

use crate::Aabb;
use glam::{Mat4, Vec3};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return Aabb::EMPTY;
        }

        let lo = aabb.min_point();
        let hi = aabb.max_point();

        (0..8).fold(Aabb::EMPTY, |acc, i| {
            let corner = Vec3::new(
                if i & 1 != 0 { hi.x } else { lo.x },
                if i & 2 != 0 { hi.y } else { lo.y },
                if i & 4 != 0 { hi.z } else { lo.z },
            );
            acc.insert(self.transform_point3(corner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_aabb_translation() {
        let mat = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = mat.transform_aabb(&aabb);

        assert_eq!(transformed.min_point(), Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(transformed.max_point(), Vec3::new(6.0, 1.0, 1.0));
    }

    #[test]
    fn test_transform_aabb_rotation() {
        let mat = Mat4::from_rotation_z(std::f32::consts::FRAC_PI_4);
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let transformed = mat.transform_aabb(&aabb);

        // 45 degree rotation widens the box to sqrt(2) in X and Y
        let sqrt2 = 2.0_f32.sqrt();
        assert!((transformed.x.max - sqrt2).abs() < 1e-4);
        assert!((transformed.y.max - sqrt2).abs() < 1e-4);
        assert!((transformed.z.max - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_transform_empty_aabb() {
        let mat = Mat4::from_scale(Vec3::splat(2.0));
        assert!(mat.transform_aabb(&Aabb::EMPTY).is_empty());
    }
}
