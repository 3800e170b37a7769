//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Uses a binary tree structure for efficient ray-scene intersection testing.

use crate::hittable::{HitRecord, Hittable};
use shadekit_math::{Aabb, Interval, Ray};

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of primitives.
    Leaf {
        objects: Vec<Box<dyn Hittable>>,
        bbox: Aabb,
    },
    /// Empty node (for edge cases).
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(objects: Vec<Box<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(objects)
    }

    /// Recursive BVH construction.
    ///
    /// Simple median-split approach: sort objects by centroid on longest axis,
    /// split in half, recurse.
    fn build(mut objects: Vec<Box<dyn Hittable>>) -> Self {
        let n = objects.len();

        let bounds = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects,
                bbox: bounds,
            };
        }

        // Choose split axis based on centroid spread
        let axis = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, obj| acc.insert(obj.bounding_box().centroid()))
            .longest_axis();

        objects.sort_unstable_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val.total_cmp(&b_val)
        });

        let right_objects = objects.split_off(n / 2);
        let left = Self::build(objects);
        let right = Self::build(right_objects);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
        }
    }
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let mut hit_anything = false;
                let mut closest = ray_t.max;

                for obj in objects {
                    if obj.hit(ray, Interval::new(ray_t.min, closest), rec) {
                        hit_anything = true;
                        closest = rec.t;
                    }
                }
                hit_anything
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec);

                // Only check right up to closest hit
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec);

                hit_left || hit_right
            }
        }
    }

    fn hit_any(&self, ray: &Ray, ray_t: Interval) -> bool {
        match self {
            BvhNode::Empty => false,
            BvhNode::Leaf { objects, bbox } => {
                bbox.hit(ray, ray_t) && objects.iter().any(|obj| obj.hit_any(ray, ray_t))
            }
            BvhNode::Branch { left, right, bbox } => {
                bbox.hit(ray, ray_t) && (left.hit_any(ray, ray_t) || right.hit_any(ray, ray_t))
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Triangle;
    use shadekit_math::Vec3;

    fn unit_triangle_at(x: f32, z: f32) -> Box<dyn Hittable> {
        Box::new(Triangle::new(
            Vec3::new(x - 0.5, -0.5, z),
            Vec3::new(x + 0.5, -0.5, z),
            Vec3::new(x, 0.5, z),
        ))
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));
        assert!(!bvh.hit_any(&Ray::new(Vec3::ZERO, Vec3::Z), Interval::UNIVERSE));
    }

    #[test]
    fn test_bvh_single_triangle() {
        let bvh = BvhNode::new(vec![unit_triangle_at(0.0, -1.0)]);
        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
    }

    #[test]
    fn test_bvh_closest_of_many() {
        // Row of triangles along X, plus one occluder in front of x=5
        let mut objects: Vec<Box<dyn Hittable>> =
            (0..10).map(|i| unit_triangle_at(i as f32, -5.0)).collect();
        objects.push(unit_triangle_at(5.0, -2.0));

        let bvh = BvhNode::new(objects);
        assert!(matches!(bvh, BvhNode::Branch { .. }));

        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), -Vec3::Z);
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.p.z - (-2.0)).abs() < 0.01);

        assert!(bvh.hit_any(&ray, Interval::new(0.001, 3.0)));
        assert!(!bvh.hit_any(&ray, Interval::new(0.001, 1.0)));
    }
}
