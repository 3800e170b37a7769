//! Ray/scene intersection service used by ray-traced ambient occlusion.

use crate::bvh::BvhNode;
use crate::hittable::{HitRecord, Hittable};
use crate::triangle::Triangle;
use shadekit_core::Scene;
use shadekit_math::{Interval, Ray};

/// Nearest-hit and any-hit queries against scene geometry.
pub trait RayIntersector: Send + Sync {
    /// Closest intersection within `ray_t`.
    fn trace(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;

    /// True if anything is hit within `ray_t`.
    fn trace_probe(&self, ray: &Ray, ray_t: Interval) -> bool;
}

/// BVH over the world-space triangles of a scene.
pub struct Intersector {
    bvh: BvhNode,
    triangle_count: usize,
}

impl Intersector {
    pub fn from_scene(scene: &Scene) -> Self {
        let objects: Vec<Box<dyn Hittable>> = scene
            .world_triangles()
            .into_iter()
            .map(|tri| Box::new(Triangle::from_vertices(tri)) as Box<dyn Hittable>)
            .collect();
        let triangle_count = objects.len();

        log::info!(
            "Built scene intersector for '{}': {} triangles",
            scene.name(),
            triangle_count
        );

        Self {
            bvh: BvhNode::new(objects),
            triangle_count,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }
}

impl RayIntersector for Intersector {
    fn trace(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut rec = HitRecord::default();
        self.bvh.hit(ray, ray_t, &mut rec).then_some(rec)
    }

    fn trace_probe(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.bvh.hit_any(ray, ray_t)
    }
}
