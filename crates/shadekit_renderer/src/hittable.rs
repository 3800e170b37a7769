//! Hittable trait and HitRecord for ray-object intersection.

use shadekit_math::{Aabb, Interval, Ray, Vec3};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Vec3,
    /// Geometric normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Barycentric coordinates of the hit
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl HitRecord {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the given interval.
    ///
    /// Returns true if hit, and fills in the hit record with the closest hit.
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool;

    /// Test if a ray hits anything within the interval, without caring
    /// which hit is closest.
    fn hit_any(&self, ray: &Ray, ray_t: Interval) -> bool {
        let mut rec = HitRecord::default();
        self.hit(ray, ray_t, &mut rec)
    }

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}
