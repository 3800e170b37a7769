//! Per-sample shading inputs and outputs.

use crate::hittable::HitRecord;
use crate::intersector::RayIntersector;
use shadekit_core::Color;
use shadekit_math::{Basis3, Ray, Vec3};

/// Surface point being shaded, as seen along a camera or secondary ray.
#[derive(Debug, Clone, Copy)]
pub struct ShadingPoint {
    ray: Ray,
    distance: f32,
    point: Vec3,
    geometric_normal: Vec3,
    shading_basis: Basis3,
}

impl ShadingPoint {
    /// Build a shading point from a ray and the hit it produced.
    ///
    /// The ray direction must be normalized so that `distance` is a
    /// world-space length. The geometric normal faces the incoming ray.
    pub fn new(ray: Ray, hit: &HitRecord) -> Self {
        debug_assert!(ray.direction.is_normalized());
        Self {
            ray,
            distance: hit.t,
            point: hit.p,
            geometric_normal: hit.normal,
            shading_basis: Basis3::from_normal(hit.normal),
        }
    }

    /// The ray that produced this shading point.
    pub fn ray(&self) -> &Ray {
        &self.ray
    }

    /// Distance from the ray origin to the point.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn point(&self) -> Vec3 {
        self.point
    }

    pub fn geometric_normal(&self) -> Vec3 {
        self.geometric_normal
    }

    pub fn shading_basis(&self) -> &Basis3 {
        &self.shading_basis
    }
}

/// Services the host makes available to shaders during evaluation.
#[derive(Clone, Copy)]
pub struct ShadingContext<'a> {
    intersector: &'a dyn RayIntersector,
}

impl<'a> ShadingContext<'a> {
    pub fn new(intersector: &'a dyn RayIntersector) -> Self {
        Self { intersector }
    }

    pub fn intersector(&self) -> &'a dyn RayIntersector {
        self.intersector
    }
}

/// Output of a surface shader: linear RGB color and alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingResult {
    pub color: Color,
    pub alpha: f32,
}

impl ShadingResult {
    /// Fully opaque result of the given color.
    pub fn opaque(color: Color) -> Self {
        Self { color, alpha: 1.0 }
    }
}

impl Default for ShadingResult {
    fn default() -> Self {
        Self::opaque(Color::ZERO)
    }
}
