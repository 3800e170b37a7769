//! Monte Carlo ambient occlusion estimators.
//!
//! Both estimators cast `samples` cosine-weighted rays over the hemisphere
//! around the geometric normal and return the fraction that hit something
//! within `max_distance`. One traces real geometry, the other the voxel
//! approximation.

use shadekit_core::SamplingContext;
use shadekit_math::sampling::sample_hemisphere_cosine;
use shadekit_math::{Basis3, Interval, Ray, Vec3};

use crate::intersector::RayIntersector;
use crate::voxel::VoxelTreeIntersector;

/// Distance the origin of occlusion rays is pushed off the surface.
const SELF_INTERSECTION_OFFSET: f32 = 1.0e-4;

/// Occlusion by scene geometry, in [0, 1].
pub fn compute_ambient_occlusion(
    sampling_context: &mut SamplingContext,
    intersector: &dyn RayIntersector,
    point: Vec3,
    geometric_normal: Vec3,
    shading_basis: &Basis3,
    max_distance: f32,
    samples: usize,
) -> f32 {
    let origin = point + geometric_normal * SELF_INTERSECTION_OFFSET;
    estimate_occlusion(
        sampling_context,
        geometric_normal,
        shading_basis,
        samples,
        |direction| intersector.trace_probe(&Ray::new(origin, direction), Interval::up_to(max_distance)),
    )
}

/// Occlusion by solid voxels, in [0, 1].
///
/// `origin` must already lie in empty space, clear of the voxels that
/// contain the shaded surface.
pub fn compute_fast_ambient_occlusion(
    sampling_context: &mut SamplingContext,
    intersector: &VoxelTreeIntersector<'_>,
    origin: Vec3,
    geometric_normal: Vec3,
    shading_basis: &Basis3,
    max_distance: f32,
    samples: usize,
) -> f32 {
    estimate_occlusion(
        sampling_context,
        geometric_normal,
        shading_basis,
        samples,
        |direction| {
            intersector
                .trace(&Ray::new(origin, direction), Interval::up_to(max_distance), true)
                .is_some()
        },
    )
}

fn estimate_occlusion(
    sampling_context: &mut SamplingContext,
    geometric_normal: Vec3,
    shading_basis: &Basis3,
    samples: usize,
    mut is_occluded: impl FnMut(Vec3) -> bool,
) -> f32 {
    if samples == 0 {
        return 0.0;
    }

    let mut child_context = sampling_context.split(2, samples);
    let mut occluded = 0;

    for _ in 0..samples {
        let local = sample_hemisphere_cosine(child_context.next2());
        let mut direction = shading_basis.transform_to_parent(local);

        // The shading basis may tilt samples below the actual surface.
        if direction.dot(geometric_normal) < 0.0 {
            direction = -direction;
        }

        if is_occluded(direction) {
            occluded += 1;
        }
    }

    occluded as f32 / samples as f32
}
