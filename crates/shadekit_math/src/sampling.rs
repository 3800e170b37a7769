//! Mappings from the unit square to directions.

use crate::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Map a uniform 2D sample to a cosine-weighted direction on the +Z hemisphere.
///
/// The probability density of the returned direction `w` is `w.z / π`. The
/// first coordinate is clamped away from zero so the density never vanishes.
pub fn sample_hemisphere_cosine(s: Vec2) -> Vec3 {
    let cos_theta_sq = s.x.clamp(1e-6, 1.0);
    let cos_theta = cos_theta_sq.sqrt();
    let sin_theta = (1.0 - cos_theta_sq).sqrt();
    let (sin_phi, cos_phi) = (TAU * s.y).sin_cos();
    Vec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta)
}
