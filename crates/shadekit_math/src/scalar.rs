//! Small scalar helpers shared by the shading models.

/// 1 / π
pub const RCP_PI: f32 = std::f32::consts::FRAC_1_PI;

/// 1 / π²
pub const RCP_PI_SQUARE: f32 = RCP_PI * RCP_PI;

#[inline]
pub fn square(x: f32) -> f32 {
    x * x
}

/// Linear interpolation, `a` at `t = 0` and `b` at `t = 1`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Remap `x` from `[old_min, old_max]` to `[new_min, new_max]`.
#[inline]
pub fn fit(x: f32, old_min: f32, old_max: f32, new_min: f32, new_max: f32) -> f32 {
    debug_assert!(old_min != old_max);
    new_min + (x - old_min) * (new_max - new_min) / (old_max - old_min)
}

/// 0 below `a`, 1 above `b`, linear in between.
#[inline]
pub fn linearstep(a: f32, b: f32, x: f32) -> f32 {
    debug_assert!(a <= b);
    if x <= a {
        0.0
    } else if x >= b {
        1.0
    } else {
        (x - a) / (b - a)
    }
}
