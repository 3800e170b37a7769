//! Pinhole camera for primary ray generation.

use shadekit_math::{Ray, Vec2, Vec3};

/// Pinhole camera producing normalized primary rays.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,
    /// Vertical field of view in degrees.
    vfov: f32,

    // Cached by initialize()
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            image_width: 640,
            image_height: 360,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 60.0,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    pub fn with_vfov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Compute the cached viewport vectors. Must be called after the last
    /// builder call and before generating rays.
    pub fn initialize(&mut self) {
        let h = (self.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        let w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        // Image rows go down the screen.
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        let viewport_upper_left = self.look_from - w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);
    }

    /// Ray through pixel (i, j), displaced by `offset` in [-0.5, 0.5]² pixels.
    pub fn get_ray(&self, i: u32, j: u32, offset: Vec2) -> Ray {
        let pixel_sample = self.pixel00_loc
            + (i as f32 + offset.x) * self.pixel_delta_u
            + (j as f32 + offset.y) * self.pixel_delta_v;

        Ray::new(self.look_from, (pixel_sample - self.look_from).normalize())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_looks_at_target() {
        let mut camera = Camera::new()
            .with_resolution(101, 51)
            .with_position(Vec3::new(0.0, 2.0, 5.0), Vec3::new(0.0, 2.0, 0.0), Vec3::Y);
        camera.initialize();

        let ray = camera.get_ray(50, 25, Vec2::ZERO);
        assert_eq!(ray.origin, Vec3::new(0.0, 2.0, 5.0));
        assert!((ray.direction - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
        assert!(ray.direction.is_normalized());
    }

    #[test]
    fn test_image_orientation() {
        let mut camera = Camera::new().with_resolution(64, 64).with_vfov(90.0);
        camera.initialize();

        // Top-left pixel looks up and to the left.
        let ray = camera.get_ray(0, 0, Vec2::ZERO);
        assert!(ray.direction.x < 0.0);
        assert!(ray.direction.y > 0.0);

        let ray = camera.get_ray(63, 63, Vec2::ZERO);
        assert!(ray.direction.x > 0.0);
        assert!(ray.direction.y < 0.0);
    }
}
