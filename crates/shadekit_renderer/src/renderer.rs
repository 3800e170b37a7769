//! Multi-threaded bucket renderer driving a surface shader.
//!
//! Every pixel owns a sampling context seeded from the frame seed and the
//! pixel index, so images are reproducible regardless of how buckets are
//! scheduled across threads.

use std::time::Instant;

use log::info;
use rayon::prelude::*;
use shadekit_core::{Color, Image, SamplingContext};
use shadekit_math::{Interval, Vec2, Vec3};

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::intersector::RayIntersector;
use crate::shading::{ShadingContext, ShadingPoint};
use crate::surface_shader::SurfaceShader;
use crate::Camera;

/// Rec. 709 luminance weights.
const LUMINANCE_WEIGHTS: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub samples_per_pixel: u32,
    pub bucket_size: u32,
    pub seed: u64,
    /// Color of camera rays that hit nothing.
    pub background: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 4,
            bucket_size: DEFAULT_BUCKET_SIZE,
            seed: 0,
            background: Color::ZERO,
        }
    }
}

/// Mean color of a pixel and the sample variance of its luminance.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelEstimate {
    pub color: Color,
    pub variance: f32,
}

/// Images produced by [`render`].
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub beauty: Image,
    /// Per-pixel luminance variance in the red channel.
    pub pixel_variance: Image,
}

/// Render one pixel.
pub fn render_pixel(
    camera: &Camera,
    intersector: &dyn RayIntersector,
    shader: &dyn SurfaceShader,
    x: u32,
    y: u32,
    config: &RenderConfig,
) -> PixelEstimate {
    let pixel_index = y as u64 * camera.image_width as u64 + x as u64;
    let mut sampling_context = SamplingContext::new(config.seed.wrapping_add(pixel_index));
    let shading_context = ShadingContext::new(intersector);

    // Welford's running mean and variance.
    let mut mean = Color::ZERO;
    let mut mean_luminance = 0.0_f32;
    let mut m2 = 0.0_f32;

    for n in 1..=config.samples_per_pixel {
        sampling_context.split_in_place(2, 1);
        let offset = sampling_context.next2() - Vec2::splat(0.5);
        let ray = camera.get_ray(x, y, offset);

        let color = match intersector.trace(&ray, Interval::new(0.0, f32::INFINITY)) {
            Some(hit) => {
                let shading_point = ShadingPoint::new(ray, &hit);
                shader
                    .evaluate(&mut sampling_context, &shading_context, &shading_point)
                    .color
            }
            None => config.background,
        };

        let n = n as f32;
        mean += (color - mean) / n;

        let luminance = color.dot(LUMINANCE_WEIGHTS);
        let delta = luminance - mean_luminance;
        mean_luminance += delta / n;
        m2 += delta * (luminance - mean_luminance);
    }

    let variance = if config.samples_per_pixel > 1 {
        m2 / (config.samples_per_pixel - 1) as f32
    } else {
        0.0
    };

    PixelEstimate {
        color: mean,
        variance,
    }
}

/// Render the full frame, buckets in parallel.
///
/// The shader must have seen `on_frame_begin` for the scene the
/// intersector was built from.
pub fn render(
    camera: &Camera,
    intersector: &dyn RayIntersector,
    shader: &dyn SurfaceShader,
    config: &RenderConfig,
) -> RenderOutput {
    let (width, height) = (camera.image_width, camera.image_height);
    let buckets = generate_buckets(width, height, config.bucket_size);

    info!(
        "Rendering {}x{} with {} in {} buckets, {} spp",
        width,
        height,
        shader.name(),
        buckets.len(),
        config.samples_per_pixel
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            BucketResult::new(
                *bucket,
                render_bucket(bucket, camera, intersector, shader, config),
            )
        })
        .collect();

    let mut beauty = Image::new(width, height);
    let mut pixel_variance = Image::new(width, height);
    for result in &results {
        let bucket = &result.bucket;
        for (i, estimate) in result.pixels.iter().enumerate() {
            let x = bucket.x + i as u32 % bucket.width;
            let y = bucket.y + i as u32 / bucket.width;
            beauty.set_pixel(x, y, estimate.color);
            pixel_variance.set_pixel(x, y, Color::new(estimate.variance, 0.0, 0.0));
        }
    }

    info!("Rendered in {:.2?}", start.elapsed());

    RenderOutput {
        beauty,
        pixel_variance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersector::Intersector;
    use crate::surface_shader::VoxelAoSurfaceShader;
    use shadekit_core::{Mesh, ParamArray, Scene};

    fn shader_for(scene: &Scene, max_voxel_extent: f64) -> VoxelAoSurfaceShader {
        let params = ParamArray::new()
            .insert("samples", 8)
            .insert("max_distance", 1.0)
            .insert("max_voxel_extent", max_voxel_extent);
        let mut shader = VoxelAoSurfaceShader::new("ao", &params);
        shader.on_frame_begin(scene);
        shader
    }

    #[test]
    fn test_open_ground_is_white() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut scene = Scene::new("ground");
        scene.add_mesh(Mesh::plane(0.0, 20.0), "ground");
        let intersector = Intersector::from_scene(&scene);
        // Voxels are about 0.3 across, well below the camera.
        let shader = shader_for(&scene, 0.01);

        let mut camera = Camera::new()
            .with_resolution(12, 8)
            .with_position(Vec3::new(0.0, 3.0, 2.0), Vec3::ZERO, Vec3::Y);
        camera.initialize();

        let config = RenderConfig {
            samples_per_pixel: 2,
            bucket_size: 5,
            ..RenderConfig::default()
        };
        let output = render(&camera, &intersector, &shader, &config);

        assert_eq!(output.beauty.width(), 12);
        assert!(output.beauty.pixels().iter().all(|c| *c == Color::ONE));
        assert!(output.pixel_variance.pixels().iter().all(|c| *c == Color::ZERO));
    }

    #[test]
    fn test_misses_use_background() {
        let mut scene = Scene::new("ground");
        scene.add_mesh(Mesh::plane(0.0, 1.0), "ground");
        let intersector = Intersector::from_scene(&scene);
        let shader = shader_for(&scene, 0.1);

        // Looking up, away from the ground.
        let mut camera = Camera::new()
            .with_resolution(4, 4)
            .with_position(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 2.0, -1.0), Vec3::Y);
        camera.initialize();

        let config = RenderConfig {
            background: Color::new(0.1, 0.2, 0.3),
            ..RenderConfig::default()
        };
        let output = render(&camera, &intersector, &shader, &config);

        assert!(output.beauty.pixels().iter().all(|c| *c == Color::new(0.1, 0.2, 0.3)));
        assert!(output.pixel_variance.pixels().iter().all(|c| c.x == 0.0));
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut scene = Scene::new("room");
        scene.add_mesh(Mesh::cuboid(Vec3::splat(-1.0), Vec3::splat(1.0)), "walls");
        scene.add_mesh(Mesh::cuboid(Vec3::new(-0.3, -1.0, -0.3), Vec3::new(0.3, -0.4, 0.3)), "crate");
        let intersector = Intersector::from_scene(&scene);
        let shader = shader_for(&scene, 0.1);

        let mut camera = Camera::new()
            .with_resolution(16, 12)
            .with_position(Vec3::new(0.0, 0.5, 0.5), Vec3::new(0.0, -1.0, -0.2), Vec3::Y)
            .with_vfov(70.0);
        camera.initialize();

        let config = RenderConfig {
            samples_per_pixel: 4,
            bucket_size: 4,
            seed: 42,
            ..RenderConfig::default()
        };
        let a = render(&camera, &intersector, &shader, &config);
        let b = render(&camera, &intersector, &shader, &config);

        assert_eq!(a.beauty, b.beauty);
        assert_eq!(a.pixel_variance, b.pixel_variance);
        assert!(a.pixel_variance.pixels().iter().all(|c| c.x >= 0.0));
        assert!(a.pixel_variance.pixels().iter().any(|c| c.x > 0.0));
        assert!(a
            .beauty
            .pixels()
            .iter()
            .all(|c| c.min_element() >= 0.0 && c.max_element() <= 1.0));
    }
}
