//! Renders a small demo scene with the voxel AO surface shader.
//!
//! Usage: shadekit_cli [--params FILE.json] [--out PREFIX] [--spp N] [--list-models]
//!
//! Writes `PREFIX_beauty.png` and `PREFIX_pixel_variation.png`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use shadekit_core::{Image, Mesh, ParamArray, Scene, Transform};
use shadekit_math::{Quat, Vec3};
use shadekit_renderer::{
    render, AovFactory, Camera, Intersector, ModelCatalog, Registrar, RenderConfig,
    SurfaceShaderFactory,
};

const SHADER_MODEL: &str = "voxel_ao_surface_shader";
const AOV_MODEL: &str = "pixel_variation_aov";

#[derive(Debug, PartialEq)]
struct Args {
    params: Option<PathBuf>,
    out: String,
    samples_per_pixel: u32,
    list_models: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            params: None,
            out: "shadekit".to_string(),
            samples_per_pixel: 4,
            list_models: false,
        }
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--params" => {
                let value = args.next().context("--params expects a file path")?;
                parsed.params = Some(PathBuf::from(value));
            }
            "--out" => {
                parsed.out = args.next().context("--out expects a file prefix")?;
            }
            "--spp" => {
                let value = args.next().context("--spp expects a sample count")?;
                parsed.samples_per_pixel = value
                    .parse()
                    .with_context(|| format!("Invalid sample count: {}", value))?;
            }
            "--list-models" => parsed.list_models = true,
            other => bail!(
                "Unknown argument: {}\nUsage: shadekit_cli [--params FILE.json] [--out PREFIX] [--spp N] [--list-models]",
                other
            ),
        }
    }

    Ok(parsed)
}

/// Ground plane with a few boxes, one of them rotated.
fn build_demo_scene() -> Scene {
    let mut scene = Scene::new("demo");
    scene.add_mesh(Mesh::plane(0.0, 4.0), "ground");

    let crate_id = scene.add_prototype(
        Arc::new(Mesh::cuboid(Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 1.0, 0.5))),
        "crate",
    );
    scene.add_instance(crate_id, Transform::from_translation(Vec3::new(-1.2, 0.0, 0.0)));
    scene.add_instance(
        crate_id,
        Transform {
            translation: Vec3::new(0.3, 0.0, -0.6),
            rotation: Quat::from_rotation_y(0.6),
            scale: Vec3::new(1.0, 1.6, 1.0),
        },
    );
    scene.add_instance(
        crate_id,
        Transform {
            translation: Vec3::new(1.1, 0.0, 0.9),
            scale: Vec3::splat(0.5),
            ..Default::default()
        },
    );

    scene
}

fn save_png(image: &Image, path: &Path) -> Result<()> {
    let buffer = image::RgbaImage::from_raw(image.width(), image.height(), image.to_rgba8())
        .context("Image buffer does not match its dimensions")?;
    buffer
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = parse_args(env::args().skip(1))?;

    if args.list_models {
        println!("{}", serde_json::to_string_pretty(&ModelCatalog::builtin())?);
        return Ok(());
    }

    let params = match &args.params {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            ParamArray::from_json_str(&json)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => ParamArray::new(),
    };

    let scene = build_demo_scene();
    log::info!(
        "Scene {}: {} instances, {} triangles",
        scene.name(),
        scene.instance_count(),
        scene.total_triangle_count()
    );

    let shaders = Registrar::<dyn SurfaceShaderFactory>::with_builtin_models();
    let shader_factory = shaders
        .lookup(SHADER_MODEL)
        .with_context(|| format!("Surface shader model {} is not registered", SHADER_MODEL))?;
    let mut shader = shader_factory.create("voxel_ao", &params);
    shader.on_frame_begin(&scene);

    let intersector = Intersector::from_scene(&scene);

    let mut camera = Camera::new()
        .with_resolution(480, 320)
        .with_position(Vec3::new(3.5, 2.5, 4.5), Vec3::new(0.0, 0.4, 0.0), Vec3::Y)
        .with_vfov(45.0);
    camera.initialize();

    let config = RenderConfig {
        samples_per_pixel: args.samples_per_pixel,
        ..RenderConfig::default()
    };
    let output = render(&camera, &intersector, shader.as_ref(), &config);

    let aovs = Registrar::<dyn AovFactory>::with_builtin_models();
    let aov = aovs
        .lookup(AOV_MODEL)
        .with_context(|| format!("AOV model {} is not registered", AOV_MODEL))?
        .create(&ParamArray::new());
    let mut variation = output.pixel_variance;
    if let Some(crop_window) = variation.full_crop_window() {
        aov.post_process_image(&mut variation, &crop_window);
    }

    save_png(&output.beauty, Path::new(&format!("{}_beauty.png", args.out)))?;
    save_png(&variation, Path::new(&format!("{}_{}.png", args.out, aov.name())))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(args(&[]).unwrap(), Args::default());

        let parsed = args(&["--params", "ao.json", "--out", "renders/test", "--spp", "16"]).unwrap();
        assert_eq!(parsed.params, Some(PathBuf::from("ao.json")));
        assert_eq!(parsed.out, "renders/test");
        assert_eq!(parsed.samples_per_pixel, 16);
        assert!(!parsed.list_models);

        assert!(args(&["--list-models"]).unwrap().list_models);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(args(&["--params"]).is_err());
        assert!(args(&["--spp", "lots"]).is_err());
        assert!(args(&["--verbose"]).is_err());
    }

    #[test]
    fn test_demo_scene() {
        let scene = build_demo_scene();
        assert_eq!(scene.instance_count(), 4);
        assert_eq!(scene.total_triangle_count(), 2 + 3 * 12);
        assert!(scene.world_bounds().y.max > 1.5);
    }
}
