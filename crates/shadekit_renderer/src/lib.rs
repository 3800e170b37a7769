//! Shading models and the CPU renderer that drives them.
//!
//! - `bsdf`: the Oren-Nayar rough diffuse BRDF
//! - `aov`: the pixel variation heat map
//! - `surface_shader`: voxel-based ambient occlusion
//! - `renderer`: rayon bucket renderer producing beauty and variance images

pub mod ambient_occlusion;
pub mod aov;
pub mod bsdf;
mod bucket;
mod bvh;
mod camera;
pub mod factory;
mod hittable;
mod intersector;
mod renderer;
mod shading;
pub mod surface_shader;
mod triangle;
pub mod voxel;

pub use aov::{Aov, PixelVariationAov};
pub use bsdf::{Bsdf, BsdfEvaluation, BsdfSample, OrenNayarBrdf, ScatteringMode, ScatteringModes};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use factory::{
    AovFactory, BsdfFactory, EntityFactory, ModelCatalog, Registrar, SurfaceShaderFactory,
};
pub use hittable::{HitRecord, Hittable};
pub use intersector::{Intersector, RayIntersector};
pub use renderer::{render, render_pixel, PixelEstimate, RenderConfig, RenderOutput};
pub use shading::{ShadingContext, ShadingPoint, ShadingResult};
pub use surface_shader::{AoMode, SurfaceShader, VoxelAoSurfaceShader};
pub use triangle::Triangle;
pub use voxel::{VoxelTree, VoxelTreeIntersector};
