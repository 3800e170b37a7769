//! Surface shaders compute the final color of a shading point.

pub mod voxel_ao;

use shadekit_core::{SamplingContext, Scene};

use crate::shading::{ShadingContext, ShadingPoint, ShadingResult};

pub use voxel_ao::{AoMode, VoxelAoSettings, VoxelAoSurfaceShader, VoxelAoSurfaceShaderFactory};

pub trait SurfaceShader: Send + Sync {
    fn name(&self) -> &str;

    fn model(&self) -> &'static str;

    /// Called once per frame before any evaluation, with exclusive access.
    fn on_frame_begin(&mut self, _scene: &Scene) {}

    /// Shade one point. Runs concurrently on the rendering threads.
    fn evaluate(
        &self,
        sampling_context: &mut SamplingContext,
        shading_context: &ShadingContext<'_>,
        shading_point: &ShadingPoint,
    ) -> ShadingResult;
}
