//! Voxel-based ambient occlusion.
//!
//! Ambient occlusion is estimated against a voxelization of the scene where
//! the surface is far enough from other geometry for the voxels to be a good
//! approximation, and by tracing the real geometry close to it. The switch
//! is driven by the clearance measured along the geometric normal, in units
//! of the largest voxel diagonal, with a linear blend between the two
//! thresholds.

use std::path::PathBuf;

use log::{debug, warn};
use shadekit_core::{Color, ParamArray, SamplingContext, Scene, VersionId};
use shadekit_math::scalar::linearstep;
use shadekit_math::{Interval, Ray, Vec3};

use super::SurfaceShader;
use crate::ambient_occlusion::{compute_ambient_occlusion, compute_fast_ambient_occlusion};
use crate::factory::{EntityFactory, ModelMetadata, SurfaceShaderFactory};
use crate::shading::{ShadingContext, ShadingPoint, ShadingResult};
use crate::voxel::{VoxelTree, VoxelTreeIntersector, DEFAULT_MAX_EXTENT_FRACTION};

pub const MODEL: &str = "voxel_ao_surface_shader";

const DEFAULT_LOW_THRESHOLD: f32 = 2.0;
const DEFAULT_HIGH_THRESHOLD: f32 = 4.0;

/// Relative overshoot applied when stepping past voxel boundaries.
const BOUNDARY_EPSILON: f32 = 1.0e-5;

/// Construction parameters of [`VoxelAoSurfaceShader`].
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelAoSettings {
    pub samples: usize,
    pub max_distance: f32,
    /// Largest solid voxel edge, as a fraction of the longest scene extent.
    pub max_voxel_extent: f32,
    /// Clearance below which real geometry is traced, in voxel diagonals.
    pub low_threshold: f32,
    /// Clearance above which only voxels are traced, in voxel diagonals.
    pub high_threshold: f32,
    /// Where to write the solid voxels after each rebuild.
    pub output_filename: Option<PathBuf>,
    pub enable_diagnostics: bool,
}

impl Default for VoxelAoSettings {
    fn default() -> Self {
        Self {
            samples: 16,
            max_distance: 1.0,
            max_voxel_extent: DEFAULT_MAX_EXTENT_FRACTION,
            low_threshold: DEFAULT_LOW_THRESHOLD,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
            output_filename: None,
            enable_diagnostics: false,
        }
    }
}

impl VoxelAoSettings {
    pub fn from_params(params: &ParamArray) -> Self {
        let defaults = Self::default();

        let mut low_threshold = params.get_optional("low_threshold", defaults.low_threshold);
        let mut high_threshold = params.get_optional("high_threshold", defaults.high_threshold);
        if low_threshold < 0.0 || high_threshold < 0.0 || high_threshold < low_threshold {
            warn!(
                "Invalid voxel AO thresholds (low {}, high {}), using {} and {}",
                low_threshold, high_threshold, DEFAULT_LOW_THRESHOLD, DEFAULT_HIGH_THRESHOLD
            );
            low_threshold = DEFAULT_LOW_THRESHOLD;
            high_threshold = DEFAULT_HIGH_THRESHOLD;
        }

        let mut max_voxel_extent: f32 =
            params.get_required("max_voxel_extent", defaults.max_voxel_extent);
        if !max_voxel_extent.is_finite() || max_voxel_extent <= 0.0 {
            warn!(
                "Invalid maximum voxel extent {}, using {}",
                max_voxel_extent, DEFAULT_MAX_EXTENT_FRACTION
            );
            max_voxel_extent = DEFAULT_MAX_EXTENT_FRACTION;
        }

        let output_filename: String = params.get_optional("output_filename", String::new());

        Self {
            samples: params.get_required("samples", defaults.samples),
            max_distance: params.get_required("max_distance", defaults.max_distance),
            max_voxel_extent,
            low_threshold,
            high_threshold,
            output_filename: (!output_filename.is_empty()).then(|| PathBuf::from(output_filename)),
            enable_diagnostics: params.get_optional("enable_diagnostics", defaults.enable_diagnostics),
        }
    }
}

/// How occlusion is estimated at a shading point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AoMode {
    /// Voxels only.
    Fast,
    /// Real geometry only.
    Classic,
    /// `k * fast + (1 - k) * classic`.
    Blend { k: f32 },
}

impl AoMode {
    pub fn select(clearance: f32, classic_threshold: f32, fast_threshold: f32) -> Self {
        if clearance >= fast_threshold {
            AoMode::Fast
        } else if clearance < classic_threshold {
            AoMode::Classic
        } else {
            AoMode::Blend {
                k: linearstep(classic_threshold, fast_threshold, clearance),
            }
        }
    }

    /// Color written in diagnostics mode.
    pub fn diagnostic_color(self) -> Color {
        match self {
            AoMode::Fast => Color::new(0.0, 0.0, 1.0),
            AoMode::Classic => Color::new(1.0, 1.0, 0.0),
            AoMode::Blend { k } => Color::new(1.0 - k, 0.0, k),
        }
    }
}

/// Mix of the voxel (`fast`) and ray traced (`classic`) occlusion estimates
/// at blend factor `k`.
fn blend_occlusion(k: f32, fast: f32, classic: f32) -> f32 {
    k * fast + (1.0 - k) * classic
}

/// Ambient occlusion surface shader backed by a voxel tree that is rebuilt
/// whenever the scene geometry or its instances change.
pub struct VoxelAoSurfaceShader {
    name: String,
    settings: VoxelAoSettings,

    last_geometry_version_id: Option<VersionId>,
    last_instances_version_id: Option<VersionId>,
    voxel_tree: Option<VoxelTree>,
    rebuild_count: usize,

    diag_length: f32,
    classic_threshold: f32,
    fast_threshold: f32,
    half_samples: usize,
}

impl VoxelAoSurfaceShader {
    pub fn new(name: impl Into<String>, params: &ParamArray) -> Self {
        Self::with_settings(name, VoxelAoSettings::from_params(params))
    }

    pub fn with_settings(name: impl Into<String>, settings: VoxelAoSettings) -> Self {
        Self {
            name: name.into(),
            settings,
            last_geometry_version_id: None,
            last_instances_version_id: None,
            voxel_tree: None,
            rebuild_count: 0,
            diag_length: 0.0,
            classic_threshold: 0.0,
            fast_threshold: 0.0,
            half_samples: 1,
        }
    }

    pub fn settings(&self) -> &VoxelAoSettings {
        &self.settings
    }

    pub fn voxel_tree(&self) -> Option<&VoxelTree> {
        self.voxel_tree.as_ref()
    }

    /// Number of times the voxel tree has been built.
    pub fn rebuild_count(&self) -> usize {
        self.rebuild_count
    }

    /// Samples given to each estimator when blending.
    pub fn half_samples(&self) -> usize {
        self.half_samples
    }

    /// Classic and fast clearance thresholds in world units.
    pub fn thresholds(&self) -> (f32, f32) {
        (self.classic_threshold, self.fast_threshold)
    }

    fn rebuild_voxel_tree(&mut self, scene: &Scene) {
        let tree = VoxelTree::new(scene, self.settings.max_voxel_extent);

        if let Some(path) = &self.settings.output_filename {
            if let Err(e) = tree.dump_solid_leaves_to_disk(path) {
                log::error!("Failed to write voxel tree to {}: {}", path.display(), e);
            }
        }

        self.diag_length = tree.max_diag_length() * (1.0 + BOUNDARY_EPSILON);
        self.classic_threshold = self.settings.low_threshold * self.diag_length;
        self.fast_threshold = self.settings.high_threshold * self.diag_length;
        self.half_samples = (self.settings.samples / 2).max(1);
        self.voxel_tree = Some(tree);
        self.rebuild_count += 1;
    }

    fn classic_occlusion(
        &self,
        sampling_context: &mut SamplingContext,
        shading_context: &ShadingContext<'_>,
        shading_point: &ShadingPoint,
        samples: usize,
    ) -> f32 {
        compute_ambient_occlusion(
            sampling_context,
            shading_context.intersector(),
            shading_point.point(),
            shading_point.geometric_normal(),
            shading_point.shading_basis(),
            self.settings.max_distance,
            samples,
        )
    }

    fn fast_occlusion(
        &self,
        sampling_context: &mut SamplingContext,
        intersector: &VoxelTreeIntersector<'_>,
        origin: Vec3,
        shading_point: &ShadingPoint,
        samples: usize,
    ) -> f32 {
        compute_fast_ambient_occlusion(
            sampling_context,
            intersector,
            origin,
            shading_point.geometric_normal(),
            shading_point.shading_basis(),
            self.settings.max_distance,
            samples,
        )
    }
}

impl SurfaceShader for VoxelAoSurfaceShader {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &'static str {
        MODEL
    }

    fn on_frame_begin(&mut self, scene: &Scene) {
        let geometry_version_id = scene.geometry_version_id();
        let instances_version_id = scene.assembly_instances_version_id();

        if self.last_geometry_version_id == Some(geometry_version_id)
            && self.last_instances_version_id == Some(instances_version_id)
        {
            debug!("Voxel tree of {} is up to date", self.name);
            return;
        }

        self.last_geometry_version_id = Some(geometry_version_id);
        self.last_instances_version_id = Some(instances_version_id);
        self.rebuild_voxel_tree(scene);
    }

    fn evaluate(
        &self,
        sampling_context: &mut SamplingContext,
        shading_context: &ShadingContext<'_>,
        shading_point: &ShadingPoint,
    ) -> ShadingResult {
        debug_assert!(
            self.voxel_tree.is_some(),
            "on_frame_begin() must be called before evaluate()"
        );
        let Some(tree) = &self.voxel_tree else {
            return ShadingResult::default();
        };
        let intersector = tree.intersector();
        let geometric_normal = shading_point.geometric_normal();

        // Step back along the incoming ray until we leave the voxels that
        // contain the shading point.
        let mut safe_origin = shading_point.point();
        let reverse_ray = Ray::new(safe_origin, -shading_point.ray().direction);
        let backtrack = intersector.trace(
            &reverse_ray,
            Interval::up_to(shading_point.distance()),
            false,
        );
        debug_assert!(backtrack.is_some(), "no empty voxel between camera and shading point");
        if let Some(distance) = backtrack {
            safe_origin += reverse_ray.direction * (distance * (1.0 + BOUNDARY_EPSILON));
        }

        // Measure the free space along the geometric normal.
        let normal_ray = Ray::new(safe_origin, geometric_normal);
        let clearance = intersector
            .trace(&normal_ray, Interval::up_to(self.fast_threshold), true)
            .unwrap_or(self.fast_threshold);

        // Move the origin away from any voxel touching the surface.
        safe_origin += geometric_normal * self.diag_length;

        let mode = AoMode::select(clearance, self.classic_threshold, self.fast_threshold);
        if self.settings.enable_diagnostics {
            return ShadingResult::opaque(mode.diagnostic_color());
        }

        let samples = self.settings.samples;
        let occlusion = match mode {
            AoMode::Fast => {
                self.fast_occlusion(sampling_context, &intersector, safe_origin, shading_point, samples)
            }
            AoMode::Classic => {
                self.classic_occlusion(sampling_context, shading_context, shading_point, samples)
            }
            AoMode::Blend { k } => {
                let classic = self.classic_occlusion(
                    sampling_context,
                    shading_context,
                    shading_point,
                    self.half_samples,
                );
                let fast = self.fast_occlusion(
                    sampling_context,
                    &intersector,
                    safe_origin,
                    shading_point,
                    self.half_samples,
                );
                blend_occlusion(k, fast, classic)
            }
        };

        ShadingResult::opaque(Color::splat(1.0 - occlusion))
    }
}

/// Creates [`VoxelAoSurfaceShader`] instances.
pub struct VoxelAoSurfaceShaderFactory;

impl EntityFactory for VoxelAoSurfaceShaderFactory {
    fn model(&self) -> &'static str {
        MODEL
    }

    fn model_metadata(&self) -> ModelMetadata {
        ModelMetadata {
            name: MODEL,
            label: self.human_readable_model(),
        }
    }
}

impl SurfaceShaderFactory for VoxelAoSurfaceShaderFactory {
    fn human_readable_model(&self) -> &'static str {
        "Voxel-Based Ambient Occlusion (experimental)"
    }

    fn create(&self, name: &str, params: &ParamArray) -> Box<dyn SurfaceShader> {
        Box::new(VoxelAoSurfaceShader::new(name, params))
    }
}
