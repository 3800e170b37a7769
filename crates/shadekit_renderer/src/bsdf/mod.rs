//! BSDF trait and the scattering vocabulary shared by its implementations.
//!
//! BSDFs are evaluated in world space: callers pass the shading basis and
//! the two directions, both pointing away from the surface.

pub mod oren_nayar;

use std::ops::BitOr;

use shadekit_core::SamplingContext;
use shadekit_math::{Basis3, Vec3};

pub use oren_nayar::{OrenNayarBrdf, OrenNayarBrdfFactory, OrenNayarBrdfInputValues};

/// Spectral quantity, one float per wavelength bucket (RGB).
pub type Spectrum = Vec3;

/// A single way light can scatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScatteringMode {
    Diffuse,
    Glossy,
    Specular,
}

impl ScatteringMode {
    fn bit(self) -> u8 {
        match self {
            ScatteringMode::Diffuse => 1,
            ScatteringMode::Glossy => 2,
            ScatteringMode::Specular => 4,
        }
    }
}

/// Set of scattering modes a caller is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScatteringModes(u8);

impl ScatteringModes {
    pub const NONE: Self = Self(0);
    pub const DIFFUSE: Self = Self(1);
    pub const GLOSSY: Self = Self(2);
    pub const SPECULAR: Self = Self(4);
    pub const ALL: Self = Self(7);

    pub fn contains(self, mode: ScatteringMode) -> bool {
        self.0 & mode.bit() != 0
    }

    pub fn has_diffuse(self) -> bool {
        self.contains(ScatteringMode::Diffuse)
    }

    pub fn has_glossy(self) -> bool {
        self.contains(ScatteringMode::Glossy)
    }

    pub fn has_specular(self) -> bool {
        self.contains(ScatteringMode::Specular)
    }
}

impl BitOr for ScatteringModes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<ScatteringMode> for ScatteringModes {
    fn from(mode: ScatteringMode) -> Self {
        Self(mode.bit())
    }
}

/// Which side(s) of the surface a BSDF scatters to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BsdfType {
    Reflective,
    Transmissive,
}

/// BSDF value split by shading component.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShadingComponents {
    pub diffuse: Spectrum,
    pub beauty: Spectrum,
}

impl ShadingComponents {
    /// Purely diffuse value; the beauty component mirrors it.
    pub fn from_diffuse(diffuse: Spectrum) -> Self {
        Self {
            diffuse,
            beauty: diffuse,
        }
    }
}

/// Result of evaluating a BSDF for a fixed pair of directions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BsdfEvaluation {
    pub value: ShadingComponents,
    /// Probability density of sampling `incoming` given `outgoing`.
    pub probability: f32,
}

/// Output of importance sampling an incoming direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BsdfSample {
    pub incoming: Vec3,
    pub value: ShadingComponents,
    pub probability: f32,
    pub mode: ScatteringMode,
}

/// Bidirectional scattering distribution function.
///
/// Implementations are pure functions of their configuration and arguments
/// and can be shared across rendering threads.
pub trait Bsdf: Send + Sync {
    /// Instance name given at creation.
    fn name(&self) -> &str;

    /// Model identifier of the factory that created this BSDF.
    fn model(&self) -> &'static str;

    fn bsdf_type(&self) -> BsdfType;

    /// Sample an incoming direction for light leaving along `outgoing`.
    ///
    /// Returns `None` if no requested mode can scatter in this configuration.
    fn sample(
        &self,
        sampling_context: &mut SamplingContext,
        outgoing: Vec3,
        shading_basis: &Basis3,
        modes: ScatteringModes,
    ) -> Option<BsdfSample>;

    /// Evaluate the BSDF value and sampling density for a direction pair.
    fn evaluate(
        &self,
        geometric_normal: Vec3,
        shading_basis: &Basis3,
        outgoing: Vec3,
        incoming: Vec3,
        modes: ScatteringModes,
    ) -> BsdfEvaluation;

    /// Density `sample` would assign to `incoming`, without the value.
    fn evaluate_pdf(
        &self,
        geometric_normal: Vec3,
        shading_basis: &Basis3,
        outgoing: Vec3,
        incoming: Vec3,
        modes: ScatteringModes,
    ) -> f32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scattering_modes() {
        assert!(ScatteringModes::ALL.has_diffuse());
        assert!(ScatteringModes::ALL.has_specular());
        assert!(!ScatteringModes::NONE.has_diffuse());
        assert!(!ScatteringModes::GLOSSY.has_diffuse());

        let mixed = ScatteringModes::DIFFUSE | ScatteringModes::SPECULAR;
        assert!(mixed.has_diffuse());
        assert!(!mixed.has_glossy());
        assert_eq!(ScatteringModes::from(ScatteringMode::Glossy), ScatteringModes::GLOSSY);
    }
}
