//! Oren-Nayar BRDF.
//!
//! Reference:
//!
//!   Generalization of Lambert's Reflectance Model
//!   <http://www1.cs.columbia.edu/CAVE/publications/pdfs/Oren_SIGGRAPH94.pdf>
//!
//! Implements the qualitative model with the interreflection term. Zero
//! roughness reverts to Lambert.

use serde::Deserialize;
use shadekit_core::{ParamArray, SamplingContext};
use shadekit_math::sampling::sample_hemisphere_cosine;
use shadekit_math::scalar::{square, RCP_PI, RCP_PI_SQUARE};
use shadekit_math::{Basis3, Vec3};
use std::f32::consts::FRAC_PI_2;

use super::{
    Bsdf, BsdfEvaluation, BsdfSample, BsdfType, ScatteringMode, ScatteringModes,
    ShadingComponents, Spectrum,
};
use crate::factory::{
    BsdfFactory, EntityFactory, EntityType, InputMetadata, InputUse, ModelMetadata,
};

pub const MODEL: &str = "orennayar_brdf";

/// Material inputs of the Oren-Nayar BRDF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrenNayarBrdfInputValues {
    pub reflectance: Spectrum,
    pub reflectance_multiplier: f32,
    /// Standard deviation of the microfacet slopes; 0 is Lambertian.
    pub roughness: f32,
}

impl Default for OrenNayarBrdfInputValues {
    fn default() -> Self {
        Self {
            reflectance: Spectrum::splat(0.5),
            reflectance_multiplier: 1.0,
            roughness: 0.1,
        }
    }
}

/// A reflectance parameter given either as a gray level or an RGB triple.
#[derive(Deserialize)]
#[serde(untagged)]
enum SpectrumValue {
    Gray(f32),
    Rgb([f32; 3]),
}

impl OrenNayarBrdfInputValues {
    pub fn from_params(params: &ParamArray) -> Self {
        let defaults = Self::default();
        let reflectance = match params.get_required("reflectance", SpectrumValue::Gray(0.5)) {
            SpectrumValue::Gray(g) => Spectrum::splat(g),
            SpectrumValue::Rgb(rgb) => Spectrum::from_array(rgb),
        };
        Self {
            reflectance,
            reflectance_multiplier: params
                .get_optional("reflectance_multiplier", defaults.reflectance_multiplier),
            roughness: params.get_required("roughness", defaults.roughness),
        }
    }
}

/// Oren-Nayar rough diffuse reflection.
#[derive(Debug, Clone)]
pub struct OrenNayarBrdf {
    name: String,
    values: OrenNayarBrdfInputValues,
}

impl OrenNayarBrdf {
    pub fn new(name: impl Into<String>, params: &ParamArray) -> Self {
        Self::with_values(name, OrenNayarBrdfInputValues::from_params(params))
    }

    pub fn with_values(name: impl Into<String>, values: OrenNayarBrdfInputValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn values(&self) -> &OrenNayarBrdfInputValues {
        &self.values
    }

    /// BRDF value for a direction pair, `None` if either lies below the
    /// shading surface.
    fn compute_value(&self, outgoing: Vec3, incoming: Vec3, n: Vec3) -> Option<Spectrum> {
        // No reflection below the shading surface.
        let cos_on = outgoing.dot(n);
        let cos_in = incoming.dot(n);
        if cos_on < 0.0 || cos_in < 0.0 {
            return None;
        }

        let v = &self.values;
        if v.roughness != 0.0 {
            Some(oren_nayar_qualitative(
                cos_on,
                cos_in,
                v.roughness,
                v.reflectance,
                v.reflectance_multiplier,
                outgoing,
                incoming,
                n,
            ))
        } else {
            // Revert to Lambertian when roughness is zero.
            Some(v.reflectance * (v.reflectance_multiplier * RCP_PI))
        }
    }
}

impl Bsdf for OrenNayarBrdf {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &'static str {
        MODEL
    }

    fn bsdf_type(&self) -> BsdfType {
        BsdfType::Reflective
    }

    fn sample(
        &self,
        sampling_context: &mut SamplingContext,
        outgoing: Vec3,
        shading_basis: &Basis3,
        modes: ScatteringModes,
    ) -> Option<BsdfSample> {
        if !modes.has_diffuse() {
            return None;
        }

        // Compute the incoming direction in local space.
        sampling_context.split_in_place(2, 1);
        let wi = sample_hemisphere_cosine(sampling_context.next2());

        // Transform the incoming direction to parent space.
        let incoming = shading_basis.transform_to_parent(wi);

        let value = self.compute_value(outgoing, incoming, shading_basis.normal())?;

        let probability = wi.z * RCP_PI;
        debug_assert!(probability > 0.0);

        Some(BsdfSample {
            incoming,
            value: ShadingComponents::from_diffuse(value),
            probability,
            mode: ScatteringMode::Diffuse,
        })
    }

    fn evaluate(
        &self,
        _geometric_normal: Vec3,
        shading_basis: &Basis3,
        outgoing: Vec3,
        incoming: Vec3,
        modes: ScatteringModes,
    ) -> BsdfEvaluation {
        if !modes.has_diffuse() {
            return BsdfEvaluation::default();
        }

        let n = shading_basis.normal();
        match self.compute_value(outgoing, incoming, n) {
            Some(value) => BsdfEvaluation {
                value: ShadingComponents::from_diffuse(value),
                probability: incoming.dot(n) * RCP_PI,
            },
            None => BsdfEvaluation::default(),
        }
    }

    fn evaluate_pdf(
        &self,
        _geometric_normal: Vec3,
        shading_basis: &Basis3,
        outgoing: Vec3,
        incoming: Vec3,
        modes: ScatteringModes,
    ) -> f32 {
        if !modes.has_diffuse() {
            return 0.0;
        }

        // No reflection below the shading surface.
        let n = shading_basis.normal();
        let cos_in = incoming.dot(n);
        if cos_in < 0.0 || outgoing.dot(n) < 0.0 {
            return 0.0;
        }

        cos_in * RCP_PI
    }
}

#[allow(clippy::too_many_arguments)]
fn oren_nayar_qualitative(
    cos_on: f32,
    cos_in: f32,
    roughness: f32,
    reflectance: Spectrum,
    reflectance_multiplier: f32,
    outgoing: Vec3,
    incoming: Vec3,
    n: Vec3,
) -> Spectrum {
    let sigma2 = square(roughness);
    let theta_r = cos_on.min(1.0).acos().min(FRAC_PI_2);
    let theta_i = cos_in.min(1.0).acos().min(FRAC_PI_2);
    let alpha = theta_r.max(theta_i);
    let beta = theta_r.min(theta_i);

    // Project outgoing and incoming vectors onto the tangent plane
    // and compute the cosine of the angle between them.
    let v_perp_n = (outgoing - n * cos_on).normalize_or_zero();
    let i_perp_n = (incoming - n * cos_in).normalize_or_zero();
    let delta_cos_phi = v_perp_n.dot(i_perp_n);

    let c1 = 1.0 - 0.5 * (sigma2 / (sigma2 + 0.33));

    let sigma2_009 = sigma2 / (sigma2 + 0.09);
    let c2 = 0.45
        * sigma2_009
        * if delta_cos_phi >= 0.0 {
            alpha.sin()
        } else {
            alpha.sin() - (2.0 * beta * RCP_PI).powi(3)
        };
    debug_assert!(c2 >= 0.0);

    let c3 = 0.125 * sigma2_009 * square(4.0 * alpha * beta * RCP_PI_SQUARE);
    debug_assert!(c3 >= 0.0);

    // Direct illumination component.
    let direct = reflectance
        * (reflectance_multiplier
            * RCP_PI
            * (c1
                + delta_cos_phi * c2 * beta.tan()
                + (1.0 - delta_cos_phi.abs()) * c3 * (0.5 * (alpha + beta)).tan()));

    // Interreflection component.
    let interreflection = reflectance
        * reflectance
        * (0.17
            * square(reflectance_multiplier)
            * RCP_PI
            * cos_in
            * sigma2
            / (sigma2 + 0.13)
            * (1.0 - delta_cos_phi * square(2.0 * beta * RCP_PI)));

    (direct + interreflection).max(Spectrum::ZERO)
}

/// Creates [`OrenNayarBrdf`] instances.
pub struct OrenNayarBrdfFactory;

impl EntityFactory for OrenNayarBrdfFactory {
    fn model(&self) -> &'static str {
        MODEL
    }

    fn model_metadata(&self) -> ModelMetadata {
        ModelMetadata {
            name: MODEL,
            label: "Oren-Nayar BRDF",
        }
    }
}

impl BsdfFactory for OrenNayarBrdfFactory {
    fn input_metadata(&self) -> Vec<InputMetadata> {
        let textures = EntityType {
            key: "texture_instance",
            label: "Textures",
        };
        vec![
            InputMetadata {
                name: "reflectance",
                label: "Reflectance",
                input_type: "colormap",
                entity_types: vec![
                    EntityType {
                        key: "color",
                        label: "Colors",
                    },
                    textures,
                ],
                usage: InputUse::Required,
                default: "0.5",
            },
            InputMetadata {
                name: "reflectance_multiplier",
                label: "Reflectance Multiplier",
                input_type: "colormap",
                entity_types: vec![textures],
                usage: InputUse::Optional,
                default: "1.0",
            },
            InputMetadata {
                name: "roughness",
                label: "Roughness",
                input_type: "colormap",
                entity_types: vec![textures],
                usage: InputUse::Required,
                default: "0.1",
            },
        ]
    }

    fn create(&self, name: &str, params: &ParamArray) -> Box<dyn Bsdf> {
        Box::new(OrenNayarBrdf::new(name, params))
    }
}
