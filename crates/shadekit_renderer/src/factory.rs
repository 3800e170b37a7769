//! Model factories and the registrars that look them up by model id.
//!
//! Every pluggable entity (BSDF, AOV, surface shader) comes with a factory
//! that describes the model and its inputs and creates instances from a
//! [`ParamArray`]. Descriptions serialize to JSON for tooling.

use std::collections::BTreeMap;

use serde::Serialize;
use shadekit_core::ParamArray;

use crate::aov::{Aov, PixelVariationAovFactory};
use crate::bsdf::{Bsdf, OrenNayarBrdfFactory};
use crate::surface_shader::{SurfaceShader, VoxelAoSurfaceShaderFactory};

/// Model identifier plus a label for user interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelMetadata {
    pub name: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputUse {
    Required,
    Optional,
}

/// Kind of entity that may be bound to an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityType {
    pub key: &'static str,
    pub label: &'static str,
}

/// Description of a single model input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputMetadata {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub input_type: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entity_types: Vec<EntityType>,
    #[serde(rename = "use")]
    pub usage: InputUse,
    pub default: &'static str,
}

/// Behavior common to every factory.
pub trait EntityFactory: Send + Sync {
    /// Unique model identifier.
    fn model(&self) -> &'static str;

    fn model_metadata(&self) -> ModelMetadata;
}

pub trait BsdfFactory: EntityFactory {
    fn input_metadata(&self) -> Vec<InputMetadata>;

    fn create(&self, name: &str, params: &ParamArray) -> Box<dyn Bsdf>;
}

pub trait AovFactory: EntityFactory {
    fn input_metadata(&self) -> Vec<InputMetadata> {
        Vec::new()
    }

    fn create(&self, params: &ParamArray) -> Box<dyn Aov>;
}

pub trait SurfaceShaderFactory: EntityFactory {
    /// Longer name shown in model pickers.
    fn human_readable_model(&self) -> &'static str;

    /// Inputs exposed for editing, in display order.
    fn widget_definitions(&self) -> Vec<InputMetadata> {
        Vec::new()
    }

    fn create(&self, name: &str, params: &ParamArray) -> Box<dyn SurfaceShader>;
}

/// Factories of one entity kind, keyed by model id.
pub struct Registrar<F: ?Sized + EntityFactory> {
    factories: BTreeMap<&'static str, Box<F>>,
}

impl<F: ?Sized + EntityFactory> Default for Registrar<F> {
    fn default() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }
}

impl<F: ?Sized + EntityFactory> Registrar<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any factory with the same model id.
    pub fn register(&mut self, factory: Box<F>) {
        let model = factory.model();
        if self.factories.insert(model, factory).is_some() {
            log::warn!("Replacing previously registered factory for model {}", model);
        }
    }

    pub fn lookup(&self, model: &str) -> Option<&F> {
        self.factories.get(model).map(|f| &**f)
    }

    /// Registered factories in model id order.
    pub fn factories(&self) -> impl Iterator<Item = &F> {
        self.factories.values().map(|f| &**f)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Registrar<dyn BsdfFactory> {
    pub fn with_builtin_models() -> Self {
        let mut registrar = Self::new();
        registrar.register(Box::new(OrenNayarBrdfFactory));
        registrar
    }
}

impl Registrar<dyn AovFactory> {
    pub fn with_builtin_models() -> Self {
        let mut registrar = Self::new();
        registrar.register(Box::new(PixelVariationAovFactory));
        registrar
    }
}

impl Registrar<dyn SurfaceShaderFactory> {
    pub fn with_builtin_models() -> Self {
        let mut registrar = Self::new();
        registrar.register(Box::new(VoxelAoSurfaceShaderFactory));
        registrar
    }
}

/// Serializable description of a registered model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelDescription {
    #[serde(flatten)]
    pub metadata: ModelMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_readable_name: Option<&'static str>,
    pub inputs: Vec<InputMetadata>,
}

/// Every built-in model, grouped by entity kind.
#[derive(Debug, Clone, Serialize)]
pub struct ModelCatalog {
    pub bsdfs: Vec<ModelDescription>,
    pub aovs: Vec<ModelDescription>,
    pub surface_shaders: Vec<ModelDescription>,
}

impl ModelCatalog {
    pub fn builtin() -> Self {
        let bsdfs = Registrar::<dyn BsdfFactory>::with_builtin_models()
            .factories()
            .map(|f| ModelDescription {
                metadata: f.model_metadata(),
                human_readable_name: None,
                inputs: f.input_metadata(),
            })
            .collect();
        let aovs = Registrar::<dyn AovFactory>::with_builtin_models()
            .factories()
            .map(|f| ModelDescription {
                metadata: f.model_metadata(),
                human_readable_name: None,
                inputs: f.input_metadata(),
            })
            .collect();
        let surface_shaders = Registrar::<dyn SurfaceShaderFactory>::with_builtin_models()
            .factories()
            .map(|f| ModelDescription {
                metadata: f.model_metadata(),
                human_readable_name: Some(f.human_readable_model()),
                inputs: f.widget_definitions(),
            })
            .collect();

        Self {
            bsdfs,
            aovs,
            surface_shaders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let bsdfs = Registrar::<dyn BsdfFactory>::with_builtin_models();
        let aovs = Registrar::<dyn AovFactory>::with_builtin_models();
        let shaders = Registrar::<dyn SurfaceShaderFactory>::with_builtin_models();

        assert_eq!(bsdfs.len(), 1);
        assert!(bsdfs.lookup("orennayar_brdf").is_some());
        assert!(aovs.lookup("pixel_variation_aov").is_some());
        assert!(shaders.lookup("voxel_ao_surface_shader").is_some());
        assert!(shaders.lookup("orennayar_brdf").is_none());
    }

    #[test]
    fn test_create_through_registrar() {
        let shaders = Registrar::<dyn SurfaceShaderFactory>::with_builtin_models();
        let factory = shaders.lookup("voxel_ao_surface_shader").unwrap();
        assert_eq!(
            factory.human_readable_model(),
            "Voxel-Based Ambient Occlusion (experimental)"
        );

        let shader = factory.create("ao", &ParamArray::new());
        assert_eq!(shader.name(), "ao");
        assert_eq!(shader.model(), "voxel_ao_surface_shader");

        let aovs = Registrar::<dyn AovFactory>::with_builtin_models();
        let aov = aovs.lookup("pixel_variation_aov").unwrap().create(&ParamArray::new());
        assert_eq!(aov.name(), "pixel_variation");
    }

    #[test]
    fn test_register_replaces() {
        let mut bsdfs = Registrar::<dyn BsdfFactory>::new();
        assert!(bsdfs.is_empty());
        bsdfs.register(Box::new(OrenNayarBrdfFactory));
        bsdfs.register(Box::new(OrenNayarBrdfFactory));
        assert_eq!(bsdfs.len(), 1);
    }

    #[test]
    fn test_catalog_serializes() {
        let catalog = ModelCatalog::builtin();
        let json = serde_json::to_value(&catalog).unwrap();

        let shader = &json["surface_shaders"][0];
        assert_eq!(shader["name"], "voxel_ao_surface_shader");
        assert_eq!(
            shader["human_readable_name"],
            "Voxel-Based Ambient Occlusion (experimental)"
        );

        assert_eq!(shader["inputs"], serde_json::json!([]));

        let brdf = &json["bsdfs"][0];
        assert_eq!(brdf["label"], "Oren-Nayar BRDF");
        assert_eq!(brdf["inputs"][0]["type"], "colormap");
        assert!(brdf.get("human_readable_name").is_none());

        assert_eq!(json["aovs"][0]["label"], "Pixel Variation");
    }
}
