//! shadekit core - host-side collaborators for the shading models.
//!
//! This crate provides the pieces a renderer hands to the models:
//!
//! - **Scene**: meshes placed by instances, with geometry and instance version ids
//! - **ParamArray**: typed property dictionary used at construction time
//! - **Image / CropWindow**: frame buffers the AOVs post-process
//! - **SamplingContext**: deterministic uniform sample streams

pub mod frame;
pub mod mesh;
pub mod params;
pub mod sampling_context;
pub mod scene;

// Re-export commonly used types
pub use frame::{Color, CropWindow, Image};
pub use mesh::Mesh;
pub use params::{ParamArray, ParamError, ParamResult};
pub use sampling_context::SamplingContext;
pub use scene::{Instance, Prototype, Scene, Transform, VersionId};
