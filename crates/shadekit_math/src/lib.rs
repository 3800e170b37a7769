// Re-export glam for convenience
pub use glam::*;

// Shading math types
mod aabb;
mod basis;
mod interval;
mod ray;
pub mod sampling;
pub mod scalar;
mod transform;

pub use aabb::Aabb;
pub use basis::Basis3;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;
