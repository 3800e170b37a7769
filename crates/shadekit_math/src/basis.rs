//! Orthonormal shading frames.

use crate::Vec3;

/// An orthonormal basis built around a surface normal.
///
/// Local coordinates put the normal on +Z, so a direction with a positive
/// local `z` lies in the upper hemisphere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Basis3 {
    normal: Vec3,
    tangent_u: Vec3,
    tangent_v: Vec3,
}

impl Basis3 {
    /// Build a basis from a unit normal, picking arbitrary tangents.
    pub fn from_normal(normal: Vec3) -> Self {
        debug_assert!(normal.is_normalized());
        let (tangent_u, tangent_v) = normal.any_orthonormal_pair();
        Self {
            normal,
            tangent_u,
            tangent_v,
        }
    }

    /// Build a basis from a unit normal and a tangent hint.
    ///
    /// The tangent is orthogonalized against the normal; if it is parallel to
    /// the normal an arbitrary tangent is used instead.
    pub fn new(normal: Vec3, tangent: Vec3) -> Self {
        debug_assert!(normal.is_normalized());
        match tangent.reject_from_normalized(normal).try_normalize() {
            Some(tangent_u) => Self {
                normal,
                tangent_u,
                tangent_v: normal.cross(tangent_u),
            },
            None => Self::from_normal(normal),
        }
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    #[inline]
    pub fn tangent_u(&self) -> Vec3 {
        self.tangent_u
    }

    #[inline]
    pub fn tangent_v(&self) -> Vec3 {
        self.tangent_v
    }

    /// Express a world-space vector in this basis.
    #[inline]
    pub fn transform_to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(v.dot(self.tangent_u), v.dot(self.tangent_v), v.dot(self.normal))
    }

    /// Express a local vector in world space.
    #[inline]
    pub fn transform_to_parent(&self, v: Vec3) -> Vec3 {
        self.tangent_u * v.x + self.tangent_v * v.y + self.normal * v.z
    }
}
