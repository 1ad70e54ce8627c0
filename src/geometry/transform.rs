use crate::geometry::{Point3D, Rotation, RotationCatalog};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rigid transform from a scanner's local frame into the global frame.
///
/// Applying it rotates first, then translates. The translation is therefore
/// the scanner's own position in the global frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transform {
    pub rotation: Rotation,
    pub translation: Point3D,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn new(rotation: Rotation, translation: Point3D) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Rotation::identity(), Point3D::ORIGIN)
    }

    pub fn is_identity(&self) -> bool {
        self.rotation.is_identity() && self.translation == Point3D::ORIGIN
    }

    pub fn apply(&self, point: Point3D) -> Point3D {
        self.rotation.apply(point) + self.translation
    }

    pub fn apply_all(&self, points: &[Point3D]) -> Vec<Point3D> {
        points.iter().map(|&p| self.apply(p)).collect()
    }

    /// Global-to-local transform
    pub fn inverse(&self) -> Transform {
        let inverse_rotation = RotationCatalog::global().inverse(&self.rotation);
        Transform::new(inverse_rotation, -inverse_rotation.apply(self.translation))
    }

    /// Position of the scanner origin in the global frame
    pub fn position(&self) -> Point3D {
        self.translation
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rotation {} then translate ({})", self.rotation, self.translation)
    }
}
