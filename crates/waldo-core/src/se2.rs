//! Planar rigid transforms (SE(2)).
//!
//! An [`Se2`] combines a rotation and a translation in the plane. It is the
//! building block for forward kinematics: a chain pose is the ordered
//! composition of per-joint transforms. Composition is associative but not
//! commutative.
//!
//! Non-finite inputs are not guarded here; NaN and infinity propagate
//! through the arithmetic and are the caller's responsibility.

use std::ops::Mul;

use nalgebra::{Rotation2, Vector2};

/// A planar rigid transform: rotation followed by translation.
///
/// The rotation is stored as a [`Rotation2`], which is orthonormal with
/// determinant 1 by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Se2 {
    /// Rotation part.
    pub rotation: Rotation2<f64>,
    /// Translation part.
    pub translation: Vector2<f64>,
}

impl Se2 {
    /// The identity transform (I, 0).
    pub fn identity() -> Self {
        Self {
            rotation: Rotation2::identity(),
            translation: Vector2::zeros(),
        }
    }

    /// Build a transform from a counter-clockwise rotation angle (radians)
    /// and a translation.
    pub fn from_angle_translation(angle: f64, translation: Vector2<f64>) -> Self {
        Self {
            rotation: Rotation2::new(angle),
            translation,
        }
    }

    /// Compose two transforms: `self` applied after `other` is applied to a
    /// point, i.e. `self.compose(&other).apply(p) == self.apply(other.apply(p))`.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            rotation: self.rotation * other.rotation,
            translation: self.rotation * other.translation + self.translation,
        }
    }

    /// The inverse transform. `T.inverse().compose(&T)` is the identity up
    /// to floating-point error.
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.inverse();
        Self {
            rotation: inv_rotation,
            translation: -(inv_rotation * self.translation),
        }
    }

    /// Apply the transform to a point: `R·p + t`.
    pub fn apply(&self, point: Vector2<f64>) -> Vector2<f64> {
        self.rotation * point + self.translation
    }

    /// The rotation angle in radians.
    pub fn angle(&self) -> f64 {
        self.rotation.angle()
    }
}

impl Default for Se2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Se2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.compose(&rhs)
    }
}

impl Mul<Vector2<f64>> for Se2 {
    type Output = Vector2<f64>;

    fn mul(self, rhs: Vector2<f64>) -> Vector2<f64> {
        self.apply(rhs)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
