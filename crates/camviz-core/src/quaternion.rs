//! Minimal quaternion algebra backing [`Pose`](crate::Pose).
//!
//! Coefficients are stored as `(w, x, y, z)`. Every construction path produces a
//! unit quaternion, but nothing re-normalizes after [`Quaternion::compose`], so a
//! long chain of incremental rotations slowly drifts away from unit length.

use std::ops::Mul;

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A rotation expressed as four quaternion coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    /// Scalar part.
    pub w: f32,
    /// First vector coefficient.
    pub x: f32,
    /// Second vector coefficient.
    pub y: f32,
    /// Third vector coefficient.
    pub z: f32,
}

impl Quaternion {
    /// The identity rotation `(1, 0, 0, 0)`.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    /// Creates a quaternion from its coefficients.
    #[must_use]
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Rotation of `degrees` around `axis`.
    ///
    /// The axis is used as given; pass a unit vector to get a unit quaternion.
    #[must_use]
    pub fn from_axis_degrees(axis: Vec3, degrees: f32) -> Self {
        let (s, c) = (degrees.to_radians() * 0.5).sin_cos();
        Self::new(c, axis.x * s, axis.y * s, axis.z * s)
    }

    /// Extracts the rotation of a 3x3 rotation matrix with the trace formula.
    ///
    /// `w = sqrt(1 + trace) / 2` and the vector part comes from the off-diagonal
    /// differences divided by `4w`. Near a 180 degree rotation the trace tends
    /// to -1, `w` tends to zero and the result degenerates to NaN or infinity.
    #[must_use]
    pub fn from_rotation_matrix(m: &Mat3) -> Self {
        let r = |row: usize, col: usize| m.col(col)[row];
        let w = (1.0 + r(0, 0) + r(1, 1) + r(2, 2)).sqrt() / 2.0;
        let d = 4.0 * w;
        Self::new(
            w,
            (r(2, 1) - r(1, 2)) / d,
            (r(0, 2) - r(2, 0)) / d,
            (r(1, 0) - r(0, 1)) / d,
        )
    }

    /// Returns the coefficients as `[w, x, y, z]`.
    #[must_use]
    pub fn coefficients(&self) -> [f32; 4] {
        [self.w, self.x, self.y, self.z]
    }

    /// Returns the vector part `(x, y, z)`.
    #[must_use]
    pub fn vector(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Euclidean norm of the four coefficients.
    #[must_use]
    pub fn norm(&self) -> f32 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Hamilton product `self * other`: `other` applied in the frame already
    /// rotated by `self`.
    ///
    /// [`Pose`](crate::Pose) accumulates incremental rotations through this
    /// product, so the operand order decides intrinsic versus extrinsic.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        let (q, r) = (self, other);
        Self::new(
            r.w * q.w - r.x * q.x - r.y * q.y - r.z * q.z,
            r.w * q.x + r.x * q.w - r.y * q.z + r.z * q.y,
            r.w * q.y + r.x * q.z + r.y * q.w - r.z * q.x,
            r.w * q.z - r.x * q.y + r.y * q.x + r.z * q.w,
        )
    }

    /// Rotates `p` by this quaternion: `p + 2 (w (v x p) + v x (v x p))`.
    #[must_use]
    pub fn rotate_vector(&self, p: Vec3) -> Vec3 {
        let v = self.vector();
        let uv = v.cross(p);
        let uuv = v.cross(uv);
        p + 2.0 * (self.w * uv + uuv)
    }

    /// Rotates `p` by the inverse rotation, without building the inverse.
    ///
    /// For a unit quaternion this equals `self.invert().rotate_vector(p)`.
    #[must_use]
    pub fn inverse_rotate_vector(&self, p: Vec3) -> Vec3 {
        let v = self.vector();
        let uv = p.cross(v);
        let uuv = uv.cross(v);
        p + 2.0 * (self.w * uv + uuv)
    }

    /// Standard 3x3 rotation matrix of this quaternion.
    #[must_use]
    pub fn to_rotation_matrix(&self) -> Mat3 {
        let Self { w, x, y, z } = *self;
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let rows = [
            [1.0 - 2.0 * yy - 2.0 * zz, 2.0 * x * y - 2.0 * z * w, 2.0 * x * z + 2.0 * y * w],
            [2.0 * x * y + 2.0 * z * w, 1.0 - 2.0 * xx - 2.0 * zz, 2.0 * y * z - 2.0 * x * w],
            [2.0 * x * z - 2.0 * y * w, 2.0 * y * z + 2.0 * x * w, 1.0 - 2.0 * xx - 2.0 * yy],
        ];
        Mat3::from_cols_array_2d(&rows).transpose()
    }

    /// Conjugate divided by the norm.
    #[must_use]
    pub fn invert(&self) -> Self {
        let d = self.norm();
        Self::new(self.w / d, -self.x / d, -self.y / d, -self.z / d)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.compose(&rhs)
    }
}

impl From<Quat> for Quaternion {
    fn from(q: Quat) -> Self {
        Self::new(q.w, q.x, q.y, q.z)
    }
}

impl From<Quaternion> for Quat {
    fn from(q: Quaternion) -> Self {
        Quat::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    fn assert_mat_close(a: &Mat3, b: &Mat3, tol: f32) {
        let (a, b) = (a.to_cols_array(), b.to_cols_array());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < tol, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_identity() {
        let q = Quaternion::default();
        assert_eq!(q.coefficients(), [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(q.to_rotation_matrix(), Mat3::IDENTITY);
        assert_vec_close(q.rotate_vector(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_axis_degrees_rotates_vector() {
        let q = Quaternion::from_axis_degrees(Vec3::Z, 90.0);
        assert_vec_close(q.rotate_vector(Vec3::X), Vec3::Y);
        assert_vec_close(q.inverse_rotate_vector(Vec3::X), Vec3::NEG_Y);
        assert!((q.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_matrix_matches_glam() {
        let axis = Vec3::new(1.0, -2.0, 0.5).normalize();
        let q = Quaternion::from_axis_degrees(axis, 37.0);
        let expected = Mat3::from_quat(q.into());
        assert_mat_close(&q.to_rotation_matrix(), &expected, 1e-5);
    }

    #[test]
    fn test_compose_is_self_then_other() {
        let a = Quaternion::from_axis_degrees(Vec3::X, 30.0);
        let b = Quaternion::from_axis_degrees(Vec3::Y, 60.0);
        let composed: Quat = (a * b).into();
        let expected = Quat::from(a) * Quat::from(b);
        assert!(composed.abs_diff_eq(expected, 1e-6));
        // Not commutative
        let reversed: Quat = (b * a).into();
        assert!(!reversed.abs_diff_eq(expected, 1e-3));
    }

    #[test]
    fn test_invert() {
        let q = Quaternion::from_axis_degrees(Vec3::new(0.0, 0.6, 0.8), 75.0);
        let round = q.compose(&q.invert());
        assert!((round.w - 1.0).abs() < 1e-6);
        assert!(round.vector().length() < 1e-6);
        let p = Vec3::new(0.3, -1.0, 2.0);
        assert_vec_close(q.invert().rotate_vector(p), q.inverse_rotate_vector(p));
    }

    #[test]
    fn test_half_turn_is_degenerate() {
        // Trace of -1: w collapses to zero and the off-diagonal terms give 0/0.
        let half_turn = Mat3::from_diagonal(Vec3::new(1.0, -1.0, -1.0));
        let q = Quaternion::from_rotation_matrix(&half_turn);
        assert_eq!(q.w, 0.0);
        assert!(!q.x.is_finite());
    }

    proptest! {
        #[test]
        fn prop_matrix_round_trip(
            ax in -1.0f32..1.0,
            ay in -1.0f32..1.0,
            az in -1.0f32..1.0,
            degrees in -170.0f32..170.0,
        ) {
            let axis = Vec3::new(ax, ay, az);
            prop_assume!(axis.length() > 0.1);
            let r = Mat3::from_axis_angle(axis.normalize(), degrees.to_radians());
            let q = Quaternion::from_rotation_matrix(&r);
            assert_mat_close(&q.to_rotation_matrix(), &r, 1e-4);
        }
    }
}
