//! Rigid transforms with incremental translate/rotate operations.

use std::fmt;

use glam::{Mat3, Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{CamvizError, Result};
use crate::quaternion::Quaternion;

/// One of the three coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    /// Column index of this axis.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Vector of length `m` along this axis.
    #[must_use]
    pub fn scaled(self, m: f32) -> Vec3 {
        match self {
            Axis::X => Vec3::new(m, 0.0, 0.0),
            Axis::Y => Vec3::new(0.0, m, 0.0),
            Axis::Z => Vec3::new(0.0, 0.0, m),
        }
    }
}

/// Row-major alignment applied by [`Pose::align`]: maps a lidar frame
/// (x forward, y left, z up) onto a camera frame (x right, y down, z forward).
const LIDAR_ALIGNMENT: [[f32; 4]; 4] = [
    [0.0, -1.0, 0.0, 0.0],
    [0.0, 0.0, -1.0, 0.0],
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// A rigid transform: a 4x4 homogeneous matrix kept in sync with a [`Quaternion`].
///
/// The matrix `M` has the rotation block in its upper-left 3x3 and the
/// translation in its last column. The rotation block is always the *transpose*
/// of the quaternion's rotation matrix; its columns are the pose's local axes
/// expressed in the parent frame.
///
/// Every mutator keeps `M[:3,:3] == q.to_rotation_matrix()^T` and the bottom
/// row equal to `[0, 0, 0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    matrix: Mat4,
    q: Quaternion,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// The identity pose.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
            q: Quaternion::IDENTITY,
        }
    }

    /// Creates a pose from a homogeneous matrix.
    ///
    /// The matrix is stored as given; the quaternion is extracted from its
    /// rotation block.
    #[must_use]
    pub fn from_matrix(matrix: Mat4) -> Self {
        let mut pose = Self::identity();
        pose.set_from_matrix(matrix);
        pose
    }

    /// Creates a pose from a flattened row-major 4x4 matrix (16 values) or a
    /// `(tx, ty, tz, qw, qx, qy, qz)` 7-tuple.
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        let mut pose = Self::identity();
        pose.set_from_vector(values)?;
        Ok(pose)
    }

    /// Creates a pose from translation and rotation.
    #[must_use]
    pub fn from_translation_rotation(translation: Vec3, q: Quaternion) -> Self {
        let mut pose = Self { matrix: Mat4::IDENTITY, q };
        pose.matrix.w_axis = translation.extend(1.0);
        pose.sync_rotation();
        pose
    }

    /// Replaces this pose from a flat slice.
    ///
    /// Accepts 16 values (row-major 4x4) or 7 values `(tx, ty, tz, qw, qx, qy, qz)`.
    /// Any other length is rejected with [`CamvizError::InvalidPoseFormat`].
    pub fn set_from_vector(&mut self, values: &[f32]) -> Result<()> {
        match *values {
            [tx, ty, tz, qw, qx, qy, qz] => {
                *self = Self::from_translation_rotation(
                    Vec3::new(tx, ty, tz),
                    Quaternion::new(qw, qx, qy, qz),
                );
                Ok(())
            }
            _ if values.len() == 16 => {
                let mut cols = [0.0; 16];
                cols.copy_from_slice(values);
                // Row-major input: reading it column-major gives the transpose.
                self.set_from_matrix(Mat4::from_cols_array(&cols).transpose());
                Ok(())
            }
            _ => Err(CamvizError::InvalidPoseFormat {
                shape: format!("[{}]", values.len()),
            }),
        }
    }

    /// Replaces this pose from a nested 4x4 row-major matrix.
    pub fn set_from_rows<R: AsRef<[f32]>>(&mut self, rows: &[R]) -> Result<()> {
        let widths: Vec<usize> = rows.iter().map(|r| r.as_ref().len()).collect();
        if rows.len() != 4 || widths.iter().any(|&w| w != 4) {
            let shape = match widths.first() {
                Some(w) if widths.iter().all(|x| x == w) => format!("[{}, {w}]", rows.len()),
                _ => format!("{widths:?}"),
            };
            return Err(CamvizError::InvalidPoseFormat { shape });
        }
        let flat: Vec<f32> = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        self.set_from_vector(&flat)
    }

    /// Replaces this pose with the given homogeneous matrix.
    pub fn set_from_matrix(&mut self, matrix: Mat4) {
        self.matrix = matrix;
        self.q = Quaternion::from_rotation_matrix(&Mat3::from_mat4(matrix).transpose());
    }

    /// Pre-multiplies the pose by the lidar-to-camera alignment and re-derives
    /// the quaternion.
    pub fn align(&mut self) -> &mut Self {
        let alignment = Mat4::from_cols_array_2d(&LIDAR_ALIGNMENT).transpose();
        self.set_from_matrix(alignment * self.matrix);
        self
    }

    /// Returns an aligned copy, see [`Pose::align`].
    #[must_use]
    pub fn aligned(mut self) -> Self {
        self.align();
        self
    }

    /// Resets to the identity pose.
    pub fn reset(&mut self) {
        *self = Self::identity();
    }

    /// Homogeneous matrix `M`.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// `M` transposed, the form used when points are multiplied as row vectors.
    #[must_use]
    pub fn transposed(&self) -> Mat4 {
        self.matrix.transpose()
    }

    /// Translation (last column of `M`).
    #[must_use]
    pub fn translation(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    /// Rotation block of `M`.
    #[must_use]
    pub fn rotation(&self) -> Mat3 {
        Mat3::from_mat4(self.matrix)
    }

    /// The quaternion driving the rotation block.
    #[must_use]
    pub fn quaternion(&self) -> Quaternion {
        self.q
    }

    /// Current local axis (a column of the rotation block).
    #[must_use]
    pub fn local_axis(&self, axis: Axis) -> Vec3 {
        self.rotation().col(axis.index())
    }

    /// Translates by `axis` expressed in the pose's local frame.
    pub fn translate(&mut self, axis: Vec3) -> &mut Self {
        let step = self.q.inverse_rotate_vector(axis);
        self.matrix.w_axis += step.extend(0.0);
        self
    }

    /// Translates `m` along the local X axis.
    pub fn translate_x(&mut self, m: f32) -> &mut Self {
        self.translate(Axis::X.scaled(m))
    }

    /// Translates `m` along the local Y axis.
    pub fn translate_y(&mut self, m: f32) -> &mut Self {
        self.translate(Axis::Y.scaled(m))
    }

    /// Translates `m` along the local Z axis.
    pub fn translate_z(&mut self, m: f32) -> &mut Self {
        self.translate(Axis::Z.scaled(m))
    }

    /// Rotates by `degrees` around `axis` (given in the parent frame).
    pub fn rotate(&mut self, degrees: f32, axis: Vec3) -> &mut Self {
        self.q = self.q.compose(&Quaternion::from_axis_degrees(axis, degrees));
        self.sync_rotation();
        self
    }

    /// Intrinsic rotation around the current local X axis.
    pub fn rotate_x(&mut self, degrees: f32) -> &mut Self {
        self.rotate(degrees, self.local_axis(Axis::X))
    }

    /// Intrinsic rotation around the current local Y axis.
    pub fn rotate_y(&mut self, degrees: f32) -> &mut Self {
        self.rotate(degrees, self.local_axis(Axis::Y))
    }

    /// Intrinsic rotation around the current local Z axis.
    pub fn rotate_z(&mut self, degrees: f32) -> &mut Self {
        self.rotate(degrees, self.local_axis(Axis::Z))
    }

    /// Extrinsic rotation around the fixed world X axis.
    pub fn rotate_i(&mut self, degrees: f32) -> &mut Self {
        self.rotate(degrees, Vec3::X)
    }

    /// Extrinsic rotation around the fixed world Y axis.
    pub fn rotate_j(&mut self, degrees: f32) -> &mut Self {
        self.rotate(degrees, Vec3::Y)
    }

    /// Extrinsic rotation around the fixed world Z axis.
    pub fn rotate_k(&mut self, degrees: f32) -> &mut Self {
        self.rotate(degrees, Vec3::Z)
    }

    /// Inverse transform: transposed rotation, translation `-R^T t`.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let r_t = self.rotation().transpose();
        let t = -(r_t * self.translation());
        Self {
            matrix: Mat4::from_cols(
                r_t.x_axis.extend(0.0),
                r_t.y_axis.extend(0.0),
                r_t.z_axis.extend(0.0),
                t.extend(1.0),
            ),
            q: self.q.invert(),
        }
    }

    /// Pose composition `self * other`.
    #[must_use]
    pub fn compose(&self, other: &Pose) -> Pose {
        Pose::from_matrix(self.matrix * other.matrix)
    }

    /// Applies the transform to a set of points.
    #[must_use]
    pub fn transform_points(&self, points: &[Vec3]) -> Vec<Vec3> {
        points
            .iter()
            .map(|&p| self.matrix.transform_point3(p))
            .collect()
    }

    /// Raw product `M * other^T`, for `other` holding one homogeneous row vector
    /// per row. Column `i` of the result is row `i` of `other` transformed.
    #[must_use]
    pub fn matrix_product(&self, other: &Mat4) -> Mat4 {
        self.matrix * other.transpose()
    }

    /// Snapshot of the current translation and quaternion.
    #[must_use]
    pub fn current7(&self) -> PoseSnapshot {
        let t = self.translation();
        let q = self.q;
        PoseSnapshot([t.x, t.y, t.z, q.w, q.x, q.y, q.z])
    }

    fn sync_rotation(&mut self) {
        let r = self.q.to_rotation_matrix().transpose();
        self.matrix = Mat4::from_cols(
            r.x_axis.extend(0.0),
            r.y_axis.extend(0.0),
            r.z_axis.extend(0.0),
            self.translation().extend(1.0),
        );
    }
}

impl From<PoseSnapshot> for Pose {
    fn from(snapshot: PoseSnapshot) -> Self {
        let [tx, ty, tz, qw, qx, qy, qz] = snapshot.0;
        Pose::from_translation_rotation(Vec3::new(tx, ty, tz), Quaternion::new(qw, qx, qy, qz))
    }
}

/// A pose as `(tx, ty, tz, qw, qx, qy, qz)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseSnapshot(pub [f32; 7]);

impl PoseSnapshot {
    /// Translation part.
    #[must_use]
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.0[0], self.0[1], self.0[2])
    }

    /// Quaternion part.
    #[must_use]
    pub fn quaternion(&self) -> Quaternion {
        Quaternion::new(self.0[3], self.0[4], self.0[5], self.0[6])
    }
}

impl fmt::Display for PoseSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [tx, ty, tz, qw, qx, qy, qz] = self.0;
        write!(
            f,
            "({tx:7.5}, {ty:7.5}, {tz:7.5}, {qw:1.5}, {qx:1.5}, {qy:1.5}, {qz:1.5})"
        )
    }
}
