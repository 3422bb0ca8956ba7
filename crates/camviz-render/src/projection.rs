//! Projection and view derivation.
//!
//! All matrices follow the OpenGL clip-space convention (right-handed eye
//! space looking down -Z, depth in `[-1, 1]`). They are stored column-major,
//! the way glam lays out [`Mat4`].

use camviz_core::{Axis, Pose};
use glam::{Mat3, Mat4, UVec2, Vec2, Vec3};

/// Default vertical field of view for uncalibrated cameras, in degrees.
pub const DEFAULT_FOV_DEGREES: f32 = 45.0;

/// Near and far clip distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearFar {
    pub near: f32,
    pub far: f32,
}

impl NearFar {
    #[must_use]
    pub const fn new(near: f32, far: f32) -> Self {
        Self { near, far }
    }
}

impl Default for NearFar {
    fn default() -> Self {
        Self::new(0.01, 10000.0)
    }
}

impl From<(f32, f32)> for NearFar {
    fn from((near, far): (f32, f32)) -> Self {
        Self::new(near, far)
    }
}

/// Builds a pinhole intrinsics matrix `[[fx, 0, cx], [0, fy, cy], [0, 0, 1]]`.
#[must_use]
pub fn pinhole_intrinsics(fx: f32, fy: f32, cx: f32, cy: f32) -> Mat3 {
    intrinsics_from_rows([[fx, 0.0, cx], [0.0, fy, cy], [0.0, 0.0, 1.0]])
}

/// Builds an intrinsics matrix from its rows.
#[must_use]
pub fn intrinsics_from_rows(rows: [[f32; 3]; 3]) -> Mat3 {
    Mat3::from_cols_array_2d(&rows).transpose()
}

/// Perspective projection for a calibrated pinhole camera.
///
/// Maps pixel coordinates (origin at the top-left, y down) of a `wh`-sized
/// image to clip space, with the principal point moving the frustum off-axis.
#[must_use]
pub fn calibrated_projection(k: &Mat3, wh: UVec2, near_far: NearFar) -> Mat4 {
    let (w, h) = (wh.x as f32, wh.y as f32);
    let (fx, fy) = (k.x_axis.x, k.y_axis.y);
    let (cx, cy) = (k.z_axis.x, k.z_axis.y);
    let NearFar { near: n, far: f } = near_far;

    let mut p = [0.0f32; 16];
    p[0] = 2.0 * fx / w;
    p[5] = 2.0 * fy / h;
    p[8] = 2.0 * cx / w - 1.0;
    p[9] = 2.0 * cy / h - 1.0;
    p[10] = -(f + n) / (f - n);
    p[11] = -1.0;
    p[14] = -2.0 * f * n / (f - n);
    Mat4::from_cols_array(&p)
}

/// Symmetric perspective with a 45 degree vertical field of view.
#[must_use]
pub fn default_perspective(aspect: f32, near_far: NearFar) -> Mat4 {
    Mat4::perspective_rh_gl(
        DEFAULT_FOV_DEGREES.to_radians(),
        aspect,
        near_far.near,
        near_far.far,
    )
}

/// Orthographic projection over the visible image window `[min, max]`, with
/// the image origin at the top-left.
#[must_use]
pub fn image_orthographic(min: Vec2, max: Vec2) -> Mat4 {
    Mat4::orthographic_rh_gl(min.x, max.x, max.y, min.y, -1.0, 1.0)
}

/// View matrix looking from the pose's origin along its local +Z, with its
/// local -Y as the up direction.
#[must_use]
pub fn pose_view(pose: &Pose) -> Mat4 {
    let eye = pose.translation();
    let forward = pose.local_axis(Axis::Z);
    let up = -pose.local_axis(Axis::Y);
    Mat4::look_at_rh(eye, eye + forward, up)
}

/// Everything a renderer needs to set up a viewport's transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub projection: Mat4,
    pub view: Mat4,
    pub depth_test: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            depth_test: true,
        }
    }
}

impl ViewState {
    /// Combined `projection * view`.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Projects a world point to normalized device coordinates.
    #[must_use]
    pub fn project(&self, p: Vec3) -> Vec3 {
        self.view_projection().project_point3(p)
    }

    /// Uniform block layout of this state, for GPU-backed renderers.
    #[must_use]
    pub fn uniforms(&self) -> ViewUniforms {
        ViewUniforms {
            view: self.view.to_cols_array_2d(),
            proj: self.projection.to_cols_array_2d(),
            view_proj: self.view_projection().to_cols_array_2d(),
            depth_test: u32::from(self.depth_test),
            _padding: [0; 3],
        }
    }
}

/// GPU uniform layout of a [`ViewState`].
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct ViewUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub depth_test: u32,
    pub _padding: [u32; 3],
}

impl Default for ViewUniforms {
    fn default() -> Self {
        ViewState::default().uniforms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_calibrated_focal_terms() {
        let k = pinhole_intrinsics(1000.0, 1000.0, 960.0, 540.0);
        let p = calibrated_projection(&k, UVec2::new(1920, 1080), NearFar::new(0.1, 1000.0));
        let m = p.to_cols_array_2d();
        assert_eq!(m[0][0], 2.0 * 1000.0 / 1920.0);
        assert_eq!(m[1][1], 2.0 * 1000.0 / 1080.0);
        assert_eq!(m[2][3], -1.0);
        assert_eq!(m[3][3], 0.0);
    }

    #[test]
    fn test_calibrated_centered_principal_point() {
        let k = pinhole_intrinsics(500.0, 500.0, 320.0, 240.0);
        let nf = NearFar::new(0.1, 100.0);
        let p = calibrated_projection(&k, UVec2::new(640, 480), nf);
        let m = p.to_cols_array_2d();
        assert_eq!(m[2][0], 0.0);
        assert_eq!(m[2][1], 0.0);
        // Near and far planes map to -1 and 1
        let near = p * Vec4::new(0.0, 0.0, -0.1, 1.0);
        let far = p * Vec4::new(0.0, 0.0, -100.0, 1.0);
        assert!((near.z / near.w + 1.0).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_calibrated_offset_principal_point() {
        let k = pinhole_intrinsics(500.0, 500.0, 400.0, 240.0);
        let p = calibrated_projection(&k, UVec2::new(640, 480), NearFar::default());
        assert!((p.to_cols_array_2d()[2][0] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_default_perspective_matches_fov() {
        let p = default_perspective(2.0, NearFar::new(0.1, 10.0));
        let f = 1.0 / (22.5f32.to_radians()).tan();
        let m = p.to_cols_array_2d();
        assert!((m[1][1] - f).abs() < 1e-5);
        assert!((m[0][0] - f / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_image_orthographic_flips_y() {
        let p = image_orthographic(Vec2::ZERO, Vec2::new(640.0, 480.0));
        let top_left = p.project_point3(Vec3::ZERO);
        let bottom_right = p.project_point3(Vec3::new(640.0, 480.0, 0.0));
        assert!((top_left.x + 1.0).abs() < 1e-6 && (top_left.y - 1.0).abs() < 1e-6);
        assert!((bottom_right.x - 1.0).abs() < 1e-6 && (bottom_right.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_pose_view_looks_along_local_z() {
        let mut pose = Pose::identity();
        pose.translate_z(-5.0);
        let view = pose_view(&pose);
        // A point ahead of the camera lands on the -Z axis of eye space
        let ahead = view.transform_point3(Vec3::new(0.0, 0.0, 1.0));
        assert!(ahead.x.abs() < 1e-5 && ahead.y.abs() < 1e-5);
        assert!((ahead.z + 6.0).abs() < 1e-5);
        // Local +Y points down on screen
        let below = view.transform_point3(Vec3::new(0.0, 1.0, 0.0));
        assert!(below.y < 0.0);
    }

    #[test]
    fn test_uniforms_layout() {
        let uniforms = ViewState::default().uniforms();
        assert_eq!(uniforms.depth_test, 1);
        assert_eq!(bytemuck::bytes_of(&uniforms).len(), 3 * 64 + 16);
    }
}
