use camviz_core::{Pose, Result};
use camviz_render::{Color, Renderer};
use glam::{Mat3, UVec2, Vec2, Vec3};

use super::Drawable;
use crate::compositor::Compositor;

/// A pinhole camera placed in the scene.
///
/// Converts between image pixels, camera coordinates (x right, y down,
/// z forward) and world coordinates, and draws as a frustum whose far face
/// sits at depth `scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraObject {
    pub pose: Pose,
    k: Mat3,
    k_inv: Mat3,
    size: UVec2,
    scale: f32,
    frustum: [Vec3; 5],
    /// Texture drawn on the far face of the frustum.
    pub texture: Option<String>,
    pub show_axes: bool,
    pub color: Color,
}

impl CameraObject {
    /// Camera with intrinsics `k` for images of `size` pixels.
    pub fn new(k: Mat3, size: UVec2, scale: f32) -> Self {
        if k.determinant() == 0.0 {
            log::warn!("camera intrinsics are singular");
        }
        let k_inv = k.inverse();
        let mut camera = Self {
            pose: Pose::identity(),
            k,
            k_inv,
            size,
            scale,
            frustum: [Vec3::ZERO; 5],
            texture: None,
            show_axes: true,
            color: Color::GRAY,
        };
        let (w, h) = (size.x as f32, size.y as f32);
        let corners = camera.i2c(
            &[
                Vec2::new(w - 1.0, 0.0),
                Vec2::new(w - 1.0, h - 1.0),
                Vec2::new(0.0, h - 1.0),
                Vec2::ZERO,
            ],
            scale,
        );
        camera.frustum[..4].copy_from_slice(&corners);
        camera
    }

    #[must_use]
    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    #[must_use]
    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    #[must_use]
    pub fn intrinsics(&self) -> Mat3 {
        self.k
    }

    #[must_use]
    pub fn image_size(&self) -> UVec2 {
        self.size
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Far-face corners (in drawing order) followed by the camera center.
    #[must_use]
    pub fn frustum(&self) -> &[Vec3; 5] {
        &self.frustum
    }

    /// Back-projects pixels to camera coordinates at a fixed depth.
    #[must_use]
    pub fn i2c(&self, uv: &[Vec2], depth: f32) -> Vec<Vec3> {
        uv.iter()
            .map(|p| self.k_inv * p.extend(1.0) * depth)
            .collect()
    }

    /// Back-projects pixels to camera coordinates, one depth per pixel.
    #[must_use]
    pub fn i2c_depths(&self, uv: &[Vec2], depths: &[f32]) -> Vec<Vec3> {
        uv.iter()
            .zip(depths)
            .map(|(p, &d)| self.k_inv * p.extend(1.0) * d)
            .collect()
    }

    /// Projects camera coordinates to pixels.
    #[must_use]
    pub fn c2i(&self, xyz: &[Vec3]) -> Vec<Vec2> {
        xyz.iter().map(|&p| self.project(p)).collect()
    }

    /// Projects camera coordinates to pixels, keeping only points in front
    /// of the camera that land inside the image grown by `padding`.
    ///
    /// Returns `(index, pixel, depth)` for each kept point.
    #[must_use]
    pub fn c2i_visible(&self, xyz: &[Vec3], padding: f32) -> Vec<(usize, Vec2, f32)> {
        let max = self.size.as_vec2() + padding;
        xyz.iter()
            .enumerate()
            .filter(|(_, p)| p.z > 0.0)
            .map(|(i, &p)| (i, self.project(p), p.z))
            .filter(|(_, uv, _)| uv.cmpgt(Vec2::splat(-padding)).all() && uv.cmplt(max).all())
            .collect()
    }

    /// Camera to world coordinates.
    #[must_use]
    pub fn c2w(&self, xyz: &[Vec3]) -> Vec<Vec3> {
        self.pose.transform_points(xyz)
    }

    /// World to camera coordinates.
    #[must_use]
    pub fn w2c(&self, xyz: &[Vec3]) -> Vec<Vec3> {
        self.pose.inverse().transform_points(xyz)
    }

    /// Pixels at a fixed depth to world coordinates.
    #[must_use]
    pub fn i2w(&self, uv: &[Vec2], depth: f32) -> Vec<Vec3> {
        self.c2w(&self.i2c(uv, depth))
    }

    /// World coordinates to pixels.
    #[must_use]
    pub fn w2i(&self, xyz: &[Vec3]) -> Vec<Vec2> {
        self.c2i(&self.w2c(xyz))
    }

    fn project(&self, p: Vec3) -> Vec2 {
        (self.k * (p / p.z)).truncate()
    }
}

impl Drawable for CameraObject {
    fn pose(&self) -> &Pose {
        &self.pose
    }

    fn draw<R: Renderer>(&self, draw: &mut Compositor<R>) -> Result<()> {
        let corners = [self.frustum[0], self.frustum[1], self.frustum[2], self.frustum[3]];
        if let Some(texture) = &self.texture {
            draw.image_at(texture, &corners)?;
        }
        draw.color(self.color)
            .width(4.0)
            .connects(self.frustum[4], &corners)
            .line_loop(&corners);
        if self.show_axes {
            draw.axis(0.25 * self.scale, Vec3::ZERO);
        }
        Ok(())
    }
}
