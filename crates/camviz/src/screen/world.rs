//! 3D world viewports driven by a virtual camera pose.

use camviz_core::{PixelRect, Pose};
use camviz_render::{calibrated_projection, default_perspective, pose_view, Color, NearFar, ViewState};
use glam::{Mat3, Mat4, UVec2};

/// Frame in which "look" drags are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceFrame {
    /// x right, y down, z forward. Horizontal drags rotate about local Y.
    #[default]
    Camera,
    /// x forward, y left, z up. Horizontal drags rotate about local Z.
    Lidar,
}

/// Construction options for a [`WorldScreen`].
#[derive(Debug, Clone, PartialEq)]
pub struct WorldConfig {
    /// Virtual camera image size, used together with `intrinsics`.
    pub image_size: Option<UVec2>,
    /// Virtual camera intrinsics. Without them (or without `image_size`) the
    /// viewport uses a 45 degree perspective.
    pub intrinsics: Option<Mat3>,
    pub near_far: NearFar,
    pub background: Color,
    /// Initial camera pose, saved as the reset origin.
    pub pose: Option<Pose>,
    pub reference: ReferenceFrame,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            image_size: None,
            intrinsics: None,
            near_far: NearFar::default(),
            background: Color::BLACK,
            pose: None,
            reference: ReferenceFrame::Camera,
        }
    }
}

impl WorldConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calibrates the virtual camera.
    #[must_use]
    pub fn with_calibration(mut self, intrinsics: Mat3, image_size: UVec2) -> Self {
        self.intrinsics = Some(intrinsics);
        self.image_size = Some(image_size);
        self
    }

    #[must_use]
    pub fn with_near_far(mut self, near_far: impl Into<NearFar>) -> Self {
        self.near_far = near_far.into();
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    #[must_use]
    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = Some(pose);
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: ReferenceFrame) -> Self {
        self.reference = reference;
        self
    }
}

/// State of a 3D viewport: the live camera, its reset origin and projection.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldScreen {
    viewer: Pose,
    origin: Pose,
    projection: Option<Mat4>,
    near_far: NearFar,
    background: Color,
    reference: ReferenceFrame,
}

impl Default for WorldScreen {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl WorldScreen {
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        let mut screen = Self {
            viewer: Pose::identity(),
            origin: Pose::identity(),
            projection: None,
            near_far: config.near_far,
            background: config.background,
            reference: config.reference,
        };
        if let (Some(k), Some(wh)) = (config.intrinsics, config.image_size) {
            screen.calibrate(&k, wh, config.near_far);
        }
        if config.reference == ReferenceFrame::Lidar {
            screen.viewer.rotate_y(-90.0).rotate_z(90.0);
            screen.save_viewer();
        }
        if let Some(pose) = config.pose {
            screen.viewer = pose;
            screen.save_viewer();
        }
        screen
    }

    /// Derives the projection from pinhole intrinsics.
    pub fn calibrate(&mut self, k: &Mat3, image_size: UVec2, near_far: NearFar) {
        self.near_far = near_far;
        self.projection = Some(calibrated_projection(k, image_size, near_far));
    }

    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        self.projection.is_some()
    }

    /// Restores the viewer to the saved origin.
    pub fn reset(&mut self) {
        self.viewer = self.origin;
    }

    /// Saves the current viewer as the reset origin.
    pub fn save_viewer(&mut self) {
        self.origin = self.viewer;
    }

    #[must_use]
    pub fn viewer(&self) -> &Pose {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut Pose {
        &mut self.viewer
    }

    #[must_use]
    pub fn origin(&self) -> &Pose {
        &self.origin
    }

    #[must_use]
    pub fn near_far(&self) -> NearFar {
        self.near_far
    }

    #[must_use]
    pub fn reference(&self) -> ReferenceFrame {
        self.reference
    }

    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    /// Projection for a viewport of the given aspect ratio.
    #[must_use]
    pub fn projection(&self, aspect: f32) -> Mat4 {
        self.projection
            .unwrap_or_else(|| default_perspective(aspect, self.near_far))
    }

    /// Projection and view for drawing into `rect`, with depth testing.
    #[must_use]
    pub fn prepare(&self, rect: &PixelRect) -> ViewState {
        ViewState {
            projection: self.projection(rect.aspect()),
            view: pose_view(&self.viewer),
            depth_test: true,
        }
    }
}
