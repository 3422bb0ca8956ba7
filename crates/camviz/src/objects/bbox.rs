use camviz_core::{Pose, Result};
use camviz_render::{Color, Primitive, Renderer};
use glam::Vec3;

use super::Drawable;
use crate::compositor::Compositor;

/// Vertex pairs for the 12 edges of a box given as two faces of 4 corners.
const BOX_EDGES: [u32; 24] = [
    0, 1, 1, 2, 2, 3, 3, 0, 4, 5, 5, 6, 6, 7, 7, 4, 0, 4, 1, 5, 2, 6, 3, 7,
];

const RECT_EDGES: [u32; 8] = [0, 1, 1, 2, 2, 3, 3, 0];

/// A 3D bounding box from its 8 corners around the box center.
///
/// Corner order is `+++`, `+-+`, `+--`, `++-`, `-++`, `--+`, `---`, `-+-`,
/// so corners 0..4 and 4..8 form the two opposite faces.
#[derive(Debug, Clone, PartialEq)]
pub struct BBox3D {
    pub pose: Pose,
    pub corners: [Vec3; 8],
    /// Edge color; `None` skips the edges.
    pub line_color: Option<Color>,
    /// Corner color; `None` skips the corner points.
    pub corner_color: Option<Color>,
}

impl BBox3D {
    pub fn new(corners: [Vec3; 8], pose: Pose) -> Self {
        Self {
            pose,
            corners,
            line_color: Some(Color::GREEN),
            corner_color: None,
        }
    }

    /// Axis-aligned box of the given full extents, centered on the origin.
    pub fn from_size(size: Vec3, pose: Pose) -> Self {
        let h = size * 0.5;
        let signs = [
            (1.0, 1.0, 1.0),
            (1.0, -1.0, 1.0),
            (1.0, -1.0, -1.0),
            (1.0, 1.0, -1.0),
            (-1.0, 1.0, 1.0),
            (-1.0, -1.0, 1.0),
            (-1.0, -1.0, -1.0),
            (-1.0, 1.0, -1.0),
        ];
        let corners = signs.map(|(x, y, z)| h * Vec3::new(x, y, z));
        Self::new(corners, pose)
    }

    #[must_use]
    pub fn with_colors(mut self, line: Option<Color>, corners: Option<Color>) -> Self {
        self.line_color = line;
        self.corner_color = corners;
        self
    }

    /// Corners in the parent frame.
    pub fn world_corners(&self) -> Vec<Vec3> {
        self.pose.transform_points(&self.corners)
    }
}

impl Drawable for BBox3D {
    fn pose(&self) -> &Pose {
        &self.pose
    }

    fn draw<R: Renderer>(&self, draw: &mut Compositor<R>) -> Result<()> {
        if let Some(color) = self.line_color {
            draw.color(color)
                .width(2.0)
                .vertices(Primitive::Lines, &self.corners, None, Some(&BOX_EDGES));
        }
        if let Some(color) = self.corner_color {
            draw.color(color).size(4.0).points(&self.corners);
        }
        Ok(())
    }
}

/// A 2D box on an image viewport, in image pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct BBox2D {
    pub pose: Pose,
    corners: [Vec3; 4],
    pub line_color: Option<Color>,
    pub corner_color: Option<Color>,
}

impl BBox2D {
    /// Box from its `left`, `top`, `right`, `bottom` edges.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            pose: Pose::identity(),
            corners: [
                Vec3::new(left, top, 0.0),
                Vec3::new(right, top, 0.0),
                Vec3::new(right, bottom, 0.0),
                Vec3::new(left, bottom, 0.0),
            ],
            line_color: Some(Color::GREEN),
            corner_color: None,
        }
    }

    #[must_use]
    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, line: Option<Color>, corners: Option<Color>) -> Self {
        self.line_color = line;
        self.corner_color = corners;
        self
    }

    /// Corners clockwise from the top-left.
    pub fn corners(&self) -> &[Vec3; 4] {
        &self.corners
    }
}

impl Drawable for BBox2D {
    fn pose(&self) -> &Pose {
        &self.pose
    }

    fn draw<R: Renderer>(&self, draw: &mut Compositor<R>) -> Result<()> {
        if let Some(color) = self.line_color {
            draw.color(color)
                .width(2.0)
                .vertices(Primitive::Lines, &self.corners, None, Some(&RECT_EDGES));
        }
        if let Some(color) = self.corner_color {
            draw.color(color).size(4.0).points(&self.corners);
        }
        Ok(())
    }
}
