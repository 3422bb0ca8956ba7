use camviz_core::{Pose, Result};
use camviz_render::{Color, Renderer};
use glam::Vec3;

use super::Drawable;
use crate::compositor::Compositor;

/// Where a point cloud's vertices live.
#[derive(Debug, Clone, PartialEq)]
pub enum PointSource {
    Points(Vec<Vec3>),
    /// A named compositor buffer.
    Buffer(String),
}

/// A set of points drawn in one color.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    pub pose: Pose,
    pub source: PointSource,
    pub color: Color,
    pub size: f32,
}

impl PointCloud {
    /// Point cloud drawn from raw points.
    pub fn new(points: Vec<Vec3>) -> Self {
        Self::with_source(PointSource::Points(points))
    }

    /// Point cloud drawn from an existing buffer.
    pub fn from_buffer(name: impl Into<String>) -> Self {
        Self::with_source(PointSource::Buffer(name.into()))
    }

    /// Uploads `points` into buffer `name` and draws from it.
    pub fn uploaded<R: Renderer>(
        draw: &mut Compositor<R>,
        name: impl Into<String>,
        points: Vec<Vec3>,
    ) -> Result<Self> {
        let name = name.into();
        draw.add_buffer(name.clone(), points)?;
        Ok(Self::from_buffer(name))
    }

    fn with_source(source: PointSource) -> Self {
        Self {
            pose: Pose::identity(),
            source,
            color: Color::WHITE,
            size: 1.0,
        }
    }

    #[must_use]
    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    #[must_use]
    pub fn with_style(mut self, color: Color, size: f32) -> Self {
        self.color = color;
        self.size = size;
        self
    }
}

impl Drawable for PointCloud {
    fn pose(&self) -> &Pose {
        &self.pose
    }

    fn draw<R: Renderer>(&self, draw: &mut Compositor<R>) -> Result<()> {
        draw.color(self.color).size(self.size);
        match &self.source {
            PointSource::Points(points) => {
                draw.points(points);
            }
            PointSource::Buffer(name) => {
                draw.points_buffer(name, None)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camviz_core::{CamvizError, Options};
    use camviz_render::{RecordingRenderer, RenderCommand};
    use glam::UVec2;

    fn compositor() -> Compositor<RecordingRenderer> {
        Compositor::with_size(RecordingRenderer::new(), Options::default(), UVec2::new(10, 10))
    }

    #[test]
    fn test_buffer_backed_cloud() {
        let mut c = compositor();
        let cloud = PointCloud::uploaded(&mut c, "lidar", vec![Vec3::X; 100])
            .unwrap()
            .with_style(Color::YELLOW, 2.0);
        c.object(&cloud, None).unwrap();
        assert!(c.renderer().commands().iter().any(|cmd| matches!(
            cmd,
            RenderCommand::DrawBuffers { count: 100, .. }
        )));
    }

    #[test]
    fn test_missing_buffer_still_pops_transform() {
        let mut c = compositor();
        let cloud = PointCloud::from_buffer("nope");
        assert!(matches!(c.object(&cloud, None), Err(CamvizError::UnknownBuffer(_))));
        assert_eq!(c.renderer().transform_depth(), 0);
    }

    #[test]
    fn test_alignment_premultiplies_pose() {
        let mut c = compositor();
        let mut pose = Pose::identity();
        pose.translate_z(2.0);
        let mut align = Pose::identity();
        align.translate_x(1.0);
        let cloud = PointCloud::new(vec![Vec3::ZERO]).with_pose(pose);
        c.object(&cloud, Some(&align)).unwrap();
        let expected = align.compose(&pose).matrix();
        assert!(c
            .renderer()
            .commands()
            .contains(&RenderCommand::PushTransform(expected)));
    }
}
