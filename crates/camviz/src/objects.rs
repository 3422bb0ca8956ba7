//! Scene objects drawn under their own pose.
//!
//! Use [`Compositor::object`](crate::Compositor::object) to draw one: the
//! object's pose (optionally pre-multiplied by an alignment) is pushed as the
//! model transform around [`Drawable::draw`].

mod bbox;
mod camera;
mod point_cloud;

pub use bbox::{BBox2D, BBox3D};
pub use camera::CameraObject;
pub use point_cloud::{PointCloud, PointSource};

use camviz_core::{Pose, Result};
use camviz_render::Renderer;

use crate::compositor::Compositor;

/// Something with a pose that knows how to draw itself in its own frame.
pub trait Drawable {
    fn pose(&self) -> &Pose;

    /// Draws in object coordinates; the model transform is already set.
    fn draw<R: Renderer>(&self, draw: &mut Compositor<R>) -> Result<()>;
}
