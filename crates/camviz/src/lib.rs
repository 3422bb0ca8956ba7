//! camviz-rs: multi-viewport compositing and camera-pose control for
//! geometric data.
//!
//! A window is split into named viewports ("screens"). Each one is either a
//! 2D image viewport with pan and zoom, or a 3D world viewport driven by a
//! virtual camera [`Pose`]. Input is fed once per frame to a [`Dispatcher`],
//! which moves the camera or image window of the viewport under the pointer.
//! Drawing goes through the [`Compositor`] to a host-supplied [`Renderer`].
//!
//! # Quick Start
//!
//! ```no_run
//! use camviz::*;
//!
//! fn main() -> Result<()> {
//!     let mut compositor = Compositor::new(RecordingRenderer::new(), Options::default());
//!     compositor.add_2d_image("rgb", ScreenExtent::fractions(0.0, 0.0, 0.5, 1.0), None)?;
//!     compositor.add_3d_world("3d", ScreenExtent::fractions(0.5, 0.0, 1.0, 1.0), WorldConfig::new())?;
//!
//!     let cloud = PointCloud::new(vec![Vec3::new(0.0, 0.0, 5.0)]);
//!     let mut dispatcher = Dispatcher::default();
//!     let mut input = ScriptedInput::new(Vec::new());
//!     run(&mut compositor, &mut dispatcher, &mut input, |c, _| {
//!         c.clear(Color::BLACK);
//!         c.use_screen("3d")?.object(&cloud, None)?;
//!         Ok(())
//!     })
//! }
//! ```

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Builder-style drawing calls return &mut Self for chaining
#![allow(clippy::return_self_not_must_use)]
// Pixel math converts between f32 and u32 on purpose
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::module_name_repetitions)]

pub mod compositor;
pub mod input;
pub mod objects;
pub mod screen;

// Re-export core types
pub use camviz_core::{
    Axis, CamvizError, ControlOptions, Coord, KeyboardOptions, Options, PixelRect, Pose,
    PoseSnapshot, Quaternion, Result, ScreenExtent, SpeedTier, WindowOptions, Mat3, Mat4, UVec2,
    Vec2, Vec3, Vec4,
};

// Re-export render types
pub use camviz_render::{
    pinhole_intrinsics, BufferData, Color, NearFar, Primitive, RecordingRenderer, RenderCommand,
    Renderer, RgbaImage, ViewState,
};

pub use compositor::{Compositor, DrawStyle};
pub use input::{
    control, Dispatcher, DragState, Flow, FrameInput, InputEvent, InputSource, Key, KeyState,
    MotionType, MouseButton, ScriptedInput, WinitInput,
};
pub use objects::{BBox2D, BBox3D, CameraObject, Drawable, PointCloud, PointSource};
pub use screen::{
    ImageScreen, ImageWindow, ReferenceFrame, Screen, ScreenKind, ScreenMode, WorldConfig,
    WorldScreen,
};

/// Runs the blocking frame loop until the input asks to stop.
///
/// Each frame polls `input`, lets `dispatcher` apply it, calls `frame` to
/// draw, then presents (sleeping to honour `max_fps`).
pub fn run<R, I, F>(
    compositor: &mut Compositor<R>,
    dispatcher: &mut Dispatcher,
    input: &mut I,
    mut frame: F,
) -> Result<()>
where
    R: Renderer,
    I: InputSource,
    F: FnMut(&mut Compositor<R>, &Dispatcher) -> Result<()>,
{
    let _ = env_logger::try_init();
    log::info!(
        "camviz running with {} viewports",
        compositor.screens().len()
    );

    let mut frames = 0usize;
    loop {
        let polled = input.poll();
        if dispatcher.tick(compositor, &polled) == Flow::Stop {
            break;
        }
        frame(compositor, dispatcher)?;
        compositor.present();
        frames += 1;
    }

    log::info!("camviz stopped after {frames} frames");
    Ok(())
}
