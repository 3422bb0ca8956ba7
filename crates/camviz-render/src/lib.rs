//! Rendering seam for camviz-rs.
//!
//! camviz never talks to a graphics API directly. Everything it wants drawn
//! goes through the [`Renderer`] trait, which a host implements on top of its
//! graphics stack of choice. This crate provides:
//! - the [`Renderer`] trait, draw [`Primitive`]s and buffer/texture handles
//! - projection derivation for calibrated and default cameras ([`projection`])
//! - name-keyed buffer and texture registries
//! - frame export to PNG/JPEG ([`screenshot`])
//! - [`RecordingRenderer`], a headless renderer that logs every command

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Pixel math converts between f32 and u32 on purpose
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod buffer;
pub mod color;
pub mod projection;
pub mod recording;
pub mod renderer;
pub mod screenshot;
pub mod texture;

pub use buffer::BufferRegistry;
pub use color::Color;
pub use projection::{
    calibrated_projection, default_perspective, image_orthographic, intrinsics_from_rows,
    pinhole_intrinsics, pose_view, NearFar, ViewState, ViewUniforms,
};
pub use recording::{RecordingRenderer, RenderCommand};
pub use renderer::{BufferData, BufferHandle, Primitive, Renderer, TextureHandle};
pub use screenshot::{encode_png, flip_rows, save_image, ScreenshotError};
pub use texture::{Texture, TextureRegistry};

pub use image::RgbaImage;
