//! Core types for camviz-rs.
//!
//! This crate provides the value types the rest of camviz is built on:
//! - [`Quaternion`] and [`Pose`] for rigid camera and object transforms
//! - [`ScreenExtent`] / [`PixelRect`] for laying out viewports inside a window
//! - [`Options`] for window sizing and interaction speeds
//! - [`CamvizError`], the error type shared by all camviz crates

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Pixel math converts between f32 and u32 on purpose
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
// Short geometry names (w, x, y, z, fx, cx) read better than long ones
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod error;
pub mod options;
pub mod pose;
pub mod quaternion;
pub mod rect;

pub use error::{CamvizError, Result};
pub use options::{
    ControlOptions, KeyboardOptions, Options, SpeedPair, SpeedTier, SpeedTiers, WindowOptions,
    ZoomOptions,
};
pub use pose::{Axis, Pose, PoseSnapshot};
pub use quaternion::Quaternion;
pub use rect::{Coord, PixelRect, ScreenExtent};

// Re-export glam types for convenience
pub use glam::{Mat3, Mat4, UVec2, Vec2, Vec3, Vec4};
