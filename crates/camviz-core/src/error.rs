//! Error types for camviz-rs.

use thiserror::Error;

/// The main error type for camviz operations.
#[derive(Error, Debug)]
pub enum CamvizError {
    /// Pose input had a shape other than 16 values, 7 values or a 4x4 matrix.
    #[error("invalid pose format: expected 16 values, 7 values or a 4x4 matrix, got {shape}")]
    InvalidPoseFormat {
        /// Human-readable shape of the rejected input, e.g. `[5]` or `[3, 4]`.
        shape: String,
    },

    /// A viewport with the given name was not registered.
    #[error("viewport '{0}' not found")]
    UnknownViewport(String),

    /// A buffer with the given name was not registered.
    #[error("buffer '{0}' not found")]
    UnknownBuffer(String),

    /// A texture with the given name was not registered.
    #[error("texture '{0}' not found")]
    UnknownTexture(String),

    /// A viewport with the given name already exists.
    #[error("viewport '{0}' already exists")]
    ViewportExists(String),

    /// No viewport has been selected for drawing yet.
    #[error("no current viewport - call Compositor::use_screen() first")]
    NoCurrentViewport,

    /// The viewport exists but has the wrong mode for the requested operation.
    #[error("viewport '{name}' is not a {expected} viewport")]
    WrongViewportMode {
        /// Name of the viewport.
        name: String,
        /// Mode the operation needed.
        expected: &'static str,
    },

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Rendering or frame export error.
    #[error("render error: {0}")]
    RenderError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for camviz operations.
pub type Result<T> = std::result::Result<T, CamvizError>;
