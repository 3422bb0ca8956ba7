//! The renderer seam.

use camviz_core::{PixelRect, Result};
use glam::{Mat4, UVec2, Vec2, Vec3};
use image::RgbaImage;

use crate::color::Color;
use crate::projection::ViewState;

/// Primitive topology for a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Quads,
    Triangles,
}

impl Primitive {
    /// Vertices consumed per primitive, `None` for strips and loops.
    #[must_use]
    pub fn vertices_per_primitive(self) -> Option<usize> {
        match self {
            Primitive::Points => Some(1),
            Primitive::Lines => Some(2),
            Primitive::Triangles => Some(3),
            Primitive::Quads => Some(4),
            Primitive::LineStrip | Primitive::LineLoop => None,
        }
    }
}

/// Opaque handle to a renderer-owned vertex, color or index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Opaque handle to a renderer-owned texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Typed contents of a buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum BufferData {
    /// 2D vertices.
    Float2(Vec<Vec2>),
    /// 3D vertices or RGB colors.
    Float3(Vec<Vec3>),
    /// Element indices.
    Index(Vec<u32>),
}

impl BufferData {
    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            BufferData::Float2(v) => v.len(),
            BufferData::Float3(v) => v.len(),
            BufferData::Index(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Components per element.
    #[must_use]
    pub fn dimension(&self) -> usize {
        match self {
            BufferData::Float2(_) => 2,
            BufferData::Float3(_) => 3,
            BufferData::Index(_) => 1,
        }
    }

    /// Raw bytes, ready for upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            BufferData::Float2(v) => bytemuck::cast_slice(v),
            BufferData::Float3(v) => bytemuck::cast_slice(v),
            BufferData::Index(v) => bytemuck::cast_slice(v),
        }
    }

    /// Same kind of data, no elements.
    #[must_use]
    pub fn emptied(&self) -> Self {
        match self {
            BufferData::Float2(_) => BufferData::Float2(Vec::new()),
            BufferData::Float3(_) => BufferData::Float3(Vec::new()),
            BufferData::Index(_) => BufferData::Index(Vec::new()),
        }
    }

    /// Quad indices for a `rows x cols` grid of vertices stored row-major,
    /// four per cell in winding order.
    #[must_use]
    pub fn grid_indices(rows: u32, cols: u32) -> Self {
        let mut idx = Vec::with_capacity(4 * (rows.saturating_sub(1) * cols.saturating_sub(1)) as usize);
        for i in 0..rows.saturating_sub(1) {
            for j in 0..cols.saturating_sub(1) {
                let k = i * cols + j;
                idx.extend_from_slice(&[k, k + 1, k + cols + 1, k + cols]);
            }
        }
        BufferData::Index(idx)
    }
}

impl From<Vec<Vec3>> for BufferData {
    fn from(v: Vec<Vec3>) -> Self {
        BufferData::Float3(v)
    }
}

impl From<Vec<Vec2>> for BufferData {
    fn from(v: Vec<Vec2>) -> Self {
        BufferData::Float2(v)
    }
}

impl From<Vec<u32>> for BufferData {
    fn from(v: Vec<u32>) -> Self {
        BufferData::Index(v)
    }
}

impl From<Vec<Color>> for BufferData {
    fn from(v: Vec<Color>) -> Self {
        BufferData::Float3(v.into_iter().map(|c| c.0).collect())
    }
}

/// Draw backend used by the compositor.
///
/// Implementations own all GPU state. camviz only decides what to draw and
/// under which transforms; it never uploads or binds anything itself.
pub trait Renderer {
    /// Restricts drawing and clearing to `rect`, given in top-left window
    /// pixels for a window `window_height` pixels tall.
    fn set_viewport(&mut self, rect: PixelRect, window_height: u32);

    /// Color used by [`Renderer::clear`].
    fn set_clear_color(&mut self, color: Color);

    /// Clears color and depth inside the current viewport.
    fn clear(&mut self);

    /// Loads projection and view transforms.
    fn load_view(&mut self, view: &ViewState);

    /// Pushes a model transform, multiplied onto the current one.
    fn push_transform(&mut self, transform: Mat4);

    /// Pops the last model transform.
    fn pop_transform(&mut self);

    fn set_color(&mut self, color: Color);

    fn set_point_size(&mut self, size: f32);

    fn set_line_width(&mut self, width: f32);

    /// Draws raw vertices, optionally with per-vertex colors and indices.
    fn draw_vertices(
        &mut self,
        primitive: Primitive,
        vertices: &[Vec3],
        colors: Option<&[Color]>,
        indices: Option<&[u32]>,
    );

    /// Draws `count` elements from renderer-owned buffers.
    fn draw_buffers(
        &mut self,
        primitive: Primitive,
        vertices: BufferHandle,
        colors: Option<BufferHandle>,
        indices: Option<BufferHandle>,
        count: usize,
    );

    /// Draws a texture on a quad. Corners map to texture coordinates
    /// `(1, 1)`, `(1, 0)`, `(0, 0)`, `(0, 1)` in that order.
    fn draw_textured_quad(&mut self, texture: TextureHandle, corners: &[Vec3; 4]);

    fn create_buffer(&mut self, data: &BufferData) -> Result<BufferHandle>;

    fn update_buffer(&mut self, handle: BufferHandle, data: &BufferData) -> Result<()>;

    fn create_texture(&mut self, size: UVec2, image: Option<&RgbaImage>) -> Result<TextureHandle>;

    fn update_texture(&mut self, handle: TextureHandle, image: &RgbaImage) -> Result<()>;

    /// Reads back the framebuffer as tightly packed RGBA rows, bottom row
    /// first.
    fn read_pixels(&mut self, size: UVec2) -> Result<Vec<u8>>;

    /// Swaps buffers.
    fn present(&mut self);
}
