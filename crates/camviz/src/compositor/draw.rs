//! Drawing into the current viewport.

use camviz_core::{Pose, Result};
use camviz_render::{Color, Primitive, Renderer, RgbaImage};
use glam::Vec3;

use super::Compositor;
use crate::objects::Drawable;

/// Color, point size and line width applied to subsequent draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStyle {
    pub color: Color,
    pub size: f32,
    pub width: f32,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            size: 1.0,
            width: 1.0,
        }
    }
}

impl<R: Renderer> Compositor<R> {
    // ========================================================================
    // Style
    // ========================================================================

    pub fn color(&mut self, color: impl Into<Color>) -> &mut Self {
        self.style.color = color.into();
        self.renderer.set_color(self.style.color);
        self
    }

    /// Point size.
    pub fn size(&mut self, size: f32) -> &mut Self {
        self.style.size = size;
        self.renderer.set_point_size(size);
        self
    }

    /// Line width.
    pub fn width(&mut self, width: f32) -> &mut Self {
        self.style.width = width;
        self.renderer.set_line_width(width);
        self
    }

    /// Sets color, size and width at once.
    pub fn csw(&mut self, color: impl Into<Color>, size: f32, width: f32) -> &mut Self {
        self.color(color).size(size).width(width)
    }

    pub fn set_style(&mut self, style: DrawStyle) -> &mut Self {
        self.csw(style.color, style.size, style.width)
    }

    pub fn style(&self) -> DrawStyle {
        self.style
    }

    // ========================================================================
    // Raw vertices
    // ========================================================================

    /// Draws raw vertices with optional per-vertex colors and indices.
    ///
    /// 2D viewports use the `x`/`y` image coordinates of each vertex.
    pub fn vertices(
        &mut self,
        primitive: Primitive,
        vertices: &[Vec3],
        colors: Option<&[Color]>,
        indices: Option<&[u32]>,
    ) -> &mut Self {
        if let Some(colors) = colors {
            if colors.len() != vertices.len() {
                log::warn!(
                    "{} colors for {} vertices, drawing without colors",
                    colors.len(),
                    vertices.len()
                );
                self.renderer.draw_vertices(primitive, vertices, None, indices);
                return self;
            }
        }
        self.renderer.draw_vertices(primitive, vertices, colors, indices);
        self
    }

    pub fn points(&mut self, vertices: &[Vec3]) -> &mut Self {
        self.vertices(Primitive::Points, vertices, None, None)
    }

    /// Independent segments, one per vertex pair.
    pub fn lines(&mut self, vertices: &[Vec3]) -> &mut Self {
        self.vertices(Primitive::Lines, vertices, None, None)
    }

    /// A connected polyline.
    pub fn strips(&mut self, vertices: &[Vec3]) -> &mut Self {
        self.vertices(Primitive::LineStrip, vertices, None, None)
    }

    /// A closed polyline.
    pub fn line_loop(&mut self, vertices: &[Vec3]) -> &mut Self {
        self.vertices(Primitive::LineLoop, vertices, None, None)
    }

    pub fn quads(&mut self, vertices: &[Vec3]) -> &mut Self {
        self.vertices(Primitive::Quads, vertices, None, None)
    }

    pub fn tris(&mut self, vertices: &[Vec3]) -> &mut Self {
        self.vertices(Primitive::Triangles, vertices, None, None)
    }

    // ========================================================================
    // Named buffers
    // ========================================================================

    /// Draws from named buffers. With an index buffer, the index count is
    /// drawn; otherwise the vertex count.
    pub fn buffers(
        &mut self,
        primitive: Primitive,
        vertices: &str,
        colors: Option<&str>,
        indices: Option<&str>,
    ) -> Result<&mut Self> {
        let vertex_entry = self.buffers.get(vertices)?;
        let color_entry = colors.map(|name| self.buffers.get(name)).transpose()?;
        let index_entry = indices.map(|name| self.buffers.get(name)).transpose()?;

        let count = index_entry.map_or(vertex_entry.len, |e| e.len);
        let color_handle = match color_entry {
            Some(entry) if entry.len != vertex_entry.len => {
                log::warn!(
                    "color buffer has {} entries for {} vertices, drawing without colors",
                    entry.len,
                    vertex_entry.len
                );
                None
            }
            Some(entry) => Some(entry.handle),
            None => None,
        };
        self.renderer.draw_buffers(
            primitive,
            vertex_entry.handle,
            color_handle,
            index_entry.map(|e| e.handle),
            count,
        );
        Ok(self)
    }

    pub fn points_buffer(&mut self, vertices: &str, colors: Option<&str>) -> Result<&mut Self> {
        self.buffers(Primitive::Points, vertices, colors, None)
    }

    pub fn lines_buffer(&mut self, vertices: &str, colors: Option<&str>) -> Result<&mut Self> {
        self.buffers(Primitive::Lines, vertices, colors, None)
    }

    /// Indexed triangles, e.g. a mesh over a vertex grid.
    pub fn tris_buffer(
        &mut self,
        vertices: &str,
        indices: &str,
        colors: Option<&str>,
    ) -> Result<&mut Self> {
        self.buffers(Primitive::Triangles, vertices, colors, Some(indices))
    }

    // ========================================================================
    // Shapes
    // ========================================================================

    /// Segments from `center` to each of `points`.
    pub fn connects(&mut self, center: Vec3, points: &[Vec3]) -> &mut Self {
        let segments: Vec<Vec3> = points.iter().flat_map(|&p| [center, p]).collect();
        self.lines(&segments)
    }

    /// Segments between matching entries of `from` and `to`.
    pub fn matches(&mut self, from: &[Vec3], to: &[Vec3]) -> &mut Self {
        if from.len() != to.len() {
            log::warn!("matching {} points against {}", from.len(), to.len());
        }
        let segments: Vec<Vec3> = from.iter().zip(to).flat_map(|(&a, &b)| [a, b]).collect();
        self.lines(&segments)
    }

    /// Coordinate axes of length `scale` at `center`: X green, Y blue, Z red.
    pub fn axis(&mut self, scale: f32, center: Vec3) -> &mut Self {
        let vertices = [
            center,
            center + Vec3::X * scale,
            center,
            center + Vec3::Y * scale,
            center,
            center + Vec3::Z * scale,
        ];
        let colors = [
            Color::GREEN,
            Color::GREEN,
            Color::BLUE,
            Color::BLUE,
            Color::RED,
            Color::RED,
        ];
        self.vertices(Primitive::Lines, &vertices, Some(&colors), None)
    }

    // ========================================================================
    // Images
    // ========================================================================

    /// Draws a texture over the current 2D viewport's image space.
    ///
    /// With `fit`, the viewport's image resolution first becomes the
    /// texture's size.
    pub fn image(&mut self, texture: &str, fit: bool) -> Result<&mut Self> {
        let size = self.textures.get(texture)?.size.as_vec2();
        if fit {
            let screen = self.current_screen_mut()?;
            screen.image_mut()?.set_resolution(size);
            let view = screen.prepare();
            self.renderer.load_view(&view);
        }
        let corners = [
            Vec3::new(size.x, 0.0, 0.0),
            Vec3::new(size.x, size.y, 0.0),
            Vec3::new(0.0, size.y, 0.0),
            Vec3::ZERO,
        ];
        self.image_at(texture, &corners)
    }

    /// Uploads `data` into a texture, then draws it as [`Compositor::image`].
    pub fn image_with(&mut self, texture: &str, data: &RgbaImage, fit: bool) -> Result<&mut Self> {
        self.update_texture(texture, data)?;
        self.image(texture, fit)
    }

    /// Draws a texture on an arbitrary quad, unshaded.
    pub fn image_at(&mut self, texture: &str, corners: &[Vec3; 4]) -> Result<&mut Self> {
        let handle = self.textures.get(texture)?.handle;
        self.renderer.set_color(Color::WHITE);
        self.renderer.draw_textured_quad(handle, corners);
        self.renderer.set_color(self.style.color);
        Ok(self)
    }

    /// Fills several 2D viewports with textures: `(viewport, texture, data)`,
    /// uploading `data` first when given.
    pub fn populate<'a>(
        &mut self,
        entries: impl IntoIterator<Item = (&'a str, &'a str, Option<&'a RgbaImage>)>,
        fit: bool,
    ) -> Result<&mut Self> {
        for (screen, texture, data) in entries {
            self.use_screen(screen)?;
            match data {
                Some(data) => self.image_with(texture, data, fit)?,
                None => self.image(texture, fit)?,
            };
        }
        Ok(self)
    }

    // ========================================================================
    // Objects
    // ========================================================================

    /// Draws an object under its pose, optionally pre-multiplied by `align`.
    pub fn object<D: Drawable>(&mut self, object: &D, align: Option<&Pose>) -> Result<&mut Self> {
        let pose = match align {
            Some(align) => align.compose(object.pose()),
            None => *object.pose(),
        };
        self.renderer.push_transform(pose.matrix());
        let drawn = object.draw(self);
        self.renderer.pop_transform();
        drawn?;
        Ok(self)
    }
}
