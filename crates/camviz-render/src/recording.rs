//! Headless renderer that records every command.
//!
//! Used by tests and by hosts that only need the draw stream (for example to
//! forward it elsewhere). When given a framebuffer it also honours `clear`,
//! so frame export works without a GPU.

use camviz_core::{CamvizError, PixelRect, Result};
use glam::{Mat4, UVec2, Vec3};
use image::RgbaImage;

use crate::color::Color;
use crate::projection::ViewState;
use crate::renderer::{BufferData, BufferHandle, Primitive, Renderer, TextureHandle};

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    SetViewport { rect: PixelRect, window_height: u32 },
    SetClearColor(Color),
    Clear,
    LoadView(ViewState),
    PushTransform(Mat4),
    PopTransform,
    SetColor(Color),
    SetPointSize(f32),
    SetLineWidth(f32),
    DrawVertices {
        primitive: Primitive,
        vertices: Vec<Vec3>,
        colors: Option<Vec<Color>>,
        indices: Option<Vec<u32>>,
    },
    DrawBuffers {
        primitive: Primitive,
        vertices: BufferHandle,
        colors: Option<BufferHandle>,
        indices: Option<BufferHandle>,
        count: usize,
    },
    DrawTexturedQuad {
        texture: TextureHandle,
        corners: [Vec3; 4],
    },
    CreateBuffer { handle: BufferHandle, len: usize },
    UpdateBuffer { handle: BufferHandle, len: usize },
    CreateTexture { handle: TextureHandle, size: UVec2 },
    UpdateTexture { handle: TextureHandle, size: UVec2 },
    Present,
}

/// A [`Renderer`] that keeps a log of commands instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<RenderCommand>,
    next_handle: u64,
    frames: usize,
    clear_color: Color,
    viewport: Option<(PixelRect, u32)>,
    transform_depth: usize,
    framebuffer: Option<(UVec2, Vec<u8>)>,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer backed by a CPU framebuffer of the given size, bottom row
    /// first like a GPU readback.
    #[must_use]
    pub fn with_framebuffer(size: UVec2) -> Self {
        let bytes = (size.x * size.y * 4) as usize;
        Self {
            framebuffer: Some((size, vec![0; bytes])),
            ..Self::default()
        }
    }

    /// All commands recorded so far.
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Drains the command log.
    pub fn take_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of `present` calls.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Current model transform nesting depth.
    #[must_use]
    pub fn transform_depth(&self) -> usize {
        self.transform_depth
    }

    /// Draw calls recorded so far, of either kind.
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    RenderCommand::DrawVertices { .. }
                        | RenderCommand::DrawBuffers { .. }
                        | RenderCommand::DrawTexturedQuad { .. }
                )
            })
            .count()
    }

    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn fill_viewport(&mut self) {
        let Some((size, pixels)) = self.framebuffer.as_mut() else {
            return;
        };
        let rgba = self.clear_color.to_rgba().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        let (x0, y0, x1, y1) = match self.viewport {
            Some((rect, window_height)) => {
                let (x, y, w, h) = rect.bottom_up(window_height);
                let x0 = x.max(0) as u32;
                let y0 = y.max(0) as u32;
                let x1 = (x.max(0) as u32 + w).min(size.x);
                let y1 = ((y + h as i32).max(0) as u32).min(size.y);
                (x0, y0, x1, y1)
            }
            None => (0, 0, size.x, size.y),
        };
        for row in y0..y1 {
            for col in x0..x1 {
                let at = ((row * size.x + col) * 4) as usize;
                pixels[at..at + 4].copy_from_slice(&rgba);
            }
        }
    }
}

impl Renderer for RecordingRenderer {
    fn set_viewport(&mut self, rect: PixelRect, window_height: u32) {
        self.viewport = Some((rect, window_height));
        self.commands.push(RenderCommand::SetViewport { rect, window_height });
    }

    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
        self.commands.push(RenderCommand::SetClearColor(color));
    }

    fn clear(&mut self) {
        self.fill_viewport();
        self.commands.push(RenderCommand::Clear);
    }

    fn load_view(&mut self, view: &ViewState) {
        self.commands.push(RenderCommand::LoadView(*view));
    }

    fn push_transform(&mut self, transform: Mat4) {
        self.transform_depth += 1;
        self.commands.push(RenderCommand::PushTransform(transform));
    }

    fn pop_transform(&mut self) {
        if self.transform_depth == 0 {
            log::warn!("pop_transform without a matching push");
        }
        self.transform_depth = self.transform_depth.saturating_sub(1);
        self.commands.push(RenderCommand::PopTransform);
    }

    fn set_color(&mut self, color: Color) {
        self.commands.push(RenderCommand::SetColor(color));
    }

    fn set_point_size(&mut self, size: f32) {
        self.commands.push(RenderCommand::SetPointSize(size));
    }

    fn set_line_width(&mut self, width: f32) {
        self.commands.push(RenderCommand::SetLineWidth(width));
    }

    fn draw_vertices(
        &mut self,
        primitive: Primitive,
        vertices: &[Vec3],
        colors: Option<&[Color]>,
        indices: Option<&[u32]>,
    ) {
        self.commands.push(RenderCommand::DrawVertices {
            primitive,
            vertices: vertices.to_vec(),
            colors: colors.map(<[Color]>::to_vec),
            indices: indices.map(<[u32]>::to_vec),
        });
    }

    fn draw_buffers(
        &mut self,
        primitive: Primitive,
        vertices: BufferHandle,
        colors: Option<BufferHandle>,
        indices: Option<BufferHandle>,
        count: usize,
    ) {
        self.commands.push(RenderCommand::DrawBuffers {
            primitive,
            vertices,
            colors,
            indices,
            count,
        });
    }

    fn draw_textured_quad(&mut self, texture: TextureHandle, corners: &[Vec3; 4]) {
        self.commands.push(RenderCommand::DrawTexturedQuad {
            texture,
            corners: *corners,
        });
    }

    fn create_buffer(&mut self, data: &BufferData) -> Result<BufferHandle> {
        let handle = BufferHandle(self.next_handle());
        self.commands.push(RenderCommand::CreateBuffer {
            handle,
            len: data.len(),
        });
        Ok(handle)
    }

    fn update_buffer(&mut self, handle: BufferHandle, data: &BufferData) -> Result<()> {
        self.commands.push(RenderCommand::UpdateBuffer {
            handle,
            len: data.len(),
        });
        Ok(())
    }

    fn create_texture(&mut self, size: UVec2, _image: Option<&RgbaImage>) -> Result<TextureHandle> {
        let handle = TextureHandle(self.next_handle());
        self.commands.push(RenderCommand::CreateTexture { handle, size });
        Ok(handle)
    }

    fn update_texture(&mut self, handle: TextureHandle, image: &RgbaImage) -> Result<()> {
        self.commands.push(RenderCommand::UpdateTexture {
            handle,
            size: UVec2::new(image.width(), image.height()),
        });
        Ok(())
    }

    fn read_pixels(&mut self, size: UVec2) -> Result<Vec<u8>> {
        match &self.framebuffer {
            Some((fb_size, pixels)) if *fb_size == size => Ok(pixels.clone()),
            Some((fb_size, _)) => Err(CamvizError::SizeMismatch {
                expected: (fb_size.x * fb_size.y * 4) as usize,
                actual: (size.x * size.y * 4) as usize,
            }),
            None => Ok(vec![0; (size.x * size.y * 4) as usize]),
        }
    }

    fn present(&mut self) {
        self.frames += 1;
        self.commands.push(RenderCommand::Present);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut r = RecordingRenderer::new();
        r.set_color(Color::RED);
        r.draw_vertices(Primitive::Points, &[Vec3::ZERO], None, None);
        r.present();
        assert_eq!(r.commands().len(), 3);
        assert_eq!(r.commands()[0], RenderCommand::SetColor(Color::RED));
        assert_eq!(r.draw_count(), 1);
        assert_eq!(r.frames(), 1);
        assert_eq!(r.take_commands().len(), 3);
        assert!(r.commands().is_empty());
    }

    #[test]
    fn test_handles_are_unique() {
        let mut r = RecordingRenderer::new();
        let a = r.create_buffer(&BufferData::Index(vec![])).unwrap();
        let b = r.create_buffer(&BufferData::Index(vec![])).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_clear_fills_viewport_bottom_up() {
        let mut r = RecordingRenderer::with_framebuffer(UVec2::new(2, 2));
        // Top half of a 2x2 window is the second row of a bottom-up buffer
        r.set_viewport(PixelRect::new(0, 0, 2, 1), 2);
        r.set_clear_color(Color::WHITE);
        r.clear();
        let pixels = r.read_pixels(UVec2::new(2, 2)).unwrap();
        assert_eq!(&pixels[..8], &[0; 8]);
        assert_eq!(&pixels[8..], &[255; 8]);
    }

    #[test]
    fn test_read_pixels_size_mismatch() {
        let mut r = RecordingRenderer::with_framebuffer(UVec2::new(2, 2));
        assert!(matches!(
            r.read_pixels(UVec2::new(3, 3)),
            Err(CamvizError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_transform_depth() {
        let mut r = RecordingRenderer::new();
        r.push_transform(Mat4::IDENTITY);
        r.push_transform(Mat4::IDENTITY);
        r.pop_transform();
        assert_eq!(r.transform_depth(), 1);
        r.pop_transform();
        r.pop_transform();
        assert_eq!(r.transform_depth(), 0);
    }
}
