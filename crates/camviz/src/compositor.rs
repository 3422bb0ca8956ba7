//! The compositor: viewport registry, current viewport, resources and frame
//! export, all owned by the host's render loop.

mod draw;

pub use draw::DrawStyle;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use camviz_core::{CamvizError, Options, PixelRect, Result, ScreenExtent};
use camviz_render::buffer::BufferEntry;
use camviz_render::{
    flip_rows, save_image, BufferData, BufferRegistry, Color, Renderer, RgbaImage, Texture,
    TextureRegistry,
};
use glam::{UVec2, Vec2};
use image::RgbImage;

use crate::screen::{ImageScreen, Screen, ScreenKind, ScreenRegistry, WorldConfig, WorldScreen};

/// Owns the renderer and everything drawn through it.
///
/// Viewports are registered once, with rectangles resolved against the
/// window size at that moment. Drawing always targets the viewport selected
/// by [`Compositor::use_screen`].
pub struct Compositor<R: Renderer> {
    renderer: R,
    options: Options,
    window_size: UVec2,
    screens: ScreenRegistry,
    current: Option<String>,
    buffers: BufferRegistry,
    textures: TextureRegistry,
    style: DrawStyle,
    last_present: Option<Instant>,
}

impl<R: Renderer> Compositor<R> {
    /// Creates a compositor sized from `options.window`.
    pub fn new(renderer: R, options: Options) -> Self {
        let window_size = options.window.resolved_size();
        Self::with_size(renderer, options, window_size)
    }

    /// Creates a compositor for a window of exactly `window_size` pixels.
    pub fn with_size(renderer: R, options: Options, window_size: UVec2) -> Self {
        log::debug!("compositor window {}x{}", window_size.x, window_size.y);
        let mut compositor = Self {
            renderer,
            options,
            window_size,
            screens: ScreenRegistry::new(),
            current: None,
            buffers: BufferRegistry::new(),
            textures: TextureRegistry::new(),
            style: DrawStyle::default(),
            last_present: None,
        };
        compositor.set_style(DrawStyle::default());
        compositor
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn window_size(&self) -> UVec2 {
        self.window_size
    }

    pub fn screens(&self) -> &ScreenRegistry {
        &self.screens
    }

    pub fn screens_mut(&mut self) -> &mut ScreenRegistry {
        &mut self.screens
    }

    // ========================================================================
    // Viewport registration
    // ========================================================================

    /// Resolves an extent against the window.
    pub fn resolve(&self, extent: ScreenExtent) -> PixelRect {
        extent.resolve(self.window_size)
    }

    fn insert(&mut self, name: String, extent: ScreenExtent, kind: ScreenKind) -> Result<&mut Screen> {
        let rect = self.resolve(extent);
        log::debug!("viewport '{name}' at {rect:?}");
        self.screens.insert(Screen::new(name, rect, kind))
    }

    /// Registers a 2D image viewport.
    ///
    /// Without a resolution the image space matches the viewport's pixels.
    pub fn add_2d_image(
        &mut self,
        name: impl Into<String>,
        extent: ScreenExtent,
        resolution: Option<Vec2>,
    ) -> Result<&mut Screen> {
        let rect = self.resolve(extent);
        let resolution = resolution.unwrap_or_else(|| rect.size().as_vec2());
        let kind = ScreenKind::Image2D(ImageScreen::new(resolution));
        self.insert(name.into(), extent, kind)
    }

    /// Registers a 3D world viewport.
    pub fn add_3d_world(
        &mut self,
        name: impl Into<String>,
        extent: ScreenExtent,
        config: WorldConfig,
    ) -> Result<&mut Screen> {
        let kind = ScreenKind::World3D(WorldScreen::new(config));
        self.insert(name.into(), extent, kind)
    }

    /// `n` side-by-side image viewports named `{prefix}0`, `{prefix}1`, ...
    pub fn add_2d_image_row(
        &mut self,
        prefix: &str,
        extent: ScreenExtent,
        n: u32,
        resolution: Option<Vec2>,
    ) -> Result<Vec<String>> {
        let cells = extent.row(n, self.window_size);
        self.add_2d_image_cells(prefix, &cells, None, resolution)
    }

    /// `n` stacked image viewports named `{prefix}0`, `{prefix}1`, ...
    pub fn add_2d_image_column(
        &mut self,
        prefix: &str,
        extent: ScreenExtent,
        n: u32,
        resolution: Option<Vec2>,
    ) -> Result<Vec<String>> {
        let cells = extent.column(n, self.window_size);
        self.add_2d_image_cells(prefix, &cells, None, resolution)
    }

    /// A `rows x cols` grid of image viewports named `{prefix}{row}{col}`,
    /// returned row-major.
    pub fn add_2d_image_grid(
        &mut self,
        prefix: &str,
        extent: ScreenExtent,
        rows: u32,
        cols: u32,
        resolution: Option<Vec2>,
    ) -> Result<Vec<String>> {
        let cells = extent.split(rows, cols, self.window_size);
        self.add_2d_image_cells(prefix, &cells, Some(cols), resolution)
    }

    /// `n` side-by-side world viewports sharing one configuration.
    pub fn add_3d_world_row(
        &mut self,
        prefix: &str,
        extent: ScreenExtent,
        n: u32,
        config: &WorldConfig,
    ) -> Result<Vec<String>> {
        let cells = extent.row(n, self.window_size);
        self.add_3d_world_cells(prefix, &cells, None, config)
    }

    /// `n` stacked world viewports sharing one configuration.
    pub fn add_3d_world_column(
        &mut self,
        prefix: &str,
        extent: ScreenExtent,
        n: u32,
        config: &WorldConfig,
    ) -> Result<Vec<String>> {
        let cells = extent.column(n, self.window_size);
        self.add_3d_world_cells(prefix, &cells, None, config)
    }

    /// A `rows x cols` grid of world viewports named `{prefix}{row}{col}`.
    pub fn add_3d_world_grid(
        &mut self,
        prefix: &str,
        extent: ScreenExtent,
        rows: u32,
        cols: u32,
        config: &WorldConfig,
    ) -> Result<Vec<String>> {
        let cells = extent.split(rows, cols, self.window_size);
        self.add_3d_world_cells(prefix, &cells, Some(cols), config)
    }

    fn add_2d_image_cells(
        &mut self,
        prefix: &str,
        cells: &[ScreenExtent],
        grid_cols: Option<u32>,
        resolution: Option<Vec2>,
    ) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            let name = cell_name(prefix, i, grid_cols);
            self.add_2d_image(name.clone(), *cell, resolution)?;
            names.push(name);
        }
        Ok(names)
    }

    fn add_3d_world_cells(
        &mut self,
        prefix: &str,
        cells: &[ScreenExtent],
        grid_cols: Option<u32>,
        config: &WorldConfig,
    ) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            let name = cell_name(prefix, i, grid_cols);
            self.add_3d_world(name.clone(), *cell, config.clone())?;
            names.push(name);
        }
        Ok(names)
    }

    // ========================================================================
    // Current viewport
    // ========================================================================

    /// Selects the viewport subsequent draw calls target, loading its
    /// projection and view.
    pub fn use_screen(&mut self, name: &str) -> Result<&mut Self> {
        let screen = self.screens.get(name)?;
        let rect = screen.rect();
        let background = screen.background();
        let view = screen.prepare();
        self.renderer.set_viewport(rect, self.window_size.y);
        self.renderer.set_clear_color(background);
        self.renderer.load_view(&view);
        self.current = Some(name.to_string());
        Ok(self)
    }

    /// Name of the viewport selected for drawing.
    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_screen(&self) -> Result<&Screen> {
        let name = self.current.as_deref().ok_or(CamvizError::NoCurrentViewport)?;
        self.screens.get(name)
    }

    pub fn current_screen_mut(&mut self) -> Result<&mut Screen> {
        let name = self.current.as_deref().ok_or(CamvizError::NoCurrentViewport)?;
        self.screens.get_mut(name)
    }

    pub fn screen(&self, name: &str) -> Result<&Screen> {
        self.screens.get(name)
    }

    pub fn screen_mut(&mut self, name: &str) -> Result<&mut Screen> {
        self.screens.get_mut(name)
    }

    /// Clears the current viewport with its background color.
    pub fn clear_screen(&mut self) -> Result<&mut Self> {
        let background = self.current_screen()?.background();
        self.renderer.set_clear_color(background);
        self.renderer.clear();
        Ok(self)
    }

    /// Clears the whole window. Deselects the current viewport.
    pub fn clear(&mut self, color: Color) -> &mut Self {
        let full = PixelRect::new(0, 0, self.window_size.x, self.window_size.y);
        self.renderer.set_viewport(full, self.window_size.y);
        self.renderer.set_clear_color(color);
        self.renderer.clear();
        self.current = None;
        self
    }

    // ========================================================================
    // Buffers and textures
    // ========================================================================

    /// Creates (or replaces) a named buffer.
    pub fn add_buffer(&mut self, name: impl Into<String>, data: impl Into<BufferData>) -> Result<()> {
        self.buffers.add(&mut self.renderer, name, &data.into())?;
        Ok(())
    }

    pub fn update_buffer(&mut self, name: &str, data: impl Into<BufferData>) -> Result<()> {
        self.buffers.update(&mut self.renderer, name, &data.into())
    }

    /// Empties a named buffer, keeping it registered.
    pub fn clear_buffer(&mut self, name: &str) -> Result<()> {
        self.buffers.clear(&mut self.renderer, name)
    }

    pub fn buffer(&self, name: &str) -> Result<BufferEntry> {
        self.buffers.get(name)
    }

    /// Creates (or replaces) a named texture from an image.
    pub fn add_texture(&mut self, name: impl Into<String>, image: &RgbaImage) -> Result<Texture> {
        self.textures.add(&mut self.renderer, name, image)
    }

    /// Creates an uninitialized named texture.
    pub fn add_empty_texture(&mut self, name: impl Into<String>, size: UVec2) -> Result<Texture> {
        self.textures.add_empty(&mut self.renderer, name, size)
    }

    pub fn update_texture(&mut self, name: &str, image: &RgbaImage) -> Result<Texture> {
        self.textures.update(&mut self.renderer, name, image)
    }

    pub fn texture(&self, name: &str) -> Result<Texture> {
        self.textures.get(name)
    }

    // ========================================================================
    // Frames
    // ========================================================================

    /// Presents the frame, then sleeps as needed to stay under `max_fps`.
    pub fn present(&mut self) {
        self.renderer.present();
        let max_fps = self.options.window.max_fps;
        if max_fps > 0 {
            let budget = Duration::from_secs_f64(1.0 / f64::from(max_fps));
            if let Some(last) = self.last_present {
                let elapsed = last.elapsed();
                if elapsed < budget {
                    std::thread::sleep(budget - elapsed);
                }
            }
        }
        self.last_present = Some(Instant::now());
    }

    /// Blocks for `ms` milliseconds.
    pub fn halt(&self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }

    /// Reads the window back as a top-down RGBA image.
    pub fn read_frame(&mut self) -> Result<RgbaImage> {
        let size = self.window_size;
        let data = self.renderer.read_pixels(size)?;
        Ok(flip_rows(&data, size.x, size.y)?)
    }

    /// Reads the window back as a top-down RGB image.
    pub fn to_image(&mut self) -> Result<RgbImage> {
        let frame = self.read_frame()?;
        Ok(image::DynamicImage::ImageRgba8(frame).to_rgb8())
    }

    /// Saves the window to an image file (`.png`, `.jpg` or `.jpeg`).
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let size = self.window_size;
        let data = self.renderer.read_pixels(size)?;
        save_image(path, &data, size.x, size.y)?;
        Ok(())
    }

    /// Saves the window as `camviz_<timestamp>.png` inside `dir`.
    pub fn save_timestamped(&mut self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%3f");
        let path = dir.as_ref().join(format!("camviz_{timestamp}.png"));
        self.save(&path)?;
        Ok(path)
    }
}

/// Label for cell `i` of a layout: `{prefix}{row}{col}` for a grid,
/// `{prefix}{i}` for a single row or column.
fn cell_name(prefix: &str, i: usize, grid_cols: Option<u32>) -> String {
    match grid_cols {
        Some(cols) => {
            let cols = cols.max(1) as usize;
            format!("{prefix}{}{}", i / cols, i % cols)
        }
        None => format!("{prefix}{i}"),
    }
}
