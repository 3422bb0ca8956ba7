//! 2D image viewports with pan and zoom.

use camviz_core::PixelRect;
use camviz_render::{image_orthographic, Color, ViewState};
use glam::{Mat4, Vec2};

/// An axis-aligned region of image space, `min` at the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageWindow {
    pub min: Vec2,
    pub max: Vec2,
}

impl ImageWindow {
    /// Window covering a whole image of the given resolution.
    #[must_use]
    pub fn full(resolution: Vec2) -> Self {
        Self {
            min: Vec2::ZERO,
            max: resolution,
        }
    }

    #[must_use]
    pub fn span(&self) -> Vec2 {
        self.max - self.min
    }

    /// Whether `other` lies entirely within this window.
    #[must_use]
    pub fn contains(&self, other: &ImageWindow) -> bool {
        other.min.cmpge(self.min).all() && other.max.cmple(self.max).all()
    }

    fn scaled_about(&self, anchor: Vec2, factor: f32) -> Self {
        Self {
            min: anchor + (self.min - anchor) * factor,
            max: anchor + (self.max - anchor) * factor,
        }
    }

    fn clamped_to(&self, bounds: &ImageWindow) -> Self {
        Self {
            min: self.min.max(bounds.min),
            max: self.max.min(bounds.max),
        }
    }
}

/// State of an image viewport: the visible window and the image bounds it
/// must stay inside.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageScreen {
    window: ImageWindow,
    bounds: ImageWindow,
    background: Color,
}

impl ImageScreen {
    /// Viewport showing a whole image of the given resolution on a white
    /// background.
    #[must_use]
    pub fn new(resolution: Vec2) -> Self {
        let bounds = ImageWindow::full(resolution);
        Self {
            window: bounds,
            bounds,
            background: Color::WHITE,
        }
    }

    #[must_use]
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Changes the image resolution. Both the bounds and the visible window
    /// are reset to the full new image.
    pub fn set_resolution(&mut self, resolution: Vec2) {
        self.bounds = ImageWindow::full(resolution);
        self.window = self.bounds;
    }

    /// Shows the whole image again.
    pub fn reset(&mut self) {
        self.window = self.bounds;
    }

    #[must_use]
    pub fn window(&self) -> ImageWindow {
        self.window
    }

    #[must_use]
    pub fn bounds(&self) -> ImageWindow {
        self.bounds
    }

    #[must_use]
    pub fn resolution(&self) -> Vec2 {
        self.bounds.span()
    }

    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    /// Whether the window differs from the full image.
    #[must_use]
    pub fn is_panned_or_zoomed(&self) -> bool {
        self.window != self.bounds
    }

    /// Maps a window pixel inside `rect` to image coordinates under the
    /// current visible window.
    #[must_use]
    pub fn pointer_to_image(&self, pointer: Vec2, rect: &PixelRect) -> Vec2 {
        let size = rect.size().as_vec2().max(Vec2::ONE);
        (pointer - rect.origin()) / size * self.window.span() + self.window.min
    }

    /// Zooms in around `anchor` (image coordinates) by `factor`.
    ///
    /// Rejected, returning `false`, if either side of the result would drop
    /// below `min_fraction` of the image span.
    pub fn zoom_in(&mut self, anchor: Vec2, factor: f32, min_fraction: f32) -> bool {
        let anchor = anchor.clamp(self.window.min, self.window.max);
        let candidate = self.window.scaled_about(anchor, 1.0 / factor);
        let limit = self.bounds.span() * min_fraction;
        if candidate.span().cmplt(limit).any() {
            log::debug!("zoom-in rejected: window span {:?} below {limit:?}", candidate.span());
            return false;
        }
        self.window = candidate.clamped_to(&self.bounds);
        true
    }

    /// Zooms out around `anchor` (image coordinates) by `factor`, never past
    /// the image bounds.
    pub fn zoom_out(&mut self, anchor: Vec2, factor: f32) {
        let anchor = anchor.clamp(self.window.min, self.window.max);
        self.window = self
            .window
            .scaled_about(anchor, factor)
            .clamped_to(&self.bounds);
    }

    /// Shifts the window by `delta` image pixels. The shift is undone on any
    /// axis where it would leave the image bounds.
    pub fn pan(&mut self, delta: Vec2) {
        let mut window = self.window;
        window.min.x += delta.x;
        window.max.x += delta.x;
        if window.min.x < self.bounds.min.x || window.max.x > self.bounds.max.x {
            window.min.x = self.window.min.x;
            window.max.x = self.window.max.x;
        }
        window.min.y += delta.y;
        window.max.y += delta.y;
        if window.min.y < self.bounds.min.y || window.max.y > self.bounds.max.y {
            window.min.y = self.window.min.y;
            window.max.y = self.window.max.y;
        }
        self.window = window;
    }

    /// Orthographic projection of the visible window, without depth testing.
    #[must_use]
    pub fn prepare(&self) -> ViewState {
        ViewState {
            projection: image_orthographic(self.window.min, self.window.max),
            view: Mat4::IDENTITY,
            depth_test: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn screen() -> ImageScreen {
        ImageScreen::new(Vec2::new(640.0, 480.0))
    }

    #[test]
    fn test_initial_state() {
        let s = screen();
        assert_eq!(s.window(), ImageWindow::full(Vec2::new(640.0, 480.0)));
        assert!(!s.is_panned_or_zoomed());
        assert_eq!(s.background(), Color::WHITE);
    }

    #[test]
    fn test_zoom_in_about_anchor() {
        let mut s = screen();
        assert!(s.zoom_in(Vec2::ZERO, 2.0, 0.05));
        let w = s.window();
        assert_eq!(w.min, Vec2::ZERO);
        assert_eq!(w.max, Vec2::new(320.0, 240.0));
        s.reset();
        assert!(!s.is_panned_or_zoomed());
    }

    #[test]
    fn test_zoom_in_stops_at_min_fraction() {
        let mut s = screen();
        let anchor = Vec2::new(320.0, 240.0);
        assert!(s.zoom_in(anchor, 10.0, 0.05));
        // 10% of the span left: another 10x would give 1%
        assert!(!s.zoom_in(anchor, 10.0, 0.05));
        assert!((s.window().span().x - 64.0).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_out_clamps_to_bounds() {
        let mut s = screen();
        s.zoom_in(Vec2::new(600.0, 400.0), 4.0, 0.05);
        for _ in 0..20 {
            s.zoom_out(Vec2::new(600.0, 400.0), 1.2);
        }
        assert_eq!(s.window(), s.bounds());
    }

    #[test]
    fn test_pan_reverts_per_axis() {
        let mut s = screen();
        s.zoom_in(Vec2::new(320.0, 240.0), 2.0, 0.05);
        let before = s.window();
        // X shift fits, Y shift does not
        s.pan(Vec2::new(50.0, 1000.0));
        assert_eq!(s.window().min.x, before.min.x + 50.0);
        assert_eq!(s.window().min.y, before.min.y);
    }

    #[test]
    fn test_set_resolution_resets_window() {
        let mut s = screen();
        s.zoom_in(Vec2::new(10.0, 10.0), 2.0, 0.05);
        s.set_resolution(Vec2::new(100.0, 50.0));
        assert_eq!(s.window(), ImageWindow::full(Vec2::new(100.0, 50.0)));
        assert_eq!(s.resolution(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_pointer_to_image() {
        let mut s = screen();
        let rect = PixelRect::new(100, 0, 320, 240);
        assert_eq!(s.pointer_to_image(Vec2::new(260.0, 120.0), &rect), Vec2::new(320.0, 240.0));
        s.zoom_in(Vec2::ZERO, 2.0, 0.05);
        assert_eq!(s.pointer_to_image(Vec2::new(260.0, 120.0), &rect), Vec2::new(160.0, 120.0));
    }

    #[test]
    fn test_prepare_disables_depth() {
        let view = screen().prepare();
        assert!(!view.depth_test);
        let corner = view.projection.project_point3(glam::Vec3::new(640.0, 480.0, 0.0));
        assert!((corner.x - 1.0).abs() < 1e-6 && (corner.y + 1.0).abs() < 1e-6);
    }

    #[derive(Debug, Clone)]
    enum Op {
        ZoomIn(f32, f32, bool),
        ZoomOut(f32, f32, bool),
        Pan(f32, f32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (-100.0f32..800.0, -100.0f32..600.0, any::<bool>()).prop_map(|(x, y, f)| Op::ZoomIn(x, y, f)),
            (-100.0f32..800.0, -100.0f32..600.0, any::<bool>()).prop_map(|(x, y, f)| Op::ZoomOut(x, y, f)),
            (-5000.0f32..5000.0, -5000.0f32..5000.0).prop_map(|(x, y)| Op::Pan(x, y)),
        ]
    }

    proptest! {
        #[test]
        fn prop_window_stays_within_bounds_and_above_min_span(
            ops in proptest::collection::vec(op_strategy(), 1..60)
        ) {
            let mut s = screen();
            let min_span = s.bounds().span() * 0.05;
            for op in ops {
                match op {
                    Op::ZoomIn(x, y, fast) => {
                        s.zoom_in(Vec2::new(x, y), if fast { 1.20 } else { 1.05 }, 0.05);
                    }
                    Op::ZoomOut(x, y, fast) => {
                        s.zoom_out(Vec2::new(x, y), if fast { 1.20 } else { 1.05 });
                    }
                    Op::Pan(x, y) => s.pan(Vec2::new(x, y)),
                }
                let w = s.window();
                prop_assert!(s.bounds().contains(&w), "{w:?} escaped bounds");
                prop_assert!(w.span().cmpge(min_span - 1e-2).all(), "{w:?} below minimum span");
            }
        }
    }
}
