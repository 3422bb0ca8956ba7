//! Viewport rectangles.
//!
//! A viewport is requested as a [`ScreenExtent`]: four corner coordinates
//! (left, up, right, bottom), each either a fraction of the window or an
//! absolute pixel position. The extent is resolved once, against the window
//! size at registration time, into a [`PixelRect`].

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

/// A single corner coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Coord {
    /// Fraction of the window extent along this axis.
    Fraction(f32),
    /// Absolute pixel position.
    Pixels(u32),
}

impl Coord {
    /// Resolves to pixels given the window extent along this axis.
    #[must_use]
    pub fn resolve(self, extent: u32) -> u32 {
        match self {
            Coord::Fraction(f) => (f * extent as f32) as u32,
            Coord::Pixels(p) => p,
        }
    }

    /// Distance from `self` to `end` in pixels.
    ///
    /// Same-kind coordinates are subtracted before conversion, so a fractional
    /// span truncates once instead of once per corner.
    #[must_use]
    pub fn span_to(self, end: Coord, extent: u32) -> u32 {
        match (self, end) {
            (Coord::Fraction(a), Coord::Fraction(b)) => ((b - a) * extent as f32) as u32,
            (Coord::Pixels(a), Coord::Pixels(b)) => b.saturating_sub(a),
            (a, b) => b.resolve(extent).saturating_sub(a.resolve(extent)),
        }
    }

    /// Point `i / n` of the way from `self` to `end`.
    fn lerp(self, end: Coord, i: u32, n: u32, extent: u32) -> Coord {
        match (self, end) {
            (Coord::Fraction(a), Coord::Fraction(b)) => {
                Coord::Fraction(a + (b - a) * i as f32 / n as f32)
            }
            (Coord::Pixels(a), Coord::Pixels(b)) => {
                Coord::Pixels(a + b.saturating_sub(a) * i / n)
            }
            (a, b) => {
                let (a, b) = (a.resolve(extent), b.resolve(extent));
                Coord::Pixels(a + b.saturating_sub(a) * i / n)
            }
        }
    }
}

impl From<f32> for Coord {
    fn from(f: f32) -> Self {
        Coord::Fraction(f)
    }
}

impl From<u32> for Coord {
    fn from(p: u32) -> Self {
        Coord::Pixels(p)
    }
}

/// Requested viewport corners: `(left, up, right, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenExtent {
    pub left: Coord,
    pub up: Coord,
    pub right: Coord,
    pub bottom: Coord,
}

impl Default for ScreenExtent {
    fn default() -> Self {
        Self::FULL
    }
}

impl ScreenExtent {
    /// The whole window.
    pub const FULL: Self = Self::fractions(0.0, 0.0, 1.0, 1.0);

    /// Creates an extent from arbitrary corner coordinates.
    pub fn new(
        left: impl Into<Coord>,
        up: impl Into<Coord>,
        right: impl Into<Coord>,
        bottom: impl Into<Coord>,
    ) -> Self {
        Self {
            left: left.into(),
            up: up.into(),
            right: right.into(),
            bottom: bottom.into(),
        }
    }

    /// Extent given entirely in window fractions.
    #[must_use]
    pub const fn fractions(left: f32, up: f32, right: f32, bottom: f32) -> Self {
        Self {
            left: Coord::Fraction(left),
            up: Coord::Fraction(up),
            right: Coord::Fraction(right),
            bottom: Coord::Fraction(bottom),
        }
    }

    /// Extent given entirely in pixels.
    #[must_use]
    pub const fn pixels(left: u32, up: u32, right: u32, bottom: u32) -> Self {
        Self {
            left: Coord::Pixels(left),
            up: Coord::Pixels(up),
            right: Coord::Pixels(right),
            bottom: Coord::Pixels(bottom),
        }
    }

    /// Resolves the extent against a window size.
    #[must_use]
    pub fn resolve(&self, window: UVec2) -> PixelRect {
        PixelRect {
            left: self.left.resolve(window.x),
            up: self.up.resolve(window.y),
            width: self.left.span_to(self.right, window.x),
            height: self.up.span_to(self.bottom, window.y),
        }
    }

    /// Splits the extent into a `rows x cols` grid of equal cells, row-major.
    ///
    /// `window` is only consulted when a pair of opposite corners mixes
    /// fractions and pixels.
    #[must_use]
    pub fn split(&self, rows: u32, cols: u32, window: UVec2) -> Vec<ScreenExtent> {
        let (rows, cols) = (rows.max(1), cols.max(1));
        let mut cells = Vec::with_capacity((rows * cols) as usize);
        for i in 0..rows {
            let up = self.up.lerp(self.bottom, i, rows, window.y);
            let bottom = self.up.lerp(self.bottom, i + 1, rows, window.y);
            for j in 0..cols {
                cells.push(ScreenExtent {
                    left: self.left.lerp(self.right, j, cols, window.x),
                    up,
                    right: self.left.lerp(self.right, j + 1, cols, window.x),
                    bottom,
                });
            }
        }
        cells
    }

    /// `n` side-by-side cells.
    #[must_use]
    pub fn row(&self, n: u32, window: UVec2) -> Vec<ScreenExtent> {
        self.split(1, n, window)
    }

    /// `n` stacked cells.
    #[must_use]
    pub fn column(&self, n: u32, window: UVec2) -> Vec<ScreenExtent> {
        self.split(n, 1, window)
    }
}

/// A resolved viewport rectangle in window pixels, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: u32,
    pub up: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(left: u32, up: u32, width: u32, height: u32) -> Self {
        Self { left, up, width, height }
    }

    /// Strict containment; points on the border are outside.
    #[must_use]
    pub fn inside(&self, p: Vec2) -> bool {
        let (l, u) = (self.left as f32, self.up as f32);
        p.x > l && p.x < l + self.width as f32 && p.y > u && p.y < u + self.height as f32
    }

    /// Width and height.
    #[must_use]
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left as f32, self.up as f32)
    }

    /// Width over height, 1.0 for an empty rectangle.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// `(x, y, width, height)` with the origin at the bottom-left of a window
    /// `window_height` pixels tall, the form graphics APIs expect for
    /// viewports and scissor boxes.
    #[must_use]
    pub fn bottom_up(&self, window_height: u32) -> (i32, i32, u32, u32) {
        let y = i64::from(window_height) - i64::from(self.up) - i64::from(self.height);
        (self.left as i32, y as i32, self.width, self.height)
    }
}
