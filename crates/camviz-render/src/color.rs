//! Named RGB colors.

use glam::Vec3;

/// An RGB color with components in `[0, 1]`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color(pub Vec3);

impl Color {
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    pub const MAGENTA: Self = Self::rgb(1.0, 0.0, 1.0);
    pub const CYAN: Self = Self::rgb(0.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const GRAY: Self = Self::rgb(0.5, 0.5, 0.5);

    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self(Vec3::new(r, g, b))
    }

    /// Looks up a color by its three-letter short name (`red`, `gre`, `blu`,
    /// `yel`, `mag`, `cya`, `blk`, `whi`, `gra`). Full English names work too.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name {
            "red" => Self::RED,
            "gre" | "green" => Self::GREEN,
            "blu" | "blue" => Self::BLUE,
            "yel" | "yellow" => Self::YELLOW,
            "mag" | "magenta" => Self::MAGENTA,
            "cya" | "cyan" => Self::CYAN,
            "blk" | "bla" | "black" => Self::BLACK,
            "whi" | "white" => Self::WHITE,
            "gra" | "gray" | "grey" => Self::GRAY,
            _ => return None,
        };
        Some(color)
    }

    /// The color scaled by `intensity`.
    #[must_use]
    pub fn scaled(self, intensity: f32) -> Self {
        Self(self.0 * intensity)
    }

    /// RGBA with an opaque alpha, as renderers usually want for clear colors.
    #[must_use]
    pub fn to_rgba(self) -> [f32; 4] {
        self.0.extend(1.0).to_array()
    }
}

impl From<Vec3> for Color {
    fn from(v: Vec3) -> Self {
        Self(v)
    }
}

impl From<[f32; 3]> for Color {
    fn from(c: [f32; 3]) -> Self {
        Self(Vec3::from_array(c))
    }
}
