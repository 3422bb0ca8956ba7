//! Configuration options for camviz.
//!
//! Every interaction constant used by the input dispatcher lives here so a
//! host can tune speeds from a JSON file without touching code.

use std::fs;
use std::path::Path;

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Window sizing and frame pacing.
    pub window: WindowOptions,
    /// Mouse and keyboard interaction speeds.
    pub controls: ControlOptions,
}

impl Options {
    /// Parses options from a JSON string. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes options as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Writes options to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

/// Window sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowOptions {
    /// Window title.
    pub title: String,
    /// Base size in pixels, before scaling.
    pub size: [u32; 2],
    /// Optional `(rows, cols)` multiplier: the window becomes `cols` base
    /// widths wide and `rows` base heights tall.
    pub grid: Option<[u32; 2]>,
    /// Scale applied to the base size.
    pub scale: f32,
    /// Fixed width; the height follows the scaled aspect ratio.
    pub width: Option<u32>,
    /// Maximum frames per second (0 = unlimited).
    pub max_fps: u32,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "camviz".to_string(),
            size: [1600, 900],
            grid: None,
            scale: 1.0,
            width: Some(1600),
            max_fps: 60,
        }
    }
}

impl WindowOptions {
    /// Final window size in pixels.
    #[must_use]
    pub fn resolved_size(&self) -> UVec2 {
        let mut w = (self.size[0] as f32 * self.scale) as u32;
        let mut h = (self.size[1] as f32 * self.scale) as u32;
        if let Some(width) = self.width {
            if w > 0 {
                h = width * h / w;
            }
            w = width;
        }
        if let Some([rows, cols]) = self.grid {
            w *= cols;
            h *= rows;
        }
        UVec2::new(w, h)
    }
}

/// Modifier-selected speed tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpeedTier {
    /// Right control held.
    Fast,
    /// Left control held.
    Slow,
    /// No modifier.
    #[default]
    Normal,
}

/// Step sizes for the three speed tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedTiers {
    pub fast: f32,
    pub slow: f32,
    pub normal: f32,
}

impl SpeedTiers {
    #[must_use]
    pub const fn new(fast: f32, slow: f32, normal: f32) -> Self {
        Self { fast, slow, normal }
    }

    /// Step size for a tier.
    #[must_use]
    pub fn pick(&self, tier: SpeedTier) -> f32 {
        match tier {
            SpeedTier::Fast => self.fast,
            SpeedTier::Slow => self.slow,
            SpeedTier::Normal => self.normal,
        }
    }
}

/// Two-level speed (no slow tier).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedPair {
    pub normal: f32,
    pub fast: f32,
}

impl SpeedPair {
    #[must_use]
    pub fn pick(&self, fast: bool) -> f32 {
        if fast {
            self.fast
        } else {
            self.normal
        }
    }
}

/// 2D zoom behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomOptions {
    /// Zoom factor per wheel step, plain and with the fast-zoom modifier.
    pub factor: SpeedPair,
    /// Zoom-in stops once the visible span would drop below this fraction of
    /// the image span.
    pub min_fraction: f32,
}

impl Default for ZoomOptions {
    fn default() -> Self {
        Self {
            factor: SpeedPair {
                normal: 1.05,
                fast: 1.20,
            },
            min_fraction: 0.05,
        }
    }
}

/// Keyboard pose control steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardOptions {
    /// Translation per frame.
    pub linear: f32,
    /// Rotation per frame, in degrees.
    pub angular: f32,
}

impl Default for KeyboardOptions {
    fn default() -> Self {
        Self {
            linear: 0.2,
            angular: 5.0,
        }
    }
}

/// Interaction speeds for mouse and keyboard controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlOptions {
    /// Wheel translation along the viewing axis.
    pub dolly: SpeedTiers,
    /// Wheel rotation about the viewing axis, in degrees.
    pub roll: SpeedTiers,
    /// Primary-drag translation per pixel.
    pub pan: SpeedTiers,
    /// Secondary-drag rotation per pixel, in degrees.
    pub look: SpeedTiers,
    /// 2D wheel zoom.
    pub zoom: ZoomOptions,
    /// 2D drag pan per pixel.
    pub image_pan: SpeedPair,
    /// Keyboard pose control.
    pub keyboard: KeyboardOptions,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            dolly: SpeedTiers::new(5.0, 0.5, 1.0),
            roll: SpeedTiers::new(5.0, 0.05, 0.5),
            pan: SpeedTiers::new(1.0, 0.02, 0.10),
            look: SpeedTiers::new(0.25, 0.01, 0.05),
            zoom: ZoomOptions::default(),
            image_pan: SpeedPair {
                normal: 1.0,
                fast: 5.0,
            },
            keyboard: KeyboardOptions::default(),
        }
    }
}
