//! Viewports ("screens"): named rectangles of the window with their own
//! projection and interaction state.

mod image;
mod world;

pub use self::image::{ImageScreen, ImageWindow};
pub use self::world::{ReferenceFrame, WorldConfig, WorldScreen};

use std::collections::HashMap;

use camviz_core::{CamvizError, PixelRect, Result};
use camviz_render::{Color, ViewState};
use glam::Vec2;

/// Viewport mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenMode {
    Image2D,
    World3D,
}

impl ScreenMode {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ScreenMode::Image2D => "2D image",
            ScreenMode::World3D => "3D world",
        }
    }
}

/// Mode-specific viewport state.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenKind {
    Image2D(ImageScreen),
    World3D(WorldScreen),
}

/// A registered viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    name: String,
    rect: PixelRect,
    kind: ScreenKind,
}

impl Screen {
    #[must_use]
    pub fn new(name: impl Into<String>, rect: PixelRect, kind: ScreenKind) -> Self {
        Self {
            name: name.into(),
            rect,
            kind,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pixel rectangle, fixed at registration.
    #[must_use]
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    #[must_use]
    pub fn mode(&self) -> ScreenMode {
        match self.kind {
            ScreenKind::Image2D(_) => ScreenMode::Image2D,
            ScreenKind::World3D(_) => ScreenMode::World3D,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &ScreenKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ScreenKind {
        &mut self.kind
    }

    /// Strict containment test against the pixel rectangle.
    #[must_use]
    pub fn inside(&self, pointer: Vec2) -> bool {
        self.rect.inside(pointer)
    }

    /// Projection and view state for drawing into this viewport.
    #[must_use]
    pub fn prepare(&self) -> ViewState {
        match &self.kind {
            ScreenKind::Image2D(image) => image.prepare(),
            ScreenKind::World3D(world) => world.prepare(&self.rect),
        }
    }

    #[must_use]
    pub fn background(&self) -> Color {
        match &self.kind {
            ScreenKind::Image2D(image) => image.background(),
            ScreenKind::World3D(world) => world.background(),
        }
    }

    #[must_use]
    pub fn as_image(&self) -> Option<&ImageScreen> {
        match &self.kind {
            ScreenKind::Image2D(image) => Some(image),
            ScreenKind::World3D(_) => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut ImageScreen> {
        match &mut self.kind {
            ScreenKind::Image2D(image) => Some(image),
            ScreenKind::World3D(_) => None,
        }
    }

    #[must_use]
    pub fn as_world(&self) -> Option<&WorldScreen> {
        match &self.kind {
            ScreenKind::World3D(world) => Some(world),
            ScreenKind::Image2D(_) => None,
        }
    }

    pub fn as_world_mut(&mut self) -> Option<&mut WorldScreen> {
        match &mut self.kind {
            ScreenKind::World3D(world) => Some(world),
            ScreenKind::Image2D(_) => None,
        }
    }

    /// The 2D state, or [`CamvizError::WrongViewportMode`].
    pub fn image_mut(&mut self) -> Result<&mut ImageScreen> {
        let name = self.name.clone();
        self.as_image_mut().ok_or(CamvizError::WrongViewportMode {
            name,
            expected: ScreenMode::Image2D.name(),
        })
    }

    /// The 3D state, or [`CamvizError::WrongViewportMode`].
    pub fn world_mut(&mut self) -> Result<&mut WorldScreen> {
        let name = self.name.clone();
        self.as_world_mut().ok_or(CamvizError::WrongViewportMode {
            name,
            expected: ScreenMode::World3D.name(),
        })
    }
}

/// Viewports by name, remembering registration order.
#[derive(Debug, Default)]
pub struct ScreenRegistry {
    screens: Vec<Screen>,
    index: HashMap<String, usize>,
}

impl ScreenRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a viewport. Names must be unique.
    pub fn insert(&mut self, screen: Screen) -> Result<&mut Screen> {
        if self.index.contains_key(&screen.name) {
            return Err(CamvizError::ViewportExists(screen.name));
        }
        let at = self.screens.len();
        self.index.insert(screen.name.clone(), at);
        self.screens.push(screen);
        Ok(&mut self.screens[at])
    }

    pub fn get(&self, name: &str) -> Result<&Screen> {
        self.index
            .get(name)
            .map(|&i| &self.screens[i])
            .ok_or_else(|| CamvizError::UnknownViewport(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Screen> {
        match self.index.get(name) {
            Some(&i) => Ok(&mut self.screens[i]),
            None => Err(CamvizError::UnknownViewport(name.to_string())),
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// First viewport, in registration order, strictly containing `pointer`.
    #[must_use]
    pub fn find_at(&self, pointer: Vec2) -> Option<&Screen> {
        self.screens.iter().find(|s| s.inside(pointer))
    }

    /// Viewports in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Screen> {
        self.screens.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Screen> {
        self.screens.iter_mut()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.screens.iter().map(Screen::name).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.screens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}
