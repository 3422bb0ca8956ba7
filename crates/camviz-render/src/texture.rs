//! Name-keyed texture registry.

use std::collections::HashMap;

use camviz_core::{CamvizError, Result};
use glam::UVec2;
use image::RgbaImage;

use crate::renderer::{Renderer, TextureHandle};

/// A renderer texture and its pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture {
    pub handle: TextureHandle,
    pub size: UVec2,
}

/// Maps texture names to renderer textures.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    textures: HashMap<String, Texture>,
}

impl TextureRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a texture from an image, replacing any texture of the same name.
    pub fn add(
        &mut self,
        renderer: &mut dyn Renderer,
        name: impl Into<String>,
        image: &RgbaImage,
    ) -> Result<Texture> {
        let size = UVec2::new(image.width(), image.height());
        self.insert(renderer, name.into(), size, Some(image))
    }

    /// Creates an uninitialized texture of the given size.
    pub fn add_empty(
        &mut self,
        renderer: &mut dyn Renderer,
        name: impl Into<String>,
        size: UVec2,
    ) -> Result<Texture> {
        self.insert(renderer, name.into(), size, None)
    }

    fn insert(
        &mut self,
        renderer: &mut dyn Renderer,
        name: String,
        size: UVec2,
        image: Option<&RgbaImage>,
    ) -> Result<Texture> {
        let handle = renderer.create_texture(size, image)?;
        let texture = Texture { handle, size };
        log::debug!("texture '{name}' created at {}x{}", size.x, size.y);
        self.textures.insert(name, texture);
        Ok(texture)
    }

    /// Uploads new contents; the texture takes the image's size.
    pub fn update(
        &mut self,
        renderer: &mut dyn Renderer,
        name: &str,
        image: &RgbaImage,
    ) -> Result<Texture> {
        let texture = self
            .textures
            .get_mut(name)
            .ok_or_else(|| CamvizError::UnknownTexture(name.to_string()))?;
        renderer.update_texture(texture.handle, image)?;
        texture.size = UVec2::new(image.width(), image.height());
        Ok(*texture)
    }

    /// Looks up a texture.
    pub fn get(&self, name: &str) -> Result<Texture> {
        self.textures
            .get(name)
            .copied()
            .ok_or_else(|| CamvizError::UnknownTexture(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingRenderer;

    #[test]
    fn test_update_resizes() {
        let mut renderer = RecordingRenderer::new();
        let mut textures = TextureRegistry::new();
        textures
            .add_empty(&mut renderer, "rgb", UVec2::new(4, 4))
            .unwrap();
        let updated = textures
            .update(&mut renderer, "rgb", &RgbaImage::new(64, 32))
            .unwrap();
        assert_eq!(updated.size, UVec2::new(64, 32));
        assert_eq!(textures.get("rgb").unwrap().size, UVec2::new(64, 32));
    }

    #[test]
    fn test_unknown_texture() {
        let textures = TextureRegistry::new();
        assert!(matches!(
            textures.get("depth"),
            Err(CamvizError::UnknownTexture(name)) if name == "depth"
        ));
    }
}
