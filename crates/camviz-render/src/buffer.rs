//! Name-keyed buffer registry.

use std::collections::HashMap;

use camviz_core::{CamvizError, Result};

use crate::renderer::{BufferData, BufferHandle, Renderer};

/// A renderer buffer plus what camviz needs to draw from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferEntry {
    pub handle: BufferHandle,
    /// Number of elements currently stored.
    pub len: usize,
    /// Components per element.
    pub dimension: usize,
}

/// Maps buffer names to renderer buffers.
#[derive(Debug, Default)]
pub struct BufferRegistry {
    buffers: HashMap<String, BufferEntry>,
}

impl BufferRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer holding `data`, replacing any buffer of the same name.
    pub fn add(
        &mut self,
        renderer: &mut dyn Renderer,
        name: impl Into<String>,
        data: &BufferData,
    ) -> Result<BufferHandle> {
        let name = name.into();
        let handle = renderer.create_buffer(data)?;
        log::debug!("buffer '{name}' created with {} elements", data.len());
        self.buffers.insert(
            name,
            BufferEntry {
                handle,
                len: data.len(),
                dimension: data.dimension(),
            },
        );
        Ok(handle)
    }

    /// Replaces the contents of an existing buffer.
    pub fn update(
        &mut self,
        renderer: &mut dyn Renderer,
        name: &str,
        data: &BufferData,
    ) -> Result<()> {
        let entry = self
            .buffers
            .get_mut(name)
            .ok_or_else(|| CamvizError::UnknownBuffer(name.to_string()))?;
        renderer.update_buffer(entry.handle, data)?;
        entry.len = data.len();
        entry.dimension = data.dimension();
        Ok(())
    }

    /// Empties a buffer without releasing it.
    pub fn clear(&mut self, renderer: &mut dyn Renderer, name: &str) -> Result<()> {
        let entry = self.get(name)?;
        let empty = match entry.dimension {
            1 => BufferData::Index(Vec::new()),
            2 => BufferData::Float2(Vec::new()),
            _ => BufferData::Float3(Vec::new()),
        };
        self.update(renderer, name, &empty)
    }

    /// Looks up a buffer.
    pub fn get(&self, name: &str) -> Result<BufferEntry> {
        self.buffers
            .get(name)
            .copied()
            .ok_or_else(|| CamvizError::UnknownBuffer(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.buffers.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}
