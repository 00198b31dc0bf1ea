use std::sync::{Arc, Mutex};

use crate::foundation::error::{KitError, KitResult};
use crate::render::surface::FrameRGBA;

/// Consumer of finished export surfaces.
///
/// The session calls `present` after every successful render, in increasing `generation` order.
/// A flat preview element and a 3D texture source are both just adapters.
pub trait SurfaceAdapter {
    /// Receive the newest export-surface pixels.
    fn present(&mut self, generation: u64, frame: &FrameRGBA) -> KitResult<()>;
}

impl<T: SurfaceAdapter> SurfaceAdapter for Arc<Mutex<T>> {
    fn present(&mut self, generation: u64, frame: &FrameRGBA) -> KitResult<()> {
        let mut inner = self
            .lock()
            .map_err(|_| KitError::surface_unavailable("surface adapter lock poisoned"))?;
        inner.present(generation, frame)
    }
}

/// Live texture source for an external mesh renderer.
///
/// The renderer polls [`TextureSlot::needs_update`] each frame and uploads through
/// [`TextureSlot::take_update`].
#[derive(Debug, Default)]
pub struct TextureSlot {
    frame: Option<FrameRGBA>,
    generation: u64,
    uploaded: u64,
}

impl TextureSlot {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation of the newest frame (0 before the first render).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `true` when a frame newer than the last upload is available.
    pub fn needs_update(&self) -> bool {
        self.frame.is_some() && self.generation > self.uploaded
    }

    /// Newest frame, without marking it uploaded.
    pub fn latest(&self) -> Option<&FrameRGBA> {
        self.frame.as_ref()
    }

    /// Newest frame if it has not been uploaded yet; marks it uploaded.
    pub fn take_update(&mut self) -> Option<(u64, &FrameRGBA)> {
        if !self.needs_update() {
            return None;
        }
        self.uploaded = self.generation;
        self.frame.as_ref().map(|f| (self.generation, f))
    }
}

impl SurfaceAdapter for TextureSlot {
    fn present(&mut self, generation: u64, frame: &FrameRGBA) -> KitResult<()> {
        if generation <= self.generation && self.frame.is_some() {
            return Ok(());
        }
        match &mut self.frame {
            Some(existing) => existing.clone_from(frame),
            None => self.frame = Some(frame.clone()),
        }
        self.generation = generation;
        Ok(())
    }
}

/// Adapter that keeps every presented frame, for tests and debugging.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    frames: Vec<(u64, FrameRGBA)>,
}

impl RecordingSurface {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames in presentation order.
    pub fn frames(&self) -> &[(u64, FrameRGBA)] {
        &self.frames
    }

    /// Most recent frame.
    pub fn last(&self) -> Option<&(u64, FrameRGBA)> {
        self.frames.last()
    }
}

impl SurfaceAdapter for RecordingSurface {
    fn present(&mut self, generation: u64, frame: &FrameRGBA) -> KitResult<()> {
        self.frames.push((generation, frame.clone()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
