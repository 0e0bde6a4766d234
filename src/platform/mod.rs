//! Platform abstraction layer
//!
//! The narrow surface the core consumes from its rendering/platform
//! collaborator: immediate-mode draw primitives, opaque texture
//! handles, and nothing else. Window/context creation, input polling,
//! audio, and frame pacing all live on the far side of these traits.

use std::error::Error;
use std::fmt;
use std::path::Path;

use glam::Vec2;

use crate::sim::collider::Rect;

/// 8-bit RGBA color, straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);

    pub fn from_array(c: [u8; 4]) -> Self {
        Self::rgba(c[0], c[1], c[2], c[3])
    }

    /// Same color with opacity scaled by `alpha` in [0, 1].
    pub fn faded(self, alpha: f32) -> Self {
        Self {
            a: (self.a as f32 * alpha.clamp(0.0, 1.0)) as u8,
            ..self
        }
    }
}

/// Opaque handle to a texture owned by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// A texture could not be loaded. Recoverable: the caller aborts the
/// screen load instead of crashing.
#[derive(Debug)]
pub struct ResourceError {
    pub path: String,
    pub reason: String,
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to load resource {:?}: {}", self.path, self.reason)
    }
}

impl Error for ResourceError {}

/// Immediate-mode draw primitives, all by value; no retained scene
/// graph. Implemented by the rendering collaborator.
pub trait DrawSurface {
    fn draw_rect(&mut self, rect: Rect, color: Color);
    fn draw_rect_outline(&mut self, rect: Rect, color: Color);
    /// Textured quad with source rect, rotation (degrees, around the
    /// destination center) and tint. A negative `source` height flips
    /// the texture vertically.
    fn draw_texture(&mut self, texture: TextureId, source: Rect, dest: Rect, rotation: f32, tint: Color);
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn draw_text(&mut self, text: &str, position: Vec2, size: f32, color: Color);
}

/// Texture loading/ownership on the platform side.
pub trait TextureStore {
    fn load_texture(&mut self, path: &Path) -> Result<TextureId, ResourceError>;
    fn unload_texture(&mut self, id: TextureId);
}

/// Texture store for headless runs and tests: mints handles without
/// touching the GPU or the filesystem.
#[derive(Debug, Default)]
pub struct HeadlessTextures {
    next: u32,
    live: usize,
}

impl HeadlessTextures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live
    }
}

impl TextureStore for HeadlessTextures {
    fn load_texture(&mut self, path: &Path) -> Result<TextureId, ResourceError> {
        let id = TextureId(self.next);
        self.next += 1;
        self.live += 1;
        log::debug!("headless texture {} -> {:?}", path.display(), id);
        Ok(id)
    }

    fn unload_texture(&mut self, _id: TextureId) {
        self.live = self.live.saturating_sub(1);
    }
}
