//! Collaborator contracts: the animation engine that rasterizes frames and the
//! render backend that owns textures and draws quads.
//!
//! The core never parses or rasterizes the animation format; it only asks an
//! [`AnimationEngine`] for metadata and for the pixels of a chosen frame. Engines
//! are destroyed by dropping them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::geometry::{Color, Rect, Vec2};

/// Marker as reported by the engine, in frame units.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RawMarker {
    pub name: String,
    /// Start frame.
    pub time: f32,
    /// Length in frames; ≤ 0 means a single frame.
    pub duration: f32,
}

/// Vector-animation decoder and rasterizer.
pub trait AnimationEngine {
    /// Load an animation document from disk, rasterizing at `width × height`.
    fn load_path(&mut self, path: &Path, width: u32, height: u32) -> Result<(), EngineError>;

    /// Load an animation document held in memory.
    fn load_data(&mut self, data: &str, width: u32, height: u32) -> Result<(), EngineError>;

    /// Load a bundle archive (several animations plus themes) held in memory.
    fn load_bundle(&mut self, bytes: &[u8], width: u32, height: u32) -> Result<(), EngineError>;

    /// Switch to another animation of the loaded bundle.
    fn load_animation(&mut self, animation_id: &str, width: u32, height: u32)
        -> Result<(), EngineError>;

    fn resize(&mut self, width: u32, height: u32) -> Result<(), EngineError>;

    fn set_frame(&mut self, frame: f32) -> Result<(), EngineError>;

    /// Rasterize the current frame into the engine's pixel buffer.
    fn render(&mut self) -> Result<(), EngineError>;

    /// Pixel buffer of the last render, one RGBA texel per `u32`.
    fn pixels(&self) -> Option<&[u32]>;

    /// Natural width/height of the loaded animation.
    fn animation_size(&self) -> (f32, f32);

    /// Total duration in seconds.
    fn duration(&self) -> f32;

    fn total_frames(&self) -> f32;

    fn current_frame(&self) -> f32;

    fn markers(&self) -> Vec<RawMarker>;

    fn set_theme(&mut self, theme_id: &str) -> Result<(), EngineError>;

    fn reset_theme(&mut self) -> Result<(), EngineError>;

    /// Transport notifications; the player keeps its own clock regardless.
    fn play(&mut self) {}
    fn pause(&mut self) {}
    fn stop(&mut self) {}
}

/// Creates engines configured for a new player.
pub trait EngineFactory {
    type Engine: AnimationEngine;

    fn create(&mut self, config: &EngineConfig) -> Result<Self::Engine, EngineError>;
}

/// GPU side: texture storage and quad drawing.
pub trait RenderBackend {
    /// Opaque texture handle.
    type Texture;

    /// Allocate an RGBA texture; `None` on failure.
    fn create_texture(&mut self, width: u32, height: u32) -> Option<Self::Texture>;

    /// Replace the full contents of `texture`.
    fn update_texture(&mut self, texture: &Self::Texture, pixels: &[u32]);

    fn release_texture(&mut self, texture: Self::Texture);

    fn draw_rect(&mut self, dest: Rect, color: Color);

    /// Draw `src` of `texture` into `dest`, rotated by `rotation` degrees about
    /// `origin` (relative to `dest`'s position, which is the rotation pivot).
    fn draw_texture(
        &mut self,
        texture: &Self::Texture,
        src: Rect,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    );
}
