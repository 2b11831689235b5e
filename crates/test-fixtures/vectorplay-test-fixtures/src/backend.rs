//! Render backend that records every call instead of touching a GPU.

use std::cell::RefCell;
use std::rc::Rc;

use vectorplay_core::{Color, Rect, RenderBackend, Vec2};

/// Texture handle handed out by [`RecordingBackend`].
#[derive(Debug, PartialEq, Eq)]
pub struct MockTexture {
    pub id: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Rect {
        dest: Rect,
        color: Color,
    },
    Texture {
        texture: u32,
        src: Rect,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upload {
    pub texture: u32,
    pub texels: usize,
    pub first: Option<u32>,
}

#[derive(Debug, Default)]
pub struct BackendLog {
    next_id: u32,
    /// `(id, width, height)` per allocation.
    pub created: Vec<(u32, u32, u32)>,
    pub released: Vec<u32>,
    pub uploads: Vec<Upload>,
    pub draws: Vec<DrawCall>,
    /// Make every following allocation fail.
    pub fail_create: bool,
}

impl BackendLog {
    pub fn live_textures(&self) -> usize {
        self.created.len() - self.released.len()
    }

    pub fn last_upload(&self) -> Option<&Upload> {
        self.uploads.last()
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    log: Rc<RefCell<BackendLog>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Rc<RefCell<BackendLog>> {
        Rc::clone(&self.log)
    }
}

impl RenderBackend for RecordingBackend {
    type Texture = MockTexture;

    fn create_texture(&mut self, width: u32, height: u32) -> Option<MockTexture> {
        let mut log = self.log.borrow_mut();
        if log.fail_create || width == 0 || height == 0 {
            return None;
        }
        log.next_id += 1;
        let id = log.next_id;
        log.created.push((id, width, height));
        Some(MockTexture { id, width, height })
    }

    fn update_texture(&mut self, texture: &MockTexture, pixels: &[u32]) {
        self.log.borrow_mut().uploads.push(Upload {
            texture: texture.id,
            texels: pixels.len(),
            first: pixels.first().copied(),
        });
    }

    fn release_texture(&mut self, texture: MockTexture) {
        self.log.borrow_mut().released.push(texture.id);
    }

    fn draw_rect(&mut self, dest: Rect, color: Color) {
        self.log.borrow_mut().draws.push(DrawCall::Rect { dest, color });
    }

    fn draw_texture(
        &mut self,
        texture: &MockTexture,
        src: Rect,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    ) {
        self.log.borrow_mut().draws.push(DrawCall::Texture {
            texture: texture.id,
            src,
            dest,
            origin,
            rotation,
            tint,
        });
    }
}
