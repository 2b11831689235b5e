//! Scripted engine that understands a small Lottie subset.
//!
//! Documents carry `w`, `h`, `fr`, `ip`, `op` and an optional `markers` array of
//! `{cm, tm, dr}` entries. Bundles are JSON objects with an `animations` map, an
//! optional `themes` list and an optional `active` id; the engine config's
//! `animation_id` and `theme_id` take precedence when set. Rendering fills the pixel
//! buffer with the rounded frame number so uploads can be checked.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use hashbrown::HashMap;
use serde::Deserialize;
use vectorplay_core::{AnimationEngine, EngineConfig, EngineError, EngineFactory, RawMarker};

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DocMarker {
    pub cm: String,
    pub tm: f32,
    #[serde(default)]
    pub dr: f32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Document {
    pub w: f32,
    pub h: f32,
    pub fr: f32,
    #[serde(default)]
    pub ip: f32,
    pub op: f32,
    #[serde(default)]
    pub markers: Vec<DocMarker>,
}

impl Document {
    pub fn total_frames(&self) -> f32 {
        (self.op - self.ip).max(0.0)
    }

    pub fn duration(&self) -> f32 {
        if self.fr > 0.0 {
            self.total_frames() / self.fr
        } else {
            0.0
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
struct Bundle {
    animations: HashMap<String, Document>,
    #[serde(default)]
    themes: Vec<String>,
    #[serde(default)]
    active: Option<String>,
}

impl Bundle {
    /// `active` if present, else the lexicographically first id.
    fn default_id(&self) -> Option<String> {
        self.active
            .clone()
            .or_else(|| self.animations.keys().min().cloned())
    }
}

/// Calls observed across every engine a factory produced.
#[derive(Debug, Default)]
pub struct EngineLog {
    pub configs: Vec<EngineConfig>,
    pub created: usize,
    pub dropped: usize,
    /// `(source, width, height)` per load; source is `path`, `data`, `bundle` or
    /// `animation:<id>`.
    pub loads: Vec<(String, u32, u32)>,
    pub resizes: Vec<(u32, u32)>,
    pub frames: Vec<f32>,
    pub renders: usize,
    pub transport: Vec<&'static str>,
    pub theme: Option<String>,
    pub fail_create: bool,
    pub fail_load: bool,
    pub fail_render: bool,
    pub fail_resize: bool,
    /// Resizes report success but keep the previous pixel buffer.
    pub stale_resize: bool,
}

impl EngineLog {
    /// Engines created and not yet dropped.
    pub fn live(&self) -> usize {
        self.created - self.dropped
    }

    pub fn last_frame(&self) -> Option<f32> {
        self.frames.last().copied()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MockEngineFactory {
    log: Rc<RefCell<EngineLog>>,
}

impl MockEngineFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Rc<RefCell<EngineLog>> {
        Rc::clone(&self.log)
    }

    pub fn failing_create(self) -> Self {
        self.log.borrow_mut().fail_create = true;
        self
    }

    pub fn failing_load(self) -> Self {
        self.log.borrow_mut().fail_load = true;
        self
    }
}

impl EngineFactory for MockEngineFactory {
    type Engine = MockEngine;

    fn create(&mut self, config: &EngineConfig) -> Result<MockEngine, EngineError> {
        let mut log = self.log.borrow_mut();
        log.configs.push(config.clone());
        if log.fail_create {
            return Err(EngineError::new("engine creation disabled"));
        }
        log.created += 1;
        Ok(MockEngine {
            log: Rc::clone(&self.log),
            config: config.clone(),
            bundle: None,
            document: None,
            width: 0,
            height: 0,
            frame: 0.0,
            pixels: Vec::new(),
        })
    }
}

pub struct MockEngine {
    log: Rc<RefCell<EngineLog>>,
    config: EngineConfig,
    bundle: Option<Bundle>,
    document: Option<Document>,
    width: u32,
    height: u32,
    frame: f32,
    pixels: Vec<u32>,
}

impl MockEngine {
    fn record_load(&self, source: String, width: u32, height: u32) -> Result<(), EngineError> {
        let mut log = self.log.borrow_mut();
        log.loads.push((source, width, height));
        if log.fail_load {
            return Err(EngineError::new("load disabled"));
        }
        Ok(())
    }

    fn install(&mut self, document: Document, width: u32, height: u32) {
        self.document = Some(document);
        self.frame = 0.0;
        self.allocate(width, height);
    }

    fn allocate(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width as usize * height as usize];
    }

    fn document(&self) -> Result<&Document, EngineError> {
        self.document
            .as_ref()
            .ok_or_else(|| EngineError::new("no animation loaded"))
    }
}

impl AnimationEngine for MockEngine {
    fn load_path(&mut self, path: &Path, width: u32, height: u32) -> Result<(), EngineError> {
        self.record_load("path".into(), width, height)?;
        let text = fs::read_to_string(path)
            .map_err(|e| EngineError::new(format!("{}: {e}", path.display())))?;
        let document: Document =
            serde_json::from_str(&text).map_err(|e| EngineError::new(e.to_string()))?;
        self.install(document, width, height);
        Ok(())
    }

    fn load_data(&mut self, data: &str, width: u32, height: u32) -> Result<(), EngineError> {
        self.record_load("data".into(), width, height)?;
        let document: Document =
            serde_json::from_str(data).map_err(|e| EngineError::new(e.to_string()))?;
        self.install(document, width, height);
        Ok(())
    }

    fn load_bundle(&mut self, bytes: &[u8], width: u32, height: u32) -> Result<(), EngineError> {
        self.record_load("bundle".into(), width, height)?;
        let bundle: Bundle =
            serde_json::from_slice(bytes).map_err(|e| EngineError::new(e.to_string()))?;
        let id = self
            .config
            .animation_id
            .clone()
            .or_else(|| bundle.default_id())
            .ok_or_else(|| EngineError::new("bundle has no animations"))?;
        let document = bundle
            .animations
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::new(format!("unknown animation '{id}'")))?;
        if let Some(theme) = self.config.theme_id.as_ref() {
            if bundle.themes.contains(theme) {
                self.log.borrow_mut().theme = Some(theme.clone());
            }
        }
        self.bundle = Some(bundle);
        self.install(document, width, height);
        Ok(())
    }

    fn load_animation(
        &mut self,
        animation_id: &str,
        width: u32,
        height: u32,
    ) -> Result<(), EngineError> {
        self.record_load(format!("animation:{animation_id}"), width, height)?;
        let document = self
            .bundle
            .as_ref()
            .ok_or_else(|| EngineError::new("not a bundle"))?
            .animations
            .get(animation_id)
            .cloned()
            .ok_or_else(|| EngineError::new(format!("unknown animation '{animation_id}'")))?;
        self.install(document, width, height);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        let (fail, stale) = {
            let mut log = self.log.borrow_mut();
            log.resizes.push((width, height));
            (log.fail_resize, log.stale_resize)
        };
        if fail {
            return Err(EngineError::new("resize disabled"));
        }
        if !stale {
            self.allocate(width, height);
        }
        Ok(())
    }

    fn set_frame(&mut self, frame: f32) -> Result<(), EngineError> {
        self.log.borrow_mut().frames.push(frame);
        let last = (self.document()?.total_frames() - 1.0).max(0.0);
        self.frame = frame.clamp(0.0, last);
        Ok(())
    }

    fn render(&mut self) -> Result<(), EngineError> {
        {
            let mut log = self.log.borrow_mut();
            if log.fail_render {
                return Err(EngineError::new("render disabled"));
            }
            log.renders += 1;
        }
        let value = self.frame.round() as u32;
        self.pixels.fill(value);
        Ok(())
    }

    fn pixels(&self) -> Option<&[u32]> {
        self.document.as_ref().map(|_| self.pixels.as_slice())
    }

    fn animation_size(&self) -> (f32, f32) {
        self.document
            .as_ref()
            .map(|d| (d.w, d.h))
            .unwrap_or((0.0, 0.0))
    }

    fn duration(&self) -> f32 {
        self.document.as_ref().map(Document::duration).unwrap_or(0.0)
    }

    fn total_frames(&self) -> f32 {
        self.document
            .as_ref()
            .map(Document::total_frames)
            .unwrap_or(0.0)
    }

    fn current_frame(&self) -> f32 {
        self.frame
    }

    fn markers(&self) -> Vec<RawMarker> {
        self.document
            .as_ref()
            .map(|d| {
                d.markers
                    .iter()
                    .map(|m| RawMarker {
                        name: m.cm.clone(),
                        time: m.tm,
                        duration: m.dr,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn set_theme(&mut self, theme_id: &str) -> Result<(), EngineError> {
        let known = self
            .bundle
            .as_ref()
            .is_some_and(|b| b.themes.iter().any(|t| t == theme_id));
        if !known {
            return Err(EngineError::new(format!("unknown theme '{theme_id}'")));
        }
        self.log.borrow_mut().theme = Some(theme_id.to_string());
        Ok(())
    }

    fn reset_theme(&mut self) -> Result<(), EngineError> {
        self.log.borrow_mut().theme = None;
        Ok(())
    }

    fn play(&mut self) {
        self.log.borrow_mut().transport.push("play");
    }

    fn pause(&mut self) {
        self.log.borrow_mut().transport.push("pause");
    }

    fn stop(&mut self) {
        self.log.borrow_mut().transport.push("stop");
    }
}

impl Drop for MockEngine {
    fn drop(&mut self) {
        self.log.borrow_mut().dropped += 1;
    }
}
