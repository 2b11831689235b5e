//! Player: owns the engine, the output texture, the marker catalog and the clock,
//! and exposes the lifecycle / transport / per-frame API.
//!
//! Per tick the host calls [`Player::update`] then [`Player::draw`]. Update advances
//! the clock, maps progress to a frame of the active segment, asks the engine to
//! render it and uploads the pixels; draw places the texture into the destination
//! rectangle according to the fit policy and anchor.
//!
//! After [`Player::unload`] the player holds no resources; mutators become no-ops
//! and queries return zero values.

use std::path::Path;

use log::{debug, warn};

use crate::backend::{AnimationEngine, EngineFactory, RenderBackend};
use crate::clock::PlaybackClock;
use crate::config::{EngineConfig, FitPolicy, PlayMode, PlayerConfig};
use crate::error::PlayerError;
use crate::fit::fit_rect;
use crate::frame_map::target_frame;
use crate::geometry::{Color, Rect, Vec2};
use crate::marker::{Marker, MarkerCatalog, MarkerOptions};
use crate::segment::{AssetTiming, Segment};
use crate::Result;

/// Surface size used to load an asset whose output size is automatic.
pub const FALLBACK_SURFACE: u32 = 512;

enum Source<'a> {
    Path(&'a Path),
    Data(&'a str),
    Bundle(&'a [u8]),
}

fn has_bundle_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("lottie"))
}

/// Requested size if set, else the natural size, else the load surface.
fn output_dimension(requested: u32, natural: f32, load: u32) -> u32 {
    if requested > 0 {
        requested
    } else if natural >= 1.0 {
        natural as u32
    } else {
        load
    }
}

/// Playback of one loaded asset into one texture.
///
/// Not internally synchronized; share across threads only behind a lock.
pub struct Player<E: AnimationEngine, B: RenderBackend> {
    engine: Option<E>,
    backend: B,
    texture: Option<B::Texture>,
    tex_width: u32,
    tex_height: u32,
    /// 0 = follow the asset's natural size.
    requested_width: u32,
    requested_height: u32,
    natural: Vec2,
    timing: AssetTiming,
    segment: Segment,
    clock: PlaybackClock,
    markers: MarkerCatalog,
    marker_options: MarkerOptions,
    active_marker: Option<usize>,
    fit: FitPolicy,
    anchor: Vec2,
    background: Color,
    interpolate: bool,
}

impl<E: AnimationEngine, B: RenderBackend> Player<E, B> {
    /// Load an asset from disk.
    ///
    /// Files with a `.lottie` extension are read and loaded as a bundle; any other
    /// path is handed to the engine directly.
    pub fn load_from_path<F>(
        factory: &mut F,
        backend: B,
        path: impl AsRef<Path>,
        config: &PlayerConfig,
    ) -> Result<Self>
    where
        F: EngineFactory<Engine = E>,
    {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(PlayerError::invalid("empty asset path"));
        }
        if has_bundle_extension(path) {
            let bytes = std::fs::read(path)?;
            return Self::load_with(factory, backend, Source::Bundle(&bytes), config);
        }
        Self::load_with(factory, backend, Source::Path(path), config)
    }

    /// Load an animation document held in memory.
    pub fn load_from_memory<F>(
        factory: &mut F,
        backend: B,
        data: &str,
        config: &PlayerConfig,
    ) -> Result<Self>
    where
        F: EngineFactory<Engine = E>,
    {
        if data.is_empty() {
            return Err(PlayerError::invalid("empty animation data"));
        }
        Self::load_with(factory, backend, Source::Data(data), config)
    }

    /// Load a bundle archive held in memory.
    pub fn load_bundle<F>(
        factory: &mut F,
        backend: B,
        bytes: &[u8],
        config: &PlayerConfig,
    ) -> Result<Self>
    where
        F: EngineFactory<Engine = E>,
    {
        if bytes.is_empty() {
            return Err(PlayerError::invalid("empty bundle"));
        }
        Self::load_with(factory, backend, Source::Bundle(bytes), config)
    }

    fn load_with<F>(
        factory: &mut F,
        mut backend: B,
        source: Source<'_>,
        config: &PlayerConfig,
    ) -> Result<Self>
    where
        F: EngineFactory<Engine = E>,
    {
        let requested_width = config.width;
        let requested_height = config.height;
        let load_w = if requested_width > 0 { requested_width } else { FALLBACK_SURFACE };
        let load_h = if requested_height > 0 { requested_height } else { FALLBACK_SURFACE };

        // Any early return below drops `engine`, which releases it.
        let mut engine = factory
            .create(&EngineConfig::from(config))
            .map_err(|e| PlayerError::engine("create", e))?;

        let loaded = match source {
            Source::Path(path) => engine.load_path(path, load_w, load_h),
            Source::Data(data) => engine.load_data(data, load_w, load_h),
            Source::Bundle(bytes) => engine.load_bundle(bytes, load_w, load_h),
        };
        if let Err(e) = loaded {
            warn!("asset load failed: {e}");
            return Err(PlayerError::engine("load", e));
        }

        let (natural_w, natural_h) = engine.animation_size();
        let timing = AssetTiming::new(engine.duration(), engine.total_frames());

        let tex_width = output_dimension(requested_width, natural_w, load_w);
        let tex_height = output_dimension(requested_height, natural_h, load_h);
        if (tex_width, tex_height) != (load_w, load_h) {
            engine.resize(tex_width, tex_height).map_err(|e| {
                warn!("resize to {tex_width}x{tex_height} failed: {e}");
                PlayerError::engine("resize", e)
            })?;
        }

        let texture = backend
            .create_texture(tex_width, tex_height)
            .ok_or(PlayerError::TextureAllocation {
                width: tex_width,
                height: tex_height,
            })?;

        let marker_options = MarkerOptions {
            truncate_names: config.truncate_marker_names,
        };
        let markers = MarkerCatalog::build(&engine.markers(), timing, marker_options);
        let segment = Segment::full(timing);
        let clock = PlaybackClock::new(
            segment.duration_seconds,
            config.effective_speed(),
            config.looping,
            config.mode,
        );

        debug!(
            "loaded asset: natural {natural_w}x{natural_h}, output {tex_width}x{tex_height}, \
             {:.3}s over {} frames, {} markers",
            timing.duration_seconds,
            timing.total_frames,
            markers.len()
        );

        let mut player = Self {
            engine: Some(engine),
            backend,
            texture: Some(texture),
            tex_width,
            tex_height,
            requested_width,
            requested_height,
            natural: Vec2::new(natural_w, natural_h),
            timing,
            segment,
            clock,
            markers,
            marker_options,
            active_marker: None,
            fit: config.fit,
            anchor: config.anchor,
            background: config.background,
            interpolate: config.interpolate,
        };

        if let Some(name) = config.marker.as_deref().filter(|n| !n.is_empty()) {
            if let Err(e) = player.set_marker(name) {
                warn!("initial marker ignored: {e}");
            }
        }

        Ok(player)
    }

    /// Release the texture, then the engine, then the marker list.
    ///
    /// Safe to call repeatedly.
    pub fn unload(&mut self) {
        if let Some(texture) = self.texture.take() {
            self.backend.release_texture(texture);
        }
        if let Some(engine) = self.engine.take() {
            drop(engine);
            debug!("player unloaded");
        }
        self.markers = MarkerCatalog::new();
        self.active_marker = None;
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.engine.is_some()
    }

    fn load_size(&self) -> (u32, u32) {
        let w = if self.requested_width > 0 { self.requested_width } else { FALLBACK_SURFACE };
        let h = if self.requested_height > 0 { self.requested_height } else { FALLBACK_SURFACE };
        (w, h)
    }

    // ---- transport ----

    pub fn play(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.play();
            self.clock.play();
        }
    }

    pub fn pause(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.pause();
            self.clock.pause();
        }
    }

    /// Pause, rewind to the start of the active segment and re-derive direction.
    pub fn stop(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        engine.stop();
        self.clock.stop();
        if let Err(e) = engine.set_frame(target_frame(0.0, &self.segment)) {
            warn!("set_frame on stop failed: {e}");
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.is_loaded() && self.clock.is_playing()
    }

    // ---- configuration ----

    /// Negative speeds store the magnitude and play backwards.
    pub fn set_speed(&mut self, speed: f32) {
        if self.is_loaded() {
            self.clock.set_speed(speed);
        }
    }

    pub fn set_loop(&mut self, looping: bool) {
        if self.is_loaded() {
            self.clock.set_loop(looping);
        }
    }

    pub fn set_mode(&mut self, mode: PlayMode) {
        if self.is_loaded() {
            self.clock.set_mode(mode);
        }
    }

    pub fn set_fit(&mut self, fit: FitPolicy) {
        self.fit = fit;
    }

    pub fn set_anchor(&mut self, anchor: Vec2) {
        self.anchor = anchor;
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    /// Jump to `time` seconds inside the active segment.
    pub fn seek(&mut self, time: f32) {
        if self.is_loaded() {
            self.clock.seek(time);
        }
    }

    // ---- per frame ----

    /// Advance the clock by `dt` seconds, render the mapped frame and upload it.
    pub fn update(&mut self, dt: f32) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        self.clock.advance(dt);
        let frame = target_frame(self.clock.progress(), &self.segment);
        if let Err(e) = engine.set_frame(frame).and_then(|_| engine.render()) {
            warn!("render of frame {frame} failed: {e}");
            return;
        }

        let (Some(pixels), Some(texture)) = (engine.pixels(), self.texture.as_ref()) else {
            return;
        };
        let expected = self.tex_width as usize * self.tex_height as usize;
        if pixels.len() != expected {
            warn!(
                "pixel buffer holds {} texels, texture {}x{} needs {expected}; upload skipped",
                pixels.len(),
                self.tex_width,
                self.tex_height
            );
            return;
        }
        self.backend.update_texture(texture, pixels);
    }

    /// Where the texture lands inside `dest` under the current fit policy and anchor.
    pub fn placement(&self, dest: Rect) -> Rect {
        fit_rect(
            self.tex_width as f32,
            self.tex_height as f32,
            dest,
            self.fit,
            self.anchor,
        )
    }

    /// Composite the last uploaded frame into `dest`, rotated about its centre.
    pub fn draw(&mut self, dest: Rect, rotation: f32, tint: Color) {
        let Some(texture) = self.texture.as_ref() else {
            return;
        };
        if self.background.is_visible() {
            self.backend.draw_rect(dest, self.background);
        }

        let src = Rect::new(0.0, 0.0, self.tex_width as f32, self.tex_height as f32);
        let placed = fit_rect(src.width, src.height, dest, self.fit, self.anchor);
        let origin = Vec2::new(placed.width * 0.5, placed.height * 0.5);
        let center = placed.center();
        self.backend.draw_texture(
            texture,
            src,
            Rect::new(center.x, center.y, placed.width, placed.height),
            origin,
            rotation,
            tint,
        );
    }

    // ---- queries ----

    /// Active segment duration in seconds (0 once unloaded).
    pub fn duration(&self) -> f32 {
        if self.is_loaded() {
            self.clock.duration()
        } else {
            0.0
        }
    }

    /// Elapsed seconds inside the active segment.
    pub fn current_time(&self) -> f32 {
        if self.is_loaded() {
            self.clock.time()
        } else {
            0.0
        }
    }

    pub fn progress(&self) -> f32 {
        if self.is_loaded() {
            self.clock.progress()
        } else {
            0.0
        }
    }

    /// Total frames as currently reported by the engine.
    pub fn total_frames(&self) -> u32 {
        self.engine
            .as_ref()
            .map(|e| e.total_frames().max(0.0) as u32)
            .unwrap_or(0)
    }

    /// Frame the engine last rendered.
    pub fn current_frame(&self) -> u32 {
        self.engine
            .as_ref()
            .map(|e| e.current_frame().max(0.0) as u32)
            .unwrap_or(0)
    }

    pub fn natural_size(&self) -> Vec2 {
        if self.is_loaded() {
            self.natural
        } else {
            Vec2::ZERO
        }
    }

    /// The live output texture.
    pub fn texture(&self) -> Option<&B::Texture> {
        self.texture.as_ref()
    }

    pub fn texture_size(&self) -> (u32, u32) {
        if self.texture.is_some() {
            (self.tex_width, self.tex_height)
        } else {
            (0, 0)
        }
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Engine frame interpolation flag the player was loaded with.
    pub fn interpolate(&self) -> bool {
        self.interpolate
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ---- content switching ----

    /// Apply a theme; an empty id resets to the asset's default theme.
    pub fn set_theme(&mut self, theme_id: &str) -> Result<()> {
        let engine = self.engine.as_mut().ok_or(PlayerError::NotLoaded)?;
        if theme_id.is_empty() {
            engine
                .reset_theme()
                .map_err(|e| PlayerError::engine("reset_theme", e))
        } else {
            engine
                .set_theme(theme_id)
                .map_err(|e| PlayerError::engine("set_theme", e))
        }
    }

    /// Switch to another animation of the loaded bundle.
    ///
    /// Once the engine accepts the new animation its timing, full-asset segment and
    /// marker catalog are committed and time restarts at 0. The texture is reallocated
    /// only when the output size changes. If that allocation fails the previous
    /// texture is kept, the engine is sized to it and `TextureAllocation` is returned.
    /// If the engine cannot be resized the texture is released; the next successful
    /// switch allocates a fresh one.
    pub fn set_animation(&mut self, animation_id: &str) -> Result<()> {
        if animation_id.is_empty() {
            return Err(PlayerError::invalid("empty animation id"));
        }
        let (load_w, load_h) = self.load_size();
        let engine = self.engine.as_mut().ok_or(PlayerError::NotLoaded)?;

        engine
            .load_animation(animation_id, load_w, load_h)
            .map_err(|e| {
                warn!("switch to animation '{animation_id}' failed: {e}");
                PlayerError::engine("load_animation", e)
            })?;

        let (natural_w, natural_h) = engine.animation_size();
        let timing = AssetTiming::new(engine.duration(), engine.total_frames());
        let raw_markers = engine.markers();

        self.natural = Vec2::new(natural_w, natural_h);
        self.timing = timing;
        self.markers = MarkerCatalog::build(&raw_markers, timing, self.marker_options);
        self.active_marker = None;
        self.apply_segment(Segment::full(timing));

        let wanted = (
            output_dimension(self.requested_width, natural_w, load_w),
            output_dimension(self.requested_height, natural_h, load_h),
        );
        let allocated = self.reallocate_texture(wanted);
        let surface = if self.texture.is_some() {
            (self.tex_width, self.tex_height)
        } else {
            wanted
        };
        if surface != (load_w, load_h) {
            if let Some(engine) = self.engine.as_mut() {
                if let Err(e) = engine.resize(surface.0, surface.1) {
                    warn!("resize to {}x{} failed: {e}", surface.0, surface.1);
                    if let Some(texture) = self.texture.take() {
                        self.backend.release_texture(texture);
                    }
                    return Err(PlayerError::engine("resize", e));
                }
            }
        }
        allocated?;

        debug!(
            "switched to animation '{animation_id}' ({} markers)",
            self.markers.len()
        );
        Ok(())
    }

    /// Make the live texture `width x height`, allocating the new one before
    /// releasing the old. On failure the current texture stays in place.
    fn reallocate_texture(&mut self, (width, height): (u32, u32)) -> Result<()> {
        if self.texture.is_some() && (width, height) == (self.tex_width, self.tex_height) {
            return Ok(());
        }
        let Some(texture) = self.backend.create_texture(width, height) else {
            warn!(
                "texture allocation {width}x{height} failed; keeping {}x{}",
                self.tex_width, self.tex_height
            );
            return Err(PlayerError::TextureAllocation { width, height });
        };
        if let Some(old) = self.texture.replace(texture) {
            self.backend.release_texture(old);
        }
        debug!(
            "texture reallocated {}x{} -> {width}x{height}",
            self.tex_width, self.tex_height
        );
        self.tex_width = width;
        self.tex_height = height;
        Ok(())
    }

    /// Play only the named marker's window; an empty name reverts to the full asset.
    ///
    /// Lookup is case-insensitive. On a miss nothing changes.
    pub fn set_marker(&mut self, name: &str) -> Result<()> {
        if !self.is_loaded() {
            return Err(PlayerError::NotLoaded);
        }
        if name.is_empty() {
            self.clear_marker();
            return Ok(());
        }
        let (index, segment) = match self.markers.find(name) {
            Some((index, marker)) => (
                index,
                Segment::resolve(
                    marker.start_frame,
                    marker.frame_count,
                    marker.duration_seconds,
                    self.timing,
                ),
            ),
            None => {
                return Err(PlayerError::MarkerNotFound {
                    name: name.to_string(),
                })
            }
        };
        self.apply_segment(segment);
        self.active_marker = Some(index);
        debug!("marker '{name}' active at index {index}");
        Ok(())
    }

    /// Revert to the full-asset segment.
    pub fn clear_marker(&mut self) {
        if !self.is_loaded() {
            return;
        }
        self.apply_segment(Segment::full(self.timing));
        self.active_marker = None;
    }

    fn apply_segment(&mut self, segment: Segment) {
        self.segment = segment;
        self.clock.reset_to(segment.duration_seconds);
        debug!(
            "segment frames {}+{} over {:.3}s",
            segment.start_frame, segment.frame_count, segment.duration_seconds
        );
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Marker name by time-ordered index.
    pub fn marker_name(&self, index: usize) -> Option<&str> {
        self.markers.name(index)
    }

    pub fn markers(&self) -> &MarkerCatalog {
        &self.markers
    }

    /// The activated marker, `None` while the full timeline plays.
    pub fn active_marker(&self) -> Option<&Marker> {
        self.active_marker.and_then(|i| self.markers.get(i))
    }
}

impl<E: AnimationEngine, B: RenderBackend> Drop for Player<E, B> {
    fn drop(&mut self) {
        self.unload();
    }
}
