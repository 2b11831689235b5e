//! Load-time configuration for a player and the engine it creates.

use serde::{Deserialize, Serialize};

use crate::error::PlayerError;
use crate::geometry::{Color, Vec2};

/// Playback direction policy.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    #[default]
    Forward,
    Reverse,
    Bounce,
    ReverseBounce,
}

impl PlayMode {
    /// Direction a freshly (re)started clock travels in under this mode.
    #[inline]
    pub fn initial_direction(self) -> f32 {
        match self {
            PlayMode::Reverse | PlayMode::ReverseBounce => -1.0,
            PlayMode::Forward | PlayMode::Bounce => 1.0,
        }
    }

    /// Bounce modes keep direction across ticks and flip it at the boundaries.
    #[inline]
    pub fn is_bounce(self) -> bool {
        matches!(self, PlayMode::Bounce | PlayMode::ReverseBounce)
    }
}

/// Scaling rule used to place the rendered raster into a destination rectangle.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FitPolicy {
    #[default]
    Contain,
    Cover,
    Fill,
    FitWidth,
    FitHeight,
}

/// Options recognised when loading an asset.
///
/// `Default` matches loading with no configuration at all.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Output width in pixels; 0 picks the asset's natural width.
    pub width: u32,
    /// Output height in pixels; 0 picks the asset's natural height.
    pub height: u32,
    /// Initial speed. 0 is treated as 1; negative values reverse the initial direction.
    pub speed: f32,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub mode: PlayMode,
    /// Passed through to the engine.
    pub interpolate: bool,
    pub fit: FitPolicy,
    pub anchor: Vec2,
    pub background: Color,
    pub animation_id: Option<String>,
    pub theme_id: Option<String>,
    pub state_machine_id: Option<String>,
    /// Marker activated right after load.
    pub marker: Option<String>,
    /// Cap marker names at [`MARKER_NAME_LIMIT`](crate::MARKER_NAME_LIMIT) bytes.
    pub truncate_marker_names: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            speed: 1.0,
            looping: true,
            mode: PlayMode::Forward,
            interpolate: true,
            fit: FitPolicy::Contain,
            anchor: Vec2::new(0.5, 0.5),
            background: Color::BLANK,
            animation_id: None,
            theme_id: None,
            state_machine_id: None,
            marker: None,
            truncate_marker_names: false,
        }
    }
}

impl PlayerConfig {
    /// Parse a JSON document; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, PlayerError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_mode(mut self, mode: PlayMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_fit(mut self, fit: FitPolicy, anchor: Vec2) -> Self {
        self.fit = fit;
        self.anchor = anchor;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_animation(mut self, animation_id: impl Into<String>) -> Self {
        self.animation_id = Some(animation_id.into());
        self
    }

    pub fn with_theme(mut self, theme_id: impl Into<String>) -> Self {
        self.theme_id = Some(theme_id.into());
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Speed with the "0 means 1" rule applied, sign preserved.
    #[inline]
    pub(crate) fn effective_speed(&self) -> f32 {
        if self.speed == 0.0 {
            1.0
        } else {
            self.speed
        }
    }
}

/// Settings handed to [`EngineFactory::create`](crate::EngineFactory::create).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    pub mode: PlayMode,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub speed: f32,
    pub interpolate: bool,
    /// Background packed as `0xRRGGBBAA`.
    pub background: u32,
    pub animation_id: Option<String>,
    pub theme_id: Option<String>,
    pub state_machine_id: Option<String>,
}

impl From<&PlayerConfig> for EngineConfig {
    fn from(cfg: &PlayerConfig) -> Self {
        Self {
            mode: cfg.mode,
            looping: cfg.looping,
            speed: cfg.effective_speed(),
            interpolate: cfg.interpolate,
            background: cfg.background.to_rgba_u32(),
            animation_id: cfg.animation_id.clone(),
            theme_id: cfg.theme_id.clone(),
            state_machine_id: cfg.state_machine_id.clone(),
        }
    }
}
