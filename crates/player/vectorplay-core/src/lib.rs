//! vectorplay core (engine-agnostic)
//!
//! Drives an external vector-animation renderer toward a raster texture once per
//! tick. This crate owns the playback clock and direction state machine, the
//! segment/frame mapping, the marker catalog and the fit geometry used when the
//! rendered frame is composited. Decoding, rasterization and GPU work stay behind
//! the [`AnimationEngine`] and [`RenderBackend`] traits.

pub mod backend;
pub mod clock;
pub mod config;
pub mod error;
pub mod fit;
pub mod frame_map;
pub mod geometry;
pub mod marker;
pub mod player;
pub mod segment;

// Re-exports for consumers (hosts and adapters)
pub use backend::{AnimationEngine, EngineFactory, RawMarker, RenderBackend};
pub use clock::{wrap_time, PlaybackClock};
pub use config::{EngineConfig, FitPolicy, PlayMode, PlayerConfig};
pub use error::{EngineError, PlayerError};
pub use fit::fit_rect;
pub use frame_map::target_frame;
pub use geometry::{Color, Rect, Vec2};
pub use marker::{Marker, MarkerCatalog, MarkerOptions, MARKER_NAME_LIMIT};
pub use player::{Player, FALLBACK_SURFACE};
pub use segment::{seconds_per_frame, AssetTiming, Segment};

/// Result type used across the player API.
pub type Result<T> = core::result::Result<T, PlayerError>;
