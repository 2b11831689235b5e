//! The playable window currently driving the clock.
//!
//! A segment is either the full asset (`start_frame = 0`, `frame_count = total_frames`)
//! or the range of an activated marker. Both go through [`Segment::resolve`].

use serde::{Deserialize, Serialize};

/// Asset metadata needed to convert between frames and seconds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct AssetTiming {
    /// Total asset duration in seconds, as reported by the engine (may be ≤ 0).
    pub duration_seconds: f32,
    /// Total frame count, at least 1.
    pub total_frames: u32,
}

impl AssetTiming {
    /// Build from raw engine metadata; a non-positive frame count becomes 1.
    pub fn new(duration_seconds: f32, total_frames: f32) -> Self {
        let total_frames = if total_frames > 0.0 {
            total_frames as u32
        } else {
            0
        };
        Self {
            duration_seconds,
            total_frames: total_frames.max(1),
        }
    }

    #[inline]
    pub fn seconds_per_frame(&self) -> f32 {
        seconds_per_frame(self.duration_seconds, self.total_frames)
    }
}

/// Seconds between two consecutive frames of the asset.
///
/// Returns 0 when the duration is non-positive or there are no frames, which makes
/// every frame-derived duration fall back to the asset duration.
pub fn seconds_per_frame(asset_duration: f32, total_frames: u32) -> f32 {
    if asset_duration <= 0.0 {
        return 0.0;
    }
    let frames = if total_frames > 1 {
        total_frames - 1
    } else {
        total_frames
    };
    if frames == 0 {
        return 0.0;
    }
    asset_duration / frames as f32
}

/// Frames spanned between the first and last frame of a window.
#[inline]
pub(crate) fn frame_span(frame_count: f32) -> f32 {
    if frame_count > 1.0 {
        frame_count - 1.0
    } else {
        frame_count
    }
}

/// Active playable window.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub start_frame: f32,
    pub frame_count: f32,
    pub duration_seconds: f32,
}

impl Segment {
    /// Resolve a window from its frame range and an optional explicit duration.
    ///
    /// `start_frame` is clamped to ≥ 0 and `frame_count` to ≥ 1. An explicit duration
    /// > 0 wins; otherwise the duration is derived from the asset's seconds-per-frame,
    /// then the asset duration, then 1.
    pub fn resolve(
        start_frame: f32,
        frame_count: f32,
        explicit_duration: f32,
        timing: AssetTiming,
    ) -> Self {
        let start_frame = if start_frame >= 0.0 { start_frame } else { 0.0 };
        let frame_count = if frame_count > 1.0 { frame_count } else { 1.0 };

        let mut duration = if explicit_duration > 0.0 {
            explicit_duration
        } else {
            let spf = timing.seconds_per_frame();
            if spf > 0.0 {
                spf * frame_span(frame_count)
            } else {
                timing.duration_seconds
            }
        };
        if !(duration > 0.0) {
            duration = if timing.duration_seconds > 0.0 {
                timing.duration_seconds
            } else {
                1.0
            };
        }

        Self {
            start_frame,
            frame_count,
            duration_seconds: duration,
        }
    }

    /// The whole asset timeline.
    pub fn full(timing: AssetTiming) -> Self {
        Self::resolve(
            0.0,
            timing.total_frames as f32,
            timing.duration_seconds,
            timing,
        )
    }
}
