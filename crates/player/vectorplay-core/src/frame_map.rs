//! Normalized progress → concrete frame number for the engine.

use crate::segment::Segment;

/// Frame to render for `normalized` progress through `segment`.
///
/// A one-frame segment always maps to its start frame.
#[inline]
pub fn target_frame(normalized: f32, segment: &Segment) -> f32 {
    let span = if segment.frame_count > 1.0 {
        segment.frame_count - 1.0
    } else {
        0.0
    };
    segment.start_frame + normalized * span
}
