//! Placement of a fixed-aspect raster inside an arbitrary destination rectangle.

use crate::config::FitPolicy;
use crate::geometry::{Rect, Vec2};

/// Uniform scale factor for `policy` given per-axis ratios.
#[inline]
fn uniform_scale(policy: FitPolicy, sx: f32, sy: f32) -> f32 {
    match policy {
        // Mean of both axes; the raster keeps its aspect ratio.
        FitPolicy::Fill => (sx + sy) * 0.5,
        FitPolicy::Contain => sx.min(sy),
        FitPolicy::Cover => sx.max(sy),
        FitPolicy::FitWidth => sx,
        FitPolicy::FitHeight => sy,
    }
}

/// Compute where a `source_w × source_h` raster lands inside `dest`.
///
/// The raster is scaled uniformly according to `policy`, then positioned so that
/// `anchor` (0 = left/top, 1 = right/bottom) of the leftover space sits before it.
/// Anchors outside `[0, 1]` are honoured and place the raster outside `dest`.
///
/// A zero-sized source produces an empty rectangle at the anchored point.
pub fn fit_rect(source_w: f32, source_h: f32, dest: Rect, policy: FitPolicy, anchor: Vec2) -> Rect {
    let (width, height) = if source_w > 0.0 && source_h > 0.0 {
        let sx = dest.width / source_w;
        let sy = dest.height / source_h;
        let s = uniform_scale(policy, sx, sy);
        (source_w * s, source_h * s)
    } else {
        (0.0, 0.0)
    };

    Rect {
        x: dest.x + (dest.width - width) * anchor.x,
        y: dest.y + (dest.height - height) * anchor.y,
        width,
        height,
    }
}
