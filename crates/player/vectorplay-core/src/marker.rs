//! Named time markers and the catalog built from an asset's raw marker list.

use serde::{Deserialize, Serialize};

use crate::backend::RawMarker;
use crate::segment::{frame_span, AssetTiming};

/// Byte cap applied to marker names when truncation is enabled.
pub const MARKER_NAME_LIMIT: usize = 63;

/// A named window inside the asset's frame range.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Marker {
    pub name: String,
    pub start_frame: f32,
    /// At least 1.
    pub frame_count: f32,
    /// Frame-derived duration; 0 when the asset has no usable frame rate.
    pub duration_seconds: f32,
}

impl Marker {
    /// Build a marker from engine data using the asset's seconds-per-frame.
    pub fn from_raw(raw: &RawMarker, timing: AssetTiming, options: MarkerOptions) -> Self {
        let frame_count = if raw.duration > 0.0 { raw.duration } else { 1.0 };
        let spf = timing.seconds_per_frame();
        let duration_seconds = if spf > 0.0 {
            spf * frame_span(frame_count)
        } else {
            0.0
        };
        let name = if options.truncate_names {
            truncate_name(&raw.name, MARKER_NAME_LIMIT).to_string()
        } else {
            raw.name.clone()
        };
        Self {
            name,
            start_frame: raw.time,
            frame_count,
            duration_seconds,
        }
    }

    /// ASCII case-insensitive name comparison.
    #[inline]
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Longest prefix of `name` that fits in `limit` bytes without splitting a character.
fn truncate_name(name: &str, limit: usize) -> &str {
    if name.len() <= limit {
        return name;
    }
    let mut end = limit;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// Catalog build options.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkerOptions {
    pub truncate_names: bool,
}

/// Markers of the loaded asset, ordered by start frame.
///
/// Markers with equal start frames keep the order the engine reported them in.
/// Index-based enumeration always follows this time order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MarkerCatalog {
    markers: Vec<Marker>,
}

impl MarkerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from the engine's raw list.
    pub fn build(raw: &[RawMarker], timing: AssetTiming, options: MarkerOptions) -> Self {
        let mut markers: Vec<Marker> = raw
            .iter()
            .map(|r| Marker::from_raw(r, timing, options))
            .collect();
        // Vec::sort_by is stable; ties keep discovery order.
        markers.sort_by(|a, b| a.start_frame.total_cmp(&b.start_frame));
        Self { markers }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    /// Name of the marker at `index` in time order.
    #[inline]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.markers.get(index).map(|m| m.name.as_str())
    }

    /// First marker (in time order) whose name matches case-insensitively.
    pub fn find(&self, name: &str) -> Option<(usize, &Marker)> {
        self.markers.iter().enumerate().find(|(_, m)| m.matches(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }
}
