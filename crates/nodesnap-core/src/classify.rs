//! Classification of a pointer position against the nearest node.

use crate::error::SnapResult;
use crate::geometry::{Coordinate, NAN_COORDINATE, squared_distance};
use crate::node::Node;
use crate::predicates::AtCoordinateFn;
use crate::providers::PixelTransform;
use crate::state::RangeState;
use serde::{Deserialize, Serialize};

/// Snapping possibilities of one pointer position.
///
/// Predicates alone never make `start` and `end` both true; a latched end
/// range can still coexist with a matching start predicate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnappingInfo {
    /// The raw pointer coordinate.
    pub mouse_coordinate: Coordinate,
    /// The node coordinate when snapping, otherwise the raw pointer coordinate.
    pub snapped_coordinate: Coordinate,
    /// Whether the pointer is in snapping range of a start point.
    pub start: bool,
    /// Whether the pointer is in snapping range of an end point.
    pub end: bool,
}

/// Classify `mouse` against the `nearest` eligible node.
///
/// A latched range stays "at" its point while snapping holds, whatever the
/// predicates say now. Start wins over end when both predicates match.
/// Snapping holds when the pixel distance is at most `resolution`; a missing
/// node or non-finite coordinate never snaps.
pub fn classify(
    mouse: Coordinate,
    nearest: Option<&Node>,
    resolution: f64,
    to_pixel: &dyn PixelTransform,
    range: &RangeState,
    at_start: AtCoordinateFn<'_>,
    at_end: AtCoordinateFn<'_>,
) -> SnapResult<SnappingInfo> {
    let closest = nearest.map_or(NAN_COORDINATE, |node| node.position);

    let is_at_start = range.in_start_range || at_start(closest);
    let is_at_end = range.in_end_range || (!is_at_start && at_end(closest));

    let mouse_pixel = to_pixel.to_pixel(mouse)?;
    let closest_pixel = to_pixel.to_pixel(closest)?;
    let distance = squared_distance(mouse_pixel, closest_pixel).sqrt();
    let snapping = distance.is_finite() && distance <= resolution;

    Ok(SnappingInfo {
        mouse_coordinate: mouse,
        snapped_coordinate: if snapping { closest } else { mouse },
        start: is_at_start && snapping,
        end: is_at_end && snapping,
    })
}
