//! Pointer events delivered by the host map surface.

use crate::classify::SnappingInfo;
use crate::geometry::{Coordinate, is_finite};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Kind of pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    #[default]
    Move,
    Down,
    Up,
    Drag,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// A pointer event in map and pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPointerEvent {
    /// Pointer position in map units.
    pub coordinate: Coordinate,
    /// Pointer position in pixels, relative to the viewport.
    #[serde(default)]
    pub pixel: Point,
    #[serde(default)]
    pub kind: PointerKind,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl MapPointerEvent {
    /// A plain move event at a map coordinate.
    pub fn moved_to(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            pixel: Point::ZERO,
            kind: PointerKind::Move,
            modifiers: Modifiers::default(),
        }
    }

    /// Attach the pixel position.
    pub fn with_pixel(mut self, pixel: Point) -> Self {
        self.pixel = pixel;
        self
    }

    /// Check whether the map coordinate is usable for distance tests.
    pub fn has_finite_coordinate(&self) -> bool {
        is_finite(self.coordinate)
    }
}

/// A pointer event merged with the snapping info it produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnappingPointerEvent {
    /// The originating pointer event.
    pub pointer: MapPointerEvent,
    /// Snapping info computed for it.
    pub info: SnappingInfo,
}

impl SnappingPointerEvent {
    pub fn new(pointer: MapPointerEvent, info: SnappingInfo) -> Self {
        Self { pointer, info }
    }

    pub fn mouse_coordinate(&self) -> Coordinate {
        self.info.mouse_coordinate
    }

    pub fn snapped_coordinate(&self) -> Coordinate {
        self.info.snapped_coordinate
    }

    pub fn start(&self) -> bool {
        self.info.start
    }

    pub fn end(&self) -> bool {
        self.info.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moved_to_defaults() {
        let event = MapPointerEvent::moved_to(Point::new(1.0, 2.0)).with_pixel(Point::new(10.0, 20.0));
        assert_eq!(event.kind, PointerKind::Move);
        assert_eq!(event.pixel, Point::new(10.0, 20.0));
        assert!(event.has_finite_coordinate());
        assert!(!MapPointerEvent::moved_to(Point::new(f64::NAN, 0.0)).has_finite_coordinate());
    }

    #[test]
    fn test_deserialize_minimal_event() {
        let event: MapPointerEvent = serde_json::from_str(r#"{"coordinate": {"x": 3.0, "y": 4.0}}"#).unwrap();
        assert_eq!(event.coordinate, Point::new(3.0, 4.0));
        assert_eq!(event.kind, PointerKind::Move);
        assert_eq!(event.modifiers, Modifiers::default());
    }
}
