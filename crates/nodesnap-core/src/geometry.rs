//! Coordinates and extents in map projection units.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A position in map projection units.
pub type Coordinate = Point;

/// Coordinate that matches nothing: every comparison and distance against it fails.
pub const NAN_COORDINATE: Coordinate = Point::new(f64::NAN, f64::NAN);

/// Check whether both components of a coordinate are finite.
pub fn is_finite(coordinate: Coordinate) -> bool {
    coordinate.x.is_finite() && coordinate.y.is_finite()
}

/// Squared euclidean distance between two coordinates.
///
/// Non-finite input yields `f64::INFINITY` so it never wins a minimum search.
pub fn squared_distance(a: Coordinate, b: Coordinate) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let d = dx * dx + dy * dy;
    if d.is_nan() { f64::INFINITY } else { d }
}

/// Axis-aligned bounding box used to prune candidates.
///
/// Bounds are inclusive on every side and may be infinite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    rect: Rect,
}

impl Extent {
    /// Create an extent from its bounds, normalizing swapped corners.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            rect: Rect::new(min_x, min_y, max_x, max_y).abs(),
        }
    }

    /// The extent covering the whole plane.
    pub fn unbounded() -> Self {
        Self {
            rect: Rect::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::INFINITY),
        }
    }

    /// A square centered on `center` with the given half width.
    pub fn around(center: Coordinate, half_width: f64) -> Self {
        Self {
            rect: Rect::new(
                center.x - half_width,
                center.y - half_width,
                center.x + half_width,
                center.y + half_width,
            ),
        }
    }

    pub fn min_x(&self) -> f64 {
        self.rect.x0
    }

    pub fn min_y(&self) -> f64 {
        self.rect.y0
    }

    pub fn max_x(&self) -> f64 {
        self.rect.x1
    }

    pub fn max_y(&self) -> f64 {
        self.rect.y1
    }

    /// Check whether the extent has infinite bounds.
    pub fn is_unbounded(&self) -> bool {
        !(self.rect.x0.is_finite()
            && self.rect.y0.is_finite()
            && self.rect.x1.is_finite()
            && self.rect.y1.is_finite())
    }

    /// Check whether a coordinate lies inside or on the border.
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate.x >= self.rect.x0
            && coordinate.x <= self.rect.x1
            && coordinate.y >= self.rect.y0
            && coordinate.y <= self.rect.y1
    }

    /// Check whether two extents overlap (touching borders count).
    pub fn intersects(&self, other: &Extent) -> bool {
        self.rect.x0 <= other.rect.x1
            && self.rect.x1 >= other.rect.x0
            && self.rect.y0 <= other.rect.y1
            && self.rect.y1 >= other.rect.y0
    }

    /// The underlying rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl From<Rect> for Extent {
    fn from(rect: Rect) -> Self {
        Self { rect: rect.abs() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_contains_everything_finite() {
        let extent = Extent::unbounded();
        assert!(extent.is_unbounded());
        assert!(extent.contains(Point::new(1e300, -1e300)));
        assert!(!extent.contains(NAN_COORDINATE));
    }

    #[test]
    fn test_around_is_inclusive() {
        let extent = Extent::around(Point::new(10.0, 10.0), 5.0);
        assert!(!extent.is_unbounded());
        assert!(extent.contains(Point::new(15.0, 5.0)));
        assert!(!extent.contains(Point::new(15.1, 10.0)));
        assert!((extent.min_x() - 5.0).abs() < f64::EPSILON);
        assert!((extent.max_y() - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_new_normalizes_corners() {
        let extent = Extent::new(4.0, 3.0, 0.0, -1.0);
        assert!((extent.min_x() - 0.0).abs() < f64::EPSILON);
        assert!((extent.min_y() + 1.0).abs() < f64::EPSILON);
        assert!((extent.max_x() - 4.0).abs() < f64::EPSILON);
        assert!((extent.max_y() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_intersects() {
        let a = Extent::new(0.0, 0.0, 10.0, 10.0);
        let b = Extent::new(10.0, 10.0, 20.0, 20.0);
        let c = Extent::new(10.5, 0.0, 20.0, 5.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(Extent::unbounded().intersects(&c));
    }

    #[test]
    fn test_squared_distance_non_finite_is_infinite() {
        assert_eq!(squared_distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 25.0);
        assert_eq!(squared_distance(NAN_COORDINATE, Point::ZERO), f64::INFINITY);
        assert_eq!(
            squared_distance(Point::new(f64::INFINITY, 0.0), Point::new(f64::INFINITY, 0.0)),
            f64::INFINITY
        );
    }
}
