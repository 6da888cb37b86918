//! Point features that act as snap targets.

use crate::geometry::{Coordinate, squared_distance};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a node.
pub type NodeId = Uuid;

/// A point feature eligible as a snapping target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier. Generated when missing from serialized input.
    #[serde(default = "Uuid::new_v4")]
    pub id: NodeId,
    /// Position in map units.
    pub position: Coordinate,
}

impl Node {
    /// Create a node with a fresh identifier.
    pub fn new(position: Coordinate) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
        }
    }

    /// Create a node with a known identifier.
    pub fn with_id(id: NodeId, position: Coordinate) -> Self {
        Self { id, position }
    }

    /// Refine a running minimum squared distance against this node.
    ///
    /// Returns the node's squared distance to `(x, y)` if it is strictly
    /// smaller than `best_squared_distance`, otherwise `best_squared_distance`
    /// unchanged. Non-finite positions or queries never improve the minimum.
    pub fn closest_point_refine(&self, x: f64, y: f64, best_squared_distance: f64) -> f64 {
        let d = squared_distance(self.position, Coordinate::new(x, y));
        if d < best_squared_distance {
            d
        } else {
            best_squared_distance
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_refine_improves_strictly() {
        let node = Node::new(Point::new(3.0, 4.0));
        assert!((node.closest_point_refine(0.0, 0.0, f64::INFINITY) - 25.0).abs() < f64::EPSILON);
        assert!((node.closest_point_refine(0.0, 0.0, 10.0) - 10.0).abs() < f64::EPSILON);
        // Equal distance is not an improvement
        assert!((node.closest_point_refine(0.0, 0.0, 25.0) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_refine_ignores_non_finite() {
        let node = Node::new(Point::new(f64::NAN, 1.0));
        assert_eq!(node.closest_point_refine(0.0, 0.0, f64::INFINITY), f64::INFINITY);

        let node = Node::new(Point::new(1.0, 1.0));
        assert_eq!(node.closest_point_refine(f64::NAN, 0.0, f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_new_nodes_have_distinct_ids() {
        let a = Node::new(Point::ZERO);
        let b = Node::new(Point::ZERO);
        assert_ne!(a.id, b.id);
    }
}
