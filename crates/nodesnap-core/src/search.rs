//! Nearest-node search with an exclusion filter.

use crate::collection::{ExtentVisitor, SpatialCollection};
use crate::error::SnapResult;
use crate::geometry::{Coordinate, Extent};
use crate::node::{Node, NodeId};
use std::collections::HashSet;

/// Search state threaded through a collection scan.
struct ClosestNode<'a> {
    query: Coordinate,
    exclusions: &'a HashSet<NodeId>,
    min_squared_distance: f64,
    extent: Extent,
    closest: Option<Node>,
}

impl ExtentVisitor for ClosestNode<'_> {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn visit(&mut self, node: &Node) {
        if self.exclusions.contains(&node.id) {
            return;
        }

        let previous = self.min_squared_distance;
        self.min_squared_distance = node.closest_point_refine(self.query.x, self.query.y, previous);

        if self.min_squared_distance < previous {
            self.closest = Some(*node);
            self.extent = Extent::around(self.query, self.min_squared_distance.sqrt());
        }
    }

    fn focus(&self) -> Option<Coordinate> {
        Some(self.query)
    }
}

/// Find the node closest to `query`, skipping any node in `exclusions`.
///
/// The search extent starts unbounded and shrinks to a square around the
/// query each time a closer node is found. Equidistant nodes resolve to the
/// first one in the collection's iteration order. Returns `Ok(None)` when the
/// collection has no eligible node or the query is not finite.
pub fn closest_node<C: SpatialCollection + ?Sized>(
    collection: &C,
    query: Coordinate,
    exclusions: &HashSet<NodeId>,
) -> SnapResult<Option<Node>> {
    let mut search = ClosestNode {
        query,
        exclusions,
        min_squared_distance: f64::INFINITY,
        extent: Extent::unbounded(),
        closest: None,
    };
    collection.for_each_in_extent(&mut search)?;

    if let Some(node) = &search.closest {
        log::trace!(
            "Closest node {} at squared distance {}",
            node.id,
            search.min_squared_distance
        );
    }
    Ok(search.closest)
}
