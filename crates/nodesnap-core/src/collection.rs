//! Spatial collections of nodes.
//!
//! A collection hands nodes to an [`ExtentVisitor`] and consults the visitor's
//! extent as it goes, so a visitor that narrows its extent while visiting
//! (like the nearest-node search) prunes the rest of the scan.

use crate::error::{SnapError, SnapResult};
use crate::geometry::{Coordinate, Extent, is_finite};
use crate::node::{Node, NodeId};
use kiddo::{KdTree, SquaredEuclidean};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Receives nodes from a [`SpatialCollection`] scan.
pub trait ExtentVisitor {
    /// The extent nodes must intersect to be visited. Read before every candidate.
    fn extent(&self) -> Extent;

    /// Visit a node inside the current extent.
    fn visit(&mut self, node: &Node);

    /// Point the visitor searches around, if any. Indexes may use it to visit
    /// nearby nodes first while the extent is still unbounded.
    fn focus(&self) -> Option<Coordinate> {
        None
    }
}

/// A collection of nodes that supports extent-filtered iteration.
///
/// Iteration order must be deterministic for an unchanged collection; it
/// decides ties in nearest-node searches.
pub trait SpatialCollection {
    /// Visit every node inside the visitor's (possibly shrinking) extent.
    fn for_each_in_extent(&self, visitor: &mut dyn ExtentVisitor) -> SnapResult<()>;
}

impl<T: SpatialCollection + ?Sized> SpatialCollection for RefCell<T> {
    fn for_each_in_extent(&self, visitor: &mut dyn ExtentVisitor) -> SnapResult<()> {
        let inner = self
            .try_borrow()
            .map_err(|e| SnapError::Collection(format!("Borrow error: {}", e)))?;
        inner.for_each_in_extent(visitor)
    }
}

/// Insertion-ordered node layer scanned linearly.
#[derive(Debug, Clone, Default)]
pub struct NodeLayer {
    /// All nodes, keyed by ID.
    nodes: HashMap<NodeId, Node>,
    /// Insertion order of node IDs.
    order: Vec<NodeId>,
}

impl NodeLayer {
    /// Create an empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a layer from nodes, keeping their order.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        let mut layer = Self::new();
        for node in nodes {
            layer.add(node);
        }
        layer
    }

    /// Add a node. Re-adding a known ID updates its position in place.
    pub fn add(&mut self, node: Node) -> NodeId {
        if self.nodes.insert(node.id, node).is_none() {
            self.order.push(node.id);
        }
        log::debug!("Node layer: added {} at ({}, {})", node.id, node.position.x, node.position.y);
        node.id
    }

    /// Remove a node by ID.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.remove(&id)?;
        self.order.retain(|other| *other != id);
        log::debug!("Node layer: removed {}", id);
        Some(node)
    }

    /// Move a node. Returns false if the ID is unknown.
    pub fn move_node(&mut self, id: NodeId, position: Coordinate) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Iterate nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Remove all nodes.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.order.clear();
    }
}

impl SpatialCollection for NodeLayer {
    fn for_each_in_extent(&self, visitor: &mut dyn ExtentVisitor) -> SnapResult<()> {
        for node in self.iter() {
            if visitor.extent().contains(node.position) {
                visitor.visit(node);
            }
        }
        Ok(())
    }
}

/// Padding applied to kd-tree query radii; exact containment is re-checked
/// against the visitor's extent afterwards.
const RADIUS_PADDING: f64 = 1e-9;

fn padded(radius_sq: f64) -> f64 {
    radius_sq + radius_sq * RADIUS_PADDING + f64::EPSILON
}

/// Kd-tree node index.
///
/// Every node ID owns a slot, assigned on first insertion and kept across
/// moves and re-adds. Candidates of a range query are visited nearest to the
/// query center first, equal distances in slot order, so equidistant nodes
/// resolve to the one inserted first, as in [`NodeLayer`].
///
/// While the visitor's extent is unbounded and it has a finite
/// [`focus`](ExtentVisitor::focus), the index visits growing rings around the
/// focus until the visitor narrows its extent. Without a focus it falls back
/// to a scan in slot order.
#[derive(Debug, Clone)]
pub struct KdIndex {
    tree: KdTree<f64, 2>,
    /// Nodes by slot. Removed nodes leave an empty slot.
    slots: Vec<Option<Node>>,
    slot_of: HashMap<NodeId, usize>,
    /// Number of entries in the tree; nodes with non-finite positions are kept out.
    placed: usize,
}

impl Default for KdIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl KdIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            tree: KdTree::new(),
            slots: Vec::new(),
            slot_of: HashMap::new(),
            placed: 0,
        }
    }

    /// Build an index from nodes, keeping their order as slot order.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        let mut index = Self::new();
        for node in nodes {
            index.add(node);
        }
        index
    }

    fn node_at(&self, slot: usize) -> Option<&Node> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn place(&mut self, slot: usize) {
        if let Some(node) = self.node_at(slot).copied() {
            if is_finite(node.position) {
                self.tree.add(&[node.position.x, node.position.y], slot as u64);
                self.placed += 1;
            }
        }
    }

    fn unplace(&mut self, slot: usize) {
        if let Some(node) = self.node_at(slot).copied() {
            if is_finite(node.position) {
                let removed = self.tree.remove(&[node.position.x, node.position.y], slot as u64);
                self.placed = self.placed.saturating_sub(removed);
            }
        }
    }

    /// Add a node. Re-adding a known ID moves it and keeps its slot.
    pub fn add(&mut self, node: Node) -> NodeId {
        match self.slot_of.get(&node.id).copied() {
            Some(slot) => {
                self.unplace(slot);
                if let Some(entry) = self.slots.get_mut(slot) {
                    *entry = Some(node);
                }
                self.place(slot);
            }
            None => {
                let slot = self.slots.len();
                self.slots.push(Some(node));
                self.slot_of.insert(node.id, slot);
                self.place(slot);
            }
        }
        log::debug!("Kd index: added {} at ({}, {})", node.id, node.position.x, node.position.y);
        node.id
    }

    /// Remove a node by ID.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slot_of.remove(&id)?;
        self.unplace(slot);
        let node = self.slots.get_mut(slot).and_then(Option::take);
        log::debug!("Kd index: removed {}", id);
        node
    }

    /// Move a node. Returns false if the ID is unknown.
    pub fn move_node(&mut self, id: NodeId, position: Coordinate) -> bool {
        if !self.slot_of.contains_key(&id) {
            return false;
        }
        self.add(Node::with_id(id, position));
        true
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slot_of.get(&id).and_then(|slot| self.node_at(*slot))
    }

    pub fn len(&self) -> usize {
        self.slot_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slot_of.is_empty()
    }

    /// Visit `(squared distance, slot)` candidates nearest first, skipping
    /// slots already seen and nodes outside the visitor's current extent.
    fn visit_candidates(
        &self,
        candidates: impl IntoIterator<Item = (f64, u64)>,
        visitor: &mut dyn ExtentVisitor,
        seen: &mut HashSet<usize>,
    ) {
        let mut candidates: Vec<(f64, u64)> = candidates.into_iter().collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        for (_, item) in candidates {
            let slot = item as usize;
            if !seen.insert(slot) {
                continue;
            }
            if let Some(node) = self.node_at(slot) {
                if visitor.extent().contains(node.position) {
                    visitor.visit(node);
                }
            }
        }
    }

    /// Visit rings of doubling radius around `focus` until the visitor's
    /// extent becomes bounded or every placed node was seen.
    fn visit_rings(&self, focus: Coordinate, visitor: &mut dyn ExtentVisitor, seen: &mut HashSet<usize>) {
        let query = [focus.x, focus.y];
        let mut radius_sq = self.tree.nearest_one::<SquaredEuclidean>(&query).distance;

        loop {
            let ring = self.tree.within_unsorted::<SquaredEuclidean>(&query, padded(radius_sq));
            let covered = ring.len() >= self.placed;
            self.visit_candidates(ring.into_iter().map(|n| (n.distance, n.item)), visitor, seen);

            if covered || !visitor.extent().is_unbounded() {
                break;
            }
            radius_sq = (radius_sq * 4.0).max(1.0);
        }
    }

    fn visit_in_slot_order(&self, visitor: &mut dyn ExtentVisitor) {
        for node in self.slots.iter().flatten() {
            if visitor.extent().contains(node.position) {
                visitor.visit(node);
            }
        }
    }
}

impl SpatialCollection for KdIndex {
    fn for_each_in_extent(&self, visitor: &mut dyn ExtentVisitor) -> SnapResult<()> {
        if self.placed == 0 {
            return Ok(());
        }

        let mut seen = HashSet::new();
        if visitor.extent().is_unbounded() {
            match visitor.focus().filter(|focus| is_finite(*focus)) {
                Some(focus) => self.visit_rings(focus, visitor, &mut seen),
                None => {
                    self.visit_in_slot_order(visitor);
                    return Ok(());
                }
            }
            if visitor.extent().is_unbounded() {
                return Ok(());
            }
        }

        // Circle enclosing the extent, then exact containment per candidate
        let rect = visitor.extent().rect();
        let center = rect.center();
        let half_w = rect.width() / 2.0;
        let half_h = rect.height() / 2.0;
        let radius_sq = half_w * half_w + half_h * half_h;

        let candidates = self
            .tree
            .within_unsorted::<SquaredEuclidean>(&[center.x, center.y], padded(radius_sq));
        self.visit_candidates(candidates.into_iter().map(|n| (n.distance, n.item)), visitor, &mut seen);
        Ok(())
    }
}
