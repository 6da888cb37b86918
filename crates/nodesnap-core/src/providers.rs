//! Collaborators the snapping monitor reads from on every update.

use crate::config::SnapSettings;
use crate::error::{SnapError, SnapResult};
use crate::geometry::Coordinate;
use crate::node::NodeId;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

/// Supplies the node IDs that must not attract snapping.
pub trait ExclusionProvider {
    /// The excluded IDs as of now. Called once per update, never cached.
    fn current_exclusions(&self) -> SnapResult<HashSet<NodeId>>;
}

/// Supplies the snapping radius in pixels.
pub trait ResolutionProvider {
    /// The radius as of now. May change between updates.
    fn current_resolution(&self) -> f64;
}

/// Projects map coordinates to pixel coordinates.
pub trait PixelTransform {
    fn to_pixel(&self, coordinate: Coordinate) -> SnapResult<Coordinate>;
}

impl<T: ExclusionProvider + ?Sized> ExclusionProvider for RefCell<T> {
    fn current_exclusions(&self) -> SnapResult<HashSet<NodeId>> {
        let inner = self
            .try_borrow()
            .map_err(|e| SnapError::Collection(format!("Borrow error: {}", e)))?;
        inner.current_exclusions()
    }
}

impl<T: PixelTransform + ?Sized> PixelTransform for RefCell<T> {
    fn to_pixel(&self, coordinate: Coordinate) -> SnapResult<Coordinate> {
        let inner = self
            .try_borrow()
            .map_err(|e| SnapError::Projection(format!("Borrow error: {}", e)))?;
        inner.to_pixel(coordinate)
    }
}

impl ExclusionProvider for HashSet<NodeId> {
    fn current_exclusions(&self) -> SnapResult<HashSet<NodeId>> {
        Ok(self.clone())
    }
}

impl ResolutionProvider for f64 {
    fn current_resolution(&self) -> f64 {
        *self
    }
}

/// Nodes already connected into the shape being drawn.
#[derive(Debug, Clone, Default)]
pub struct Connections {
    ids: HashSet<NodeId>,
}

impl Connections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a node as connected. Returns false if it already was.
    pub fn connect(&mut self, id: NodeId) -> bool {
        self.ids.insert(id)
    }

    /// Unmark a node. Returns false if it was not connected.
    pub fn disconnect(&mut self, id: NodeId) -> bool {
        self.ids.remove(&id)
    }

    pub fn is_connected(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Forget all connections, e.g. when a drawing finishes.
    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

impl FromIterator<NodeId> for Connections {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl ExclusionProvider for Connections {
    fn current_exclusions(&self) -> SnapResult<HashSet<NodeId>> {
        Ok(self.ids.clone())
    }
}

/// Live snapping resolution shared between the settings UI and the monitor.
#[derive(Debug, Clone)]
pub struct SnappingStore {
    resolution: Cell<f64>,
}

impl Default for SnappingStore {
    fn default() -> Self {
        Self::from_settings(&SnapSettings::default())
    }
}

impl SnappingStore {
    /// Create a store with the given radius in pixels.
    pub fn new(resolution: f64) -> Self {
        Self {
            resolution: Cell::new(resolution),
        }
    }

    pub fn from_settings(settings: &SnapSettings) -> Self {
        Self::new(settings.resolution)
    }

    pub fn resolution(&self) -> f64 {
        self.resolution.get()
    }

    /// Change the radius; takes effect on the next update.
    pub fn set_resolution(&self, resolution: f64) {
        log::debug!("Snapping resolution set to {}px", resolution);
        self.resolution.set(resolution);
    }
}

impl ResolutionProvider for SnappingStore {
    fn current_resolution(&self) -> f64 {
        self.resolution()
    }
}

/// Pixel transform backed by a plain function.
pub struct PixelFn<F>(pub F);

impl<F: Fn(Coordinate) -> Coordinate> PixelTransform for PixelFn<F> {
    fn to_pixel(&self, coordinate: Coordinate) -> SnapResult<Coordinate> {
        Ok((self.0)(coordinate))
    }
}

/// Map units are pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl PixelTransform for Identity {
    fn to_pixel(&self, coordinate: Coordinate) -> SnapResult<Coordinate> {
        Ok(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use uuid::Uuid;

    #[test]
    fn test_connections() {
        let mut connections = Connections::new();
        let id = Uuid::new_v4();
        assert!(connections.connect(id));
        assert!(!connections.connect(id));
        assert!(connections.is_connected(id));
        assert_eq!(connections.current_exclusions().unwrap().len(), 1);

        assert!(connections.disconnect(id));
        assert!(!connections.disconnect(id));

        connections.connect(Uuid::new_v4());
        connections.clear();
        assert!(connections.is_empty());
    }

    #[test]
    fn test_store_reads_live_value() {
        let store = SnappingStore::new(10.0);
        assert!((store.current_resolution() - 10.0).abs() < f64::EPSILON);
        store.set_resolution(4.5);
        assert!((store.current_resolution() - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_store_default_matches_settings() {
        let store = SnappingStore::default();
        assert!((store.resolution() - SnapSettings::default().resolution).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pixel_fn_and_identity() {
        let double = PixelFn(|c: Coordinate| Point::new(c.x * 2.0, c.y * 2.0));
        assert_eq!(double.to_pixel(Point::new(1.0, 2.0)).unwrap(), Point::new(2.0, 4.0));
        assert_eq!(Identity.to_pixel(Point::new(1.0, 2.0)).unwrap(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_refcell_exclusions_follow_mutation() {
        let shared = RefCell::new(Connections::new());
        assert!(shared.current_exclusions().unwrap().is_empty());
        let id = Uuid::new_v4();
        shared.borrow_mut().connect(id);
        assert!(shared.current_exclusions().unwrap().contains(&id));
    }

    #[test]
    fn test_refcell_exclusions_report_conflicting_borrow() {
        let shared = RefCell::new(Connections::new());
        let _guard = shared.borrow_mut();
        assert!(matches!(shared.current_exclusions(), Err(SnapError::Collection(_))));
    }
}
