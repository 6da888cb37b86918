//! Serializable snapping scenes and trace replay.
//!
//! A scene bundles everything a monitor needs (nodes, connected nodes,
//! settings, view) with a pointer trace, so a digitizing session can be
//! stored as JSON and replayed deterministically.

use crate::collection::{KdIndex, NodeLayer, SpatialCollection};
use crate::config::SnapSettings;
use crate::error::{SnapError, SnapResult};
use crate::geometry::{Coordinate, is_finite};
use crate::input::MapPointerEvent;
use crate::monitor::SnappingMonitor;
use crate::node::{Node, NodeId};
use crate::predicates::coincides_with_any;
use crate::providers::{Connections, Identity, PixelTransform, SnappingStore};
use crate::state::SnapSignal;
use crate::view::MapView;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// Spatial collection backing a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Linear scan in node order.
    #[default]
    Layer,
    /// Kd-tree index; equidistant nodes resolve in node order as with `Layer`.
    KdTree,
}

/// One pointer event of a trace and the drawing strategy's targets at that moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub pointer: MapPointerEvent,
    /// Coordinates accepted as start points.
    #[serde(default)]
    pub start_targets: Vec<Coordinate>,
    /// Coordinates accepted as end points; any node when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_targets: Option<Vec<Coordinate>>,
    /// Reset the monitor before this step, as on a strategy change.
    #[serde(default)]
    pub reset_before: bool,
}

impl TraceStep {
    /// A move to `coordinate` with no start targets and the default end predicate.
    pub fn moved_to(coordinate: Coordinate) -> Self {
        Self {
            pointer: MapPointerEvent::moved_to(coordinate),
            start_targets: Vec::new(),
            end_targets: None,
            reset_before: false,
        }
    }
}

/// Outcome of one replayed trace step.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayStep {
    /// Position in the trace.
    pub index: usize,
    /// Coordinate returned by the monitor.
    pub snapped: Coordinate,
    /// Signals fired, in order.
    pub signals: Vec<SnapSignal>,
}

/// A stored snapping session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub settings: SnapSettings,
    /// Map view for pixel distances; map units are pixels when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<MapView>,
    #[serde(default)]
    pub index: IndexKind,
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Nodes already connected into the shape being drawn.
    #[serde(default)]
    pub connected: Vec<NodeId>,
    #[serde(default)]
    pub trace: Vec<TraceStep>,
}

impl Scene {
    /// Parse and validate a scene.
    pub fn from_json(json: &str) -> SnapResult<Self> {
        let scene: Scene = serde_json::from_str(json)
            .map_err(|e| SnapError::Scene(format!("Failed to parse scene: {}", e)))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Serialize the scene to pretty JSON.
    pub fn to_json(&self) -> SnapResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapError::Scene(format!("Failed to serialize scene: {}", e)))
    }

    /// Load a scene file.
    pub fn load(path: impl AsRef<Path>) -> SnapResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| SnapError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Write the scene to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> SnapResult<()> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json)
            .map_err(|e| SnapError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Check settings, node positions and node ID uniqueness.
    pub fn validate(&self) -> SnapResult<()> {
        if !self.settings.is_valid() {
            return Err(SnapError::Scene(format!(
                "Invalid snapping resolution: {}",
                self.settings.resolution
            )));
        }

        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !is_finite(node.position) {
                return Err(SnapError::Scene(format!("Node {} has a non-finite position", node.id)));
            }
            if !seen.insert(node.id) {
                return Err(SnapError::Scene(format!("Duplicate node id {}", node.id)));
            }
        }

        for id in &self.connected {
            if !seen.contains(id) {
                log::warn!("Connected node {} is not part of the scene", id);
            }
        }
        Ok(())
    }

    fn collection(&self) -> Rc<dyn SpatialCollection> {
        let nodes = self.nodes.iter().copied();
        match self.index {
            IndexKind::Layer => Rc::new(RefCell::new(NodeLayer::from_nodes(nodes))),
            IndexKind::KdTree => Rc::new(RefCell::new(KdIndex::from_nodes(nodes))),
        }
    }

    /// Validate the scene and build a monitor wired to its nodes, connections,
    /// settings and view.
    pub fn monitor(&self) -> SnapResult<SnappingMonitor> {
        self.validate()?;
        let projection: Rc<dyn PixelTransform> = match &self.view {
            Some(view) => Rc::new(view.clone()),
            None => Rc::new(Identity),
        };
        let connections: Connections = self.connected.iter().copied().collect();

        Ok(SnappingMonitor::new(
            self.collection(),
            Rc::new(connections),
            Rc::new(SnappingStore::from_settings(&self.settings)),
            projection,
        ))
    }

    /// Feed the trace through a fresh monitor and record what it emitted.
    pub fn replay(&self) -> SnapResult<Vec<ReplayStep>> {
        let mut monitor = self.monitor()?;

        let fired = Rc::new(RefCell::new(Vec::new()));
        let sink = fired.clone();
        let _subscription = monitor.subscribe_all(move |kind, _| sink.borrow_mut().push(kind));

        let mut steps = Vec::with_capacity(self.trace.len());
        for (index, step) in self.trace.iter().enumerate() {
            if step.reset_before {
                monitor.reset();
            }

            let at_start = coincides_with_any(step.start_targets.clone());
            let snapped = match &step.end_targets {
                Some(targets) => {
                    let at_end = coincides_with_any(targets.clone());
                    monitor.update(&step.pointer, &at_start, Some(&at_end))?
                }
                None => monitor.update_with_start(&step.pointer, &at_start)?,
            };

            steps.push(ReplayStep {
                index,
                snapped,
                signals: fired.borrow_mut().drain(..).collect(),
            });
        }

        log::debug!("Replayed {} trace steps", steps.len());
        Ok(steps)
    }
}
