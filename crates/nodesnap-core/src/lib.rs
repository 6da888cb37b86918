//! NodeSnap Core Library
//!
//! Platform-agnostic snapping engine for digitizing shapes on a map: finds the
//! nearest eligible node under the pointer and turns proximity into an ordered
//! stream of enter/exit/move signals.

pub mod classify;
pub mod collection;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod monitor;
pub mod node;
pub mod predicates;
pub mod providers;
pub mod scene;
pub mod search;
pub mod signal;
pub mod state;
pub mod view;

pub use classify::{SnappingInfo, classify};
pub use collection::{ExtentVisitor, KdIndex, NodeLayer, SpatialCollection};
pub use config::{SnapSettings, DEFAULT_RESOLUTION};
pub use error::{SnapError, SnapResult};
pub use geometry::{Coordinate, Extent, NAN_COORDINATE};
pub use input::{MapPointerEvent, Modifiers, PointerKind, SnappingPointerEvent};
pub use monitor::{SnapSignals, SnappingMonitor};
pub use node::{Node, NodeId};
pub use predicates::AtCoordinateFn;
pub use providers::{
    Connections, ExclusionProvider, Identity, PixelFn, PixelTransform, ResolutionProvider,
    SnappingStore,
};
pub use scene::{IndexKind, ReplayStep, Scene, TraceStep};
pub use search::closest_node;
pub use signal::{Signal, Subscription};
pub use state::{RangeState, SnapSignal, Transition};
pub use view::{BASE_RESOLUTION, MapView};
