//! Snapping monitor: search, classify, latch and notify on every pointer move.

use crate::classify::{SnappingInfo, classify};
use crate::collection::SpatialCollection;
use crate::error::SnapResult;
use crate::geometry::Coordinate;
use crate::input::{MapPointerEvent, SnappingPointerEvent};
use crate::predicates::{self, AtCoordinateFn};
use crate::providers::{ExclusionProvider, PixelTransform, ResolutionProvider};
use crate::search::closest_node;
use crate::signal::{Signal, Subscription};
use crate::state::{RangeState, SnapSignal};
use std::rc::Rc;

/// The seven snapping signals plus a catch-all channel.
#[derive(Default)]
pub struct SnapSignals {
    move_at_start: Signal<SnappingPointerEvent>,
    move_at_end: Signal<SnappingPointerEvent>,
    move_outside: Signal<SnappingPointerEvent>,
    snap_in_start: Signal<SnappingPointerEvent>,
    snap_out_start: Signal<SnappingPointerEvent>,
    snap_in_end: Signal<SnappingPointerEvent>,
    snap_out_end: Signal<SnappingPointerEvent>,
    all: Signal<(SnapSignal, SnappingPointerEvent)>,
}

impl SnapSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// The channel for one signal kind.
    pub fn get(&self, kind: SnapSignal) -> &Signal<SnappingPointerEvent> {
        match kind {
            SnapSignal::MoveAtStart => &self.move_at_start,
            SnapSignal::MoveAtEnd => &self.move_at_end,
            SnapSignal::MoveOutside => &self.move_outside,
            SnapSignal::SnapInStart => &self.snap_in_start,
            SnapSignal::SnapOutStart => &self.snap_out_start,
            SnapSignal::SnapInEnd => &self.snap_in_end,
            SnapSignal::SnapOutEnd => &self.snap_out_end,
        }
    }

    /// Fires as long as the pointer moves within range of a start point.
    pub fn move_at_start(&self) -> &Signal<SnappingPointerEvent> {
        &self.move_at_start
    }

    /// Fires as long as the pointer moves within range of an end point.
    pub fn move_at_end(&self) -> &Signal<SnappingPointerEvent> {
        &self.move_at_end
    }

    /// Fires as long as the pointer moves outside range of any point.
    pub fn move_outside(&self) -> &Signal<SnappingPointerEvent> {
        &self.move_outside
    }

    /// Fires when the pointer enters range of a start point.
    pub fn snap_in_start(&self) -> &Signal<SnappingPointerEvent> {
        &self.snap_in_start
    }

    /// Fires when the pointer leaves range of a start point.
    pub fn snap_out_start(&self) -> &Signal<SnappingPointerEvent> {
        &self.snap_out_start
    }

    /// Fires when the pointer enters range of an end point.
    pub fn snap_in_end(&self) -> &Signal<SnappingPointerEvent> {
        &self.snap_in_end
    }

    /// Fires when the pointer leaves range of an end point.
    pub fn snap_out_end(&self) -> &Signal<SnappingPointerEvent> {
        &self.snap_out_end
    }

    /// Every signal, tagged with its kind, after the kind's own channel.
    pub fn all(&self) -> &Signal<(SnapSignal, SnappingPointerEvent)> {
        &self.all
    }

    fn publish(&self, kind: SnapSignal, event: &SnappingPointerEvent) {
        self.get(kind).publish(event);
        self.all.publish(&(kind, *event));
    }
}

/// Determines snapping possibilities of the pointer and signals changes.
///
/// One monitor serves one drawing session at a time; call [`reset`](Self::reset)
/// whenever the active drawing strategy changes so latched state from the
/// previous strategy does not leak into the next one.
pub struct SnappingMonitor {
    nodes: Rc<dyn SpatialCollection>,
    exclusions: Rc<dyn ExclusionProvider>,
    resolution: Rc<dyn ResolutionProvider>,
    projection: Rc<dyn PixelTransform>,
    range: RangeState,
    signals: SnapSignals,
}

impl SnappingMonitor {
    /// Create a monitor wired to its collaborators.
    pub fn new(
        nodes: Rc<dyn SpatialCollection>,
        exclusions: Rc<dyn ExclusionProvider>,
        resolution: Rc<dyn ResolutionProvider>,
        projection: Rc<dyn PixelTransform>,
    ) -> Self {
        Self {
            nodes,
            exclusions,
            resolution,
            projection,
            range: RangeState::default(),
            signals: SnapSignals::new(),
        }
    }

    /// The signal channels.
    pub fn signals(&self) -> &SnapSignals {
        &self.signals
    }

    /// Listen to one signal kind.
    pub fn subscribe(
        &self,
        kind: SnapSignal,
        listener: impl Fn(&SnappingPointerEvent) + 'static,
    ) -> Subscription {
        self.signals.get(kind).subscribe(listener)
    }

    /// Listen to every signal kind.
    pub fn subscribe_all(
        &self,
        listener: impl Fn(SnapSignal, &SnappingPointerEvent) + 'static,
    ) -> Subscription {
        self.signals
            .all()
            .subscribe(move |tagged: &(SnapSignal, SnappingPointerEvent)| listener(tagged.0, &tagged.1))
    }

    /// Current latch state.
    pub fn range_state(&self) -> RangeState {
        self.range
    }

    /// Clear both latches without emitting exit signals.
    pub fn reset(&mut self) {
        log::debug!("Snapping monitor reset");
        self.range.reset();
    }

    /// Analyse a pointer event and return the coordinate to use for drawing.
    ///
    /// `at_end` defaults to accepting any node. Signals are published before
    /// this returns: at most one exit, then at most one entry, then exactly
    /// one move signal. Errors from collaborators propagate and leave the
    /// latch state untouched.
    pub fn update(
        &mut self,
        event: &MapPointerEvent,
        at_start: AtCoordinateFn<'_>,
        at_end: Option<AtCoordinateFn<'_>>,
    ) -> SnapResult<Coordinate> {
        let at_end: AtCoordinateFn<'_> = match at_end {
            Some(at_end) => at_end,
            None => &predicates::always,
        };

        let info = self.snapping_info(event, at_start, at_end)?;
        let transition = self.range.advance(&info);

        let merged = SnappingPointerEvent::new(*event, info);
        for signal in transition.signals() {
            self.signals.publish(signal, &merged);
        }

        Ok(info.snapped_coordinate)
    }

    /// [`update`](Self::update) with the default end predicate.
    pub fn update_with_start(
        &mut self,
        event: &MapPointerEvent,
        at_start: AtCoordinateFn<'_>,
    ) -> SnapResult<Coordinate> {
        self.update(event, at_start, None)
    }

    /// Find the closest node not connected to the drawing and compare its
    /// distance with the snapping resolution.
    fn snapping_info(
        &self,
        event: &MapPointerEvent,
        at_start: AtCoordinateFn<'_>,
        at_end: AtCoordinateFn<'_>,
    ) -> SnapResult<SnappingInfo> {
        let mouse = event.coordinate;
        if !event.has_finite_coordinate() {
            log::warn!("Pointer coordinate is not finite: ({}, {})", mouse.x, mouse.y);
        }

        let exclusions = self.exclusions.current_exclusions()?;
        let nearest = closest_node(self.nodes.as_ref(), mouse, &exclusions)?;
        classify(
            mouse,
            nearest.as_ref(),
            self.resolution.current_resolution(),
            self.projection.as_ref(),
            &self.range,
            at_start,
            at_end,
        )
    }
}
