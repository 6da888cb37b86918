//! Latching state machine that turns snapping info into signals.

use crate::classify::SnappingInfo;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter;

/// Signals emitted by the snapping monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SnapSignal {
    /// Pointer moves within snapping range of a start point.
    MoveAtStart,
    /// Pointer moves within snapping range of an end point.
    MoveAtEnd,
    /// Pointer moves outside snapping range of any point.
    MoveOutside,
    /// Pointer entered snapping range of a start point.
    SnapInStart,
    /// Pointer left snapping range of a start point.
    SnapOutStart,
    /// Pointer entered snapping range of an end point.
    SnapInEnd,
    /// Pointer left snapping range of an end point.
    SnapOutEnd,
}

impl SnapSignal {
    /// All signals, in declaration order.
    pub const ALL: [SnapSignal; 7] = [
        SnapSignal::MoveAtStart,
        SnapSignal::MoveAtEnd,
        SnapSignal::MoveOutside,
        SnapSignal::SnapInStart,
        SnapSignal::SnapOutStart,
        SnapSignal::SnapInEnd,
        SnapSignal::SnapOutEnd,
    ];

    /// Signal name as used by event consumers.
    pub fn name(self) -> &'static str {
        match self {
            SnapSignal::MoveAtStart => "moveAtStart",
            SnapSignal::MoveAtEnd => "moveAtEnd",
            SnapSignal::MoveOutside => "moveOutside",
            SnapSignal::SnapInStart => "snapInStart",
            SnapSignal::SnapOutStart => "snapOutStart",
            SnapSignal::SnapInEnd => "snapInEnd",
            SnapSignal::SnapOutEnd => "snapOutEnd",
        }
    }

    /// Check if this signal fires on every update rather than on a latch change.
    pub fn is_move(self) -> bool {
        matches!(
            self,
            SnapSignal::MoveAtStart | SnapSignal::MoveAtEnd | SnapSignal::MoveOutside
        )
    }

    /// Check if this signal marks leaving a range.
    pub fn is_exit(self) -> bool {
        matches!(self, SnapSignal::SnapOutStart | SnapSignal::SnapOutEnd)
    }

    /// Check if this signal marks entering a range.
    pub fn is_entry(self) -> bool {
        matches!(self, SnapSignal::SnapInStart | SnapSignal::SnapInEnd)
    }
}

impl fmt::Display for SnapSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signals produced by one update, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// `SnapOutStart` or `SnapOutEnd`, if a latch was released.
    pub exit: Option<SnapSignal>,
    /// `SnapInStart` or `SnapInEnd`, if a latch was set.
    pub entry: Option<SnapSignal>,
    /// The move signal; exactly one per update.
    pub movement: SnapSignal,
}

impl Transition {
    /// Exit, then entry, then the move signal.
    pub fn signals(&self) -> impl Iterator<Item = SnapSignal> {
        self.exit
            .into_iter()
            .chain(self.entry)
            .chain(iter::once(self.movement))
    }
}

/// The two range latches of a drawing session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeState {
    /// Whether the last update was in range of a start point.
    pub in_start_range: bool,
    /// Whether the last update was in range of an end point.
    pub in_end_range: bool,
}

impl RangeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if neither latch is set.
    pub fn is_idle(&self) -> bool {
        !self.in_start_range && !self.in_end_range
    }

    /// Clear both latches without producing signals.
    pub fn reset(&mut self) {
        self.in_start_range = false;
        self.in_end_range = false;
    }

    /// Apply freshly classified info and return the signals to emit.
    ///
    /// At most one latch is released per update, start first. Entry signals
    /// fire only when a latch goes from clear to set.
    pub fn advance(&mut self, info: &SnappingInfo) -> Transition {
        let mut exit = None;
        if self.in_start_range && !info.start {
            self.in_start_range = false;
            exit = Some(SnapSignal::SnapOutStart);
        } else if self.in_end_range && !info.end {
            self.in_end_range = false;
            exit = Some(SnapSignal::SnapOutEnd);
        }

        let mut entry = None;
        let movement = if info.start {
            if !self.in_start_range {
                self.in_start_range = true;
                entry = Some(SnapSignal::SnapInStart);
            }
            SnapSignal::MoveAtStart
        } else if info.end {
            if !self.in_end_range {
                self.in_end_range = true;
                entry = Some(SnapSignal::SnapInEnd);
            }
            SnapSignal::MoveAtEnd
        } else {
            SnapSignal::MoveOutside
        };

        if let Some(signal) = exit {
            log::trace!("Range latch released: {}", signal);
        }
        if let Some(signal) = entry {
            log::trace!("Range latch set: {}", signal);
        }

        Transition {
            exit,
            entry,
            movement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn info(start: bool, end: bool) -> SnappingInfo {
        SnappingInfo {
            mouse_coordinate: Point::ZERO,
            snapped_coordinate: Point::ZERO,
            start,
            end,
        }
    }

    fn run(state: &mut RangeState, start: bool, end: bool) -> Vec<SnapSignal> {
        state.advance(&info(start, end)).signals().collect()
    }

    #[test]
    fn test_outside_from_idle() {
        let mut state = RangeState::new();
        assert_eq!(run(&mut state, false, false), vec![SnapSignal::MoveOutside]);
        assert!(state.is_idle());
    }

    #[test]
    fn test_enter_and_stay_at_start() {
        let mut state = RangeState::new();
        assert_eq!(
            run(&mut state, true, false),
            vec![SnapSignal::SnapInStart, SnapSignal::MoveAtStart]
        );
        assert!(state.in_start_range);
        assert_eq!(run(&mut state, true, false), vec![SnapSignal::MoveAtStart]);
    }

    #[test]
    fn test_leave_start() {
        let mut state = RangeState { in_start_range: true, in_end_range: false };
        assert_eq!(
            run(&mut state, false, false),
            vec![SnapSignal::SnapOutStart, SnapSignal::MoveOutside]
        );
        assert!(state.is_idle());
    }

    #[test]
    fn test_enter_and_leave_end() {
        let mut state = RangeState::new();
        assert_eq!(
            run(&mut state, false, true),
            vec![SnapSignal::SnapInEnd, SnapSignal::MoveAtEnd]
        );
        assert_eq!(run(&mut state, false, true), vec![SnapSignal::MoveAtEnd]);
        assert_eq!(
            run(&mut state, false, false),
            vec![SnapSignal::SnapOutEnd, SnapSignal::MoveOutside]
        );
    }

    #[test]
    fn test_switch_from_start_to_end() {
        let mut state = RangeState { in_start_range: true, in_end_range: false };
        assert_eq!(
            run(&mut state, false, true),
            vec![SnapSignal::SnapOutStart, SnapSignal::SnapInEnd, SnapSignal::MoveAtEnd]
        );
        assert!(!state.in_start_range);
        assert!(state.in_end_range);
    }

    #[test]
    fn test_only_one_exit_per_update() {
        // Both latches set: only start is released this time, end on the next update
        let mut state = RangeState { in_start_range: true, in_end_range: true };
        assert_eq!(
            run(&mut state, false, false),
            vec![SnapSignal::SnapOutStart, SnapSignal::MoveOutside]
        );
        assert!(state.in_end_range);
        assert_eq!(
            run(&mut state, false, false),
            vec![SnapSignal::SnapOutEnd, SnapSignal::MoveOutside]
        );
        assert!(state.is_idle());
    }

    #[test]
    fn test_reset_clears_silently() {
        let mut state = RangeState { in_start_range: true, in_end_range: true };
        state.reset();
        assert!(state.is_idle());
    }

    #[test]
    fn test_every_transition_is_ordered() {
        let combos = [(false, false), (true, false), (false, true)];
        for latched_start in [false, true] {
            for latched_end in [false, true] {
                for (start, end) in combos {
                    let mut state = RangeState { in_start_range: latched_start, in_end_range: latched_end };
                    let signals = run(&mut state, start, end);

                    assert_eq!(signals.iter().filter(|s| s.is_move()).count(), 1);
                    assert!(signals.iter().filter(|s| s.is_exit()).count() <= 1);
                    assert!(signals.iter().filter(|s| s.is_entry()).count() <= 1);
                    assert!(signals.last().unwrap().is_move());
                    if let (Some(exit), Some(entry)) = (
                        signals.iter().position(|s| s.is_exit()),
                        signals.iter().position(|s| s.is_entry()),
                    ) {
                        assert!(exit < entry);
                    }
                }
            }
        }
    }

    #[test]
    fn test_signal_names() {
        assert_eq!(SnapSignal::SnapInStart.to_string(), "snapInStart");
        assert_eq!(SnapSignal::MoveOutside.name(), "moveOutside");
        assert_eq!(serde_json::to_string(&SnapSignal::SnapOutEnd).unwrap(), "\"snapOutEnd\"");
        assert_eq!(SnapSignal::ALL.iter().filter(|s| s.is_move()).count(), 3);
    }
}
