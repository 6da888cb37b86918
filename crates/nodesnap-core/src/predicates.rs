//! Stock start/end predicates for drawing strategies.
//!
//! A predicate receives the coordinate of the nearest eligible node, or
//! [`NAN_COORDINATE`](crate::NAN_COORDINATE) when there is none, and decides
//! whether that node is a valid start or end point.

use crate::geometry::{Coordinate, squared_distance};

/// Decides whether a node coordinate qualifies as a start or end point.
pub type AtCoordinateFn<'a> = &'a dyn Fn(Coordinate) -> bool;

/// Tolerance for coordinate equality, in squared map units.
const COINCIDENCE_EPSILON_SQ: f64 = 1e-18;

/// Any node qualifies. The default end predicate.
pub fn always(_coordinate: Coordinate) -> bool {
    true
}

/// No node qualifies.
pub fn never(_coordinate: Coordinate) -> bool {
    false
}

/// Matches nodes at `target`.
pub fn coincides_with(target: Coordinate) -> impl Fn(Coordinate) -> bool {
    move |coordinate| squared_distance(coordinate, target) <= COINCIDENCE_EPSILON_SQ
}

/// Matches nodes at any of `targets`.
pub fn coincides_with_any(targets: Vec<Coordinate>) -> impl Fn(Coordinate) -> bool {
    move |coordinate| {
        targets
            .iter()
            .any(|target| squared_distance(coordinate, *target) <= COINCIDENCE_EPSILON_SQ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::NAN_COORDINATE;
    use kurbo::Point;

    #[test]
    fn test_constant_predicates() {
        assert!(always(Point::ZERO));
        assert!(always(NAN_COORDINATE));
        assert!(!never(Point::ZERO));
    }

    #[test]
    fn test_coincides_with() {
        let at_origin = coincides_with(Point::ZERO);
        assert!(at_origin(Point::new(0.0, 0.0)));
        assert!(!at_origin(Point::new(0.001, 0.0)));
        assert!(!at_origin(NAN_COORDINATE));
    }

    #[test]
    fn test_coincides_with_any() {
        let ends = coincides_with_any(vec![Point::new(1.0, 1.0), Point::new(5.0, 5.0)]);
        assert!(ends(Point::new(5.0, 5.0)));
        assert!(!ends(Point::new(3.0, 3.0)));
        assert!(!ends(NAN_COORDINATE));

        let nothing = coincides_with_any(Vec::new());
        assert!(!nothing(Point::ZERO));
    }
}
