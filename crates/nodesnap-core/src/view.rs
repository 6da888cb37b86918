//! Map view projecting map units to viewport pixels.

use crate::error::{SnapError, SnapResult};
use crate::geometry::Coordinate;
use crate::providers::PixelTransform;
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Map units per pixel at 100% zoom.
pub const BASE_RESOLUTION: f64 = 1.0;

/// MapView manages the transform between map coordinates and viewport pixels.
///
/// Map space has y pointing up; pixel space has y pointing down with the
/// origin at the top-left corner of the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    /// Map coordinate shown at the viewport center
    pub center: Coordinate,
    /// Map units per pixel
    pub resolution: f64,
    /// Viewport size in pixels
    pub size: Size,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: Point::ZERO,
            resolution: BASE_RESOLUTION,
            size: Size::new(800.0, 600.0),
        }
    }
}

impl MapView {
    /// Create a view with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a view centered on `center` at the given resolution.
    pub fn centered(center: Coordinate, resolution: f64, size: Size) -> Self {
        Self {
            center,
            resolution,
            size,
        }
    }

    fn validate(&self) -> SnapResult<()> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(SnapError::Projection(format!(
                "Invalid view resolution: {}",
                self.resolution
            )));
        }
        if !(self.center.x.is_finite() && self.center.y.is_finite()) {
            return Err(SnapError::Projection("View center is not finite".to_string()));
        }
        if !(self.size.width.is_finite() && self.size.height.is_finite()) {
            return Err(SnapError::Projection("Viewport size is not finite".to_string()));
        }
        Ok(())
    }

    /// Get the affine transform from map coordinates to pixels.
    pub fn transform(&self) -> SnapResult<Affine> {
        self.validate()?;
        let half = Vec2::new(self.size.width / 2.0, self.size.height / 2.0);
        Ok(Affine::translate(half)
            * Affine::scale_non_uniform(1.0 / self.resolution, -1.0 / self.resolution)
            * Affine::translate(-self.center.to_vec2()))
    }

    /// Convert a map coordinate to a pixel.
    pub fn coordinate_to_pixel(&self, coordinate: Coordinate) -> SnapResult<Point> {
        Ok(self.transform()? * coordinate)
    }
}

impl PixelTransform for MapView {
    fn to_pixel(&self, coordinate: Coordinate) -> SnapResult<Coordinate> {
        self.coordinate_to_pixel(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_center_maps_to_viewport_center() {
        let view = MapView::centered(Point::new(1000.0, 2000.0), 2.0, Size::new(400.0, 300.0));
        let pixel = view.coordinate_to_pixel(Point::new(1000.0, 2000.0)).unwrap();
        assert!(close(pixel, Point::new(200.0, 150.0)));
    }

    #[test]
    fn test_y_axis_flips() {
        let view = MapView::centered(Point::ZERO, 1.0, Size::new(100.0, 100.0));
        let up = view.coordinate_to_pixel(Point::new(0.0, 10.0)).unwrap();
        assert!(close(up, Point::new(50.0, 40.0)));
    }

    #[test]
    fn test_resolution_scales_distances() {
        let view = MapView::centered(Point::ZERO, 0.5, Size::new(100.0, 100.0));
        let a = view.coordinate_to_pixel(Point::new(0.0, 0.0)).unwrap();
        let b = view.coordinate_to_pixel(Point::new(5.0, 0.0)).unwrap();
        assert!(((b.x - a.x) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_resolution_is_an_error() {
        let mut view = MapView::new();
        view.resolution = 0.0;
        assert!(matches!(view.to_pixel(Point::ZERO), Err(SnapError::Projection(_))));
        view.resolution = f64::NAN;
        assert!(view.transform().is_err());
    }

    #[test]
    fn test_nan_coordinate_projects_to_nan() {
        let view = MapView::new();
        let pixel = view.to_pixel(crate::geometry::NAN_COORDINATE).unwrap();
        assert!(pixel.x.is_nan());
    }
}
