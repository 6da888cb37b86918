//! Snapping settings.

use serde::{Deserialize, Serialize};

/// Default snapping radius in pixels.
pub const DEFAULT_RESOLUTION: f64 = 10.0;

fn default_resolution() -> f64 {
    DEFAULT_RESOLUTION
}

/// User-tunable snapping settings. Every field is optional in serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapSettings {
    /// Snapping radius in pixels.
    #[serde(default = "default_resolution")]
    pub resolution: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl SnapSettings {
    /// Check that the resolution is finite and positive.
    pub fn is_valid(&self) -> bool {
        self.resolution.is_finite() && self.resolution > 0.0
    }
}
