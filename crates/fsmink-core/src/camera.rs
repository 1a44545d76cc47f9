//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Default lower zoom bound.
pub const MIN_ZOOM: f64 = 0.25;
/// Default upper zoom bound.
pub const MAX_ZOOM: f64 = 4.0;

/// Camera manages the view transform for the canvas.
///
/// World coordinates map to screen coordinates as `offset + world * zoom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
    /// Current zoom level, 1.0 = 100%.
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera with custom zoom bounds.
    pub fn with_bounds(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            min_zoom,
            max_zoom,
            ..Self::default()
        }
    }

    /// Get the affine transform for rendering (world → screen).
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling (screen → world).
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Apply a mouse wheel step.
    ///
    /// The zoom changes additively by `wheel / divisor`, clamped to the zoom
    /// bounds, and the offset compensates so `pivot` (a world point) keeps its
    /// screen position. Returns the zoom delta actually applied.
    pub fn zoom_by_wheel(&mut self, wheel: f64, pivot: Point, divisor: f64) -> f64 {
        let mut delta = wheel / divisor;
        if self.zoom + delta > self.max_zoom {
            delta = self.max_zoom - self.zoom;
        } else if self.zoom + delta < self.min_zoom {
            delta = self.min_zoom - self.zoom;
        }
        self.offset -= pivot.to_vec2() * delta;
        self.zoom += delta;
        delta
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }
}
