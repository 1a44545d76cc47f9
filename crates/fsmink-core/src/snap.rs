//! Axis snapping for dragged nodes.
//!
//! A dragged node snaps each axis independently onto the matching coordinate of
//! any other node within the snap padding, which lines states up without a
//! separate alignment-guide entity.

use kurbo::Point;

/// Default distance below which an axis snaps (in world units).
pub const DEFAULT_SNAP_PADDING: f64 = 10.0;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Snap `point` onto the coordinates of `anchors`, one axis at a time.
///
/// Anchors are visited in order. Each comparison uses the coordinate as
/// snapped so far, so a later anchor can pull an already snapped axis again.
pub fn snap_to_anchors<I>(point: Point, anchors: I, padding: f64) -> SnapResult
where
    I: IntoIterator<Item = Point>,
{
    let mut result = SnapResult::none(point);
    for anchor in anchors {
        if (result.point.x - anchor.x).abs() < padding {
            result.point.x = anchor.x;
            result.snapped_x = true;
        }
        if (result.point.y - anchor.y).abs() < padding {
            result.point.y = anchor.y;
            result.snapped_y = true;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_anchors() {
        let result = snap_to_anchors(Point::new(3.0, 4.0), [], DEFAULT_SNAP_PADDING);
        assert_eq!(result.point, Point::new(3.0, 4.0));
        assert!(!result.is_snapped());
    }

    #[test]
    fn test_snap_single_axis() {
        let result = snap_to_anchors(Point::new(105.0, 300.0), [Point::new(100.0, 100.0)], 10.0);
        assert_eq!(result.point, Point::new(100.0, 300.0));
        assert!(result.snapped_x);
        assert!(!result.snapped_y);
    }

    #[test]
    fn test_snap_axes_to_different_anchors() {
        let anchors = [Point::new(100.0, 0.0), Point::new(500.0, 200.0)];
        let result = snap_to_anchors(Point::new(97.0, 204.0), anchors, 10.0);
        assert_eq!(result.point, Point::new(100.0, 200.0));
    }

    #[test]
    fn test_snapped_axis_can_chain() {
        let anchors = [Point::new(108.0, 0.0), Point::new(116.0, 500.0)];
        let result = snap_to_anchors(Point::new(100.0, 300.0), anchors, 10.0);
        assert_eq!(result.point.x, 116.0);
    }

    #[test]
    fn test_padding_is_exclusive() {
        let result = snap_to_anchors(Point::new(110.0, 0.0), [Point::new(100.0, 50.0)], 10.0);
        assert!(!result.snapped_x);
    }
}
