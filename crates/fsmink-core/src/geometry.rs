//! Closed-form circle and line geometry shared by nodes, edges and the exporter.
//!
//! Every function here is pure. Degenerate input (coincident points, collinear
//! triples) never panics: it yields either a guarded fallback value or a
//! non-finite [`Circle`] that callers treat as "no arc".

use kurbo::{Point, Vec2};
use std::f64::consts::{PI, TAU};

/// Length of an arrowhead along the edge direction.
pub const ARROW_LENGTH: f64 = 8.0;
/// Half of the arrowhead base width.
pub const ARROW_HALF_WIDTH: f64 = 5.0;

/// A circle with a center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Whether this circle can be drawn. Collinear fits produce infinite or NaN values.
    pub fn is_finite(&self) -> bool {
        self.center.is_finite() && self.radius.is_finite() && self.radius > 0.0
    }

    /// Point on the circle at `angle` (radians, Y-down screen convention).
    pub fn point_at(&self, angle: f64) -> Point {
        Point::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// Angle from the center towards `point`.
    pub fn angle_of(&self, point: Point) -> f64 {
        (point.y - self.center.y).atan2(point.x - self.center.x)
    }
}

/// A filled disc: the footprint of a node as seen by edge geometry.
///
/// Free edge ends use a zero radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub center: Point,
    pub radius: f64,
}

impl Disc {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// A zero-radius disc at `point`.
    pub fn point(point: Point) -> Self {
        Self::new(point, 0.0)
    }
}

/// Curvature parameters recovered from a dragged point, see [`set_anchor_point`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPlacement {
    /// Signed projection fraction along u→v.
    pub para: f64,
    /// Signed perpendicular distance from the u→v line.
    pub perp: f64,
    /// `PI` when the unsnapped perpendicular offset was negative, else `0`.
    pub text_adjust: f64,
}

/// Point at fraction `para` along u→v, offset by `perp` along the u→v normal.
///
/// The normal is the u→v direction rotated by +90° and normalized by the segment
/// length. Coincident endpoints skip the perpendicular term.
pub fn get_anchor(u: Point, v: Point, para: f64, perp: f64) -> Point {
    let d = v - u;
    let scale = d.hypot();
    if scale < f64::EPSILON {
        return u + d * para;
    }
    Point::new(
        u.x + d.x * para - d.y * perp / scale,
        u.y + d.y * para + d.x * perp / scale,
    )
}

/// Inverse of [`get_anchor`]: the `para`/`perp` pair that places the anchor at `point`.
///
/// When the point projects strictly inside the segment and lies within
/// `padding` of it, `perp` snaps to zero so near-straight drags straighten out.
pub fn set_anchor_point(u: Point, v: Point, point: Point, padding: f64) -> AnchorPlacement {
    let d = v - u;
    let scale = d.hypot();
    if scale < f64::EPSILON {
        return AnchorPlacement {
            para: 0.0,
            perp: 0.0,
            text_adjust: 0.0,
        };
    }

    let rel = point - u;
    let para = d.dot(rel) / (scale * scale);
    let mut perp = d.cross(rel) / scale;
    let text_adjust = if perp < 0.0 { PI } else { 0.0 };
    if para > 0.0 && para < 1.0 && perp.abs() < padding {
        perp = 0.0;
    }

    AnchorPlacement {
        para,
        perp,
        text_adjust,
    }
}

#[allow(clippy::too_many_arguments)]
fn det(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64, g: f64, h: f64, i: f64) -> f64 {
    a * e * i + b * f * g + c * d * h - a * f * h - b * d * i - c * e * g
}

/// Circumcircle of three points.
///
/// Collinear or coincident points divide by a zero determinant and produce a
/// circle for which [`Circle::is_finite`] is false.
pub fn get_circle(p1: Point, p2: Point, p3: Point) -> Circle {
    let (x1, y1, x2, y2, x3, y3) = (p1.x, p1.y, p2.x, p2.y, p3.x, p3.y);
    let s1 = x1 * x1 + y1 * y1;
    let s2 = x2 * x2 + y2 * y2;
    let s3 = x3 * x3 + y3 * y3;

    let a = det(x1, y1, 1.0, x2, y2, 1.0, x3, y3, 1.0);
    let bx = -det(s1, y1, 1.0, s2, y2, 1.0, s3, y3, 1.0);
    let by = det(s1, x1, 1.0, s2, x2, 1.0, s3, x3, 1.0);
    let c = -det(s1, x1, y1, s2, x2, y2, s3, x3, y3);

    Circle {
        center: Point::new(-bx / (2.0 * a), -by / (2.0 * a)),
        radius: (bx * bx + by * by - 4.0 * a * c).sqrt() / (2.0 * a.abs()),
    }
}

/// Project `toward` onto the rim of `disc` along the ray from its center.
///
/// Returns the center itself when `toward` coincides with it.
pub fn circle_projection(disc: Disc, toward: Point) -> Point {
    let d = toward - disc.center;
    let scale = d.hypot();
    if scale < f64::EPSILON {
        return disc.center;
    }
    disc.center + d * (disc.radius / scale)
}

/// Project `point` onto segment a→b.
///
/// Returns the parametric position (`0` at `a`, `1` at `b`) and the signed
/// perpendicular distance, or `None` for a zero-length segment.
pub fn segment_projection(point: Point, a: Point, b: Point) -> Option<(f64, f64)> {
    let d = b - a;
    let length = d.hypot();
    if length < f64::EPSILON {
        return None;
    }
    let rel = point - a;
    Some((d.dot(rel) / (length * length), d.cross(rel) / length))
}

/// Shift `angle` by whole turns so it lands in `[-TAU, TAU]` together with `other`.
///
/// Both angles move by the same amount, preserving the span between them.
pub fn wrap_angle_pair(start: f64, end: f64) -> (f64, f64) {
    if start.min(end) < -TAU {
        (start + TAU, end + TAU)
    } else if start.max(end) > TAU {
        (start - TAU, end - TAU)
    } else {
        (start, end)
    }
}

/// Triangle for an arrowhead whose tip sits at `tip`, pointing along `angle`.
///
/// Vertices are ordered left barb, right barb, tip.
pub fn arrowhead(tip: Point, angle: f64) -> [Point; 3] {
    let dir = Vec2::new(angle.cos(), angle.sin());
    let back = tip - dir * ARROW_LENGTH;
    let side = Vec2::new(dir.y, -dir.x) * ARROW_HALF_WIDTH;
    [back + side, back - side, tip]
}
