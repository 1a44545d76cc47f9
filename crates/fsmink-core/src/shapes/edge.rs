//! Transition edge: a straight segment or circular arc between two nodes.
//!
//! Edges refer to their endpoints by id, so geometry that depends on the
//! endpoint nodes takes an [`EdgeEnds`] snapshot resolved by the scene.

use super::{EdgeId, NamedColor, NodeId};
use crate::geometry::{
    Circle, Disc, arrowhead, circle_projection, get_anchor, get_circle, segment_projection,
    set_anchor_point,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;

/// Attributes given to newly created edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub stroke_color: NamedColor,
    pub text_color: NamedColor,
    pub font_size: f64,
    pub para: f64,
    pub perp: f64,
    pub start_arrow: bool,
    pub end_arrow: bool,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            stroke_color: NamedColor::Black,
            text_color: NamedColor::Black,
            font_size: 14.0,
            para: 0.5,
            perp: 0.0,
            start_arrow: false,
            end_arrow: true,
        }
    }
}

/// Which ends of an edge carry an arrowhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowMode {
    None,
    /// End arrow only.
    #[default]
    Forward,
    /// Start arrow only.
    Backward,
    Both,
}

impl ArrowMode {
    pub const ALL: [ArrowMode; 4] = [
        ArrowMode::None,
        ArrowMode::Forward,
        ArrowMode::Backward,
        ArrowMode::Both,
    ];

    pub fn from_flags(start: bool, end: bool) -> Self {
        match (start, end) {
            (false, false) => ArrowMode::None,
            (false, true) => ArrowMode::Forward,
            (true, false) => ArrowMode::Backward,
            (true, true) => ArrowMode::Both,
        }
    }

    /// `(start_arrow, end_arrow)`.
    pub fn flags(self) -> (bool, bool) {
        match self {
            ArrowMode::None => (false, false),
            ArrowMode::Forward => (false, true),
            ArrowMode::Backward => (true, false),
            ArrowMode::Both => (true, true),
        }
    }

    /// Arrow slider position, 0..=3.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for ArrowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArrowMode::None => "none",
            ArrowMode::Forward => "forward",
            ArrowMode::Backward => "backward",
            ArrowMode::Both => "both",
        })
    }
}

/// Endpoint footprints of an edge, resolved from the scene.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeEnds {
    pub u: Option<Disc>,
    pub v: Option<Disc>,
    /// Node under the free end of a pending edge.
    pub hover: Option<Disc>,
}

/// Circular arc of a curved edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeArc {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    /// Rim point on the start node.
    pub start: Point,
    /// Rim point on the end node.
    pub end: Point,
    /// `1.0` when the arc winds anticlockwise from start to end, else `-1.0`.
    pub reverse: f64,
}

impl EdgeArc {
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }

    /// Whether drawing from `start_angle` to `end_angle` runs anticlockwise.
    pub fn is_anticlockwise(&self) -> bool {
        self.reverse > 0.0
    }

    /// Start and end angle with the end unwrapped past the start.
    pub fn unwrapped_angles(&self) -> (f64, f64) {
        let end = if self.end_angle < self.start_angle {
            self.end_angle + TAU
        } else {
            self.end_angle
        };
        (self.start_angle, end)
    }
}

/// Anchor and orientation of an edge label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelAnchor {
    pub point: Point,
    pub angle: f64,
}

/// Triangles for the active arrowheads.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ArrowHeads {
    pub start: Option<[Point; 3]>,
    pub end: Option<[Point; 3]>,
}

/// A transition between two nodes.
///
/// An edge with no `v` is pending: it is still being dragged out of `u` and
/// its free end sits at `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub(crate) id: EdgeId,
    pub u: Option<NodeId>,
    pub v: Option<NodeId>,
    /// Start point, used when `u` is absent.
    pub start: Point,
    /// Free end point, used when `v` is absent.
    pub end: Point,
    /// Anchor position along the u→v baseline.
    pub para: f64,
    /// Signed anchor offset from the baseline. Zero means straight.
    pub perp: f64,
    /// `0` or `PI`: flips the label of a straight edge to the other side.
    #[serde(default)]
    pub text_adjust: f64,
    #[serde(default)]
    pub text: String,
    pub stroke_color: NamedColor,
    pub text_color: NamedColor,
    pub font_size: f64,
    pub start_arrow: bool,
    pub end_arrow: bool,
}

impl Edge {
    /// A pending edge leaving `u` at `start`, with its free end at `end`.
    pub fn new(u: Option<NodeId>, start: Point, end: Point, config: &EdgeConfig) -> Self {
        Self {
            id: EdgeId::new(),
            u,
            v: None,
            start,
            end,
            para: config.para,
            perp: config.perp,
            text_adjust: 0.0,
            text: String::new(),
            stroke_color: config.stroke_color,
            text_color: config.text_color,
            font_size: config.font_size,
            start_arrow: config.start_arrow,
            end_arrow: config.end_arrow,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn is_pending(&self) -> bool {
        self.v.is_none()
    }

    pub fn is_straight(&self) -> bool {
        self.perp == 0.0
    }

    /// Whether `node` is one of the endpoints.
    pub fn touches(&self, node: NodeId) -> bool {
        self.u == Some(node) || self.v == Some(node)
    }

    /// Arc geometry, or `None` for a straight, pending or degenerate edge.
    pub fn get_arc(&self, ends: &EdgeEnds) -> Option<EdgeArc> {
        if self.perp == 0.0 {
            return None;
        }
        let (u, v) = (ends.u?, ends.v?);
        let anchor = get_anchor(u.center, v.center, self.para, self.perp);
        let circle = get_circle(u.center, v.center, anchor);
        if !circle.is_finite() {
            return None;
        }

        let reverse = if self.perp > 0.0 { 1.0 } else { -1.0 };
        let start_angle = circle.angle_of(u.center) - reverse * u.radius / circle.radius;
        let end_angle = circle.angle_of(v.center) + reverse * v.radius / circle.radius;
        Some(EdgeArc {
            center: circle.center,
            radius: circle.radius,
            start_angle,
            end_angle,
            start: circle.point_at(start_angle),
            end: circle.point_at(end_angle),
            reverse,
        })
    }

    /// Rendered endpoints of the straight form of this edge.
    ///
    /// Each end touches its node's rim where the ray toward the midpoint of the
    /// two centers leaves the node. A pending edge hovering a node projects
    /// onto that node; otherwise the free end is the raw pointer point.
    pub fn segment(&self, ends: &EdgeEnds) -> (Point, Point) {
        let u = ends.u.unwrap_or(Disc::point(self.start));
        let v = ends
            .v
            .or(if self.v.is_none() { ends.hover } else { None })
            .unwrap_or(Disc::point(self.end));
        let mid = u.center.midpoint(v.center);
        (circle_projection(u, mid), circle_projection(v, mid))
    }

    /// Visible start and end points: arc rim points or the straight segment.
    pub fn endpoints(&self, ends: &EdgeEnds) -> (Point, Point) {
        match self.get_arc(ends) {
            Some(arc) => (arc.start, arc.end),
            None => self.segment(ends),
        }
    }

    /// Hit test against the drawn stroke.
    ///
    /// `start` and `end` restrict the test to a sub-range of the edge:
    /// `start` moves the beginning forward by that fraction, then `end` keeps
    /// that fraction of what remains.
    pub fn within(
        &self,
        ends: &EdgeEnds,
        point: Point,
        padding: f64,
        start: Option<f64>,
        end: Option<f64>,
    ) -> bool {
        match self.get_arc(ends) {
            Some(arc) => arc_within(&arc, point, padding, start, end),
            None => {
                let (mut a, mut b) = self.segment(ends);
                if let Some(t) = start {
                    a = a.lerp(b, t);
                }
                if let Some(t) = end {
                    b = a.lerp(b, t);
                }
                segment_projection(point, a, b).is_some_and(|(percent, distance)| {
                    (0.0..=1.0).contains(&percent) && distance.abs() < padding
                })
            }
        }
    }

    /// Flip the arrowhead on whichever half of the edge contains `point`.
    ///
    /// Returns whether any arrow changed.
    pub fn toggle_arrow(&mut self, ends: &EdgeEnds, point: Point, padding: f64) -> bool {
        let near_start = self.within(ends, point, padding, None, Some(0.5));
        let near_end = self.within(ends, point, padding, Some(0.5), None);
        if near_start {
            self.start_arrow = !self.start_arrow;
        }
        if near_end {
            self.end_arrow = !self.end_arrow;
        }
        near_start || near_end
    }

    pub fn arrow_mode(&self) -> ArrowMode {
        ArrowMode::from_flags(self.start_arrow, self.end_arrow)
    }

    pub fn set_arrow_mode(&mut self, mode: ArrowMode) {
        (self.start_arrow, self.end_arrow) = mode.flags();
    }

    /// Follow the pointer: a pending edge moves its free end, a bound edge
    /// bends so its anchor passes through `point`.
    pub fn drag(&mut self, ends: &EdgeEnds, point: Point, padding: f64) {
        if self.v.is_none() {
            self.end = point;
            return;
        }
        if let (Some(u), Some(v)) = (ends.u, ends.v) {
            let placement = set_anchor_point(u.center, v.center, point, padding);
            self.para = placement.para;
            self.perp = placement.perp;
            self.text_adjust = placement.text_adjust;
        }
    }

    /// Attach the free end of a pending edge to `node`.
    pub(crate) fn bind_target(&mut self, node: NodeId, center: Point) {
        self.v = Some(node);
        self.end = center;
    }

    /// Label anchor on the edge and the outward direction of the label.
    pub fn label_placement(&self, ends: &EdgeEnds) -> LabelAnchor {
        match self.get_arc(ends) {
            Some(arc) => {
                let (start, end) = arc.unwrapped_angles();
                let mut angle = (start + end) / 2.0;
                if arc.reverse > 0.0 {
                    angle += PI;
                }
                LabelAnchor {
                    point: arc.circle().point_at(angle),
                    angle,
                }
            }
            None => {
                let (a, b) = self.segment(ends);
                LabelAnchor {
                    point: a.midpoint(b),
                    angle: (b.x - a.x).atan2(a.y - b.y) + self.text_adjust,
                }
            }
        }
    }

    /// Arrowhead triangles for the active ends.
    pub fn arrowheads(&self, ends: &EdgeEnds) -> ArrowHeads {
        if !self.start_arrow && !self.end_arrow {
            return ArrowHeads::default();
        }
        let (start_tip, start_angle, end_tip, end_angle) = match self.get_arc(ends) {
            Some(arc) => (
                arc.start,
                arc.start_angle + arc.reverse * FRAC_PI_2,
                arc.end,
                arc.end_angle - arc.reverse * FRAC_PI_2,
            ),
            None => {
                let (a, b) = self.segment(ends);
                let angle = (b.y - a.y).atan2(b.x - a.x);
                (a, angle + PI, b, angle)
            }
        };
        ArrowHeads {
            start: self.start_arrow.then(|| arrowhead(start_tip, start_angle)),
            end: self.end_arrow.then(|| arrowhead(end_tip, end_angle)),
        }
    }
}

fn arc_within(arc: &EdgeArc, point: Point, padding: f64, start: Option<f64>, end: Option<f64>) -> bool {
    let reversed = arc.reverse > 0.0;
    let (mut lo, mut hi) = if reversed {
        (arc.end_angle, arc.start_angle)
    } else {
        (arc.start_angle, arc.end_angle)
    };
    if hi < lo {
        hi += TAU;
    }

    // Fractions count from the edge's start node, which sits at `hi` when reversed.
    if reversed {
        if let Some(t) = start {
            hi += t * (lo - hi);
        }
        if let Some(t) = end {
            lo = hi + t * (lo - hi);
        }
    } else {
        if let Some(t) = start {
            lo += t * (hi - lo);
        }
        if let Some(t) = end {
            hi = lo + t * (hi - lo);
        }
    }

    let d = point - arc.center;
    if (d.hypot() - arc.radius).abs() >= padding {
        return false;
    }
    let mut angle = d.y.atan2(d.x);
    if angle < lo {
        angle += TAU;
    } else if angle > hi {
        angle -= TAU;
    }
    angle > lo && angle < hi
}
