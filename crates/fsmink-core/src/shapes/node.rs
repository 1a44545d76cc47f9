//! Circular state node.

use super::{EdgeId, NamedColor, NodeId};
use crate::geometry::Disc;
use crate::snap::{SnapResult, snap_to_anchors};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inset ring of an accept state, as a fraction of the node radius.
pub const ACCEPT_RING_RATIO: f64 = 0.85;

/// Attributes given to newly created nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub radius: f64,
    pub stroke_color: NamedColor,
    pub fill_color: Option<NamedColor>,
    pub text_color: NamedColor,
    pub font_size: f64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            radius: 30.0,
            stroke_color: NamedColor::Black,
            fill_color: None,
            text_color: NamedColor::Black,
            font_size: 14.0,
        }
    }
}

/// A state of the machine, drawn as a circle with an optional centered label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub(crate) id: NodeId,
    /// Center point.
    pub center: Point,
    pub radius: f64,
    pub stroke_color: NamedColor,
    /// `None` leaves the interior unpainted.
    #[serde(default)]
    pub fill_color: Option<NamedColor>,
    #[serde(default)]
    pub text: String,
    pub text_color: NamedColor,
    pub font_size: f64,
    /// Accept states draw a second, inset ring.
    #[serde(default)]
    pub accept: bool,
    /// Edges that use this node as an endpoint. Rebuilt by the scene on load.
    #[serde(skip)]
    edges: BTreeSet<EdgeId>,
}

impl Node {
    pub fn new(center: Point, config: &NodeConfig) -> Self {
        Self {
            id: NodeId::new(),
            center,
            radius: config.radius,
            stroke_color: config.stroke_color,
            fill_color: config.fill_color,
            text: String::new(),
            text_color: config.text_color,
            font_size: config.font_size,
            accept: false,
            edges: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Footprint used by edge geometry.
    pub fn disc(&self) -> Disc {
        Disc::new(self.center, self.radius)
    }

    /// Whether `point` lies inside the node or on its boundary.
    pub fn within(&self, point: Point) -> bool {
        (point - self.center).hypot() <= self.radius
    }

    pub fn toggle_accept(&mut self) {
        self.accept = !self.accept;
    }

    /// Radius of the inner accept ring.
    pub fn accept_radius(&self) -> f64 {
        self.radius * ACCEPT_RING_RATIO
    }

    /// Incident edges, in id order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().copied()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_edge(&self, edge: EdgeId) -> bool {
        self.edges.contains(&edge)
    }

    pub(crate) fn add_edge(&mut self, edge: EdgeId) {
        self.edges.insert(edge);
    }

    pub(crate) fn remove_edge(&mut self, edge: EdgeId) -> bool {
        self.edges.remove(&edge)
    }

    pub(crate) fn clear_edges(&mut self) {
        self.edges.clear();
    }

    /// Move the node so its center follows `pointer + offset`.
    ///
    /// Each axis snaps onto the matching coordinate of any anchor closer than
    /// `snap_padding`. The caller passes the centers of the nodes that are not
    /// being dragged.
    pub fn drag<I>(&mut self, pointer: Point, offset: Vec2, anchors: I, snap_padding: f64) -> SnapResult
    where
        I: IntoIterator<Item = Point>,
    {
        let result = snap_to_anchors(pointer + offset, anchors, snap_padding);
        self.center = result.point;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_at(x: f64, y: f64) -> Node {
        Node::new(Point::new(x, y), &NodeConfig::default())
    }

    #[test]
    fn test_new_uses_config() {
        let config = NodeConfig {
            radius: 40.0,
            fill_color: Some(NamedColor::Yellow),
            ..NodeConfig::default()
        };
        let node = Node::new(Point::new(1.0, 2.0), &config);
        assert_eq!(node.radius, 40.0);
        assert_eq!(node.fill_color, Some(NamedColor::Yellow));
        assert!(!node.accept);
        assert_eq!(node.edge_count(), 0);
    }

    #[test]
    fn test_within_is_inclusive() {
        let node = node_at(100.0, 100.0);
        assert!(node.within(Point::new(100.0, 100.0)));
        assert!(node.within(Point::new(130.0, 100.0)));
        assert!(!node.within(Point::new(130.5, 100.0)));
    }

    #[test]
    fn test_toggle_accept() {
        let mut node = node_at(0.0, 0.0);
        node.toggle_accept();
        assert!(node.accept);
        assert!((node.accept_radius() - 25.5).abs() < 1e-9);
        node.toggle_accept();
        assert!(!node.accept);
    }

    #[test]
    fn test_drag_applies_offset() {
        let mut node = node_at(0.0, 0.0);
        let result = node.drag(Point::new(50.0, 50.0), Vec2::new(-5.0, 3.0), [], 10.0);
        assert!(!result.is_snapped());
        assert_eq!(node.center, Point::new(45.0, 53.0));
    }

    #[test]
    fn test_drag_snaps_to_other_nodes() {
        let mut node = node_at(0.0, 0.0);
        node.drag(Point::new(204.0, 97.0), Vec2::ZERO, [Point::new(200.0, 400.0)], 10.0);
        assert_eq!(node.center, Point::new(200.0, 97.0));
    }

    #[test]
    fn test_edge_set() {
        let mut node = node_at(0.0, 0.0);
        let edge = EdgeId::new();
        node.add_edge(edge);
        node.add_edge(edge);
        assert_eq!(node.edge_count(), 1);
        assert!(node.has_edge(edge));
        assert!(node.remove_edge(edge));
        assert!(!node.remove_edge(edge));
    }
}
