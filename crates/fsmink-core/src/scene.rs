//! Scene controller: owns every node and edge and applies the editing gestures.

use crate::camera::Camera;
use crate::caret::Caret;
use crate::command::Attribute;
use crate::config::SceneConfig;
use crate::error::{SceneError, SceneResult};
use crate::selection::{DragFocus, SelectBox, Selection, rect_contains_inclusive};
use crate::shapes::{Edge, EdgeArc, EdgeEnds, EdgeId, Node, NodeId, ShapeId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub shape: ShapeId,
    /// Shape position minus the pointer, so a drag keeps the grab point.
    pub offset: Vec2,
}

/// Pointer bookkeeping between events.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Last pointer position in world coordinates. Zoom pivots here.
    pub last_world: Point,
    /// Screen position of an active pan gesture.
    pub pan_anchor: Option<Point>,
}

/// Serialized form of a scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub camera: Camera,
}

/// The diagram being edited.
///
/// Nodes and edges are kept in insertion order, which is both the hit-test
/// order and the draw order within each kind. Nodes win hit tests over
/// edges; edges are drawn below nodes.
#[derive(Debug, Clone)]
pub struct Scene {
    config: SceneConfig,
    nodes: HashMap<NodeId, Node>,
    node_order: Vec<NodeId>,
    edges: HashMap<EdgeId, Edge>,
    edge_order: Vec<EdgeId>,
    pub camera: Camera,
    selection: Selection,
    drag: DragFocus,
    select_box: Option<SelectBox>,
    caret: Caret,
    pub pointer: PointerState,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl Scene {
    pub fn new(config: SceneConfig) -> Self {
        Self::new_at(config, Instant::now())
    }

    /// Create a scene whose caret starts blinking at `now`.
    pub fn new_at(config: SceneConfig, now: Instant) -> Self {
        Self {
            camera: Camera::with_bounds(config.min_scale, config.max_scale),
            caret: Caret::new(config.caret_period(), now),
            config,
            nodes: HashMap::new(),
            node_order: Vec::new(),
            edges: HashMap::new(),
            edge_order: Vec::new(),
            selection: Selection::new(),
            drag: DragFocus::new(),
            select_box: None,
            pointer: PointerState::default(),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    // --- Construction ---

    /// Insert an existing node on top of the z-order.
    ///
    /// Fails on an id already in the scene or a non-positive radius or font size.
    pub fn add_node(&mut self, node: Node) -> SceneResult<NodeId> {
        let id = node.id();
        if self.nodes.contains_key(&id) {
            return Err(SceneError::DuplicateNode(id));
        }
        check_radius(node.radius)?;
        check_font_size(node.font_size)?;
        Ok(self.insert_node(node))
    }

    /// Create a node at `point` with the configured defaults.
    pub fn create_node(&mut self, point: Point) -> NodeId {
        let node = Node::new(point, &self.config.node);
        self.insert_node(node)
    }

    fn insert_node(&mut self, mut node: Node) -> NodeId {
        let id = node.id();
        node.clear_edges();
        self.nodes.insert(id, node);
        self.node_order.push(id);
        log::debug!("Added {id}");
        id
    }

    /// Start a pending edge out of `u` with its free end at `point`.
    ///
    /// The edge joins the drag focus, so the next moves carry its free end and
    /// the next release binds or discards it.
    pub fn create_edge(&mut self, u: NodeId, point: Point) -> SceneResult<EdgeId> {
        let node = self.nodes.get_mut(&u).ok_or(SceneError::UnknownNode(u))?;
        let edge = Edge::new(Some(u), node.center, point, &self.config.edge);
        let id = edge.id();
        node.add_edge(id);
        self.edges.insert(id, edge);
        self.edge_order.push(id);
        self.drag.insert(id.into(), Vec2::ZERO);
        log::debug!("Started pending {id} from {u}");
        Ok(id)
    }

    /// Create a finished edge between two nodes.
    pub fn connect(&mut self, u: NodeId, v: NodeId) -> SceneResult<EdgeId> {
        let v_center = self.nodes.get(&v).ok_or(SceneError::UnknownNode(v))?.center;
        let u_node = self.nodes.get_mut(&u).ok_or(SceneError::UnknownNode(u))?;
        let mut edge = Edge::new(Some(u), u_node.center, v_center, &self.config.edge);
        let id = edge.id();
        edge.bind_target(v, v_center);
        u_node.add_edge(id);
        if let Some(v_node) = self.nodes.get_mut(&v) {
            v_node.add_edge(id);
        }
        self.edges.insert(id, edge);
        self.edge_order.push(id);
        log::debug!("Connected {u} -> {v} with {id}");
        Ok(id)
    }

    // --- Accessors ---

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(&id)
    }

    /// Nodes in z-order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Edges in z-order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edge_order.iter().filter_map(|id| self.edges.get(id))
    }

    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_order.is_empty() && self.edge_order.is_empty()
    }

    pub fn contains(&self, shape: ShapeId) -> bool {
        match shape {
            ShapeId::Node(id) => self.nodes.contains_key(&id),
            ShapeId::Edge(id) => self.edges.contains_key(&id),
        }
    }

    /// Resolve the endpoint footprints of `edge`.
    pub fn edge_ends(&self, edge: &Edge) -> EdgeEnds {
        let disc = |id: Option<NodeId>| id.and_then(|id| self.nodes.get(&id)).map(Node::disc);
        EdgeEnds {
            u: disc(edge.u),
            v: disc(edge.v),
            hover: if edge.v.is_none() {
                self.node_at(edge.end).map(Node::disc)
            } else {
                None
            },
        }
    }

    pub fn edge_arc(&self, id: EdgeId) -> Option<EdgeArc> {
        let edge = self.edges.get(&id)?;
        edge.get_arc(&self.edge_ends(edge))
    }

    /// Rendered straight segment of an edge.
    pub fn edge_segment(&self, id: EdgeId) -> Option<(Point, Point)> {
        let edge = self.edges.get(&id)?;
        Some(edge.segment(&self.edge_ends(edge)))
    }

    /// Visible start and end points of an edge.
    pub fn edge_endpoints(&self, id: EdgeId) -> Option<(Point, Point)> {
        let edge = self.edges.get(&id)?;
        Some(edge.endpoints(&self.edge_ends(edge)))
    }

    fn node_at(&self, point: Point) -> Option<&Node> {
        self.nodes().find(|node| node.within(point))
    }

    // --- Hit testing ---

    pub fn select_node(&self, point: Point) -> Option<Hit> {
        self.node_at(point).map(|node| Hit {
            shape: node.id().into(),
            offset: node.center - point,
        })
    }

    pub fn select_edge(&self, point: Point) -> Option<Hit> {
        let padding = self.config.line_padding;
        self.edges()
            .find(|edge| edge.within(&self.edge_ends(edge), point, padding, None, None))
            .map(|edge| Hit {
                shape: edge.id().into(),
                offset: Vec2::ZERO,
            })
    }

    /// Topmost shape under `point`, nodes first.
    pub fn select(&self, point: Point) -> Option<Hit> {
        self.select_node(point).or_else(|| self.select_edge(point))
    }

    // --- Selection ---

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_focused(&self, shape: ShapeId) -> bool {
        self.selection.contains(shape)
    }

    pub fn add_focus(&mut self, shape: ShapeId) {
        if self.contains(shape) {
            self.selection.insert(shape);
        }
    }

    pub fn remove_focus(&mut self, shape: ShapeId) {
        self.selection.remove(shape);
    }

    /// Flip selection membership. Returns whether `shape` is now selected.
    pub fn toggle_focus(&mut self, shape: ShapeId) -> bool {
        if !self.contains(shape) {
            return false;
        }
        self.selection.toggle(shape)
    }

    /// Clear the selection.
    pub fn unselect(&mut self) {
        self.selection.clear();
    }

    // --- Dragging ---

    pub fn drag_focus(&self) -> &DragFocus {
        &self.drag
    }

    pub fn add_drag_focus(&mut self, shape: ShapeId, offset: Vec2) {
        if self.contains(shape) {
            self.drag.insert(shape, offset);
        }
    }

    /// Grab every selected shape, keeping each one's offset from `point`.
    pub fn grab_selection(&mut self, point: Point) {
        let grabbed: Vec<(ShapeId, Vec2)> = self
            .selection
            .iter()
            .map(|shape| {
                let offset = match shape {
                    ShapeId::Node(id) => self.nodes.get(&id).map_or(Vec2::ZERO, |n| n.center - point),
                    ShapeId::Edge(id) => self.edges.get(&id).map_or(Vec2::ZERO, |e| e.start - point),
                };
                (shape, offset)
            })
            .collect();
        for (shape, offset) in grabbed {
            self.drag.insert(shape, offset);
        }
    }

    /// Move the drag focus to follow `point`.
    ///
    /// When any node is being dragged only nodes move; otherwise every dragged
    /// edge bends or extends toward the pointer.
    pub fn drag(&mut self, point: Point) {
        if self.drag.is_empty() {
            return;
        }
        let entries: Vec<(ShapeId, Vec2)> = self.drag.iter().collect();

        if self.drag.has_nodes() {
            for (shape, offset) in entries {
                let Some(id) = shape.as_node() else { continue };
                let anchors: Vec<Point> = self
                    .nodes()
                    .filter(|other| other.id() != id && !self.selection.contains(other.id().into()))
                    .map(|other| other.center)
                    .collect();
                let snap_padding = self.config.snap_padding;
                if let Some(node) = self.nodes.get_mut(&id) {
                    let result = node.drag(point, offset, anchors, snap_padding);
                    log::trace!("Dragged {id} to {:?} (snapped: {})", result.point, result.is_snapped());
                }
            }
        } else {
            let padding = self.config.line_padding;
            for (shape, _) in entries {
                let Some(id) = shape.as_edge() else { continue };
                let Some(ends) = self.edges.get(&id).map(|edge| self.edge_ends(edge)) else {
                    continue;
                };
                if let Some(edge) = self.edges.get_mut(&id) {
                    edge.drag(&ends, point, padding);
                    log::trace!("Dragged {id} (para {:.3}, perp {:.3})", edge.para, edge.perp);
                }
            }
        }
    }

    /// Finish the drag gesture at `point`.
    ///
    /// A pending edge binds to the node under the pointer, or is discarded
    /// when there is none.
    pub fn unselect_drag(&mut self, point: Point) {
        let entries: Vec<ShapeId> = self.drag.iter().map(|(shape, _)| shape).collect();
        self.drag.clear();

        for shape in entries {
            let Some(id) = shape.as_edge() else { continue };
            if !self.edges.get(&id).is_some_and(Edge::is_pending) {
                continue;
            }
            match self.node_at(point).map(|node| (node.id(), node.center)) {
                Some((target, center)) => {
                    if let Some(edge) = self.edges.get_mut(&id) {
                        edge.bind_target(target, center);
                    }
                    if let Some(node) = self.nodes.get_mut(&target) {
                        node.add_edge(id);
                    }
                    log::debug!("Bound {id} to {target}");
                }
                None => {
                    log::debug!("Discarded unbound {id}");
                    self.remove_edge(id);
                }
            }
        }
    }

    /// Flip the accept flag of a node.
    pub fn toggle_accept(&mut self, id: NodeId) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.toggle_accept();
                true
            }
            None => false,
        }
    }

    /// Flip the arrowhead on the half of `id` nearest `point`.
    pub fn toggle_arrow(&mut self, id: EdgeId, point: Point) -> bool {
        let Some(ends) = self.edges.get(&id).map(|edge| self.edge_ends(edge)) else {
            return false;
        };
        let padding = self.config.line_padding;
        self.edges
            .get_mut(&id)
            .is_some_and(|edge| edge.toggle_arrow(&ends, point, padding))
    }

    // --- Box selection ---

    pub fn select_box(&self) -> Option<&SelectBox> {
        self.select_box.as_ref()
    }

    pub fn start_select_box(&mut self, point: Point) {
        self.select_box = Some(SelectBox::new(point));
    }

    /// Stretch the rubber band to `point` and reselect from scratch.
    pub fn update_select_box(&mut self, point: Point) {
        let Some(select_box) = self.select_box.as_mut() else {
            return;
        };
        select_box.corner = point;
        let rect = select_box.rect();
        self.box_select(rect);
    }

    pub fn end_select_box(&mut self) {
        self.select_box = None;
    }

    /// Shapes inside the current rubber band.
    pub fn within_select_box(&self) -> Vec<ShapeId> {
        self.select_box
            .map(|select_box| self.shapes_in_rect(select_box.rect()))
            .unwrap_or_default()
    }

    /// Nodes whose center and edges with either visible endpoint lie in `rect`.
    ///
    /// A zero-area rectangle contains nothing.
    pub fn shapes_in_rect(&self, rect: Rect) -> Vec<ShapeId> {
        if rect.abs().area() == 0.0 {
            return Vec::new();
        }
        let nodes = self
            .nodes()
            .filter(|node| rect_contains_inclusive(rect, node.center))
            .map(|node| ShapeId::from(node.id()));
        let edges = self
            .edges()
            .filter(|edge| {
                let (start, end) = edge.endpoints(&self.edge_ends(edge));
                rect_contains_inclusive(rect, start) || rect_contains_inclusive(rect, end)
            })
            .map(|edge| ShapeId::from(edge.id()));
        nodes.chain(edges).collect()
    }

    /// Replace the selection with the shapes inside `rect`.
    pub fn box_select(&mut self, rect: Rect) -> Vec<ShapeId> {
        let picked = self.shapes_in_rect(rect);
        self.selection.clear();
        for shape in &picked {
            self.selection.insert(*shape);
        }
        picked
    }

    // --- Removal ---

    /// Remove a node and every edge incident to it. No-op for unknown ids.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(incident) = self.nodes.get(&id).map(|node| node.edges().collect::<Vec<_>>()) else {
            return false;
        };
        for edge in &incident {
            self.remove_edge(*edge);
        }
        self.nodes.remove(&id);
        self.node_order.retain(|n| *n != id);
        self.forget(id.into());
        log::debug!("Removed {id} and {} incident edges", incident.len());
        true
    }

    /// Detach an edge from its endpoints and remove it. No-op for unknown ids.
    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        let Some(edge) = self.edges.remove(&id) else {
            return false;
        };
        for node in [edge.u, edge.v].into_iter().flatten() {
            if let Some(node) = self.nodes.get_mut(&node) {
                node.remove_edge(id);
            }
        }
        self.edge_order.retain(|e| *e != id);
        self.forget(id.into());
        true
    }

    fn forget(&mut self, shape: ShapeId) {
        self.selection.remove(shape);
        self.drag.remove(shape);
    }

    /// Remove every listed shape. Returns how many were present.
    pub fn delete(&mut self, shapes: &[ShapeId]) -> usize {
        shapes
            .iter()
            .filter(|shape| match **shape {
                ShapeId::Node(id) => self.remove_node(id),
                ShapeId::Edge(id) => self.remove_edge(id),
            })
            .count()
    }

    pub fn delete_selected(&mut self) -> usize {
        let selected = self.selection.to_vec();
        self.delete(&selected)
    }

    // --- Attributes ---

    /// Apply `attribute` to every listed shape it applies to.
    ///
    /// The whole call is rejected before any change if a value is invalid or
    /// an id is unknown. Returns how many shapes changed.
    pub fn set_attribute(&mut self, shapes: &[ShapeId], attribute: Attribute) -> SceneResult<usize> {
        let checked = match attribute {
            Attribute::Radius(radius) => check_radius(radius),
            Attribute::FontSize(size) => check_font_size(size),
            _ => Ok(()),
        };
        if let Err(err) = checked {
            log::warn!("Rejected {err}");
            return Err(err);
        }
        for shape in shapes {
            match *shape {
                ShapeId::Node(id) if !self.nodes.contains_key(&id) => return Err(SceneError::UnknownNode(id)),
                ShapeId::Edge(id) if !self.edges.contains_key(&id) => return Err(SceneError::UnknownEdge(id)),
                _ => {}
            }
        }

        let mut changed = 0;
        for shape in shapes {
            match *shape {
                ShapeId::Node(id) if attribute.applies_to_nodes() => {
                    if let Some(node) = self.nodes.get_mut(&id) {
                        apply_to_node(node, attribute);
                        changed += 1;
                    }
                }
                ShapeId::Edge(id) if attribute.applies_to_edges() => {
                    if let Some(edge) = self.edges.get_mut(&id) {
                        apply_to_edge(edge, attribute);
                        changed += 1;
                    }
                }
                _ => {}
            }
        }
        Ok(changed)
    }

    pub fn set_selected_attribute(&mut self, attribute: Attribute) -> SceneResult<usize> {
        let selected = self.selection.to_vec();
        self.set_attribute(&selected, attribute)
    }

    // --- Text editing ---

    /// Append `c` to every focused label. Returns whether anything was focused.
    pub fn type_char(&mut self, c: char, now: Instant) -> bool {
        self.edit_text(now, |text| text.push(c))
    }

    /// Drop the last character of every focused label.
    pub fn backspace(&mut self, now: Instant) -> bool {
        self.edit_text(now, |text| {
            text.pop();
        })
    }

    fn edit_text(&mut self, now: Instant, mut edit: impl FnMut(&mut String)) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        for shape in self.selection.iter() {
            match shape {
                ShapeId::Node(id) => {
                    if let Some(node) = self.nodes.get_mut(&id) {
                        edit(&mut node.text);
                    }
                }
                ShapeId::Edge(id) => {
                    if let Some(edge) = self.edges.get_mut(&id) {
                        edit(&mut edge.text);
                    }
                }
            }
        }
        self.caret.reset(now);
        true
    }

    // --- Caret ---

    pub fn caret(&self) -> &Caret {
        &self.caret
    }

    pub fn caret_visible(&self) -> bool {
        self.caret.is_visible()
    }

    /// Advance the caret blink. Returns whether a redraw is due.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.caret.tick(now)
    }

    // --- Viewport ---

    /// Pan the viewport by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.camera.pan(delta);
    }

    /// Zoom by a raw wheel amount around the last pointer position.
    pub fn zoom(&mut self, wheel: f64) -> f64 {
        self.camera
            .zoom_by_wheel(wheel, self.pointer.last_world, self.config.wheel_divisor)
    }

    pub fn screen_to_world(&self, point: Point) -> Point {
        self.camera.screen_to_world(point)
    }

    // --- Interchange ---

    pub fn to_document(&self) -> SceneDocument {
        SceneDocument {
            nodes: self.nodes().cloned().collect(),
            edges: self.edges().cloned().collect(),
            camera: self.camera.clone(),
        }
    }

    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    /// Build a scene from a document, rebuilding node incidence.
    ///
    /// Nodes with a duplicate id or an invalid size are dropped, and so are
    /// edges that reference a missing node, repeat an id or have an invalid
    /// font size.
    pub fn from_document(document: SceneDocument, config: SceneConfig) -> Self {
        let mut scene = Self::new(config);
        scene.camera = document.camera;
        for node in document.nodes {
            if let Err(err) = scene.add_node(node) {
                log::warn!("Dropping node: {err}");
            }
        }
        for edge in document.edges {
            if scene.edges.contains_key(&edge.id()) {
                log::warn!("Dropping {}", SceneError::DuplicateEdge(edge.id()));
                continue;
            }
            if let Err(err) = check_font_size(edge.font_size) {
                log::warn!("Dropping {}: {err}", edge.id());
                continue;
            }
            let missing = [edge.u, edge.v]
                .into_iter()
                .flatten()
                .find(|id| !scene.nodes.contains_key(id));
            if let Some(node) = missing {
                log::warn!("Dropping {} referencing unknown {node}", edge.id());
                continue;
            }
            let id = edge.id();
            for node in [edge.u, edge.v].into_iter().flatten() {
                if let Some(node) = scene.nodes.get_mut(&node) {
                    node.add_edge(id);
                }
            }
            scene.edges.insert(id, edge);
            scene.edge_order.push(id);
        }
        log::debug!("Loaded {} nodes and {} edges", scene.node_count(), scene.edge_count());
        scene
    }

    pub fn from_json(json: &str, config: SceneConfig) -> SceneResult<Self> {
        let document: SceneDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(document, config))
    }
}

fn check_radius(radius: f64) -> SceneResult<()> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidRadius(radius))
    }
}

fn check_font_size(size: f64) -> SceneResult<()> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidFontSize(size))
    }
}

fn apply_to_node(node: &mut Node, attribute: Attribute) {
    match attribute {
        Attribute::Radius(radius) => node.radius = radius,
        Attribute::StrokeColor(color) => node.stroke_color = color,
        Attribute::FillColor(fill) => node.fill_color = fill,
        Attribute::TextColor(color) => node.text_color = color,
        Attribute::FontSize(size) => node.font_size = size,
        Attribute::ArrowMode(_) => {}
    }
}

fn apply_to_edge(edge: &mut Edge, attribute: Attribute) {
    match attribute {
        Attribute::StrokeColor(color) => edge.stroke_color = color,
        Attribute::TextColor(color) => edge.text_color = color,
        Attribute::FontSize(size) => edge.font_size = size,
        Attribute::ArrowMode(mode) => edge.set_arrow_mode(mode),
        Attribute::Radius(_) | Attribute::FillColor(_) => {}
    }
}
