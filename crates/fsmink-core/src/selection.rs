//! Selection state: the focus set, the drag-focus set and the rubber band.

use crate::shapes::ShapeId;
use kurbo::{Point, Rect, Vec2};

/// Rubber band rectangle spanned by a pointer drag over empty space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectBox {
    /// Where the drag started.
    pub origin: Point,
    /// Current pointer position.
    pub corner: Point,
}

impl SelectBox {
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            corner: origin,
        }
    }

    /// Normalized rectangle regardless of drag direction.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.origin, self.corner)
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Point) -> bool {
        rect_contains_inclusive(self.rect(), point)
    }
}

/// Inclusive on every side, unlike `Rect::contains`.
pub fn rect_contains_inclusive(rect: Rect, point: Point) -> bool {
    let rect = rect.abs();
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Ordered set of focused shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    shapes: Vec<ShapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, shape: ShapeId) -> bool {
        self.shapes.contains(&shape)
    }

    /// Add `shape` unless already present. Returns whether it was added.
    pub fn insert(&mut self, shape: ShapeId) -> bool {
        if self.contains(shape) {
            return false;
        }
        self.shapes.push(shape);
        true
    }

    pub fn remove(&mut self, shape: ShapeId) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|s| *s != shape);
        self.shapes.len() != before
    }

    /// Flip membership. Returns whether `shape` is now selected.
    pub fn toggle(&mut self, shape: ShapeId) -> bool {
        if self.remove(shape) {
            false
        } else {
            self.shapes.push(shape);
            true
        }
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<ShapeId> {
        self.shapes.clone()
    }
}

/// Shapes moved by the active pointer gesture, each with its offset from
/// the pointer at the moment it was grabbed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragFocus {
    entries: Vec<(ShapeId, Vec2)>,
}

impl DragFocus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `shape`, or update its offset if it is already being dragged.
    pub fn insert(&mut self, shape: ShapeId, offset: Vec2) {
        match self.entries.iter_mut().find(|(s, _)| *s == shape) {
            Some(entry) => entry.1 = offset,
            None => self.entries.push((shape, offset)),
        }
    }

    pub fn remove(&mut self, shape: ShapeId) {
        self.entries.retain(|(s, _)| *s != shape);
    }

    pub fn contains(&self, shape: ShapeId) -> bool {
        self.entries.iter().any(|(s, _)| *s == shape)
    }

    pub fn offset(&self, shape: ShapeId) -> Option<Vec2> {
        self.entries.iter().find(|(s, _)| *s == shape).map(|(_, o)| *o)
    }

    pub fn has_nodes(&self) -> bool {
        self.entries.iter().any(|(s, _)| s.is_node())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, Vec2)> + '_ {
        self.entries.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{EdgeId, NodeId};

    #[test]
    fn test_select_box_normalizes() {
        let mut select_box = SelectBox::new(Point::new(100.0, 100.0));
        select_box.corner = Point::new(0.0, 50.0);
        assert_eq!(select_box.rect(), Rect::new(0.0, 50.0, 100.0, 100.0));
        assert!(select_box.contains(Point::new(0.0, 50.0)));
        assert!(select_box.contains(Point::new(100.0, 100.0)));
        assert!(!select_box.contains(Point::new(100.1, 100.0)));
    }

    #[test]
    fn test_zero_area_box_contains_only_its_point() {
        let select_box = SelectBox::new(Point::new(5.0, 5.0));
        assert!(select_box.contains(Point::new(5.0, 5.0)));
        assert!(!select_box.contains(Point::new(5.0, 6.0)));
    }

    #[test]
    fn test_selection_toggle_and_order() {
        let a = ShapeId::Node(NodeId::new());
        let b = ShapeId::Edge(EdgeId::new());
        let mut selection = Selection::new();
        assert!(selection.insert(a));
        assert!(!selection.insert(a));
        assert!(selection.toggle(b));
        assert_eq!(selection.to_vec(), vec![a, b]);
        assert!(!selection.toggle(a));
        assert_eq!(selection.to_vec(), vec![b]);
    }

    #[test]
    fn test_drag_focus_offsets() {
        let node = ShapeId::Node(NodeId::new());
        let edge = ShapeId::Edge(EdgeId::new());
        let mut drag = DragFocus::new();
        drag.insert(edge, Vec2::ZERO);
        assert!(!drag.has_nodes());
        drag.insert(node, Vec2::new(1.0, 2.0));
        drag.insert(node, Vec2::new(3.0, 4.0));
        assert!(drag.has_nodes());
        assert_eq!(drag.offset(node), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(drag.iter().count(), 2);
        drag.remove(node);
        assert!(!drag.contains(node));
    }
}
