//! Pointer and keyboard events, and their translation into scene gestures.
//!
//! Event positions are in screen coordinates; the scene maps them through
//! its camera before hit testing.

use crate::scene::Scene;
use crate::shapes::ShapeId;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Up {
        position: Point,
    },
    Move {
        position: Point,
    },
    DoubleClick {
        position: Point,
    },
    /// Wheel rotation in raw units; positive zooms in.
    Wheel {
        position: Point,
        delta: f64,
    },
}

/// Keyboard event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    /// A printable character.
    Char(char),
    Backspace,
    Delete,
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME: Duration = Duration::from_millis(500);
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Synthesizes double clicks for hosts that only report presses.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last_click: Option<(Instant, Point)>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a left press. Returns whether it completes a double click.
    pub fn register(&mut self, position: Point, now: Instant) -> bool {
        if let Some((time, last)) = self.last_click {
            let quick = now.saturating_duration_since(time) < DOUBLE_CLICK_TIME;
            if quick && (position - last).hypot() < DOUBLE_CLICK_DISTANCE {
                // A third click starts a new pair.
                self.last_click = None;
                return true;
            }
        }
        self.last_click = Some((now, position));
        false
    }
}

impl Scene {
    /// Apply a pointer event. Returns whether the scene needs a redraw.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => {
                self.pointer_down(position, button, modifiers);
                true
            }
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => {
                let world = self.screen_to_world(position);
                self.unselect_drag(world);
                self.pointer.pan_anchor = None;
                self.end_select_box();
                true
            }
            PointerEvent::DoubleClick { position } => {
                let world = self.screen_to_world(position);
                match self.select_node(world).or_else(|| self.select_edge(world)) {
                    Some(hit) => match hit.shape {
                        ShapeId::Node(id) => {
                            self.toggle_accept(id);
                        }
                        ShapeId::Edge(id) => {
                            self.toggle_arrow(id, world);
                        }
                    },
                    None => {
                        self.create_node(world);
                    }
                }
                true
            }
            PointerEvent::Wheel { position, delta } => {
                self.pointer.last_world = self.screen_to_world(position);
                self.zoom(delta) != 0.0
            }
        }
    }

    fn pointer_down(&mut self, position: Point, button: MouseButton, modifiers: Modifiers) {
        let world = self.screen_to_world(position);
        self.pointer.last_world = world;

        let Some(hit) = self.select(world) else {
            if button != MouseButton::Right && !modifiers.meta {
                self.unselect();
            }
            if modifiers.command() {
                self.start_select_box(world);
            } else if button != MouseButton::Right {
                self.pointer.pan_anchor = Some(position);
            }
            return;
        };

        if let (true, ShapeId::Node(u)) = (modifiers.shift, hit.shape) {
            if let Err(err) = self.create_edge(u, world) {
                log::warn!("Could not start edge: {err}");
            }
        } else if modifiers.command() {
            self.toggle_focus(hit.shape);
        } else if self.is_focused(hit.shape) {
            self.unselect_drag(world);
            self.grab_selection(world);
        } else {
            self.unselect();
            self.add_focus(hit.shape);
            self.add_drag_focus(hit.shape, hit.offset);
        }
    }

    fn pointer_move(&mut self, position: Point) -> bool {
        let world = self.screen_to_world(position);
        let mut redraw = !self.drag_focus().is_empty();
        self.drag(world);
        self.pointer.last_world = world;

        if let Some(anchor) = self.pointer.pan_anchor {
            if self.drag_focus().is_empty() {
                self.pan(position - anchor);
                self.pointer.pan_anchor = Some(position);
                redraw = true;
            }
        }
        if self.select_box().is_some() {
            self.update_select_box(world);
            redraw = true;
        }
        redraw
    }

    /// Apply a key event to the focused shapes. Returns whether anything changed.
    pub fn handle_key_event(&mut self, event: KeyEvent, now: Instant) -> bool {
        if self.selection().is_empty() {
            return false;
        }
        match event {
            KeyEvent::Char(c) => self.type_char(c, now),
            KeyEvent::Backspace => self.backspace(now),
            KeyEvent::Delete => self.delete_selected() > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::shapes::NodeId;
    use kurbo::Vec2;

    fn down(x: f64, y: f64, modifiers: Modifiers) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
            modifiers,
        }
    }

    fn move_to(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
        }
    }

    fn scene_with_nodes() -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::default();
        let a = scene.create_node(Point::new(100.0, 100.0));
        let b = scene.create_node(Point::new(300.0, 100.0));
        (scene, a, b)
    }

    #[test]
    fn test_double_click_creates_and_toggles() {
        let mut scene = Scene::default();
        scene.handle_pointer_event(PointerEvent::DoubleClick {
            position: Point::new(50.0, 60.0),
        });
        assert_eq!(scene.node_count(), 1);
        let id = scene.nodes().next().unwrap().id();

        scene.handle_pointer_event(PointerEvent::DoubleClick {
            position: Point::new(55.0, 60.0),
        });
        assert_eq!(scene.node_count(), 1);
        assert!(scene.node(id).unwrap().accept);
    }

    #[test]
    fn test_double_click_edge_toggles_arrow() {
        let (mut scene, a, b) = scene_with_nodes();
        let edge = scene.connect(a, b).unwrap();
        scene.handle_pointer_event(PointerEvent::DoubleClick {
            position: Point::new(250.0, 100.0),
        });
        assert!(!scene.edge(edge).unwrap().end_arrow);
    }

    #[test]
    fn test_click_selects_and_drags_node() {
        let (mut scene, a, _) = scene_with_nodes();
        scene.handle_pointer_event(down(110.0, 100.0, Modifiers::default()));
        assert!(scene.is_focused(a.into()));
        scene.handle_pointer_event(move_to(110.0, 200.0));
        scene.handle_pointer_event(up(110.0, 200.0));
        assert_eq!(scene.node(a).unwrap().center, Point::new(100.0, 200.0));
        assert!(scene.drag_focus().is_empty());
    }

    #[test]
    fn test_shift_drag_creates_edge() {
        let (mut scene, a, b) = scene_with_nodes();
        scene.handle_pointer_event(down(100.0, 100.0, Modifiers::SHIFT));
        scene.handle_pointer_event(move_to(200.0, 100.0));
        scene.handle_pointer_event(move_to(300.0, 110.0));
        scene.handle_pointer_event(up(300.0, 110.0));

        assert_eq!(scene.edge_count(), 1);
        let edge = scene.edges().next().unwrap();
        assert_eq!((edge.u, edge.v), (Some(a), Some(b)));
        // The source node was not moved by the gesture.
        assert_eq!(scene.node(a).unwrap().center, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_ctrl_click_toggles_membership() {
        let (mut scene, a, b) = scene_with_nodes();
        scene.handle_pointer_event(down(100.0, 100.0, Modifiers::CTRL));
        scene.handle_pointer_event(up(100.0, 100.0));
        scene.handle_pointer_event(down(300.0, 100.0, Modifiers::CTRL));
        scene.handle_pointer_event(up(300.0, 100.0));
        assert_eq!(scene.selection().len(), 2);
        scene.handle_pointer_event(down(100.0, 100.0, Modifiers::CTRL));
        assert!(!scene.is_focused(a.into()));
        assert!(scene.is_focused(b.into()));
    }

    #[test]
    fn test_ctrl_drag_on_empty_space_box_selects() {
        let (mut scene, a, b) = scene_with_nodes();
        scene.handle_pointer_event(down(0.0, 0.0, Modifiers::CTRL));
        scene.handle_pointer_event(move_to(200.0, 200.0));
        assert!(scene.is_focused(a.into()));
        assert!(!scene.is_focused(b.into()));
        scene.handle_pointer_event(up(200.0, 200.0));
        assert!(scene.select_box().is_none());
        assert!(scene.is_focused(a.into()));
    }

    #[test]
    fn test_drag_on_empty_space_pans() {
        let (mut scene, _, _) = scene_with_nodes();
        scene.handle_pointer_event(down(500.0, 500.0, Modifiers::default()));
        scene.handle_pointer_event(move_to(520.0, 490.0));
        scene.handle_pointer_event(move_to(530.0, 480.0));
        scene.handle_pointer_event(up(530.0, 480.0));
        assert_eq!(scene.camera.offset, Vec2::new(30.0, -20.0));
        // Further moves after release do not pan.
        scene.handle_pointer_event(move_to(600.0, 600.0));
        assert_eq!(scene.camera.offset, Vec2::new(30.0, -20.0));
    }

    #[test]
    fn test_wheel_zoom_uses_last_pointer() {
        let mut scene = Scene::default();
        scene.handle_pointer_event(move_to(200.0, 100.0));
        assert!(scene.handle_pointer_event(PointerEvent::Wheel {
            position: Point::new(200.0, 100.0),
            delta: 1000.0,
        }));
        assert!((scene.camera.zoom - 2.0).abs() < 1e-12);
        let world = scene.screen_to_world(Point::new(200.0, 100.0));
        assert!((world - Point::new(200.0, 100.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_wheel_zoom_pivots_on_wheel_position() {
        let mut scene = Scene::default();
        scene.handle_pointer_event(move_to(10.0, 10.0));
        assert!(scene.handle_pointer_event(PointerEvent::Wheel {
            position: Point::new(300.0, 200.0),
            delta: 1000.0,
        }));
        let world = scene.screen_to_world(Point::new(300.0, 200.0));
        assert!((world - Point::new(300.0, 200.0)).hypot() < 1e-9);
        assert_eq!(scene.pointer.last_world, Point::new(300.0, 200.0));
    }

    #[test]
    fn test_keys_edit_focused_labels() {
        let start = Instant::now();
        let mut scene = Scene::new_at(SceneConfig::default(), start);
        let a = scene.create_node(Point::new(100.0, 100.0));
        assert!(!scene.handle_key_event(KeyEvent::Char('x'), start));

        scene.add_focus(a.into());
        scene.handle_key_event(KeyEvent::Char('s'), start);
        scene.handle_key_event(KeyEvent::Char('1'), start);
        scene.handle_key_event(KeyEvent::Backspace, start);
        assert_eq!(scene.node(a).unwrap().text, "s");

        assert!(scene.handle_key_event(KeyEvent::Delete, start));
        assert!(scene.node(a).is_none());
    }

    #[test]
    fn test_click_tracker() {
        let start = Instant::now();
        let mut tracker = ClickTracker::new();
        let pos = Point::new(100.0, 100.0);
        assert!(!tracker.register(pos, start));
        assert!(tracker.register(pos, start + Duration::from_millis(200)));
        assert!(!tracker.register(pos, start + Duration::from_millis(300)));
        assert!(!tracker.register(Point::new(200.0, 200.0), start + Duration::from_millis(350)));
        assert!(!tracker.register(pos, start + Duration::from_secs(2)));
    }
}
