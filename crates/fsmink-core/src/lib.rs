//! FsmInk Core Library
//!
//! Geometry, shapes and the scene controller of the FsmInk state machine designer.
//! Everything here is platform-agnostic; drawing and export live in `fsmink-render`.

pub mod camera;
pub mod caret;
pub mod command;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod label;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod snap;

pub use camera::Camera;
pub use caret::Caret;
pub use command::Attribute;
pub use config::SceneConfig;
pub use error::{SceneError, SceneResult};
pub use input::{ClickTracker, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use label::{ApproxTextMetrics, TextMetrics};
pub use scene::{Hit, PointerState, Scene, SceneDocument};
pub use selection::{DragFocus, SelectBox, Selection};
pub use shapes::{ArrowMode, Edge, EdgeConfig, EdgeId, NamedColor, Node, NodeConfig, NodeId, ShapeId};
pub use snap::SnapResult;
