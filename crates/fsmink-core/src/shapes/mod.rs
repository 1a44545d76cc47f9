//! Graph elements of the diagram: circular state nodes and the edges between them.

mod edge;
mod node;

pub use edge::{ArrowMode, ArrowHeads, Edge, EdgeArc, EdgeConfig, EdgeEnds, LabelAnchor};
pub use node::{ACCEPT_RING_RATIO, Node, NodeConfig};

use crate::error::SceneError;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a node inside a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node:{}", self.0)
    }
}

/// Identifier of an edge inside a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub Uuid);

impl EdgeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge:{}", self.0)
    }
}

/// Either kind of shape the scene can hit, select, drag or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeId {
    Node(NodeId),
    Edge(EdgeId),
}

impl ShapeId {
    pub fn is_node(&self) -> bool {
        matches!(self, ShapeId::Node(_))
    }

    pub fn is_edge(&self) -> bool {
        matches!(self, ShapeId::Edge(_))
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            ShapeId::Node(id) => Some(*id),
            ShapeId::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<EdgeId> {
        match self {
            ShapeId::Edge(id) => Some(*id),
            ShapeId::Node(_) => None,
        }
    }
}

impl From<NodeId> for ShapeId {
    fn from(id: NodeId) -> Self {
        ShapeId::Node(id)
    }
}

impl From<EdgeId> for ShapeId {
    fn from(id: EdgeId) -> Self {
        ShapeId::Edge(id)
    }
}

/// The fixed color palette offered by the editor menus.
///
/// The names double as xcolor names in exported TikZ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedColor {
    #[default]
    Black,
    White,
    Red,
    Green,
    Blue,
    Cyan,
    Magenta,
    Yellow,
    Transparent,
}

impl NamedColor {
    pub const ALL: [NamedColor; 9] = [
        NamedColor::Black,
        NamedColor::White,
        NamedColor::Red,
        NamedColor::Green,
        NamedColor::Blue,
        NamedColor::Cyan,
        NamedColor::Magenta,
        NamedColor::Yellow,
        NamedColor::Transparent,
    ];

    /// Color for a palette slider position. Out-of-range values fall back to black.
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    /// Slider position of this color.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Fill for a fill slider position: the last slot means "no fill".
    pub fn fill_from_index(index: usize) -> Option<Self> {
        (index < NamedColor::Transparent.index()).then(|| Self::from_index(index))
    }

    pub fn name(self) -> &'static str {
        match self {
            NamedColor::Black => "black",
            NamedColor::White => "white",
            NamedColor::Red => "red",
            NamedColor::Green => "green",
            NamedColor::Blue => "blue",
            NamedColor::Cyan => "cyan",
            NamedColor::Magenta => "magenta",
            NamedColor::Yellow => "yellow",
            NamedColor::Transparent => "transparent",
        }
    }

    pub fn is_transparent(self) -> bool {
        self == NamedColor::Transparent
    }
}

impl fmt::Display for NamedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NamedColor {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" => Ok(NamedColor::Black),
            "white" => Ok(NamedColor::White),
            "red" => Ok(NamedColor::Red),
            "green" => Ok(NamedColor::Green),
            "blue" => Ok(NamedColor::Blue),
            "cyan" => Ok(NamedColor::Cyan),
            "magenta" => Ok(NamedColor::Magenta),
            "yellow" => Ok(NamedColor::Yellow),
            "transparent" | "none" => Ok(NamedColor::Transparent),
            _ => Err(SceneError::UnknownColor(s.to_string())),
        }
    }
}

impl From<NamedColor> for Color {
    fn from(color: NamedColor) -> Self {
        match color {
            NamedColor::Black => Color::from_rgba8(0, 0, 0, 255),
            NamedColor::White => Color::from_rgba8(255, 255, 255, 255),
            NamedColor::Red => Color::from_rgba8(255, 0, 0, 255),
            NamedColor::Green => Color::from_rgba8(0, 128, 0, 255),
            NamedColor::Blue => Color::from_rgba8(0, 0, 255, 255),
            NamedColor::Cyan => Color::from_rgba8(0, 255, 255, 255),
            NamedColor::Magenta => Color::from_rgba8(255, 0, 255, 255),
            NamedColor::Yellow => Color::from_rgba8(255, 255, 0, 255),
            NamedColor::Transparent => Color::from_rgba8(0, 0, 0, 0),
        }
    }
}
