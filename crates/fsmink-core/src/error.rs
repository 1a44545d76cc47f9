//! Scene errors.

use crate::shapes::{EdgeId, NodeId};
use thiserror::Error;

/// Recoverable misuse of the scene API.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
    #[error("Unknown edge: {0}")]
    UnknownEdge(EdgeId),
    #[error("Duplicate node: {0}")]
    DuplicateNode(NodeId),
    #[error("Duplicate edge: {0}")]
    DuplicateEdge(EdgeId),
    #[error("Invalid radius: {0} (must be finite and positive)")]
    InvalidRadius(f64),
    #[error("Invalid font size: {0} (must be finite and positive)")]
    InvalidFontSize(f64),
    #[error("Unknown color: {0}")]
    UnknownColor(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
