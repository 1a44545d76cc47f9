//! Scene configuration.
//!
//! Every field has a default so a partial JSON document is a valid config.

use crate::caret::DEFAULT_BLINK_PERIOD;
use crate::shapes::{EdgeConfig, NodeConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Distance below which a dragged node aligns with another node's axis.
    pub snap_padding: f64,
    /// Hit tolerance around edges, and the snap distance that straightens them.
    pub line_padding: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Raw wheel units per unit of zoom.
    pub wheel_divisor: f64,
    pub caret_blink_ms: u64,
    pub node: NodeConfig,
    pub edge: EdgeConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            snap_padding: 10.0,
            line_padding: 10.0,
            min_scale: crate::camera::MIN_ZOOM,
            max_scale: crate::camera::MAX_ZOOM,
            wheel_divisor: 1000.0,
            caret_blink_ms: DEFAULT_BLINK_PERIOD.as_millis() as u64,
            node: NodeConfig::default(),
            edge: EdgeConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn caret_period(&self) -> Duration {
        Duration::from_millis(self.caret_blink_ms)
    }

    /// Parse a config from JSON, filling absent fields with defaults.
    pub fn from_json(json: &str) -> crate::error::SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::NamedColor;

    #[test]
    fn test_defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.snap_padding, 10.0);
        assert_eq!(config.line_padding, 10.0);
        assert_eq!(config.caret_period(), Duration::from_millis(500));
        assert_eq!(config.node.radius, 30.0);
        assert!(config.edge.end_arrow);
        assert!(!config.edge.start_arrow);
    }

    #[test]
    fn test_partial_json() {
        let config = SceneConfig::from_json(
            r#"{ "line_padding": 4.0, "node": { "radius": 25.0, "fill_color": "yellow" } }"#,
        )
        .unwrap();
        assert_eq!(config.line_padding, 4.0);
        assert_eq!(config.snap_padding, 10.0);
        assert_eq!(config.node.radius, 25.0);
        assert_eq!(config.node.fill_color, Some(NamedColor::Yellow));
        assert_eq!(config.node.font_size, 14.0);
    }

    #[test]
    fn test_malformed_json() {
        assert!(SceneConfig::from_json("{ nope").is_err());
    }
}
