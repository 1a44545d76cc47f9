//! Attribute commands forwarded by menus and other host widgets.

use crate::shapes::{ArrowMode, NamedColor};
use serde::{Deserialize, Serialize};

/// One attribute change, applied to every applicable shape in a set.
///
/// Attributes that do not apply to a shape kind are skipped for that shape:
/// radius and fill only touch nodes, arrow mode only touches edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "attribute", content = "value", rename_all = "snake_case")]
pub enum Attribute {
    Radius(f64),
    StrokeColor(NamedColor),
    FillColor(Option<NamedColor>),
    TextColor(NamedColor),
    FontSize(f64),
    ArrowMode(ArrowMode),
}

impl Attribute {
    pub fn applies_to_nodes(&self) -> bool {
        !matches!(self, Attribute::ArrowMode(_))
    }

    pub fn applies_to_edges(&self) -> bool {
        !matches!(self, Attribute::Radius(_) | Attribute::FillColor(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applicability() {
        assert!(Attribute::Radius(10.0).applies_to_nodes());
        assert!(!Attribute::Radius(10.0).applies_to_edges());
        assert!(!Attribute::ArrowMode(ArrowMode::Both).applies_to_nodes());
        assert!(Attribute::StrokeColor(NamedColor::Red).applies_to_edges());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&Attribute::FillColor(Some(NamedColor::Cyan))).unwrap();
        assert_eq!(json, r#"{"attribute":"fill_color","value":"cyan"}"#);
        let parsed: Attribute = serde_json::from_str(r#"{"attribute":"arrow_mode","value":"both"}"#).unwrap();
        assert_eq!(parsed, Attribute::ArrowMode(ArrowMode::Both));
    }
}
