//! Label placement for node and edge text.
//!
//! Labels are drawn centered on a point. Edge labels are pushed off the stroke
//! toward the outside of the edge so they never overlap it.

use kurbo::{Line, Point, Vec2};
use std::fmt;

/// Measures rendered text width. Hosts with real font shaping plug in here.
pub trait TextMetrics {
    /// Width of `text` at `font_size`, in world units.
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}

/// Fixed-advance width estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxTextMetrics {
    /// Advance per character as a fraction of the font size.
    pub advance: f64,
}

impl Default for ApproxTextMetrics {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMetrics for ApproxTextMetrics {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * self.advance
    }
}

/// Vertical half-extent of the label box plus margin.
const LABEL_CORNER_Y: f64 = 15.0;
/// Horizontal margin between the stroke and the label box.
const LABEL_MARGIN_X: f64 = 5.0;

fn sign(value: f64) -> f64 {
    if value > 0.0 { 1.0 } else { -1.0 }
}

/// Offset from the anchor to the label center.
///
/// `angle` points away from the edge; `None` keeps the label centered, which
/// is how node labels are drawn.
pub fn label_offset(angle: Option<f64>, width: f64) -> Vec2 {
    let Some(angle) = angle else {
        return Vec2::ZERO;
    };
    let (sin, cos) = angle.sin_cos();
    let corner = Vec2::new((width / 2.0 + LABEL_MARGIN_X) * sign(cos), LABEL_CORNER_Y * sign(sin));
    let slide = sin * sin.abs().powi(40) * corner.x - cos * cos.abs().powi(10) * corner.y;
    Vec2::new(corner.x - sin * slide, corner.y + cos * slide)
}

/// Center of a label of `width` anchored at `anchor`.
pub fn label_position(anchor: Point, angle: Option<f64>, width: f64) -> Point {
    anchor + label_offset(angle, width)
}

/// Text caret drawn right after a centered label, snapped to whole pixels.
pub fn caret_segment(center: Point, width: f64, font_size: f64) -> Line {
    let x = (center.x + width / 2.0 + 1.0).round();
    let y = center.y.round();
    Line::new((x, y - font_size / 2.0), (x, y + font_size / 2.0))
}

/// Which side of its anchor a label is attached to, for text engines that
/// anchor by side instead of by center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSide {
    Right,
    Left,
    Above,
    Below,
}

impl LabelSide {
    /// Side along the dominant axis of `angle` (Y-down).
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        if cos.abs() > sin.abs() {
            if cos > 0.0 { LabelSide::Right } else { LabelSide::Left }
        } else if sin > 0.0 {
            LabelSide::Below
        } else {
            LabelSide::Above
        }
    }

    /// Move a label center to the attachment point for this side.
    pub fn attach(self, center: Point, width: f64) -> Point {
        match self {
            LabelSide::Right => center - Vec2::new(width / 2.0, 0.0),
            LabelSide::Left => center + Vec2::new(width / 2.0, 0.0),
            LabelSide::Below => center - Vec2::new(0.0, 10.0),
            LabelSide::Above => center + Vec2::new(0.0, 10.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LabelSide::Right => "right",
            LabelSide::Left => "left",
            LabelSide::Above => "above",
            LabelSide::Below => "below",
        }
    }
}

impl fmt::Display for LabelSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const GREEK_LETTERS: [&str; 24] = [
    "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta", "Theta", "Iota", "Kappa",
    "Lambda", "Mu", "Nu", "Xi", "Omicron", "Pi", "Rho", "Sigma", "Tau", "Upsilon", "Phi", "Chi",
    "Psi", "Omega",
];

/// Replace `\alpha`-style names with Greek letters and `_0`..`_9` with subscript digits.
pub fn convert_latex_shortcuts(text: &str) -> String {
    let mut out = text.to_string();
    for (i, name) in GREEK_LETTERS.iter().enumerate() {
        // The Greek block skips the final-sigma slot after Rho.
        let skip = u32::from(i > 16);
        let upper = char::from_u32(0x391 + i as u32 + skip);
        let lower = char::from_u32(0x3B1 + i as u32 + skip);
        if let Some(upper) = upper {
            out = out.replace(&format!("\\{name}"), &upper.to_string());
        }
        if let Some(lower) = lower {
            out = out.replace(&format!("\\{}", name.to_lowercase()), &lower.to_string());
        }
    }
    for digit in 0..10u32 {
        if let Some(sub) = char::from_u32(0x2080 + digit) {
            out = out.replace(&format!("_{digit}"), &sub.to_string());
        }
    }
    out
}
