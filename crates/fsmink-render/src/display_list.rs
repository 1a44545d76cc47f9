//! Recording renderer backend.
//!
//! Captures the draw calls of a frame as plain data, so hosts can replay them
//! on their own canvas and tests can inspect exactly what was drawn.

use crate::renderer::{Painter, RenderContext, Renderer, paint_scene};
use kurbo::{Affine, Circle, Line, Point, Rect};
use peniko::Color;
use std::fmt;

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetTransform(Affine),
    StrokeCircle {
        circle: Circle,
        color: Color,
        width: f64,
    },
    FillCircle {
        circle: Circle,
        color: Color,
    },
    StrokeLine {
        line: Line,
        color: Color,
        width: f64,
    },
    StrokeArc {
        circle: Circle,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
        color: Color,
        width: f64,
    },
    FillTriangle {
        points: [Point; 3],
        color: Color,
    },
    FillText {
        text: String,
        center: Point,
        font_size: f64,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f64,
    },
}

impl DrawCommand {
    /// Short name of the command kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DrawCommand::SetTransform(_) => "transform",
            DrawCommand::StrokeCircle { .. } => "stroke-circle",
            DrawCommand::FillCircle { .. } => "fill-circle",
            DrawCommand::StrokeLine { .. } => "stroke-line",
            DrawCommand::StrokeArc { .. } => "stroke-arc",
            DrawCommand::FillTriangle { .. } => "fill-triangle",
            DrawCommand::FillText { .. } => "fill-text",
            DrawCommand::StrokeRect { .. } => "stroke-rect",
        }
    }
}

/// A renderer that records draw calls.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of recorded commands of each kind, in first-seen order.
    pub fn summary(&self) -> Vec<(&'static str, usize)> {
        let mut counts: Vec<(&'static str, usize)> = Vec::new();
        for command in &self.commands {
            let kind = command.kind();
            match counts.iter_mut().find(|(k, _)| *k == kind) {
                Some(entry) => entry.1 += 1,
                None => counts.push((kind, 1)),
            }
        }
        counts
    }
}

impl Painter for DisplayList {
    fn set_transform(&mut self, transform: Affine) {
        self.commands.push(DrawCommand::SetTransform(transform));
    }

    fn stroke_circle(&mut self, circle: Circle, color: Color, width: f64) {
        self.commands.push(DrawCommand::StrokeCircle { circle, color, width });
    }

    fn fill_circle(&mut self, circle: Circle, color: Color) {
        self.commands.push(DrawCommand::FillCircle { circle, color });
    }

    fn stroke_line(&mut self, line: Line, color: Color, width: f64) {
        self.commands.push(DrawCommand::StrokeLine { line, color, width });
    }

    fn stroke_arc(
        &mut self,
        circle: Circle,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
        color: Color,
        width: f64,
    ) {
        self.commands.push(DrawCommand::StrokeArc {
            circle,
            start_angle,
            end_angle,
            anticlockwise,
            color,
            width,
        });
    }

    fn fill_triangle(&mut self, points: [Point; 3], color: Color) {
        self.commands.push(DrawCommand::FillTriangle { points, color });
    }

    fn fill_text(&mut self, text: &str, center: Point, font_size: f64, color: Color) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            center,
            font_size,
            color,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.commands.push(DrawCommand::StrokeRect { rect, color, width });
    }
}

impl Renderer for DisplayList {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.commands.clear();
        paint_scene(self, ctx);
    }
}

impl fmt::Display for DisplayList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (kind, count) in self.summary() {
            writeln!(f, "{kind}: {count}")?;
        }
        Ok(())
    }
}
