//! Renderer trait abstraction and the scene render pass.

use fsmink_core::label::{ApproxTextMetrics, TextMetrics, caret_segment, convert_latex_shortcuts, label_position};
use fsmink_core::shapes::{Edge, NamedColor, Node, ShapeId};
use fsmink_core::Scene;
use kurbo::{Affine, Circle, Line, Point, Rect};
use peniko::Color;
use std::fmt;
use thiserror::Error;

/// Stroke width of shapes, in world units.
pub const STROKE_WIDTH: f64 = 1.0;
/// Stroke width of the rubber band, in screen pixels.
pub const SELECT_BOX_WIDTH: f64 = 0.5;

static DEFAULT_METRICS: ApproxTextMetrics = ApproxTextMetrics { advance: 0.6 };

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Formatting failed")]
    Format(#[from] fmt::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Immediate-mode drawing surface, in the manner of a 2D canvas context.
///
/// Geometry is given in world coordinates and mapped through the last
/// transform passed to [`Painter::set_transform`].
pub trait Painter {
    fn set_transform(&mut self, transform: Affine);
    fn stroke_circle(&mut self, circle: Circle, color: Color, width: f64);
    fn fill_circle(&mut self, circle: Circle, color: Color);
    fn stroke_line(&mut self, line: Line, color: Color, width: f64);
    /// Arc of `circle` from `start_angle` to `end_angle`, going anticlockwise
    /// (decreasing angle in Y-down space) when `anticlockwise` is set.
    fn stroke_arc(
        &mut self,
        circle: Circle,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
        color: Color,
        width: f64,
    );
    fn fill_triangle(&mut self, points: [Point; 3], color: Color);
    /// Text centered on `center`.
    fn fill_text(&mut self, text: &str, center: Point, font_size: f64, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The scene to render.
    pub scene: &'a Scene,
    /// Selection highlight color.
    pub selection_color: Color,
    /// Width estimate for label placement.
    pub metrics: &'a dyn TextMetrics,
    /// Draw the text caret on focused labels while it is in its visible phase.
    pub show_caret: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            selection_color: NamedColor::Blue.into(),
            metrics: &DEFAULT_METRICS,
            show_caret: true,
        }
    }

    /// Set the selection color.
    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    /// Set the text metrics.
    pub fn with_metrics(mut self, metrics: &'a dyn TextMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Enable or disable caret drawing.
    pub fn with_caret(mut self, show_caret: bool) -> Self {
        self.show_caret = show_caret;
        self
    }

    fn display_color(&self, shape: ShapeId, color: NamedColor) -> Color {
        if self.scene.is_focused(shape) {
            self.selection_color
        } else {
            color.into()
        }
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the command buffer for a frame.
    fn build_scene(&mut self, ctx: &RenderContext);
}

/// Draw a whole scene: edges, then nodes, then the rubber band.
pub fn paint_scene<P: Painter + ?Sized>(painter: &mut P, ctx: &RenderContext) {
    let scene = ctx.scene;
    painter.set_transform(scene.camera.transform());

    for edge in scene.edges() {
        paint_edge(painter, ctx, edge);
    }
    for node in scene.nodes() {
        paint_node(painter, ctx, node);
    }
    if let Some(select_box) = scene.select_box() {
        painter.stroke_rect(
            select_box.rect(),
            ctx.selection_color,
            SELECT_BOX_WIDTH / scene.camera.zoom,
        );
    }
}

fn paint_edge<P: Painter + ?Sized>(painter: &mut P, ctx: &RenderContext, edge: &Edge) {
    let shape = ShapeId::Edge(edge.id());
    let ends = ctx.scene.edge_ends(edge);
    let stroke = ctx.display_color(shape, edge.stroke_color);

    match edge.get_arc(&ends) {
        Some(arc) => painter.stroke_arc(
            Circle::new(arc.center, arc.radius),
            arc.start_angle,
            arc.end_angle,
            arc.is_anticlockwise(),
            stroke,
            STROKE_WIDTH,
        ),
        None => {
            let (start, end) = edge.segment(&ends);
            painter.stroke_line(Line::new(start, end), stroke, STROKE_WIDTH);
        }
    }

    let heads = edge.arrowheads(&ends);
    for head in [heads.start, heads.end].into_iter().flatten() {
        painter.fill_triangle(head, stroke);
    }

    let label = edge.label_placement(&ends);
    paint_label(
        painter,
        ctx,
        shape,
        &edge.text,
        label.point,
        Some(label.angle),
        edge.font_size,
        edge.text_color,
    );
}

fn paint_node<P: Painter + ?Sized>(painter: &mut P, ctx: &RenderContext, node: &Node) {
    let shape = ShapeId::Node(node.id());
    let stroke = ctx.display_color(shape, node.stroke_color);
    let circle = Circle::new(node.center, node.radius);

    if let Some(fill) = node.fill_color {
        painter.fill_circle(circle, fill.into());
    }
    painter.stroke_circle(circle, stroke, STROKE_WIDTH);
    if node.accept {
        painter.stroke_circle(Circle::new(node.center, node.accept_radius()), stroke, STROKE_WIDTH);
    }

    paint_label(
        painter,
        ctx,
        shape,
        &node.text,
        node.center,
        None,
        node.font_size,
        node.text_color,
    );
}

#[allow(clippy::too_many_arguments)]
fn paint_label<P: Painter + ?Sized>(
    painter: &mut P,
    ctx: &RenderContext,
    shape: ShapeId,
    text: &str,
    anchor: Point,
    angle: Option<f64>,
    font_size: f64,
    color: NamedColor,
) {
    let focused = ctx.scene.is_focused(shape);
    let show_caret = focused && ctx.show_caret && ctx.scene.caret_visible();
    if text.is_empty() && !show_caret {
        return;
    }

    let display = convert_latex_shortcuts(text);
    let width = ctx.metrics.text_width(&display, font_size);
    let center = label_position(anchor, angle, width);
    let color = ctx.display_color(shape, color);

    if !display.is_empty() {
        painter.fill_text(&display, center, font_size, color);
    }
    if show_caret {
        painter.stroke_line(caret_segment(center, width, font_size), color, STROKE_WIDTH);
    }
}
