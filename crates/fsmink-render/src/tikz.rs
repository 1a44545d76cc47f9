//! TikZ export.
//!
//! Walks the scene (edges, then nodes) into a list of [`TikzCommand`]s and
//! formats them into a standalone LaTeX document. Coordinates are scaled
//! down into document space and the Y axis is flipped, since TikZ is Y-up.

use crate::renderer::RenderResult;
use fsmink_core::Scene;
use fsmink_core::geometry::wrap_angle_pair;
use fsmink_core::label::{ApproxTextMetrics, LabelSide, TextMetrics, convert_latex_shortcuts, label_position};
use fsmink_core::shapes::{Edge, NamedColor, Node};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt::{self, Write};

const DOCUMENT_HEADER: &str = "\\documentclass[12pt]{article}\n\\usepackage{tikz}\n\n\\begin{document}\n\n\\begin{center}\n";
const DOCUMENT_FOOTER: &str = "\\end{tikzpicture}\n\\end{center}\n\n\\end{document}\n";

/// Export settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Pixels to document units. TikZ misbehaves with large coordinates.
    pub scale: f64,
    /// `scale` option of the `tikzpicture` environment.
    pub picture_scale: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 0.1,
            picture_scale: 0.2,
        }
    }
}

/// Fixed-point number that never prints a negative zero.
struct Fixed(f64, usize);

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!("{:.*}", self.1, self.0);
        match text.strip_prefix('-') {
            Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => f.write_str(rest),
            _ => f.write_str(&text),
        }
    }
}

struct Coord(Point, usize);

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", Fixed(self.0.x, self.1), Fixed(self.0.y, self.1))
    }
}

fn draw_option(color: NamedColor) -> &'static str {
    if color.is_transparent() { "draw opacity=0" } else { color.name() }
}

fn fill_option(color: NamedColor) -> &'static str {
    if color.is_transparent() { "fill opacity=0" } else { color.name() }
}

/// One TikZ drawing command, in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum TikzCommand {
    Line {
        color: NamedColor,
        from: Point,
        to: Point,
    },
    /// Arc starting at `start`, swept from `start_deg` to `end_deg`.
    Arc {
        color: NamedColor,
        start: Point,
        start_deg: f64,
        end_deg: f64,
        radius: f64,
    },
    Arrowhead {
        color: NamedColor,
        points: [Point; 3],
    },
    /// Text in math mode, attached by `side` or centered when `None`.
    Label {
        at: Point,
        side: Option<LabelSide>,
        text: String,
    },
    Circle {
        color: NamedColor,
        fill: Option<NamedColor>,
        center: Point,
        radius: f64,
    },
}

impl fmt::Display for TikzCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TikzCommand::Line { color, from, to } => write!(
                f,
                "\\draw [{}] {} -- {};",
                draw_option(*color),
                Coord(*from, 3),
                Coord(*to, 3)
            ),
            TikzCommand::Arc {
                color,
                start,
                start_deg,
                end_deg,
                radius,
            } => write!(
                f,
                "\\draw [{}] {} arc ({}:{}:{});",
                draw_option(*color),
                Coord(*start, 3),
                Fixed(*start_deg, 5),
                Fixed(*end_deg, 5),
                Fixed(*radius, 3)
            ),
            TikzCommand::Arrowhead { color, points } => write!(
                f,
                "\\fill [{}] {} -- {} -- {};",
                fill_option(*color),
                Coord(points[0], 3),
                Coord(points[1], 3),
                Coord(points[2], 3)
            ),
            TikzCommand::Label { at, side, text } => match side {
                Some(side) => write!(f, "\\draw {} node [{side}] {{${text}$}};", Coord(*at, 2)),
                None => write!(f, "\\draw {} node {{${text}$}};", Coord(*at, 2)),
            },
            TikzCommand::Circle {
                color,
                fill,
                center,
                radius,
            } => {
                write!(f, "\\draw [{}", draw_option(*color))?;
                if let Some(fill) = fill.filter(|fill| !fill.is_transparent()) {
                    write!(f, ",fill={fill}")?;
                }
                write!(f, "] {} circle ({});", Coord(*center, 3), Fixed(*radius, 3))
            }
        }
    }
}

/// Builds TikZ from a scene.
#[derive(Debug, Clone, Default)]
pub struct TikzExporter<M = ApproxTextMetrics> {
    config: ExportConfig,
    metrics: M,
}

impl TikzExporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: TextMetrics> TikzExporter<M> {
    /// Set the export configuration.
    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `metrics` to measure label widths.
    pub fn with_metrics<N: TextMetrics>(self, metrics: N) -> TikzExporter<N> {
        TikzExporter {
            config: self.config,
            metrics,
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// World point to document space.
    fn to_document(&self, point: Point) -> Point {
        Point::new(point.x * self.config.scale, -point.y * self.config.scale)
    }

    /// All drawing commands for `scene`: edges first, then nodes.
    pub fn commands(&self, scene: &Scene) -> Vec<TikzCommand> {
        let mut commands = Vec::new();
        for edge in scene.edges() {
            if edge.is_pending() {
                log::debug!("Skipping pending {} on export", edge.id());
                continue;
            }
            self.edge_commands(scene, edge, &mut commands);
        }
        for node in scene.nodes() {
            self.node_commands(node, &mut commands);
        }
        commands
    }

    fn edge_commands(&self, scene: &Scene, edge: &Edge, out: &mut Vec<TikzCommand>) {
        let ends = scene.edge_ends(edge);
        let color = edge.stroke_color;

        match edge.get_arc(&ends) {
            Some(arc) => {
                let (mut start, mut end) = (arc.start_angle, arc.end_angle);
                if edge.perp > 0.0 {
                    std::mem::swap(&mut start, &mut end);
                }
                if end < start {
                    end += TAU;
                }
                let (start, end) = wrap_angle_pair(start, end);
                let (start, end) = (-start, -end);

                let center = self.to_document(arc.center);
                let radius = arc.radius * self.config.scale;
                out.push(TikzCommand::Arc {
                    color,
                    start: Point::new(center.x + radius * start.cos(), center.y + radius * start.sin()),
                    start_deg: start.to_degrees(),
                    end_deg: end.to_degrees(),
                    radius,
                });
            }
            None => {
                let (from, to) = edge.segment(&ends);
                out.push(TikzCommand::Line {
                    color,
                    from: self.to_document(from),
                    to: self.to_document(to),
                });
            }
        }

        let heads = edge.arrowheads(&ends);
        for head in [heads.start, heads.end].into_iter().flatten() {
            out.push(TikzCommand::Arrowhead {
                color,
                points: head.map(|point| self.to_document(point)),
            });
        }

        if !edge.text.is_empty() {
            let label = edge.label_placement(&ends);
            let width = self
                .metrics
                .text_width(&convert_latex_shortcuts(&edge.text), edge.font_size);
            let center = label_position(label.point, Some(label.angle), width);
            let side = LabelSide::from_angle(label.angle);
            out.push(TikzCommand::Label {
                at: self.to_document(side.attach(center, width)),
                side: Some(side),
                text: edge.text.clone(),
            });
        }
    }

    fn node_commands(&self, node: &Node, out: &mut Vec<TikzCommand>) {
        let center = self.to_document(node.center);
        out.push(TikzCommand::Circle {
            color: node.stroke_color,
            fill: node.fill_color,
            center,
            radius: node.radius * self.config.scale,
        });
        if node.accept {
            out.push(TikzCommand::Circle {
                color: node.stroke_color,
                fill: None,
                center,
                radius: node.accept_radius() * self.config.scale,
            });
        }
        if !node.text.is_empty() {
            out.push(TikzCommand::Label {
                at: center,
                side: None,
                text: node.text.clone(),
            });
        }
    }

    /// The complete LaTeX document for `scene`.
    pub fn document(&self, scene: &Scene) -> RenderResult<String> {
        let mut out = String::from(DOCUMENT_HEADER);
        writeln!(
            out,
            "\\begin{{tikzpicture}}[scale={}]",
            self.config.picture_scale
        )?;
        out.push_str("\\tikzstyle{every node}+=[inner sep=0pt]\n");
        for command in self.commands(scene) {
            writeln!(out, "{command}")?;
        }
        out.push_str(DOCUMENT_FOOTER);
        Ok(out)
    }
}

/// Export `scene` as a LaTeX document with default settings.
pub fn export(scene: &Scene) -> RenderResult<String> {
    TikzExporter::new().document(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsmink_core::SceneConfig;
    use pretty_assertions::assert_eq;

    fn lines(scene: &Scene) -> Vec<String> {
        TikzExporter::new()
            .commands(scene)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn two_nodes() -> (Scene, fsmink_core::NodeId, fsmink_core::NodeId) {
        let mut scene = Scene::default();
        let a = scene.create_node(Point::new(100.0, 100.0));
        let b = scene.create_node(Point::new(300.0, 100.0));
        (scene, a, b)
    }

    #[test]
    fn test_single_node_is_one_circle() {
        let mut scene = Scene::default();
        scene.create_node(Point::new(100.0, 100.0));

        let commands = TikzExporter::new().commands(&scene);
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], TikzCommand::Circle { .. }));
        assert_eq!(lines(&scene), vec!["\\draw [black] (10.000,-10.000) circle (3.000);"]);
    }

    #[test]
    fn test_accept_node_with_fill_and_label() {
        let mut scene = Scene::default();
        let a = scene.create_node(Point::new(100.0, 100.0));
        let node = scene.node_mut(a).unwrap();
        node.accept = true;
        node.fill_color = Some(NamedColor::Yellow);
        node.stroke_color = NamedColor::Red;
        node.text = "q_0".to_string();

        assert_eq!(
            lines(&scene),
            vec![
                "\\draw [red,fill=yellow] (10.000,-10.000) circle (3.000);",
                "\\draw [red] (10.000,-10.000) circle (2.550);",
                "\\draw (10.00,-10.00) node {$q_0$};",
            ]
        );
    }

    #[test]
    fn test_straight_edge_with_label() {
        let (mut scene, a, b) = two_nodes();
        let edge = scene.connect(a, b).unwrap();
        scene.edge_mut(edge).unwrap().text = "a".to_string();

        assert_eq!(
            lines(&scene),
            vec![
                "\\draw [black] (13.000,-10.000) -- (27.000,-10.000);",
                "\\fill [black] (26.200,-9.500) -- (26.200,-10.500) -- (27.000,-10.000);",
                "\\draw (20.00,-10.50) node [below] {$a$};",
                "\\draw [black] (10.000,-10.000) circle (3.000);",
                "\\draw [black] (30.000,-10.000) circle (3.000);",
            ]
        );
    }

    #[test]
    fn test_arc_edge_angles() {
        let (mut scene, a, b) = two_nodes();
        let edge = scene.connect(a, b).unwrap();
        scene.edge_mut(edge).unwrap().end_arrow = false;
        scene.add_drag_focus(edge.into(), kurbo::Vec2::ZERO);
        scene.drag(Point::new(200.0, 150.0));
        scene.unselect_drag(Point::new(200.0, 150.0));

        assert_eq!(
            lines(&scene)[0],
            "\\draw [black] (27.931,-12.162) arc (-50.62088:-129.37912:12.500);"
        );
    }

    #[test]
    fn test_both_arrowheads_exported() {
        let (mut scene, a, b) = two_nodes();
        let edge = scene.connect(a, b).unwrap();
        scene.edge_mut(edge).unwrap().start_arrow = true;

        let arrows = TikzExporter::new()
            .commands(&scene)
            .into_iter()
            .filter(|command| matches!(command, TikzCommand::Arrowhead { .. }))
            .count();
        assert_eq!(arrows, 2);
    }

    #[test]
    fn test_pending_edge_skipped() {
        let mut scene = Scene::default();
        let a = scene.create_node(Point::new(100.0, 100.0));
        scene.create_edge(a, Point::new(250.0, 250.0)).unwrap();
        assert_eq!(TikzExporter::new().commands(&scene).len(), 1);
    }

    #[test]
    fn test_transparent_stroke() {
        let mut scene = Scene::default();
        let a = scene.create_node(Point::new(0.0, 0.0));
        scene.node_mut(a).unwrap().stroke_color = NamedColor::Transparent;
        assert_eq!(lines(&scene), vec!["\\draw [draw opacity=0] (0.000,0.000) circle (3.000);"]);
    }

    #[test]
    fn test_fixed_never_negative_zero() {
        assert_eq!(Fixed(-0.0001, 3).to_string(), "0.000");
        assert_eq!(Fixed(-0.5, 2).to_string(), "-0.50");
        assert_eq!(Fixed(12.34567, 3).to_string(), "12.346");
    }

    #[test]
    fn test_empty_document() {
        let scene = Scene::new(SceneConfig::default());
        let expected = "\\documentclass[12pt]{article}\n\
            \\usepackage{tikz}\n\
            \n\
            \\begin{document}\n\
            \n\
            \\begin{center}\n\
            \\begin{tikzpicture}[scale=0.2]\n\
            \\tikzstyle{every node}+=[inner sep=0pt]\n\
            \\end{tikzpicture}\n\
            \\end{center}\n\
            \n\
            \\end{document}\n";
        assert_eq!(export(&scene).unwrap(), expected);
    }

    #[test]
    fn test_custom_config() {
        let mut scene = Scene::default();
        scene.create_node(Point::new(100.0, 100.0));
        let exporter = TikzExporter::new().with_config(ExportConfig {
            scale: 1.0,
            picture_scale: 0.5,
        });
        let document = exporter.document(&scene).unwrap();
        assert!(document.contains("\\begin{tikzpicture}[scale=0.5]\n"));
        assert!(document.contains("\\draw [black] (100.000,-100.000) circle (30.000);\n"));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: ExportConfig = serde_json::from_str(r#"{"scale": 0.05}"#).unwrap();
        assert_eq!(config.scale, 0.05);
        assert_eq!(config.picture_scale, 0.2);
    }
}
