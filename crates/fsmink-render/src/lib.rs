//! FsmInk Render Library
//!
//! Renderer abstraction for FsmInk scenes, a recording display-list backend
//! and the TikZ exporter.

mod display_list;
mod renderer;
pub mod tikz;

pub use display_list::{DisplayList, DrawCommand};
pub use renderer::{Painter, RenderContext, RenderResult, Renderer, RendererError, paint_scene};
pub use tikz::{ExportConfig, TikzCommand, TikzExporter, export};
