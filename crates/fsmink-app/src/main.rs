//! FsmInk command line entry point.
//!
//! Loads a scene document (JSON) and either exports it as a TikZ document or
//! prints a summary of the draw calls one frame of it produces.

use fsmink_core::{Scene, SceneConfig, SceneError};
use fsmink_render::{DisplayList, ExportConfig, RenderContext, Renderer, RendererError, TikzExporter};
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(&'static str),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
    #[error("Render error: {0}")]
    Render(#[from] RendererError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Command {
    #[default]
    Export,
    Render,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    out: Option<String>,
    scale: Option<f64>,
    picture_scale: Option<f64>,
}

fn usage() -> &'static str {
    "fsmink\n\
\n\
USAGE:\n\
  fsmink [export] [--config <scene-config.json>] [--scale <n>] [--picture-scale <n>] [--out <path>] [<scene.json>|-]\n\
  fsmink render [--config <scene-config.json>] [<scene.json>|-]\n\
\n\
NOTES:\n\
  - If <scene.json> is omitted or '-', input is read from stdin.\n\
  - export prints the LaTeX document to stdout unless --out is given.\n\
  - render prints how many draw calls of each kind one frame takes.\n\
  - Set RUST_LOG=debug for diagnostics.\n\
"
}

fn parse_positive(value: Option<&String>) -> Result<f64, CliError> {
    let value = value
        .and_then(|v| v.parse::<f64>().ok())
        .ok_or(CliError::Usage(usage()))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CliError::Usage(usage()))
    }
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "export" => args.command = Command::Export,
            "render" => args.command = Command::Render,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--out" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(path.clone());
            }
            "--scale" => args.scale = Some(parse_positive(it.next())?),
            "--picture-scale" => args.picture_scale = Some(parse_positive(it.next())?),
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_scene(args: &Args) -> Result<Scene, CliError> {
    let config = match &args.config {
        Some(path) => SceneConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => SceneConfig::default(),
    };
    let text = read_input(args.input.as_deref())?;
    let scene = Scene::from_json(&text, config)?;
    log::info!(
        "Loaded scene with {} nodes and {} edges",
        scene.node_count(),
        scene.edge_count()
    );
    Ok(scene)
}

fn run(args: Args) -> Result<(), CliError> {
    let scene = load_scene(&args)?;

    match args.command {
        Command::Export => {
            let mut config = ExportConfig::default();
            if let Some(scale) = args.scale {
                config.scale = scale;
            }
            if let Some(picture_scale) = args.picture_scale {
                config.picture_scale = picture_scale;
            }
            let document = TikzExporter::new().with_config(config).document(&scene)?;
            match &args.out {
                Some(path) => {
                    std::fs::write(path, document)?;
                    log::info!("Wrote {path}");
                }
                None => print!("{document}"),
            }
        }
        Command::Render => {
            let mut list = DisplayList::new();
            list.build_scene(&RenderContext::new(&scene).with_caret(false));
            print!("{list}");
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        log::error!("{err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("fsmink")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_defaults_to_export_from_stdin() {
        let args = parse_args(&argv(&[])).unwrap();
        assert_eq!(args.command, Command::Export);
        assert!(args.input.is_none());
    }

    #[test]
    fn test_export_options() {
        let args = parse_args(&argv(&[
            "export",
            "--scale",
            "0.05",
            "--picture-scale",
            "0.3",
            "--out",
            "fsm.tex",
            "scene.json",
        ]))
        .unwrap();
        assert_eq!(args.scale, Some(0.05));
        assert_eq!(args.picture_scale, Some(0.3));
        assert_eq!(args.out.as_deref(), Some("fsm.tex"));
        assert_eq!(args.input.as_deref(), Some("scene.json"));
    }

    #[test]
    fn test_render_command() {
        let args = parse_args(&argv(&["render", "--config", "cfg.json", "-"])).unwrap();
        assert_eq!(args.command, Command::Render);
        assert_eq!(args.config.as_deref(), Some("cfg.json"));
        assert_eq!(args.input.as_deref(), Some("-"));
    }

    #[test]
    fn test_usage_errors() {
        for bad in [
            &["--scale"][..],
            &["--scale", "0"],
            &["--scale", "abc"],
            &["--bogus"],
            &["a.json", "b.json"],
            &["--help"],
        ] {
            assert!(
                matches!(parse_args(&argv(bad)), Err(CliError::Usage(_))),
                "{bad:?} should be a usage error"
            );
        }
    }
}
