use futures::executor::block_on;
use lineage_core::LineageConfig;
use lineage_view::{LayoutEngine, SvgRenderOptions, render_svg};
use serde::Serialize;
use std::env;
use std::io::Read;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Lineage(lineage_core::Error),
    View(lineage_view::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Lineage(err) => write!(f, "{err}"),
            CliError::View(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<lineage_core::Error> for CliError {
    fn from(value: lineage_core::Error) -> Self {
        Self::Lineage(value)
    }
}

impl From<lineage_view::Error> for CliError {
    fn from(value: lineage_view::Error) -> Self {
        Self::View(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Normalize,
    Layout,
    Render,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    config: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "lineage-cli\n\
\n\
USAGE:\n\
  lineage-cli [normalize] [--pretty] [--out <path>] [<path>|-]\n\
  lineage-cli layout [--pretty] [--config <path>] [--out <path>] [<path>|-]\n\
  lineage-cli render [--config <path>] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - <path> is a Lineage API response (JSON). If omitted or '-', input is read from stdin.\n\
  - normalize prints the normalized graph; layout prints the positioned graph; render prints SVG.\n\
  - --config takes a JSON object merged onto the built-in settings.\n\
  - Logs go to stderr; set LINEAGE_LOG (e.g. `debug`) and LINEAGE_LOG_FORMAT=json|compact.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "normalize" => args.command = Command::Normalize,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
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

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LINEAGE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let format = env::var("LINEAGE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);
    let _ = match format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
            .try_init(),
        _ => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_config(path: Option<&str>) -> Result<LineageConfig, CliError> {
    match path {
        None => Ok(LineageConfig::default()),
        Some(path) => Ok(LineageConfig::from_json_overrides(&std::fs::read_to_string(
            path,
        )?)?),
    }
}

fn to_json(value: &impl Serialize, pretty: bool) -> Result<String, CliError> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let text = read_input(args.input.as_deref())?;
    let graph = lineage_core::normalize_json(&text)?;
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        truncated = graph.truncated,
        "normalized lineage payload"
    );

    match args.command {
        Command::Normalize => {
            let json = to_json(&graph, args.pretty)?;
            write_text(&json, args.out.as_deref())
        }
        Command::Layout => {
            let engine = LayoutEngine::from_config(&config);
            let positioned = block_on(engine.layout(graph));
            let json = positioned.to_json(args.pretty)?;
            write_text(&json, args.out.as_deref())
        }
        Command::Render => {
            let engine = LayoutEngine::from_config(&config);
            let positioned = block_on(engine.layout(graph));
            let svg = render_svg(&positioned, &config, &SvgRenderOptions::default());
            write_text(&svg, args.out.as_deref())
        }
    }
}

fn main() {
    let args = match parse_args(&env::args().collect::<Vec<_>>()) {
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

    init_tracing();

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
