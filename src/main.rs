//! CLI entry point: parses a markup file and any number of stylesheets,
//! runs the cascade/render-tree/layout pipeline, and writes the reference
//! renderer's text description of the result to stdout.
//!
//! Grounded in `main.py`'s `construct_layout_tree`/CLI argument shape, with
//! `argparse`'s `--html`/`--css` traded for a small hand-rolled parser —
//! this workspace carries no CLI-parsing dependency.

use std::fmt;
use std::fs;
use std::io;
use std::process::ExitCode;

use css::{attach_styles, Cssom};
use layout::{compute_layout, construct_render_tree, MetricsFont};
use render::render_to_text;

/// Baseline tag defaults ingested before any file the user supplies, so a
/// page that never sets `display` on `div`/`p`/`span` etc. still lays out
/// sensibly. Prepended to every run, same role as the original's
/// `agent.css`.
const USER_AGENT_STYLESHEET: &str = "
html { display: block; position: relative; }
body { display: block; margin-left: 8px; margin-right: 8px; margin-top: 8px; margin-bottom: 8px; }
div { display: block; }
p { display: block; margin-top: 8px; margin-bottom: 8px; }
h1 { display: block; font-size: 32px; font-weight: bold; margin-top: 16px; margin-bottom: 16px; }
h2 { display: block; font-size: 24px; font-weight: bold; margin-top: 14px; margin-bottom: 14px; }
ul { display: block; margin-top: 8px; margin-bottom: 8px; }
li { display: block; }
span { display: inline; }
a { display: inline; color: #0000ee; }
b { display: inline; font-weight: bold; }
i { display: inline; font-style: italic; }
";

const DEFAULT_WINDOW_WIDTH: i32 = 1000;
const DEFAULT_WINDOW_HEIGHT: i32 = 600;

#[derive(Debug)]
enum CliError {
    MissingFile(String),
    Usage(String),
    Io(String, io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::MissingFile(path) => write!(f, "cannot find {path}"),
            CliError::Usage(message) => write!(f, "{message}"),
            CliError::Io(path, err) => write!(f, "failed to read {path}: {err}"),
        }
    }
}

impl std::error::Error for CliError {}

struct Args {
    html: String,
    css: Vec<String>,
}

/// Parses `--html <path>` and any number of `--css <path>` flags, mirroring
/// the upstream's `argparse` shape without pulling in a parsing crate.
fn parse_args(mut argv: impl Iterator<Item = String>) -> Result<Args, CliError> {
    let mut html = None;
    let mut css = Vec::new();
    argv.next(); // skip argv[0]
    while let Some(flag) = argv.next() {
        match flag.as_str() {
            "--html" => {
                let path = argv
                    .next()
                    .ok_or_else(|| CliError::Usage("--html requires a path".to_string()))?;
                html = Some(path);
            }
            "--css" => {
                let path = argv
                    .next()
                    .ok_or_else(|| CliError::Usage("--css requires a path".to_string()))?;
                css.push(path);
            }
            other => {
                return Err(CliError::Usage(format!("unrecognized argument `{other}`")));
            }
        }
    }
    Ok(Args {
        html: html.unwrap_or_else(|| "index.html".to_string()),
        css,
    })
}

fn window_dimension(env_var: &str, default: i32) -> i32 {
    std::env::var(env_var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn run(args: Args) -> Result<String, CliError> {
    if !std::path::Path::new(&args.html).exists() {
        return Err(CliError::MissingFile(args.html.clone()));
    }
    for path in &args.css {
        if !std::path::Path::new(path).exists() {
            return Err(CliError::MissingFile(path.clone()));
        }
    }

    let html_source = fs::read_to_string(&args.html).map_err(|e| CliError::Io(args.html.clone(), e))?;
    let mut doc = html::parse(&html_source);

    let mut cssom = Cssom::new();
    cssom.ingest(USER_AGENT_STYLESHEET);
    for path in &args.css {
        let css_source = fs::read_to_string(path).map_err(|e| CliError::Io(path.clone(), e))?;
        cssom.ingest(&css_source);
    }
    attach_styles(&mut doc, &cssom);

    let tree = construct_render_tree(&mut doc).map_err(|e| CliError::Usage(e.to_string()))?;

    let width = window_dimension("BROWSER_WINDOW_WIDTH", DEFAULT_WINDOW_WIDTH);
    let height = window_dimension("BROWSER_WINDOW_HEIGHT", DEFAULT_WINDOW_HEIGHT);
    let metrics = MetricsFont;
    let computed =
        compute_layout(&doc, &tree, &metrics, width, height).map_err(|e| CliError::Usage(e.to_string()))?;

    let mut out = Vec::new();
    render_to_text(&doc, &tree, &computed, &mut out).map_err(|e| CliError::Usage(e.to_string()))?;
    Ok(String::from_utf8(out).expect("reference renderer only ever writes UTF-8 text"))
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args(std::env::args()) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
