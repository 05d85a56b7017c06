//! Touch Designer CLI
//!
//! Usage:
//!   touch-designer [OPTIONS] <PROJECT>
//!
//! Options:
//!   -s, --snapshot <FILE>  Live entity states (JSON map of entity id to state)
//!   -p, --page <ID>        Page to project (defaults to the first page)
//!   -c, --config <FILE>    Engine configuration (TOML format)
//!       --svg              Print an SVG wireframe instead of projection JSON
//!   -d, --debug            Debug logging; the SVG shows ids and hidden widgets
//!   -h, --help             Print help

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use touch_designer::{
    project_document, render_svg, Document, DocumentError, EngineConfig, PreviewConfig, Snapshot,
};

#[derive(Parser)]
#[command(name = "touch-designer")]
#[command(about = "Project touch-screen dashboard pages with live entity states")]
struct Cli {
    /// Project document (JSON)
    project: PathBuf,

    /// Live entity states (JSON map of entity id to {state, attributes})
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Page to project (defaults to the first page)
    #[arg(short, long)]
    page: Option<String>,

    /// Engine configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print an SVG wireframe instead of projection JSON
    #[arg(long)]
    svg: bool,

    /// Debug mode: verbose logging, widget ids and hidden widgets in the SVG
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => match EngineConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let source = match fs::read_to_string(&cli.project) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", cli.project.display(), e);
            std::process::exit(1);
        }
    };
    let doc = match Document::from_json(&source) {
        Ok(doc) => doc,
        Err(e) => {
            let filename = cli.project.display().to_string();
            match e {
                DocumentError::Io(_) => eprintln!("Error: {}", e),
                _ => eprint!("{}", e.format(&source, &filename)),
            }
            std::process::exit(1);
        }
    };

    let snapshot = match &cli.snapshot {
        Some(path) => match load_snapshot(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading snapshot '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Snapshot::new(),
    };

    let projection = match project_document(&doc, cli.page.as_deref(), &snapshot, &config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.svg {
        let preview = PreviewConfig::new()
            .with_palette(doc.palette.clone())
            .with_debug(cli.debug);
        println!("{}", render_svg(&projection, &preview));
        return;
    }

    match serde_json::to_string_pretty(&projection) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Read a snapshot file; a batch response (`{"states": {...}}`) is accepted too
fn load_snapshot(path: &Path) -> Result<Snapshot, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let mut value: serde_json::Value = serde_json::from_str(&content)?;
    if let Some(states) = value.get_mut("states").map(serde_json::Value::take) {
        value = states;
    }
    Ok(serde_json::from_value(value)?)
}
