use crate::config::{Direction, load_config};
use crate::layout::compute_layout;
use crate::model::{TieredGraph, TieredLayout};
use anyhow::Result;
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "tierlay", version, about = "Layered layout for category/subcategory/node graphs")]
pub struct Args {
    /// Input graph (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Layout direction (TB or LR), overrides the config file
    #[arg(short = 'd', long = "direction", value_parser = parse_direction)]
    pub direction: Option<Direction>,

    /// Pretty-print the JSON output
    #[arg(long = "pretty")]
    pub pretty: bool,
}

fn parse_direction(token: &str) -> std::result::Result<Direction, String> {
    Direction::from_token(token).ok_or_else(|| format!("unknown direction {token:?}, expected TB or LR"))
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(direction) = args.direction {
        config.direction = direction;
    }

    let input = read_input(args.input.as_deref())?;
    let graph: TieredGraph = serde_json::from_str(&input)?;
    let layout = compute_layout(&graph, &config)?;
    if !layout.dropped_relationships.is_empty() {
        eprintln!(
            "warning: {} relationship(s) dropped (unknown subcategory name)",
            layout.dropped_relationships.len()
        );
    }

    let rendered = render_json(&layout, args.pretty)?;
    write_output(&rendered, args.output.as_deref())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn render_json(layout: &TieredLayout, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(layout)?
    } else {
        serde_json::to_string(layout)?
    };
    Ok(rendered)
}

fn write_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, rendered)?;
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}
