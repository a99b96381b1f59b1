//! Command-line argument definitions for the Baudetail CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Besides input/output paths, configuration and logging, the
//! arguments replay a handful of viewer interactions before the snapshot is
//! taken.

use clap::Parser;

/// Command-line arguments for the Baudetail snapshot tool
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the diagram payload (JSON)
    #[arg(help = "Path to the input payload")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Category to filter by
    #[arg(long)]
    pub category: Option<String>,

    /// Failure scenario to highlight
    #[arg(long)]
    pub scenario: Option<String>,

    /// Part to select and show in the info panel
    #[arg(long)]
    pub select: Option<String>,

    /// Part to hover, showing its tooltip
    #[arg(long)]
    pub hover: Option<String>,

    /// Zoom level (clamped to 0.5..=3.0)
    #[arg(long)]
    pub zoom: Option<f32>,

    /// Pan offset as X,Y
    #[arg(long, value_parser = parse_pan, allow_hyphen_values = true)]
    pub pan: Option<(f32, f32)>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

fn parse_pan(value: &str) -> Result<(f32, f32), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got `{value}`"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f32>()
            .map_err(|err| format!("invalid pan component `{part}`: {err}"))
    };
    Ok((parse(x)?, parse(y)?))
}
