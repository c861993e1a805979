//! acuity-chart CLI - calibrated visual-acuity chart tool

use std::path::PathBuf;

use acuity_chart::ChartConfig;
use acuity_chart::calibration::DEFAULT_VIEWING_DISTANCE_FT;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

mod commands;

/// Calibrated visual-acuity chart tool.
#[derive(Parser)]
#[command(name = "acuity-chart")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file
    #[arg(long, global = true, env = "ACUITY_CHART_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Inputs shared by every command that needs a calibration.
#[derive(Args, Debug, Clone)]
pub struct CalibrationArgs {
    /// Pixel width that matches a credit card held against the screen
    #[arg(long)]
    card_width: Option<u32>,

    /// Viewing distance in feet
    #[arg(long, default_value_t = DEFAULT_VIEWING_DISTANCE_FT)]
    distance_ft: f64,

    /// Screen width in pixels (informational)
    #[arg(long, default_value_t = 1920)]
    screen_width: u32,

    /// Screen height in pixels (informational)
    #[arg(long, default_value_t = 1080)]
    screen_height: u32,

    /// Device pixel ratio (informational; picks the default card width)
    #[arg(long, default_value_t = 1.0)]
    pixel_density: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute and print a calibration record
    Calibrate {
        #[command(flatten)]
        calibration: CalibrationArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print letter sizes for every chart line
    Chart {
        #[command(flatten)]
        calibration: CalibrationArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run an interactive session reading commands from stdin
    Session {
        #[command(flatten)]
        calibration: CalibrationArgs,

        /// Start with narrow-viewport rules enabled
        #[arg(long)]
        narrow: bool,
    },
}

fn load_config(path: Option<&PathBuf>, verbose: bool) -> Result<ChartConfig> {
    let Some(path) = path else {
        return Ok(ChartConfig::default());
    };
    if verbose {
        eprintln!("Loading config from: {}", path.display());
    }
    ChartConfig::load(path).with_context(|| format!("Failed to load config {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = load_config(cli.config.as_ref(), cli.verbose)?;

    match cli.command {
        Commands::Calibrate { calibration, json } => {
            commands::calibrate::run(&calibration, json, cli.verbose)
        }
        Commands::Chart { calibration, json } => {
            commands::chart::run(&calibration, config, json, cli.verbose)
        }
        Commands::Session { calibration, narrow } => {
            commands::session::run(&calibration, config, narrow, cli.verbose)
        }
    }
}
