//! Command line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "warpfield")]
#[command(about = "A warp-speed starfield for your terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the animation full screen (default)
    Run(RunArgs),
    /// Run the field headless and report statistics
    Simulate(SimulateArgs),
    /// Write a config file with the current settings
    InitConfig,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Skip the intro and cruise at this speed
    #[arg(long)]
    pub speed: Option<f64>,

    /// Random seed for a reproducible field
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    /// Number of frames to run
    #[arg(long, default_value_t = 1000)]
    pub frames: u64,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 800.0)]
    pub width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 600.0)]
    pub height: f64,

    /// Depth removed per frame
    #[arg(long, default_value_t = 1.0)]
    pub speed: f64,

    /// Particle count (defaults to the configured count)
    #[arg(long)]
    pub count: Option<usize>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
