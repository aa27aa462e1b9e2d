use anyhow::Result;
use clap::Parser;
use lj_sim::app::{self, simulation_loop::LoopOptions};
use lj_sim::config::SimConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// 2D Lennard-Jones fluid with a text label, driven from the terminal.
///
/// Keys (type and press enter): `space` pause, `t` thermostat on/off,
/// `m` thermostat mode, `+`/`-` speed, `r` reset.
#[derive(Parser, Debug)]
struct Args {
    /// TOML file overriding the built-in parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(short, long)]
    frames: Option<u64>,

    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Draw frames as text on stdout
    #[arg(long)]
    ascii: bool,

    /// Advance the clock by one frame period per frame instead of pacing
    /// against the wall clock
    #[arg(long)]
    fast: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => SimConfig::load_from_file(path)?,
        None => SimConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let options = LoopOptions {
        fps: args.fps,
        max_frames: args.frames,
        realtime: !args.fast,
        log_every: args.fps.max(1.0).round() as u64,
    };
    app::run(config, options, args.ascii)
}
