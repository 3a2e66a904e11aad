#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Hamster Maze experience.

mod config;
mod simulation;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use hamster_maze_rendering::{Palette, Presentation, RenderingBackend};
use hamster_maze_rendering_terminal::TerminalBackend;
use hamster_maze_world::{query, World};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use self::{config::PartialConfig, simulation::Simulation};

/// Guide the hamster through ever faster mazes in your terminal.
#[derive(Debug, Parser)]
#[command(name = "hamster-maze", version)]
struct Cli {
    /// TOML file with game settings; flags override its values
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(flatten)]
    overrides: PartialConfig,
    /// Log verbosity (off, error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    log_level: String,
    /// Terminal redraws per second
    #[arg(long, default_value_t = 30)]
    fps: u32,
    /// Print the resolved configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

/// Entry point for the Hamster Maze command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let file = match &cli.config {
        Some(path) => PartialConfig::load(path)?,
        None => PartialConfig::default(),
    };
    let config = file.merge(cli.overrides).or_defaults();

    if cli.dump_config {
        print!(
            "{}",
            toml::to_string(&config).context("failed to serialise the configuration")?
        );
        return Ok(());
    }

    let world = World::with_config(config).context("invalid game configuration")?;
    let (rows, columns) = (config.rows, config.columns);
    match config.seed {
        Some(seed) => log::info!("starting a {rows}x{columns} game with seed {seed}"),
        None => log::info!("starting a {rows}x{columns} game with an entropy seed"),
    }

    let banner = query::welcome_banner(&world);
    let mut simulation = Simulation::new(world);
    let presentation = Presentation::new(banner, Palette::default(), simulation.scene());

    TerminalBackend::new()
        .with_frame_rate(cli.fps)
        .run(presentation, move |dt, frame, scene| {
            simulation.update(dt, frame, scene);
        })
}

fn init_logging(level: &str) -> Result<()> {
    let level: LevelFilter = level
        .parse()
        .map_err(|_| anyhow!("unknown log level `{level}`"))?;
    SimpleLogger::new()
        .without_timestamps()
        .with_level(level)
        .env()
        .init()
        .map_err(|error| anyhow!("failed to initialise the logger: {error}"))
}
