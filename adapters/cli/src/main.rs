#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays an LED Defence session headlessly.

mod frames;
mod maps;
mod runner;
mod scenario;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use led_defence_core::MapDefinition;
use led_defence_rendering::{render, FrameSink, PixelGrid};
use led_defence_system_spawning::Config as WaveConfig;
use led_defence_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{frames::PpmDirectory, runner::Runner, scenario::Scenario};

/// Plays an LED Defence session without a display and prints its outcome.
#[derive(Debug, Parser)]
#[command(name = "led-defence", version)]
struct Args {
    /// Bundled map name (forest-path, desert-straight) or a JSON map file.
    #[arg(long, default_value = "forest-path")]
    map: String,

    /// TOML file with tower, enemy and ability orders.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Where the waves come from.
    #[arg(long, value_enum, default_value_t = WaveSource::Map)]
    waves: WaveSource,

    /// Seed for generated wave rosters.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Simulated milliseconds per step.
    #[arg(long, default_value_t = 33, value_parser = clap::value_parser!(u64).range(1..))]
    timestep_ms: u64,

    /// Upper bound on simulated seconds.
    #[arg(long, default_value_t = 600.0)]
    max_seconds: f32,

    /// Directory receiving rendered frames as PPM images.
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Render every n-th step when writing frames.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    frame_every: u32,

    /// File receiving the session report as JSON.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log wave spawns and combat details.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum WaveSource {
    /// Waves generated from the map's enemy counts.
    Map,
    /// The hand-written demonstration waves.
    Demo,
    /// No waves; only scenario orders.
    None,
}

impl WaveSource {
    fn config(self, map: &MapDefinition, seed: u64) -> WaveConfig {
        match self {
            Self::Map => WaveConfig::from_counts(&map.waves, seed),
            Self::Demo => WaveConfig::demo(),
            Self::None => WaveConfig::new(Vec::new()),
        }
    }
}

/// Entry point for the LED Defence command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let map = maps::load(&args.map)?;
    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    let limit = Duration::try_from_secs_f32(args.max_seconds)
        .with_context(|| format!("invalid --max-seconds {}", args.max_seconds))?;
    let dt = Duration::from_millis(args.timestep_ms);

    info!(map = %map.name, waves = ?args.waves, seed = args.seed, "session starting");
    let mut runner = Runner::new(
        &map,
        scenario.session_config(map.width),
        args.waves.config(&map, args.seed),
        scenario.timeline()?,
    );

    let mut frames = args
        .frames
        .as_deref()
        .map(PpmDirectory::create)
        .transpose()?;
    let mut grid = PixelGrid::new(map.width, map.height)?;

    let mut steps: u64 = 0;
    while !runner.is_finished() && query::elapsed(runner.world()) < limit {
        runner.step(dt);
        steps += 1;

        if let Some(sink) = frames.as_mut() {
            if steps % u64::from(args.frame_every) == 0 {
                render(&runner.scene(), &mut grid);
                sink.present(&grid, query::elapsed(runner.world()))?;
            }
        }
    }
    if let Some(sink) = &frames {
        info!(frames = sink.written(), "frames written");
    }

    if let Some(path) = &args.report {
        let file = File::create(path)
            .with_context(|| format!("failed to create report {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, runner.report())
            .with_context(|| format!("failed to write report {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("failed to flush report {}", path.display()))?;
    }

    print_summary(&map, &runner);
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(map: &MapDefinition, runner: &Runner) {
    let economy = query::economy(runner.world());
    let report = runner.report();

    println!("Map: {}", map.name);
    println!("Simulated: {:.1}s", report.elapsed.as_secs_f32());
    println!("Waves announced: {}", report.waves_announced);
    println!(
        "Score: {}  Money: {}  Lives: {}",
        economy.score, economy.money, economy.lives
    );
    println!(
        "Kills: {}  Escapes: {}  Splits: {}",
        report.total_kills(),
        report.escapes,
        report.splits
    );
    match report.accuracy() {
        Some(accuracy) => println!(
            "Shots: {}  Accuracy: {:.0}%",
            report.shots_fired,
            accuracy * 100.0
        ),
        None => println!("Shots: {}", report.shots_fired),
    }
    if economy.session_over {
        println!("Game over");
    }
}
