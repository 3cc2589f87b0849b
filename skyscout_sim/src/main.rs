//! SkyScout Simulator CLI
//!
//! Runs a drone search and writes one terrain frame per move.

use clap::Parser;
use skyscout_sim::{
    Coordinator, FrameWriter, NullSink, RunOutcome, RunStatus, ScenarioId, Schedule, SimConfig,
    SimError,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "config.txt";

/// SkyScout drone search simulator
#[derive(Parser, Debug)]
#[command(name = "skyscout-sim")]
#[command(about = "Simulate drones searching a grid for a hidden target", long_about = None)]
struct Args {
    /// Config file (key=value: width, height, numberDrones, ...)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<i32>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<i32>,

    /// Number of drones (overrides the config file)
    #[arg(short, long)]
    drones: Option<usize>,

    /// Master seed for determinism (0 = random from time)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Turn ceiling before the run is declared inconclusive
    #[arg(long)]
    max_iterations: Option<u64>,

    /// Obstacle density for random terrain (0.0 - 1.0)
    #[arg(long)]
    density: Option<f64>,

    /// Run each drone on its own thread
    #[arg(short, long)]
    parallel: bool,

    /// Terrain layout (random, open_field, corridor, enclosed)
    #[arg(short = 'S', long, default_value = "random")]
    scenario: ScenarioId,

    /// Directory for per-move terrain frames
    #[arg(long, default_value = "frames")]
    frames: PathBuf,

    /// Do not write frames
    #[arg(long)]
    no_frames: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging (RUST_LOG wins over --verbose)
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(&args) {
        Ok(outcome) => {
            report(&outcome, args.json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<RunOutcome, SimError> {
    let config = resolve_config(args)?;

    info!("SkyScout Simulator v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Scenario: {} ({}) | {}x{} | {} drones | seed {}",
        args.scenario,
        args.scenario.description(),
        config.width,
        config.height,
        config.num_drones,
        config.seed
    );

    let mut coordinator = Coordinator::from_scenario(config, args.scenario)?;

    if args.no_frames {
        coordinator.run(&mut NullSink)
    } else {
        let mut writer = FrameWriter::create(&args.frames)?;
        let outcome = coordinator.run(&mut writer)?;
        info!("Wrote {} frames to {}", outcome.frames, writer.dir().display());
        Ok(outcome)
    }
}

/// Builds the run config: file values first, then CLI overrides.
fn resolve_config(args: &Args) -> Result<SimConfig, SimError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => SimConfig::from_file(DEFAULT_CONFIG)?,
        None => SimConfig::default(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(drones) = args.drones {
        config.num_drones = drones;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.max_iterations = max_iterations;
    }
    if let Some(density) = args.density {
        config.obstacle_density = density;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.parallel {
        config.schedule = Schedule::Parallel;
    }

    // Determine base seed
    if config.seed == 0 {
        config.seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
    }

    config.validate()?;
    Ok(config)
}

fn report(outcome: &RunOutcome, json: bool) {
    if json {
        match serde_json::to_string_pretty(outcome) {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Failed to encode outcome: {}", e),
        }
        return;
    }

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    match outcome.status {
        RunStatus::TargetFound { winner } => info!(
            "✅ Drone {} found the target at {} after {} turns ({} moves)",
            winner, outcome.target, outcome.iterations, outcome.frames
        ),
        RunStatus::IterationLimit => info!(
            "⏱ Stopped after {} turns without finding the target at {}",
            outcome.iterations, outcome.target
        ),
        RunStatus::Deadlocked => info!(
            "⛔ Every drone is blocked after {} turns; target at {} unreachable",
            outcome.iterations, outcome.target
        ),
    }
    if outcome.failed_turns > 0 {
        info!("{} turns failed and were skipped", outcome.failed_turns);
    }
}
