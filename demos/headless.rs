use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use unibots::*;

/// Run the robot universe without graphics.
#[derive(Parser, Debug)]
#[command(name = "universe")]
struct Args {
    /// TOML config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of pixels in each robot's sensor.
    #[arg(short = 'c')]
    pixels: Option<usize>,
    /// Sensor field of view in degrees.
    #[arg(short = 'f')]
    fov: Option<f64>,
    /// Population size.
    #[arg(short = 'p')]
    population: Option<usize>,
    /// Sensor range.
    #[arg(short = 'r')]
    range: Option<f64>,
    /// Side length of the square world.
    #[arg(short = 's')]
    world_size: Option<f64>,
    /// Updates to run before quitting; 0 runs until interrupted.
    #[arg(short = 'u')]
    updates: Option<u64>,
    /// Milliseconds to sleep between updates.
    #[arg(short = 'z', default_value_t = 0)]
    sleep_ms: u64,
    /// Quiet: only warnings and errors.
    #[arg(short = 'q')]
    quiet: bool,
}

fn main() -> Result<(), UniverseError> {
    let args = Args::parse();
    init_tracing(args.quiet);

    let mut config = match &args.config {
        Some(path) => UniverseConfig::load(path)?,
        None => UniverseConfig::default(),
    };
    if let Some(v) = args.pixels {
        config.pixel_count = v;
    }
    if let Some(v) = args.fov {
        config.fov_degrees = v;
    }
    if let Some(v) = args.population {
        config.population = v;
    }
    if let Some(v) = args.range {
        config.range = v;
    }
    if let Some(v) = args.world_size {
        config.world_size = v;
    }
    if let Some(v) = args.updates {
        config.updates_max = v;
    }
    let pause = Duration::from_millis(args.sleep_ms);

    let mut universe = Universe::new(config)?;
    universe.scatter_seeded();
    info!(config = ?universe.config(), "starting universe");

    let step = universe.config().world_size * 0.005;
    let params = *universe.sensor_params();
    let mut wander = |_id: RobotId, robot: &mut Robot| {
        // turn away from whatever is nearest, otherwise drift straight
        let nearest = robot
            .detections()
            .min_by(|a, b| a.1.range.total_cmp(&b.1.range))
            .map(|(i, _)| i);
        let turn = match nearest {
            Some(i) => {
                let (start, end) = params.wedge(i);
                -0.1 * ((start + end) / 2.0).signum()
            }
            None => 0.0,
        };
        robot.speed = Speed { forward: step, turn };
    };

    let mut total_detections = 0;
    while let StepOutcome::Ran(stats) = universe.step(&mut wander) {
        total_detections += stats.detections;
        if !pause.is_zero() {
            thread::sleep(pause);
        }
    }
    info!(
        updates = universe.updates(),
        total_detections,
        "finished"
    );
    Ok(())
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
