mod app;
mod event;
mod script;

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use serde::Deserialize;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

use flaneur_engine::EngineConfig;
use flaneur_world::{WorldIndex, WorldSnapshot};

use crate::app::{App, AppOptions};
use crate::script::Script;

/// Headless first-person stroll through a grid city: replays a scripted
/// input timeline through the locomotion engine and reports the camera pose.
#[derive(Parser, Debug)]
#[command(name = "flaneur")]
struct Args {
    /// World snapshot TOML
    #[arg(long, default_value = "assets/worlds/downtown.toml")]
    world: PathBuf,
    /// Input timeline replayed into the engine
    #[arg(long, default_value = "assets/scripts/stroll.toml")]
    script: PathBuf,
    /// Simulation tick rate, Hz
    #[arg(long, default_value_t = 60.0)]
    tick_hz: f32,
    /// Seconds of simulated time to run
    #[arg(long, default_value_t = 30.0)]
    duration: f32,
    /// Pace ticks to the wall clock instead of fast-forwarding
    #[arg(long)]
    realtime: bool,
    /// Rebuild the world index when the world file changes on disk
    #[arg(long)]
    watch_world: bool,
    /// Report the pose every N ticks (0 disables the cadence)
    #[arg(long, default_value_t = 60)]
    report_every: u64,
    /// Viewport aspect ratio used for pick rays
    #[arg(long, default_value_t = 16.0 / 9.0)]
    aspect: f32,
    /// Log verbosity: off, error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
    /// Mirror the full log into this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// The `[engine]` table of the world file.
#[derive(Deserialize, Default)]
struct EngineDoc {
    #[serde(default)]
    engine: EngineConfig,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = init_logging(&args) {
        eprintln!("logging setup failed: {}", e);
    }
    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        args.log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &args.log_file {
        loggers.push(WriteLogger::new(
            LevelFilter::Trace,
            Config::default(),
            fs::File::create(path)?,
        ));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let raw = fs::read_to_string(&args.world)?;
    let snapshot: WorldSnapshot = toml::from_str(&raw)?;
    let engine_cfg = toml::from_str::<EngineDoc>(&raw)?.engine;
    let index = WorldIndex::build(&snapshot);
    let script = Script::load_from_path(&args.script)?;
    log::info!(
        target: "sim",
        "world {}: {} cells ({} roads, {} buildings), {} scripted events",
        args.world.display(),
        snapshot.cells.len(),
        index.road_count(),
        index.volumes().len(),
        script.events.len()
    );

    let tick_hz = args.tick_hz.max(1.0);
    let dt = 1.0 / tick_hz;
    let ticks = (args.duration.max(0.0) * tick_hz).ceil() as u64;
    let spawn = (snapshot.spawn[0], snapshot.spawn[1]);
    let mut app = App::new(
        AppOptions {
            world_path: args.world,
            engine: engine_cfg,
            tick_hz,
            aspect: args.aspect,
            report_every: args.report_every,
            watch_world: args.watch_world,
        },
        index,
        spawn,
        script,
    );

    for _ in 0..ticks {
        app.step();
        if args.realtime {
            std::thread::sleep(std::time::Duration::from_secs_f32(dt));
        }
    }
    app.report();
    log::info!(target: "sim", "done: {} ticks simulated ({:.1}s)", ticks, ticks as f32 * dt);
    Ok(())
}
