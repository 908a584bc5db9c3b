//! terrain_demo - headless host for terrain_stream
//!
//! Drives a `StreamingController` with an in-memory backend along a
//! scripted observer path and logs what the engine does.
//!
//! ```text
//! RUST_LOG=debug terrain_demo --config config/streaming.toml --path circle --ticks 40
//! ```

mod path;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use terrain_stream::{
  HeadlessBackend, SharedObserver, StreamEvent, StreamingBudget, StreamingConfig,
  StreamingController,
};
use web_time::Instant;

use path::{ObserverPath, PathKind};

/// Headless terrain streaming demo.
#[derive(Parser, Debug)]
#[command(name = "terrain_demo")]
#[command(about = "Streams terrain chunks around a scripted observer")]
struct Args {
  /// Streaming config TOML (defaults when omitted).
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Number of timer intervals to simulate.
  #[arg(short, long, default_value_t = 20)]
  ticks: u32,

  /// Observer speed in world units per tick.
  #[arg(short, long, default_value_t = 40.0)]
  speed: f64,

  #[arg(short, long, value_enum, default_value_t = PathKind::Line)]
  path: PathKind,

  /// Override the config's view distance.
  #[arg(long)]
  view_distance: Option<u32>,

  /// Override the config's per-tick creation budget (0 = unlimited).
  #[arg(long)]
  budget: Option<usize>,

  /// Force height displacement on.
  #[arg(long)]
  height: bool,
}

fn main() -> Result<()> {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  let args = Args::parse();
  let config = load_config(&args)?;
  let interval = Duration::from_millis(config.update_interval_ms);
  let path = ObserverPath::new(args.path, args.speed);

  let observer = SharedObserver::at(path.position(0));
  let mut controller = StreamingController::new(config, HeadlessBackend::new(), observer.clone())
    .context("creating streaming controller")?;
  let events = controller.subscribe();

  let started = Instant::now();
  let report = controller.start().context("starting terrain streaming")?;
  log::info!("initial window: {} chunks", report.loaded.len());

  for step in 1..=args.ticks {
    observer.set(path.position(step));
    // One full interval per step, so every update is a tick.
    if let Some(report) = controller.update(interval) {
      if !report.skipped {
        log::info!(
          "step {step}: observer {:?} +{} -{} failed={} deferred={}",
          report.observer,
          report.loaded.len(),
          report.unloaded.len(),
          report.failed.len(),
          report.deferred
        );
      }
    }
  }

  let mut loaded_events = 0usize;
  let mut unloaded_events = 0usize;
  for event in events.try_iter() {
    match event {
      StreamEvent::ChunkLoaded { .. } => loaded_events += 1,
      StreamEvent::ChunkUnloaded { .. } => unloaded_events += 1,
      StreamEvent::ChunkFailed { coord, reason } => log::warn!("chunk {coord} failed: {reason}"),
      _ => {}
    }
  }

  let stats = controller.stats();
  log::info!(
    "{} ticks in {:.1}ms: loaded={} disposed={} active={} failed={}/{} (events +{} -{})",
    stats.ticks,
    started.elapsed().as_secs_f64() * 1000.0,
    stats.chunks_loaded,
    stats.chunks_disposed,
    stats.active_chunks,
    stats.failed_creations,
    stats.creation_attempts,
    loaded_events,
    unloaded_events
  );

  #[cfg(feature = "metrics")]
  {
    let timings = controller.tick_metrics();
    let (min_us, max_us) = timings.tick_timings.min_max().unwrap_or_default();
    log::info!(
      "avg tick {:.1}us (min {min_us}us, max {max_us}us), avg geometry {:.1}us",
      timings.avg_tick_us(),
      timings.avg_geometry_us()
    );
  }

  controller.shutdown();
  let backend = controller.backend();
  if backend.live_meshes() != 0 || backend.live_materials() != 0 {
    bail!(
      "leak after shutdown: {} meshes, {} materials",
      backend.live_meshes(),
      backend.live_materials()
    );
  }
  log::info!("shutdown clean");

  Ok(())
}

fn load_config(args: &Args) -> Result<StreamingConfig> {
  let mut config = match &args.config {
    Some(path) => StreamingConfig::load(path)
      .with_context(|| format!("loading config {}", path.display()))?,
    None => StreamingConfig::default(),
  };

  if let Some(view_distance) = args.view_distance {
    config = config.with_view_distance(view_distance);
  }
  if let Some(budget) = args.budget {
    config = config.with_budget(StreamingBudget::with_max_creates(budget));
  }
  if args.height {
    config.height.enabled = true;
  }

  config.validate()?;
  Ok(config)
}
