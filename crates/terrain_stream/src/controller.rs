//! StreamingController - keeps a square window of terrain chunks resident
//! around a moving observer.
//!
//! # Tick
//!
//! ```text
//!  observer position
//!        │ world_to_chunk (floor)
//!        ▼
//!  observer chunk ── unchanged and nothing outstanding? ──► early return
//!        │
//!        ▼
//!  required = window(observer, view_distance)      (2·vd+1)² coords
//!        │
//!        ├─► missing = required \ active
//!        │     nearest first, truncated to the creation budget
//!        │     geometry built in parallel (rayon)
//!        │     backend create, one coordinate at a time
//!        │
//!        └─► evicted = active \ required
//!              disposed through the backend, never budgeted
//!        │
//!        ▼
//!  events + stats
//! ```
//!
//! A coordinate whose creation failed, or that was deferred by the budget,
//! keeps the next tick from returning early, so it is retried even if the
//! observer stands still.
//!
//! # Lifecycle
//!
//! ```text
//!  Idle ── start() ──► Running ── shutdown() ──► Stopped
//!   ▲         │
//!   └─────────┘ no observer yet (retried by update)
//! ```

use std::collections::HashSet;
use std::time::Duration;

use glam::DVec3;
use web_time::Instant;

use crate::active_set::ActiveChunkSet;
use crate::backend::RenderBackend;
use crate::budget::StreamingBudget;
use crate::chunk::{Chunk, ChunkState};
use crate::config::StreamingConfig;
use crate::constants::{window_len, MAX_VIEW_DISTANCE};
use crate::coords::{window, ChunkCoord, CoordinateMapper};
use crate::error::{ConfigError, MaterialError, StreamError, StreamResult};
use crate::events::{EventBus, StreamEvent};
use crate::factory::ChunkFactory;
use crate::height::{sampler_from_config, HeightSampler};
use crate::material::{MaterialArena, MaterialHandle, SharedMaterial};
#[cfg(feature = "metrics")]
use crate::metrics::TickMetrics;
use crate::metrics::StreamStats;
use crate::observer::ObserverSource;
use crate::timer::TickTimer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
  Idle,
  Running,
  Stopped,
}

/// What a single tick did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
  /// Observer chunk the tick ran against. `None` if no tick ran.
  pub observer: Option<ChunkCoord>,
  /// Created this tick, sorted.
  pub loaded: Vec<ChunkCoord>,
  /// Disposed this tick, sorted.
  pub unloaded: Vec<ChunkCoord>,
  /// Creation failed this tick, sorted. Retried next tick.
  pub failed: Vec<ChunkCoord>,
  /// Required coordinates left for a later tick by the creation budget.
  pub deferred: usize,
  /// Early return: observer chunk unchanged and nothing outstanding.
  pub skipped: bool,
}

impl TickReport {
  fn skipped(observer: Option<ChunkCoord>) -> Self {
    Self {
      observer,
      skipped: true,
      ..Default::default()
    }
  }

  /// True if the active set did not change.
  pub fn is_noop(&self) -> bool {
    self.loaded.is_empty() && self.unloaded.is_empty()
  }
}

pub struct StreamingController<B: RenderBackend> {
  config: StreamingConfig,
  mapper: CoordinateMapper,
  factory: ChunkFactory,
  active: ActiveChunkSet,

  backend: B,
  observer: Box<dyn ObserverSource>,

  materials: MaterialArena,
  material: MaterialHandle,
  material_uploaded: bool,

  timer: TickTimer,
  lifecycle: Lifecycle,
  /// `start` was refused for lack of an observer; `update` retries it.
  start_deferred: bool,

  last_observer: Option<ChunkCoord>,
  last_position: Option<DVec3>,
  /// Required but left for a later tick by the budget.
  deferred: HashSet<ChunkCoord>,
  /// Required but failed to build; retried next tick.
  failed: HashSet<ChunkCoord>,

  budget: StreamingBudget,
  stats: StreamStats,
  events: EventBus,
  #[cfg(feature = "metrics")]
  tick_metrics: TickMetrics,
}

impl<B: RenderBackend> StreamingController<B> {
  /// Validate the config and set up an idle controller. Nothing touches the
  /// backend until `start`.
  pub fn new(
    config: StreamingConfig,
    backend: B,
    observer: impl ObserverSource + 'static,
  ) -> StreamResult<Self> {
    config.validate()?;

    let mut materials = MaterialArena::new();
    let material = materials.insert(config.material.clone());

    Ok(Self {
      mapper: CoordinateMapper::new(config.chunk_size),
      factory: ChunkFactory::from_config(&config),
      active: ActiveChunkSet::new(),
      backend,
      observer: Box::new(observer),
      materials,
      material,
      material_uploaded: false,
      timer: TickTimer::from_millis(config.update_interval_ms),
      lifecycle: Lifecycle::Idle,
      start_deferred: false,
      last_observer: None,
      last_position: None,
      deferred: HashSet::new(),
      failed: HashSet::new(),
      budget: config.budget,
      stats: StreamStats::default(),
      events: EventBus::new(),
      #[cfg(feature = "metrics")]
      tick_metrics: TickMetrics::new(),
      config,
    })
  }

  /// Replace the height sampler while keeping the enabled flag. Takes effect
  /// for chunks created afterwards; call `rebuild` to apply it everywhere.
  pub fn with_height_sampler(mut self, sampler: Box<dyn HeightSampler>) -> Self {
    let enabled = self.factory.height_enabled();
    self.factory.set_height(enabled, sampler);
    self
  }

  // ===========================================================================
  // Lifecycle
  // ===========================================================================

  /// Upload the shared material, start the timer and load the first window.
  ///
  /// With no observer available this logs, stays idle and returns
  /// `StreamError::NoObserver`; `update` keeps retrying.
  pub fn start(&mut self) -> StreamResult<TickReport> {
    match self.lifecycle {
      Lifecycle::Running => return Ok(TickReport::skipped(self.last_observer)),
      Lifecycle::Stopped => return Err(StreamError::ShutDown),
      Lifecycle::Idle => {}
    }

    let Some(position) = self.observer.position() else {
      if !self.start_deferred {
        log::warn!("terrain streaming deferred: no observer available");
      }
      self.start_deferred = true;
      return Err(StreamError::NoObserver);
    };

    if !self.material_uploaded {
      let material = self
        .materials
        .get(self.material)
        .ok_or(MaterialError::StaleHandle(self.material))?;
      self.backend.create_material(self.material, material)?;
      self.material_uploaded = true;
    }

    self.start_deferred = false;
    self.lifecycle = Lifecycle::Running;
    self.timer.start();

    log::info!(
      "terrain streaming started: chunk_size={} view_distance={} budget={}",
      self.config.chunk_size,
      self.config.view_distance,
      self.budget.max_creates_per_tick
    );
    self.events.emit(StreamEvent::Ready {
      chunk_size: self.config.chunk_size,
      view_distance: self.config.view_distance,
    });

    Ok(self.tick_at(position, true))
  }

  /// Advance the timer by `dt` and tick when due. While start is deferred
  /// for lack of an observer, each call retries `start` instead.
  pub fn update(&mut self, dt: Duration) -> Option<TickReport> {
    let lifecycle = self.lifecycle;
    match lifecycle {
      Lifecycle::Idle if self.start_deferred => self.start().ok(),
      Lifecycle::Running if self.timer.advance(dt) => Some(self.tick(false)),
      _ => None,
    }
  }

  /// Stop the timer, dispose every chunk, then release the shared material.
  /// Safe to call more than once.
  pub fn shutdown(&mut self) {
    if self.lifecycle == Lifecycle::Stopped {
      return;
    }

    self.timer.stop();
    let disposed = self.release_all();
    for &coord in &disposed {
      self.events.emit(StreamEvent::ChunkUnloaded { coord });
    }

    if self.material_uploaded {
      if !self.backend.dispose_material(self.material) {
        log::warn!("shared material {:?} was already released", self.material);
      }
      self.material_uploaded = false;
    }
    self.materials.remove(self.material);

    self.lifecycle = Lifecycle::Stopped;
    self.start_deferred = false;
    self.deferred.clear();
    self.failed.clear();

    log::info!("terrain streaming shut down, {} chunks disposed", disposed.len());
    self.events.emit(StreamEvent::Shutdown);
  }

  pub fn lifecycle(&self) -> Lifecycle {
    self.lifecycle
  }

  pub fn is_running(&self) -> bool {
    self.lifecycle == Lifecycle::Running
  }

  // ===========================================================================
  // Tick
  // ===========================================================================

  /// Poll the observer and tick. Does nothing unless running.
  pub fn tick(&mut self, force: bool) -> TickReport {
    if !self.is_running() {
      return TickReport::skipped(self.last_observer);
    }
    match self.observer.position() {
      Some(position) => self.tick_at(position, force),
      None => {
        log::debug!("tick skipped: observer unavailable");
        TickReport::skipped(self.last_observer)
      }
    }
  }

  /// Recompute the window for an explicit observer position.
  pub fn tick_at(&mut self, position: DVec3, force: bool) -> TickReport {
    self.run_tick(position, force, Vec::new())
  }

  /// `released` are coordinates already disposed by the caller. They are
  /// reported as unloaded by this tick.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "controller::tick"))]
  fn run_tick(&mut self, position: DVec3, force: bool, released: Vec<ChunkCoord>) -> TickReport {
    if !self.is_running() {
      return TickReport::skipped(self.last_observer);
    }

    let tick_started = Instant::now();
    let observer = self.mapper.position_to_chunk(position);
    self.last_position = Some(position);

    let outstanding = !self.deferred.is_empty() || !self.failed.is_empty();
    if !force && !outstanding && released.is_empty() && self.last_observer == Some(observer) {
      return TickReport::skipped(Some(observer));
    }

    let view_distance = self.config.view_distance;
    let mut required = HashSet::with_capacity(window_len(view_distance));
    required.extend(window(observer, view_distance));

    // Creation: nearest first, within budget.
    let mut missing: Vec<ChunkCoord> = required
      .iter()
      .filter(|coord| !self.active.contains(coord))
      .copied()
      .collect();
    missing.sort_by_key(|coord| {
      (
        coord.chebyshev_distance(observer),
        coord.distance_squared(observer),
        *coord,
      )
    });
    let allowed = self.budget.creations_allowed(missing.len());
    let deferred = missing.split_off(allowed);

    let geometry_started = Instant::now();
    let geometries = self.factory.build_geometries(&missing);
    let geometry_us = geometry_started.elapsed().as_micros() as u64;

    let mut report = TickReport {
      observer: Some(observer),
      unloaded: released,
      deferred: deferred.len(),
      ..Default::default()
    };

    for (coord, geometry) in missing.into_iter().zip(geometries) {
      self.stats.creation_attempts += 1;
      match self
        .factory
        .create(coord, &geometry, &mut self.backend, self.material)
      {
        Ok(chunk) => {
          if let Err(duplicate) = self.active.insert(chunk) {
            log::warn!("chunk {coord} already resident, releasing duplicate");
            self.factory.dispose(duplicate, &mut self.backend);
            continue;
          }
          self.stats.chunks_loaded += 1;
          self.stats.total_created += 1;
          report.loaded.push(coord);
        }
        Err(err) => {
          log::warn!("{err}");
          self.stats.failed_creations += 1;
          self.events.emit(StreamEvent::ChunkFailed {
            coord,
            reason: err.to_string(),
          });
          report.failed.push(coord);
        }
      }
    }

    // Eviction: exact, never budgeted.
    for chunk in self.active.extract_if_not(|coord| required.contains(coord)) {
      let coord = chunk.coord;
      self.factory.dispose(chunk, &mut self.backend);
      self.stats.chunks_disposed += 1;
      report.unloaded.push(coord);
    }

    self.deferred = deferred.into_iter().collect();
    self.failed = report.failed.iter().copied().collect();
    self.last_observer = Some(observer);
    self.stats.active_chunks = self.active.len();
    self.stats.ticks += 1;

    report.loaded.sort_unstable();
    report.unloaded.sort_unstable();
    report.failed.sort_unstable();
    self.emit_tick_events(&report, observer);

    #[cfg(feature = "metrics")]
    self.tick_metrics.record_tick(
      tick_started.elapsed().as_micros() as u64,
      geometry_us,
      report.loaded.len(),
    );

    log::debug!(
      "tick at {observer}: +{} -{} failed={} deferred={} active={} ({}us, geometry {}us)",
      report.loaded.len(),
      report.unloaded.len(),
      report.failed.len(),
      report.deferred,
      self.active.len(),
      tick_started.elapsed().as_micros(),
      geometry_us
    );

    report
  }

  /// Unloads go out before loads, so a coordinate that was rebuilt ends
  /// loaded for per-chunk listeners.
  fn emit_tick_events(&mut self, report: &TickReport, observer: ChunkCoord) {
    for &coord in &report.unloaded {
      self.events.emit(StreamEvent::ChunkUnloaded { coord });
    }
    for &coord in &report.loaded {
      self.events.emit(StreamEvent::ChunkLoaded { coord });
    }
    self.events.emit(StreamEvent::ChunksUpdated {
      loaded: report.loaded.clone(),
      unloaded: report.unloaded.clone(),
      active_count: self.active.len(),
      observer,
    });
  }

  /// Forced tick at the current observer, or the last known position if the
  /// observer is gone.
  fn recompute(&mut self) -> TickReport {
    match self.observer.position().or(self.last_position) {
      Some(position) => self.tick_at(position, true),
      None => TickReport::skipped(self.last_observer),
    }
  }

  /// Dispose every resident chunk without emitting events. Returns the
  /// disposed coordinates, sorted.
  fn release_all(&mut self) -> Vec<ChunkCoord> {
    let chunks: Vec<Chunk> = self.active.drain().collect();
    let mut disposed = Vec::with_capacity(chunks.len());
    for chunk in chunks {
      let coord = chunk.coord;
      self.factory.dispose(chunk, &mut self.backend);
      self.stats.chunks_disposed += 1;
      disposed.push(coord);
    }
    disposed.sort_unstable();
    self.stats.active_chunks = 0;
    disposed
  }

  /// Dispose everything and reload the window with the current factory
  /// settings. The one `ChunksUpdated` this emits lists each rebuilt chunk
  /// as both unloaded and loaded.
  pub fn rebuild(&mut self) -> TickReport {
    if !self.is_running() {
      return TickReport::skipped(self.last_observer);
    }
    let Some(position) = self.observer.position().or(self.last_position) else {
      return TickReport::skipped(self.last_observer);
    };
    let released = self.release_all();
    self.run_tick(position, true, released)
  }

  // ===========================================================================
  // Settings
  // ===========================================================================

  /// Change the window radius and recompute immediately. Radii above
  /// `MAX_VIEW_DISTANCE` are refused and the window is left as it was.
  pub fn set_view_distance(&mut self, view_distance: u32) -> StreamResult<TickReport> {
    if view_distance > MAX_VIEW_DISTANCE {
      return Err(ConfigError::Invalid(format!(
        "view_distance must be at most {MAX_VIEW_DISTANCE}, got {view_distance}"
      ))
      .into());
    }
    self.config.view_distance = view_distance;
    if !self.is_running() {
      return Ok(TickReport::skipped(self.last_observer));
    }
    Ok(self.recompute())
  }

  /// Toggle height displacement and set its amplitude. Every resident chunk
  /// is rebuilt.
  pub fn set_height_variation(&mut self, enabled: bool, scale: f64) -> StreamResult<TickReport> {
    if !scale.is_finite() {
      return Err(ConfigError::Invalid(format!("height scale must be finite, got {scale}")).into());
    }
    self.config.height.enabled = enabled;
    self.config.height.scale = scale;
    self
      .factory
      .set_height(enabled, sampler_from_config(&self.config.height));
    Ok(self.rebuild())
  }

  /// Replace the shared texture. Affects every chunk at once.
  pub fn set_texture(&mut self, texture_url: impl Into<String>, tiling: [f32; 2]) -> StreamResult<()> {
    let previous = self.shared_material()?.clone();
    self.materials.set_texture(self.material, texture_url, tiling)?;
    self.push_material(previous)
  }

  /// Change the shared texture tiling. Affects every chunk at once.
  pub fn set_tiling(&mut self, u: f32, v: f32) -> StreamResult<()> {
    let previous = self.shared_material()?.clone();
    self.materials.set_tiling(self.material, u, v)?;
    self.push_material(previous)
  }

  fn shared_material(&self) -> Result<&SharedMaterial, MaterialError> {
    self
      .materials
      .get(self.material)
      .ok_or(MaterialError::StaleHandle(self.material))
  }

  /// Send the edited material to the backend. If the backend refuses it the
  /// arena goes back to `previous` and the config is left untouched.
  fn push_material(&mut self, previous: SharedMaterial) -> StreamResult<()> {
    let material = self.shared_material()?.clone();
    if self.material_uploaded {
      if let Err(err) = self.backend.update_material(self.material, &material) {
        log::warn!("shared material update rejected: {err}");
        self.materials.replace(self.material, previous)?;
        return Err(err.into());
      }
    }
    self.config.material = material.desc;
    Ok(())
  }

  /// Takes effect on the next tick.
  pub fn set_budget(&mut self, budget: StreamingBudget) {
    self.budget = budget;
    self.config.budget = budget;
  }

  /// Replace the observer source. The next tick polls the new one.
  pub fn set_observer(&mut self, observer: impl ObserverSource + 'static) {
    self.observer = Box::new(observer);
  }

  // ===========================================================================
  // Queries
  // ===========================================================================

  pub fn subscribe(&mut self) -> crossbeam_channel::Receiver<StreamEvent> {
    self.events.subscribe()
  }

  pub fn stats(&self) -> StreamStats {
    self.stats
  }

  #[cfg(feature = "metrics")]
  pub fn tick_metrics(&self) -> &TickMetrics {
    &self.tick_metrics
  }

  /// Resident coordinates, sorted.
  pub fn active_coords(&self) -> Vec<ChunkCoord> {
    let mut coords: Vec<ChunkCoord> = self.active.coords().copied().collect();
    coords.sort_unstable();
    coords
  }

  pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
    self.active.get(&coord)
  }

  pub fn chunk_state(&self, coord: ChunkCoord) -> ChunkState {
    if self.active.contains(&coord) {
      ChunkState::Loaded
    } else if self.deferred.contains(&coord) {
      ChunkState::Pending
    } else {
      ChunkState::NotLoaded
    }
  }

  pub fn last_observer_coord(&self) -> Option<ChunkCoord> {
    self.last_observer
  }

  pub fn view_distance(&self) -> u32 {
    self.config.view_distance
  }

  pub fn budget(&self) -> StreamingBudget {
    self.budget
  }

  pub fn config(&self) -> &StreamingConfig {
    &self.config
  }

  pub fn mapper(&self) -> &CoordinateMapper {
    &self.mapper
  }

  pub fn material_handle(&self) -> MaterialHandle {
    self.material
  }

  /// The shared material, until shutdown.
  pub fn material(&self) -> Option<&SharedMaterial> {
    self.materials.get(self.material)
  }

  pub fn backend(&self) -> &B {
    &self.backend
  }

  pub fn backend_mut(&mut self) -> &mut B {
    &mut self.backend
  }
}

impl<B: RenderBackend> Drop for StreamingController<B> {
  fn drop(&mut self) {
    self.shutdown();
  }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;
