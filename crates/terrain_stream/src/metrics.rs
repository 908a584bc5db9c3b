//! Streaming statistics.
//!
//! `StreamStats` counters are always maintained. Per-tick timing history
//! (`TickMetrics`) is only recorded with the `metrics` feature.
//!
//! # Usage
//!
//! ```ignore
//! let stats = controller.stats();
//! log::info!("{} active, {} created", stats.active_chunks, stats.total_created);
//!
//! // Compile with --features metrics
//! let timings = controller.tick_metrics();
//! log::info!("avg tick {:.1}us", timings.avg_tick_us());
//! ```

use std::collections::VecDeque;

/// Counters exposed by `StreamingController::stats`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
  /// Chunks created over the controller's lifetime.
  pub chunks_loaded: u64,
  /// Chunks disposed over the controller's lifetime, shutdown included.
  pub chunks_disposed: u64,
  /// Chunks successfully created since start.
  pub total_created: u64,
  /// Creations attempted since start, failures included.
  pub creation_attempts: u64,
  /// Currently resident chunks.
  pub active_chunks: usize,
  /// Creation attempts that failed.
  pub failed_creations: u64,
  /// Ticks that ran a full diff (early returns excluded).
  pub ticks: u64,
}

impl StreamStats {
  /// Chunks created minus chunks disposed. Equals `active_chunks` unless a
  /// mesh leaked.
  pub fn net_loaded(&self) -> i64 {
    self.chunks_loaded as i64 - self.chunks_disposed as i64
  }
}

/// Rolling window for storing recent values (e.g., timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity: capacity.max(1),
    }
  }

  /// Push a new value, evicting the oldest if at capacity.
  pub fn push(&mut self, value: T) {
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

}

impl RollingWindow<u64> {
  pub fn sum(&self) -> u64 {
    self.buffer.iter().sum()
  }

  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.sum() as f64 / self.buffer.len() as f64
    }
  }

  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = *self.buffer.iter().min()?;
    let max = *self.buffer.iter().max()?;
    Some((min, max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128) // ~1 minute of ticks at the default 500ms interval
  }
}

/// Timing history of recent ticks, in microseconds.
#[derive(Debug, Clone, Default)]
pub struct TickMetrics {
  /// Whole tick: diff, geometry, backend calls, eviction.
  pub tick_timings: RollingWindow<u64>,
  /// Parallel geometry build phase only.
  pub geometry_timings: RollingWindow<u64>,
  pub last_tick_us: u64,
  /// Chunks created per tick, to spot budget saturation.
  pub created_per_tick: RollingWindow<u64>,
}

impl TickMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record_tick(&mut self, tick_us: u64, geometry_us: u64, created: usize) {
    self.tick_timings.push(tick_us);
    self.geometry_timings.push(geometry_us);
    self.created_per_tick.push(created as u64);
    self.last_tick_us = tick_us;
  }

  pub fn avg_tick_us(&self) -> f64 {
    self.tick_timings.average()
  }

  pub fn avg_geometry_us(&self) -> f64 {
    self.geometry_timings.average()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rolling_window() {
    let mut window = RollingWindow::new(3);
    assert!(window.is_empty());
    assert_eq!(window.min_max(), None);

    window.push(10u64);
    window.push(20);
    window.push(30);
    assert_eq!(window.len(), 3);
    assert_eq!(window.sum(), 60);
    assert_eq!(window.average(), 20.0);

    // Push one more, oldest should be evicted
    window.push(40);
    assert_eq!(window.len(), 3);
    assert_eq!(window.sum(), 90);
    assert_eq!(window.min_max(), Some((20, 40)));
  }

  #[test]
  fn test_tick_metrics() {
    let mut metrics = TickMetrics::new();
    metrics.record_tick(1000, 600, 9);
    metrics.record_tick(3000, 2000, 0);

    assert_eq!(metrics.avg_tick_us(), 2000.0);
    assert_eq!(metrics.avg_geometry_us(), 1300.0);
    assert_eq!(metrics.last_tick_us, 3000);
    assert_eq!(metrics.created_per_tick.sum(), 9);
    assert_eq!(metrics.tick_timings.min_max(), Some((1000, 3000)));
  }

  #[test]
  fn test_net_loaded() {
    let stats = StreamStats {
      chunks_loaded: 18,
      chunks_disposed: 9,
      active_chunks: 9,
      ..Default::default()
    };
    assert_eq!(stats.net_loaded(), stats.active_chunks as i64);
  }
}
