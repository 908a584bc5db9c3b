//! Fixed-interval tick driver.
//!
//! The host feeds frame deltas through `advance`; the timer fires at most
//! once per call. A long stall does not queue a burst of ticks, the backlog
//! is dropped and the phase kept.

use std::time::Duration;

#[derive(Clone, Debug)]
pub struct TickTimer {
  interval: Duration,
  elapsed: Duration,
  running: bool,
}

impl TickTimer {
  /// A stopped timer. A zero interval is clamped to 1ms.
  pub fn new(interval: Duration) -> Self {
    Self {
      interval: interval.max(Duration::from_millis(1)),
      elapsed: Duration::ZERO,
      running: false,
    }
  }

  pub fn from_millis(interval_ms: u64) -> Self {
    Self::new(Duration::from_millis(interval_ms))
  }

  pub fn interval(&self) -> Duration {
    self.interval
  }

  pub fn is_running(&self) -> bool {
    self.running
  }

  pub fn start(&mut self) {
    self.running = true;
    self.elapsed = Duration::ZERO;
  }

  pub fn stop(&mut self) {
    self.running = false;
    self.elapsed = Duration::ZERO;
  }

  /// Advance by `dt`. Returns true when a tick is due.
  pub fn advance(&mut self, dt: Duration) -> bool {
    if !self.running {
      return false;
    }
    self.elapsed += dt;
    if self.elapsed < self.interval {
      return false;
    }
    let nanos = self.elapsed.as_nanos() % self.interval.as_nanos();
    self.elapsed = Duration::from_nanos(nanos as u64);
    true
  }
}
