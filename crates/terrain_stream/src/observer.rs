//! Observer input.
//!
//! The controller polls an `ObserverSource` each tick instead of reaching
//! into a global camera. `None` means no observer exists yet.

use std::sync::{Arc, Mutex};

use glam::DVec3;

pub trait ObserverSource {
  fn position(&self) -> Option<DVec3>;
}

impl<F> ObserverSource for F
where
  F: Fn() -> Option<DVec3>,
{
  fn position(&self) -> Option<DVec3> {
    self()
  }
}

/// Observer pinned at one position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedObserver(pub DVec3);

impl ObserverSource for FixedObserver {
  fn position(&self) -> Option<DVec3> {
    Some(self.0)
  }
}

/// Observer position written by the host and read by the controller.
///
/// Clones share the same slot, so the host keeps one clone and hands the
/// other to the controller.
#[derive(Clone, Debug, Default)]
pub struct SharedObserver {
  slot: Arc<Mutex<Option<DVec3>>>,
}

impl SharedObserver {
  /// Starts with no observer.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn at(position: DVec3) -> Self {
    let observer = Self::new();
    observer.set(position);
    observer
  }

  pub fn set(&self, position: DVec3) {
    if let Ok(mut slot) = self.slot.lock() {
      *slot = Some(position);
    }
  }

  pub fn clear(&self) {
    if let Ok(mut slot) = self.slot.lock() {
      *slot = None;
    }
  }
}

impl ObserverSource for SharedObserver {
  fn position(&self) -> Option<DVec3> {
    self.slot.lock().ok().and_then(|slot| *slot)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_closure_source() {
    let source = || Some(DVec3::new(1.0, 2.0, 3.0));
    assert_eq!(source.position(), Some(DVec3::new(1.0, 2.0, 3.0)));
  }

  #[test]
  fn test_shared_observer_clones_share_slot() {
    let host = SharedObserver::new();
    let controller_side = host.clone();
    assert_eq!(controller_side.position(), None);

    host.set(DVec3::new(260.0, 0.0, 0.0));
    assert_eq!(controller_side.position(), Some(DVec3::new(260.0, 0.0, 0.0)));

    host.clear();
    assert_eq!(controller_side.position(), None);
  }

  #[test]
  fn test_boxed_source() {
    let boxed: Box<dyn ObserverSource> = Box::new(FixedObserver(DVec3::ZERO));
    assert_eq!(boxed.position(), Some(DVec3::ZERO));
  }
}
