//! Procedural elevation for terrain tiles.
//!
//! A `HeightSampler` maps absolute world (x, z) to an elevation. Samplers
//! must be pure: two tiles that share a boundary vertex evaluate the sampler
//! at the same world position and must get the same answer, otherwise the
//! tiles tear apart at the seam.

mod field;

pub use field::{noise2d, FlatField, HashNoiseField};

use crate::config::HeightConfig;

/// Deterministic world-space elevation function.
pub trait HeightSampler: Send + Sync {
  /// Elevation at absolute world position (x, z).
  fn sample(&self, x: f64, z: f64) -> f64;
}

/// Blanket impl for boxed trait objects.
impl HeightSampler for Box<dyn HeightSampler> {
  #[inline]
  fn sample(&self, x: f64, z: f64) -> f64 {
    (**self).sample(x, z)
  }
}

/// Sampler described by a `HeightConfig`: hash noise when enabled, flat
/// otherwise.
pub fn sampler_from_config(config: &HeightConfig) -> Box<dyn HeightSampler> {
  if config.enabled {
    Box::new(HashNoiseField::from_config(config))
  } else {
    Box::new(FlatField)
  }
}
