//! Hash-based fractal height field.

use super::HeightSampler;
use crate::config::HeightConfig;
use crate::constants::{NOISE_K1, NOISE_K2, NOISE_K3, NOISE_SEED_STEP};

/// Deterministic hash value in [-1, 1].
///
/// `fract(sin(x * K1 + z * K2 + seed) * K3) * 2 - 1`. Not gradient noise:
/// neighbouring inputs are uncorrelated, so high octave frequencies read as
/// grain rather than hills.
#[inline]
pub fn noise2d(x: f64, z: f64, seed: u32) -> f64 {
  let phase = x * NOISE_K1 + z * NOISE_K2 + seed as f64 * NOISE_SEED_STEP;
  let v = phase.sin() * NOISE_K3;
  (v - v.floor()) * 2.0 - 1.0
}

/// Fractal sum of `noise2d` octaves.
///
/// Octave `o` contributes `noise2d(x * f, z * f) * a` with
/// `a = amplitude * 0.5^o` and `f = frequency * 2^o`.
#[derive(Clone, Debug, PartialEq)]
pub struct HashNoiseField {
  pub amplitude: f64,
  pub frequency: f64,
  pub octaves: u32,
  pub seed: u32,
}

impl HashNoiseField {
  pub fn new(amplitude: f64, frequency: f64, octaves: u32) -> Self {
    Self {
      amplitude,
      frequency,
      octaves,
      seed: 0,
    }
  }

  pub fn from_config(config: &HeightConfig) -> Self {
    Self {
      amplitude: config.scale,
      frequency: config.frequency,
      octaves: config.octaves,
      seed: config.seed,
    }
  }

  pub fn with_seed(mut self, seed: u32) -> Self {
    self.seed = seed;
    self
  }

  /// Largest possible |elevation|: the geometric sum of octave amplitudes.
  pub fn max_amplitude(&self) -> f64 {
    (0..self.octaves).map(|o| self.amplitude * 0.5f64.powi(o as i32)).sum()
  }
}

impl HeightSampler for HashNoiseField {
  #[inline]
  fn sample(&self, x: f64, z: f64) -> f64 {
    let mut elevation = 0.0;
    let mut amplitude = self.amplitude;
    let mut frequency = self.frequency;

    for _ in 0..self.octaves {
      elevation += noise2d(x * frequency, z * frequency, self.seed) * amplitude;
      amplitude *= 0.5;
      frequency *= 2.0;
    }

    elevation
  }
}

/// Zero elevation everywhere.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlatField;

impl HeightSampler for FlatField {
  #[inline]
  fn sample(&self, _x: f64, _z: f64) -> f64 {
    0.0
  }
}

#[cfg(test)]
#[path = "field_test.rs"]
mod field_test;
