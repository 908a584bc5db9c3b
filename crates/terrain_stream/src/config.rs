//! StreamingConfig - TOML-backed configuration for the streaming engine.
//!
//! Every field has a default, so a config file only needs to list what it
//! changes:
//!
//! ```toml
//! chunk_size = 64.0
//! view_distance = 4
//!
//! [height]
//! enabled = true
//! scale = 25.0
//!
//! [material]
//! texture_url = "textures/rock.png"
//! tiling = [4.0, 4.0]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::budget::StreamingBudget;
use crate::constants::*;
use crate::error::ConfigError;
use crate::material::MaterialDesc;

/// Procedural elevation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightConfig {
  /// Displace tile vertices by the height field. Flat tiles when false.
  pub enabled: bool,
  /// Amplitude of the first octave in world units.
  pub scale: f64,
  pub octaves: u32,
  /// Frequency of the first octave in cycles per world unit.
  pub frequency: f64,
  pub seed: u32,
}

impl Default for HeightConfig {
  fn default() -> Self {
    Self {
      enabled: false,
      scale: DEFAULT_HEIGHT_SCALE,
      octaves: DEFAULT_HEIGHT_OCTAVES,
      frequency: DEFAULT_HEIGHT_FREQUENCY,
      seed: 0,
    }
  }
}

/// Configuration for the streaming controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
  /// World units per chunk side.
  pub chunk_size: f64,

  /// Chebyshev radius, in chunks, kept resident around the observer.
  pub view_distance: u32,

  /// Milliseconds between streaming ticks.
  pub update_interval_ms: u64,

  /// Grid cells per chunk side.
  pub subdivisions_per_chunk: u32,

  pub collision_enabled: bool,
  pub shadows_enabled: bool,

  pub height: HeightConfig,
  pub material: MaterialDesc,
  pub budget: StreamingBudget,
}

impl Default for StreamingConfig {
  fn default() -> Self {
    Self {
      chunk_size: DEFAULT_CHUNK_SIZE,
      view_distance: DEFAULT_VIEW_DISTANCE,
      update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
      subdivisions_per_chunk: DEFAULT_SUBDIVISIONS,
      collision_enabled: false,
      shadows_enabled: true,
      height: HeightConfig::default(),
      material: MaterialDesc::default(),
      budget: StreamingBudget::default(),
    }
  }
}

impl StreamingConfig {
  /// Parse and validate a TOML document.
  pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
    let config: Self = toml::from_str(source)?;
    config.validate()?;
    Ok(config)
  }

  /// Read, parse and validate a TOML file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    let config = Self::from_toml_str(&source)?;
    log::debug!("loaded streaming config from {}", path.display());
    Ok(config)
  }

  pub fn with_chunk_size(mut self, chunk_size: f64) -> Self {
    self.chunk_size = chunk_size;
    self
  }

  pub fn with_view_distance(mut self, view_distance: u32) -> Self {
    self.view_distance = view_distance;
    self
  }

  pub fn with_height(mut self, height: HeightConfig) -> Self {
    self.height = height;
    self
  }

  pub fn with_budget(mut self, budget: StreamingBudget) -> Self {
    self.budget = budget;
    self
  }

  /// Check invariants the rest of the crate relies on.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if !self.chunk_size.is_finite() || self.chunk_size <= 0.0 {
      return Err(ConfigError::Invalid(format!(
        "chunk_size must be finite and positive, got {}",
        self.chunk_size
      )));
    }
    if self.subdivisions_per_chunk == 0 {
      return Err(ConfigError::Invalid(
        "subdivisions_per_chunk must be at least 1".into(),
      ));
    }
    if self.view_distance > MAX_VIEW_DISTANCE {
      return Err(ConfigError::Invalid(format!(
        "view_distance must be at most {MAX_VIEW_DISTANCE}, got {}",
        self.view_distance
      )));
    }
    if self.update_interval_ms == 0 {
      return Err(ConfigError::Invalid(
        "update_interval_ms must be positive".into(),
      ));
    }
    if self.height.octaves > MAX_HEIGHT_OCTAVES {
      return Err(ConfigError::Invalid(format!(
        "height.octaves must be at most {MAX_HEIGHT_OCTAVES}, got {}",
        self.height.octaves
      )));
    }
    if !self.height.scale.is_finite() || !self.height.frequency.is_finite() {
      return Err(ConfigError::Invalid(
        "height.scale and height.frequency must be finite".into(),
      ));
    }
    let [u, v] = self.material.tiling;
    if !(u.is_finite() && v.is_finite() && u > 0.0 && v > 0.0) {
      return Err(ConfigError::Invalid(format!(
        "material.tiling must be finite and positive, got [{u}, {v}]"
      )));
    }
    Ok(())
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
