//! Error types for terrain streaming.

use std::path::PathBuf;

use thiserror::Error;

use crate::coords::ChunkCoord;
use crate::material::MaterialHandle;
use crate::types::MeshHandle;

/// Result type for streaming operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors surfaced by the streaming controller.
#[derive(Error, Debug)]
pub enum StreamError {
  /// No observer position was available when one was required.
  #[error("no observer available")]
  NoObserver,

  /// A single chunk failed to build. The coordinate stays absent and is
  /// retried on the next tick while it is still required.
  #[error("chunk {coord} failed to build: {source}")]
  ChunkBuild {
    coord: ChunkCoord,
    #[source]
    source: BackendError,
  },

  #[error("controller has been shut down")]
  ShutDown,

  #[error("material error: {0}")]
  Material(#[from] MaterialError),

  #[error("config error: {0}")]
  Config(#[from] ConfigError),

  #[error("backend error: {0}")]
  Backend(#[from] BackendError),
}

/// Failures reported by a render backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
  #[error("mesh construction failed: {0}")]
  MeshBuild(String),

  #[error("unknown mesh {0:?}")]
  UnknownMesh(MeshHandle),

  #[error("unknown material {0:?}")]
  UnknownMaterial(MaterialHandle),

  #[error("material upload failed: {0}")]
  Material(String),
}

/// Shared material arena failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
  #[error("stale or removed material handle {0:?}")]
  StaleHandle(MaterialHandle),

  #[error("invalid tiling ({u}, {v}): factors must be finite and positive")]
  InvalidTiling { u: f32, v: f32 },
}

/// Configuration loading and validation failures.
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("failed to read {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("invalid config: {0}")]
  Invalid(String),
}
