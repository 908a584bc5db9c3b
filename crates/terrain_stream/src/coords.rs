//! Chunk grid coordinates and world ↔ chunk mapping.
//!
//! ```text
//!          chunk -1        chunk 0         chunk 1
//!     ├───────────────┼───────────────┼───────────────┤
//!   -size             0             size          2*size   (world X)
//!
//!   world_to_chunk(-0.1) = floor(-0.1 / size) = -1
//!   world_to_chunk( 0.0) = 0
//! ```
//!
//! A chunk covers the half-open square `[origin, origin + size)` on X and Z.

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Integer grid cell identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
pub struct ChunkCoord {
  pub x: i32,
  pub z: i32,
}

impl ChunkCoord {
  pub const fn new(x: i32, z: i32) -> Self {
    Self { x, z }
  }

  /// Chebyshev (chessboard) distance in chunks.
  #[inline]
  pub fn chebyshev_distance(&self, other: ChunkCoord) -> u32 {
    let dx = (self.x as i64 - other.x as i64).unsigned_abs();
    let dz = (self.z as i64 - other.z as i64).unsigned_abs();
    dx.max(dz).min(u32::MAX as u64) as u32
  }

  /// Squared Euclidean distance in chunks, used to order work within a ring.
  #[inline]
  pub fn distance_squared(&self, other: ChunkCoord) -> i64 {
    let dx = self.x as i64 - other.x as i64;
    let dz = self.z as i64 - other.z as i64;
    dx * dx + dz * dz
  }
}

impl fmt::Display for ChunkCoord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.x, self.z)
  }
}

impl From<(i32, i32)> for ChunkCoord {
  fn from((x, z): (i32, i32)) -> Self {
    Self { x, z }
  }
}

/// Converts between world space and chunk grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
  chunk_size: f64,
}

impl CoordinateMapper {
  /// `chunk_size` must be finite and positive; `StreamingConfig::validate`
  /// guarantees this for configured mappers.
  pub fn new(chunk_size: f64) -> Self {
    Self { chunk_size }
  }

  #[inline]
  pub fn chunk_size(&self) -> f64 {
    self.chunk_size
  }

  /// Chunk containing world position (x, z). Uses floor, not truncation.
  #[inline]
  pub fn world_to_chunk(&self, x: f64, z: f64) -> ChunkCoord {
    ChunkCoord {
      x: (x / self.chunk_size).floor() as i32,
      z: (z / self.chunk_size).floor() as i32,
    }
  }

  /// Chunk containing a 3D position; Y is ignored.
  #[inline]
  pub fn position_to_chunk(&self, position: DVec3) -> ChunkCoord {
    self.world_to_chunk(position.x, position.z)
  }

  /// World-space minimum corner (x, z) of a chunk.
  #[inline]
  pub fn chunk_origin(&self, coord: ChunkCoord) -> (f64, f64) {
    (
      coord.x as f64 * self.chunk_size,
      coord.z as f64 * self.chunk_size,
    )
  }

  /// World-space center of a chunk at elevation 0.
  #[inline]
  pub fn chunk_center(&self, coord: ChunkCoord) -> DVec3 {
    let (x, z) = self.chunk_origin(coord);
    let half = self.chunk_size * 0.5;
    DVec3::new(x + half, 0.0, z + half)
  }
}

/// Every coordinate within Chebyshev `radius` of `center`, row by row.
pub fn window(center: ChunkCoord, radius: u32) -> impl Iterator<Item = ChunkCoord> {
  let r = radius.min(i32::MAX as u32) as i32;
  (center.z.saturating_sub(r)..=center.z.saturating_add(r)).flat_map(move |z| {
    (center.x.saturating_sub(r)..=center.x.saturating_add(r)).map(move |x| ChunkCoord { x, z })
  })
}

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;
