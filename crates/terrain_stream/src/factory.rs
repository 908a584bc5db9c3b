//! ChunkFactory - builds and disposes terrain tiles.
//!
//! Creation is split in two:
//!
//! ```text
//! build_geometry(coord)           pure, runs on rayon workers
//!        │  TileGeometry
//!        ▼
//! create(coord, geometry, ..)     backend calls, controller thread only
//!        │  build_tile_mesh → set_mesh_position → assign_material
//!        ▼
//!      Chunk
//! ```
//!
//! # Seams
//!
//! Vertices are addressed on a global lattice: vertex `ix` of chunk `cx` has
//! lattice index `cx * subdivisions + ix` and world X
//! `lattice * chunk_size / subdivisions`. The last column of chunk `cx` and
//! the first column of chunk `cx + 1` share a lattice index, so they evaluate
//! the height sampler at bit-identical world positions.

use glam::DVec3;
use rayon::prelude::*;
use web_time::Instant;

use crate::backend::RenderBackend;
use crate::chunk::Chunk;
use crate::config::StreamingConfig;
use crate::coords::{ChunkCoord, CoordinateMapper};
use crate::error::StreamError;
use crate::height::{sampler_from_config, FlatField, HeightSampler};
use crate::material::MaterialHandle;
use crate::types::{MinMaxAABB, TileFlags, TileGeometry, Vertex};

pub struct ChunkFactory {
  mapper: CoordinateMapper,
  subdivisions: u32,
  flags: TileFlags,
  height: Box<dyn HeightSampler>,
  height_enabled: bool,
}

impl ChunkFactory {
  /// Flat tiles until a height sampler is installed.
  pub fn new(mapper: CoordinateMapper, subdivisions: u32, flags: TileFlags) -> Self {
    Self {
      mapper,
      subdivisions: subdivisions.max(1),
      flags,
      height: Box::new(FlatField),
      height_enabled: false,
    }
  }

  pub fn from_config(config: &StreamingConfig) -> Self {
    let mut factory = Self::new(
      CoordinateMapper::new(config.chunk_size),
      config.subdivisions_per_chunk,
      TileFlags {
        collision: config.collision_enabled,
        shadows: config.shadows_enabled,
      },
    );
    factory.set_height(config.height.enabled, sampler_from_config(&config.height));
    factory
  }

  /// Install a height sampler. With `enabled == false` tiles stay flat and
  /// the sampler is kept for later.
  pub fn set_height(&mut self, enabled: bool, sampler: Box<dyn HeightSampler>) {
    self.height = sampler;
    self.height_enabled = enabled;
  }

  pub fn height_enabled(&self) -> bool {
    self.height_enabled
  }

  pub fn mapper(&self) -> &CoordinateMapper {
    &self.mapper
  }

  pub fn flags(&self) -> TileFlags {
    self.flags
  }

  pub fn subdivisions(&self) -> u32 {
    self.subdivisions
  }

  /// World X (or Z) of a global lattice index.
  #[inline]
  fn lattice_to_world(&self, lattice: i64) -> f64 {
    lattice as f64 * self.mapper.chunk_size() / self.subdivisions as f64
  }

  #[inline]
  fn elevation(&self, x: f64, z: f64) -> f64 {
    if self.height_enabled {
      self.height.sample(x, z)
    } else {
      0.0
    }
  }

  /// Normal from central differences of the height field, in world space.
  fn normal_at(&self, x: f64, z: f64, eps: f64) -> [f32; 3] {
    if !self.height_enabled {
      return [0.0, 1.0, 0.0];
    }
    let dx = self.height.sample(x - eps, z) - self.height.sample(x + eps, z);
    let dz = self.height.sample(x, z - eps) - self.height.sample(x, z + eps);
    let n = DVec3::new(dx, 2.0 * eps, dz).normalize_or(DVec3::Y);
    [n.x as f32, n.y as f32, n.z as f32]
  }

  /// Build the vertex grid for a tile. Positions are relative to the tile
  /// center; heights come from absolute world coordinates.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "factory::build_geometry"))]
  pub fn build_geometry(&self, coord: ChunkCoord) -> TileGeometry {
    let n = self.subdivisions as i64;
    let row = n as usize + 1;
    let size = self.mapper.chunk_size();
    let center = self.mapper.chunk_center(coord);
    let eps = size / n as f64;

    let mut vertices = Vec::with_capacity(row * row);
    let mut bounds = MinMaxAABB::empty();

    for iz in 0..=n {
      let world_z = self.lattice_to_world(coord.z as i64 * n + iz);
      for ix in 0..=n {
        let world_x = self.lattice_to_world(coord.x as i64 * n + ix);
        let y = self.elevation(world_x, world_z);

        let position = [
          (world_x - center.x) as f32,
          y as f32,
          (world_z - center.z) as f32,
        ];
        bounds.encapsulate(position);

        vertices.push(Vertex {
          position,
          normal: self.normal_at(world_x, world_z, eps),
          uv: [ix as f32 / n as f32, iz as f32 / n as f32],
        });
      }
    }

    let cells = n as usize;
    let mut indices = Vec::with_capacity(cells * cells * 6);
    for iz in 0..cells {
      for ix in 0..cells {
        let i0 = (iz * row + ix) as u32;
        let i1 = i0 + 1;
        let i2 = i0 + row as u32;
        let i3 = i2 + 1;
        // Counter-clockwise seen from +Y.
        indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
      }
    }

    TileGeometry {
      vertices,
      indices,
      subdivisions: self.subdivisions,
      size: size as f32,
      bounds,
    }
  }

  /// Build geometry for many tiles in parallel. Output order matches input.
  pub fn build_geometries(&self, coords: &[ChunkCoord]) -> Vec<TileGeometry> {
    coords.par_iter().map(|&coord| self.build_geometry(coord)).collect()
  }

  /// Upload a tile and place it at its world position.
  ///
  /// If positioning or material assignment fails the uploaded mesh is
  /// released before the error is returned, so nothing leaks.
  pub fn create<B: RenderBackend + ?Sized>(
    &self,
    coord: ChunkCoord,
    geometry: &TileGeometry,
    backend: &mut B,
    material: MaterialHandle,
  ) -> Result<Chunk, StreamError> {
    let mesh = backend
      .build_tile_mesh(coord, geometry, self.flags)
      .map_err(|source| StreamError::ChunkBuild { coord, source })?;

    let placed = backend
      .set_mesh_position(mesh, self.mapper.chunk_center(coord))
      .and_then(|()| backend.assign_material(mesh, material));

    if let Err(source) = placed {
      backend.dispose_mesh(mesh);
      return Err(StreamError::ChunkBuild { coord, source });
    }

    Ok(Chunk {
      coord,
      mesh,
      material,
      created_at: Instant::now(),
      vertex_count: geometry.vertices.len() as u32,
      index_count: geometry.indices.len() as u32,
    })
  }

  /// Release a chunk's mesh. Disposing a mesh the backend no longer knows is
  /// a warning, not an error. Returns whether a mesh was released.
  pub fn dispose<B: RenderBackend + ?Sized>(&self, chunk: Chunk, backend: &mut B) -> bool {
    let released = backend.dispose_mesh(chunk.mesh);
    if !released {
      log::warn!(
        "chunk {} mesh {:?} was already disposed or unknown",
        chunk.coord,
        chunk.mesh
      );
    }
    released
  }
}

#[cfg(test)]
#[path = "factory_test.rs"]
mod factory_test;
