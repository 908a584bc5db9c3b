//! Render backend seam.
//!
//! The streaming core never touches a graphics API. Everything it needs from
//! the engine goes through `RenderBackend`:
//!
//! ```text
//! ┌──────────────────────┐        ┌───────────────────────────────┐
//! │ StreamingController  │        │ RenderBackend (engine side)   │
//! │                      │        │                               │
//! │  ChunkFactory ───────┼──────► │ build_tile_mesh               │
//! │                      │        │ set_mesh_position             │
//! │                      │        │ assign_material               │
//! │  eviction ───────────┼──────► │ dispose_mesh                  │
//! │                      │        │                               │
//! │  MaterialArena ──────┼──────► │ create/update/dispose_material│
//! └──────────────────────┘        └───────────────────────────────┘
//! ```
//!
//! All calls happen on the controller's thread.

mod headless;

pub use headless::{HeadlessBackend, HeadlessMesh};

use glam::DVec3;

use crate::coords::ChunkCoord;
use crate::error::BackendError;
use crate::material::{MaterialHandle, SharedMaterial};
use crate::types::{MeshHandle, TileFlags, TileGeometry};

/// Engine operations consumed by the streaming core.
pub trait RenderBackend {
  /// Upload a tile mesh. `coord` identifies the tile for naming/debugging.
  fn build_tile_mesh(
    &mut self,
    coord: ChunkCoord,
    geometry: &TileGeometry,
    flags: TileFlags,
  ) -> Result<MeshHandle, BackendError>;

  /// Place a mesh in world space.
  fn set_mesh_position(&mut self, mesh: MeshHandle, position: DVec3) -> Result<(), BackendError>;

  /// Point a mesh at the shared material. Must not allocate a new material.
  fn assign_material(
    &mut self,
    mesh: MeshHandle,
    material: MaterialHandle,
  ) -> Result<(), BackendError>;

  /// Release a mesh. Returns false if the mesh was unknown.
  fn dispose_mesh(&mut self, mesh: MeshHandle) -> bool;

  /// Create the engine-side material for an arena slot.
  fn create_material(
    &mut self,
    handle: MaterialHandle,
    material: &SharedMaterial,
  ) -> Result<(), BackendError>;

  /// Push a changed description to an existing material.
  fn update_material(
    &mut self,
    handle: MaterialHandle,
    material: &SharedMaterial,
  ) -> Result<(), BackendError>;

  /// Release a material. Returns false if the material was unknown.
  fn dispose_material(&mut self, handle: MaterialHandle) -> bool;
}
