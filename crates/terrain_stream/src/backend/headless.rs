//! In-memory render backend.
//!
//! Keeps a registry of live meshes and materials instead of talking to a GPU.
//! Used by tests, benchmarks and the headless demo; failure injection lets
//! callers exercise the per-chunk error paths.

use std::collections::{HashMap, HashSet};

use glam::DVec3;

use super::RenderBackend;
use crate::coords::ChunkCoord;
use crate::error::BackendError;
use crate::material::{MaterialHandle, SharedMaterial};
use crate::types::{MeshHandle, TileFlags, TileGeometry};

/// A mesh held by the headless backend.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessMesh {
  pub coord: ChunkCoord,
  pub position: Option<DVec3>,
  pub material: Option<MaterialHandle>,
  pub flags: TileFlags,
  pub vertex_count: usize,
  pub index_count: usize,
  /// Highest vertex Y, handy for asserting displacement.
  pub max_height: f32,
}

#[derive(Default)]
pub struct HeadlessBackend {
  meshes: HashMap<MeshHandle, HeadlessMesh>,
  materials: HashMap<MaterialHandle, SharedMaterial>,
  failing: HashSet<ChunkCoord>,
  failing_material_updates: bool,
  next_mesh: u64,
  meshes_built: u64,
  meshes_disposed: u64,
  material_updates: u64,
}

impl HeadlessBackend {
  pub fn new() -> Self {
    Self::default()
  }

  /// Make `build_tile_mesh` fail for a coordinate until cleared.
  pub fn fail_coord(&mut self, coord: ChunkCoord) {
    self.failing.insert(coord);
  }

  pub fn clear_failure(&mut self, coord: ChunkCoord) {
    self.failing.remove(&coord);
  }

  pub fn clear_failures(&mut self) {
    self.failing.clear();
    self.failing_material_updates = false;
  }

  /// Make `update_material` fail while set.
  pub fn set_fail_material_updates(&mut self, fail: bool) {
    self.failing_material_updates = fail;
  }

  pub fn mesh(&self, mesh: MeshHandle) -> Option<&HeadlessMesh> {
    self.meshes.get(&mesh)
  }

  pub fn contains_mesh(&self, mesh: MeshHandle) -> bool {
    self.meshes.contains_key(&mesh)
  }

  pub fn live_meshes(&self) -> usize {
    self.meshes.len()
  }

  /// Live meshes built for a coordinate. More than one means a leak.
  pub fn meshes_for(&self, coord: ChunkCoord) -> usize {
    self.meshes.values().filter(|m| m.coord == coord).count()
  }

  pub fn material(&self, handle: MaterialHandle) -> Option<&SharedMaterial> {
    self.materials.get(&handle)
  }

  pub fn live_materials(&self) -> usize {
    self.materials.len()
  }

  pub fn meshes_built(&self) -> u64 {
    self.meshes_built
  }

  pub fn meshes_disposed(&self) -> u64 {
    self.meshes_disposed
  }

  pub fn material_updates(&self) -> u64 {
    self.material_updates
  }
}

impl RenderBackend for HeadlessBackend {
  fn build_tile_mesh(
    &mut self,
    coord: ChunkCoord,
    geometry: &TileGeometry,
    flags: TileFlags,
  ) -> Result<MeshHandle, BackendError> {
    if self.failing.contains(&coord) {
      return Err(BackendError::MeshBuild(format!("injected failure at {coord}")));
    }
    if geometry.is_empty() {
      return Err(BackendError::MeshBuild("empty geometry".into()));
    }

    let handle = MeshHandle(self.next_mesh);
    self.next_mesh += 1;
    self.meshes_built += 1;

    let max_height = geometry
      .vertices
      .iter()
      .map(|v| v.position[1])
      .fold(f32::NEG_INFINITY, f32::max);

    self.meshes.insert(
      handle,
      HeadlessMesh {
        coord,
        position: None,
        material: None,
        flags,
        vertex_count: geometry.vertices.len(),
        index_count: geometry.indices.len(),
        max_height,
      },
    );
    Ok(handle)
  }

  fn set_mesh_position(&mut self, mesh: MeshHandle, position: DVec3) -> Result<(), BackendError> {
    let entry = self
      .meshes
      .get_mut(&mesh)
      .ok_or(BackendError::UnknownMesh(mesh))?;
    entry.position = Some(position);
    Ok(())
  }

  fn assign_material(
    &mut self,
    mesh: MeshHandle,
    material: MaterialHandle,
  ) -> Result<(), BackendError> {
    if !self.materials.contains_key(&material) {
      return Err(BackendError::UnknownMaterial(material));
    }
    let entry = self
      .meshes
      .get_mut(&mesh)
      .ok_or(BackendError::UnknownMesh(mesh))?;
    entry.material = Some(material);
    Ok(())
  }

  fn dispose_mesh(&mut self, mesh: MeshHandle) -> bool {
    let removed = self.meshes.remove(&mesh).is_some();
    if removed {
      self.meshes_disposed += 1;
    }
    removed
  }

  fn create_material(
    &mut self,
    handle: MaterialHandle,
    material: &SharedMaterial,
  ) -> Result<(), BackendError> {
    if material.desc.texture_url.is_empty() {
      return Err(BackendError::Material("empty texture url".into()));
    }
    self.materials.insert(handle, material.clone());
    Ok(())
  }

  fn update_material(
    &mut self,
    handle: MaterialHandle,
    material: &SharedMaterial,
  ) -> Result<(), BackendError> {
    if self.failing_material_updates {
      return Err(BackendError::Material("injected update failure".into()));
    }
    if material.desc.texture_url.is_empty() {
      return Err(BackendError::Material("empty texture url".into()));
    }
    let entry = self
      .materials
      .get_mut(&handle)
      .ok_or(BackendError::UnknownMaterial(handle))?;
    *entry = material.clone();
    self.material_updates += 1;
    Ok(())
  }

  fn dispose_material(&mut self, handle: MaterialHandle) -> bool {
    self.materials.remove(&handle).is_some()
  }
}
