//! Core data types for tile geometry.

/// Output vertex with all mesh attributes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
  /// Vertex position relative to the tile center.
  pub position: [f32; 3],

  /// Surface normal (unit vector).
  pub normal: [f32; 3],

  /// Texture coordinate in [0, 1] across the tile, before material tiling.
  pub uv: [f32; 2],
}

impl Default for Vertex {
  fn default() -> Self {
    Self {
      position: [0.0; 3],
      normal: [0.0, 1.0, 0.0],
      uv: [0.0; 2],
    }
  }
}

/// Axis-aligned bounding box.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxAABB {
  pub min: [f32; 3],
  pub max: [f32; 3],
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: [f32::INFINITY; 3],
      max: [f32::NEG_INFINITY; 3],
    }
  }

  /// Create AABB from min/max corners.
  pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
    Self { min, max }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: [f32; 3]) {
    for i in 0..3 {
      self.min[i] = self.min[i].min(point[i]);
      self.max[i] = self.max[i].max(point[i]);
    }
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min[0] <= self.max[0] && self.min[1] <= self.max[1] && self.min[2] <= self.max[2]
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

/// Subdivided rectangular tile ready for upload to a render backend.
#[derive(Clone, Debug, Default)]
pub struct TileGeometry {
  /// `(subdivisions + 1)²` vertices, row-major with X fastest.
  pub vertices: Vec<Vertex>,

  /// Triangle indices (3 indices per triangle).
  pub indices: Vec<u32>,

  /// Grid cells per side.
  pub subdivisions: u32,

  /// Side length in world units.
  pub size: f32,

  /// Bounding box encompassing all vertices.
  pub bounds: MinMaxAABB,
}

impl TileGeometry {
  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty()
  }

  /// Number of triangles in the mesh.
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Vertices along one side.
  #[inline]
  pub fn row_len(&self) -> usize {
    self.subdivisions as usize + 1
  }

  /// Vertex at grid position (ix, iz).
  #[inline]
  pub fn vertex_at(&self, ix: usize, iz: usize) -> &Vertex {
    &self.vertices[iz * self.row_len() + ix]
  }
}

/// Per-tile render flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileFlags {
  /// Tile participates in collision queries.
  pub collision: bool,
  /// Tile casts and receives shadows.
  pub shadows: bool,
}

/// Opaque handle to a mesh owned by the render backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u64);

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
