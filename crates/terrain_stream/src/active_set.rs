//! ActiveChunkSet - the resident chunks, keyed by coordinate.
//!
//! A map rather than a list so each coordinate can hold at most one chunk.
//! Inserting over an occupied coordinate is refused instead of replacing, so
//! an existing mesh can never be orphaned.

use std::collections::HashMap;

use crate::chunk::Chunk;
use crate::coords::ChunkCoord;

#[derive(Default)]
pub struct ActiveChunkSet {
  chunks: HashMap<ChunkCoord, Chunk>,
}

impl ActiveChunkSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.chunks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.chunks.is_empty()
  }

  pub fn contains(&self, coord: &ChunkCoord) -> bool {
    self.chunks.contains_key(coord)
  }

  pub fn get(&self, coord: &ChunkCoord) -> Option<&Chunk> {
    self.chunks.get(coord)
  }

  /// Insert a chunk at its own coordinate.
  ///
  /// Returns the chunk back as `Err` if the coordinate is already occupied;
  /// the caller still owns its mesh and must dispose it.
  pub fn insert(&mut self, chunk: Chunk) -> Result<(), Chunk> {
    use std::collections::hash_map::Entry;

    match self.chunks.entry(chunk.coord) {
      Entry::Occupied(_) => Err(chunk),
      Entry::Vacant(slot) => {
        slot.insert(chunk);
        Ok(())
      }
    }
  }

  /// Iterate over resident coordinates.
  pub fn coords(&self) -> impl Iterator<Item = &ChunkCoord> {
    self.chunks.keys()
  }

  /// Remove and return every chunk.
  pub fn drain(&mut self) -> impl Iterator<Item = Chunk> + '_ {
    self.chunks.drain().map(|(_, chunk)| chunk)
  }

  /// Remove and return every chunk for which `keep` is false.
  pub fn extract_if_not(&mut self, mut keep: impl FnMut(&ChunkCoord) -> bool) -> Vec<Chunk> {
    let evicted: Vec<ChunkCoord> = self.chunks.keys().filter(|c| !keep(c)).copied().collect();
    evicted
      .into_iter()
      .filter_map(|coord| self.chunks.remove(&coord))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use web_time::Instant;

  use super::*;
  use crate::material::{MaterialArena, MaterialDesc};
  use crate::types::MeshHandle;

  fn chunk(x: i32, z: i32, mesh: u64) -> Chunk {
    let mut arena = MaterialArena::new();
    Chunk {
      coord: ChunkCoord::new(x, z),
      mesh: MeshHandle(mesh),
      material: arena.insert(MaterialDesc::default()),
      created_at: Instant::now(),
      vertex_count: 4,
      index_count: 6,
    }
  }

  #[test]
  fn test_insert_and_lookup() {
    let mut set = ActiveChunkSet::new();
    assert!(set.is_empty());

    set.insert(chunk(0, 0, 1)).unwrap();
    set.insert(chunk(1, 0, 2)).unwrap();

    assert_eq!(set.len(), 2);
    assert!(set.contains(&ChunkCoord::new(1, 0)));
    assert_eq!(set.get(&ChunkCoord::new(0, 0)).unwrap().mesh, MeshHandle(1));
  }

  #[test]
  fn test_duplicate_insert_is_refused() {
    let mut set = ActiveChunkSet::new();
    set.insert(chunk(3, 3, 1)).unwrap();

    let rejected = set.insert(chunk(3, 3, 2)).unwrap_err();
    assert_eq!(rejected.mesh, MeshHandle(2));
    assert_eq!(set.len(), 1);
    assert_eq!(
      set.get(&ChunkCoord::new(3, 3)).unwrap().mesh,
      MeshHandle(1),
      "original chunk is kept"
    );
  }

  #[test]
  fn test_extract_if_not() {
    let mut set = ActiveChunkSet::new();
    for x in -2..=2 {
      set.insert(chunk(x, 0, x as u64 + 10)).unwrap();
    }

    let mut evicted = set.extract_if_not(|c| c.x >= 0);
    evicted.sort_by_key(|c| c.coord);

    assert_eq!(evicted.len(), 2);
    assert_eq!(evicted[0].coord, ChunkCoord::new(-2, 0));
    assert_eq!(evicted[1].coord, ChunkCoord::new(-1, 0));
    assert_eq!(set.len(), 3);
  }

  #[test]
  fn test_drain() {
    let mut set = ActiveChunkSet::new();
    set.insert(chunk(0, 0, 1)).unwrap();
    set.insert(chunk(0, 1, 2)).unwrap();

    assert_eq!(set.drain().count(), 2);
    assert!(set.is_empty());
  }
}
