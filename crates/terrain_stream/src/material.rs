//! Shared tile material held in a generational arena.
//!
//! Every chunk references the same material through a `MaterialHandle`. The
//! controller owns the arena, so the material outlives the chunks that point
//! at it and is removed only after the last chunk has been disposed.
//!
//! ```text
//! MaterialArena
//! ┌──────────────────────────────┐
//! │ slot 0  gen 1  "grass.png"   │◄── chunk (0,0)
//! │                              │◄── chunk (0,1)
//! │                              │◄── chunk (1,0) ...
//! └──────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TEXTURE_URL;
use crate::error::MaterialError;

/// Texture source and UV tiling of a tile material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDesc {
  pub texture_url: String,
  /// UV repeat factors (u, v) across one tile.
  pub tiling: [f32; 2],
}

impl Default for MaterialDesc {
  fn default() -> Self {
    Self {
      texture_url: DEFAULT_TEXTURE_URL.to_string(),
      tiling: [1.0, 1.0],
    }
  }
}

impl MaterialDesc {
  pub fn new(texture_url: impl Into<String>, tiling: [f32; 2]) -> Self {
    Self {
      texture_url: texture_url.into(),
      tiling,
    }
  }
}

/// Non-owning reference to a material slot.
///
/// The generation detects use after removal: a handle whose generation no
/// longer matches its slot resolves to nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialHandle {
  index: u32,
  generation: u32,
}

impl MaterialHandle {
  pub fn index(&self) -> u32 {
    self.index
  }

  pub fn generation(&self) -> u32 {
    self.generation
  }
}

/// Live material with a revision counter bumped on every mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct SharedMaterial {
  pub desc: MaterialDesc,
  pub revision: u64,
}

struct Slot {
  generation: u32,
  entry: Option<SharedMaterial>,
}

/// Generational slot arena for shared materials.
#[derive(Default)]
pub struct MaterialArena {
  slots: Vec<Slot>,
  free: Vec<u32>,
}

impl MaterialArena {
  pub fn new() -> Self {
    Self::default()
  }

  /// Store a material and return its handle.
  pub fn insert(&mut self, desc: MaterialDesc) -> MaterialHandle {
    let entry = SharedMaterial { desc, revision: 0 };

    if let Some(index) = self.free.pop() {
      let slot = &mut self.slots[index as usize];
      slot.entry = Some(entry);
      return MaterialHandle {
        index,
        generation: slot.generation,
      };
    }

    let index = self.slots.len() as u32;
    self.slots.push(Slot {
      generation: 0,
      entry: Some(entry),
    });
    MaterialHandle {
      index,
      generation: 0,
    }
  }

  pub fn get(&self, handle: MaterialHandle) -> Option<&SharedMaterial> {
    self
      .slots
      .get(handle.index as usize)
      .filter(|slot| slot.generation == handle.generation)
      .and_then(|slot| slot.entry.as_ref())
  }

  fn get_mut(&mut self, handle: MaterialHandle) -> Result<&mut SharedMaterial, MaterialError> {
    self
      .slots
      .get_mut(handle.index as usize)
      .filter(|slot| slot.generation == handle.generation)
      .and_then(|slot| slot.entry.as_mut())
      .ok_or(MaterialError::StaleHandle(handle))
  }

  pub fn contains(&self, handle: MaterialHandle) -> bool {
    self.get(handle).is_some()
  }

  /// Replace texture and tiling in place. Every chunk holding the handle
  /// sees the change.
  pub fn set_texture(
    &mut self,
    handle: MaterialHandle,
    texture_url: impl Into<String>,
    tiling: [f32; 2],
  ) -> Result<&SharedMaterial, MaterialError> {
    validate_tiling(tiling)?;
    let material = self.get_mut(handle)?;
    material.desc.texture_url = texture_url.into();
    material.desc.tiling = tiling;
    material.revision += 1;
    Ok(material)
  }

  pub fn set_tiling(
    &mut self,
    handle: MaterialHandle,
    u: f32,
    v: f32,
  ) -> Result<&SharedMaterial, MaterialError> {
    validate_tiling([u, v])?;
    let material = self.get_mut(handle)?;
    material.desc.tiling = [u, v];
    material.revision += 1;
    Ok(material)
  }

  /// Overwrite a live material wholesale, revision included, and return the
  /// old value. Used to undo an edit the renderer refused.
  pub fn replace(
    &mut self,
    handle: MaterialHandle,
    material: SharedMaterial,
  ) -> Result<SharedMaterial, MaterialError> {
    let entry = self.get_mut(handle)?;
    Ok(std::mem::replace(entry, material))
  }

  /// Remove a material. The slot's generation advances so outstanding
  /// handles go stale.
  pub fn remove(&mut self, handle: MaterialHandle) -> Option<SharedMaterial> {
    let slot = self.slots.get_mut(handle.index as usize)?;
    if slot.generation != handle.generation {
      return None;
    }
    let entry = slot.entry.take()?;
    slot.generation = slot.generation.wrapping_add(1);
    self.free.push(handle.index);
    Some(entry)
  }

  /// Number of live materials.
  pub fn len(&self) -> usize {
    self.slots.iter().filter(|slot| slot.entry.is_some()).count()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

fn validate_tiling([u, v]: [f32; 2]) -> Result<(), MaterialError> {
  if u.is_finite() && v.is_finite() && u > 0.0 && v > 0.0 {
    Ok(())
  } else {
    Err(MaterialError::InvalidTiling { u, v })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_insert_and_get() {
    let mut arena = MaterialArena::new();
    let handle = arena.insert(MaterialDesc::new("a.png", [2.0, 2.0]));

    let material = arena.get(handle).unwrap();
    assert_eq!(material.desc.texture_url, "a.png");
    assert_eq!(material.revision, 0);
    assert_eq!(arena.len(), 1);
  }

  #[test]
  fn test_mutations_bump_revision() {
    let mut arena = MaterialArena::new();
    let handle = arena.insert(MaterialDesc::default());

    arena.set_tiling(handle, 4.0, 8.0).unwrap();
    assert_eq!(arena.get(handle).unwrap().desc.tiling, [4.0, 8.0]);
    assert_eq!(arena.get(handle).unwrap().revision, 1);

    let material = arena.set_texture(handle, "rock.png", [1.0, 1.0]).unwrap();
    assert_eq!(material.desc.texture_url, "rock.png");
    assert_eq!(material.revision, 2);
  }

  #[test]
  fn test_invalid_tiling_is_rejected() {
    let mut arena = MaterialArena::new();
    let handle = arena.insert(MaterialDesc::default());

    assert_eq!(
      arena.set_tiling(handle, 0.0, 1.0).unwrap_err(),
      MaterialError::InvalidTiling { u: 0.0, v: 1.0 }
    );
    assert!(arena.set_tiling(handle, f32::NAN, 1.0).is_err());
    assert_eq!(arena.get(handle).unwrap().revision, 0, "rejected edits do not count");
  }

  #[test]
  fn test_replace_restores_snapshot() {
    let mut arena = MaterialArena::new();
    let handle = arena.insert(MaterialDesc::new("a.png", [1.0, 1.0]));
    let snapshot = arena.get(handle).unwrap().clone();

    arena.set_texture(handle, "b.png", [3.0, 3.0]).unwrap();
    let edited = arena.replace(handle, snapshot.clone()).unwrap();

    assert_eq!(edited.desc.texture_url, "b.png");
    assert_eq!(edited.revision, 1);
    assert_eq!(arena.get(handle), Some(&snapshot));

    arena.remove(handle);
    assert_eq!(
      arena.replace(handle, snapshot).unwrap_err(),
      MaterialError::StaleHandle(handle)
    );
  }

  #[test]
  fn test_remove_invalidates_handle() {
    let mut arena = MaterialArena::new();
    let handle = arena.insert(MaterialDesc::default());

    assert!(arena.remove(handle).is_some());
    assert!(!arena.contains(handle));
    assert!(arena.remove(handle).is_none(), "double remove is a no-op");
    assert_eq!(
      arena.set_tiling(handle, 1.0, 1.0).unwrap_err(),
      MaterialError::StaleHandle(handle)
    );
    assert!(arena.is_empty());
  }

  #[test]
  fn test_slot_reuse_does_not_revive_old_handle() {
    let mut arena = MaterialArena::new();
    let old = arena.insert(MaterialDesc::new("old.png", [1.0, 1.0]));
    arena.remove(old);

    let new = arena.insert(MaterialDesc::new("new.png", [1.0, 1.0]));
    assert_eq!(new.index(), old.index());
    assert_ne!(new.generation(), old.generation());
    assert!(arena.get(old).is_none());
    assert_eq!(arena.get(new).unwrap().desc.texture_url, "new.png");
  }
}
