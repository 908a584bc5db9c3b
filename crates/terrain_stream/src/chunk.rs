//! Chunk - a live terrain tile.

use web_time::Instant;

use crate::coords::ChunkCoord;
use crate::material::MaterialHandle;
use crate::types::MeshHandle;

/// A resident terrain tile.
///
/// The mesh handle is owned exclusively by this chunk and released through
/// the backend when the chunk is disposed. The material handle is shared.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
  pub coord: ChunkCoord,
  pub mesh: MeshHandle,
  pub material: MaterialHandle,
  pub created_at: Instant,
  pub vertex_count: u32,
  pub index_count: u32,
}

/// Lifecycle of a single grid coordinate.
///
/// ```text
///                enters window            leaves window
///  NotLoaded ───────────────────► Loaded ───────────────► NotLoaded
///      │                            ▲
///      │ deferred by budget         │ created on a later tick
///      └────────► Pending ──────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkState {
  NotLoaded,
  /// Required by the current window but not yet created.
  Pending,
  Loaded,
}
