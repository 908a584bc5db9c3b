//! Streaming defaults and noise hash constants.
//!
//! # Window Layout
//!
//! ```text
//! view_distance = 1                        view_distance = 2
//!
//!   ┌───┬───┬───┐                  ┌───┬───┬───┬───┬───┐
//!   │   │   │   │                  │   │   │   │   │   │
//!   ├───┼───┼───┤                  ├───┼───┼───┼───┼───┤
//!   │   │ O │   │  3² = 9          │   │   │   │   │   │
//!   ├───┼───┼───┤                  ├───┼───┼───┼───┼───┤
//!   │   │   │   │                  │   │   │ O │   │   │  5² = 25
//!   └───┴───┴───┘                  ├───┼───┼───┼───┼───┤
//!                                  │   │   │   │   │   │
//!  O = observer chunk              ├───┼───┼───┼───┼───┤
//!                                  │   │   │   │   │   │
//!                                  └───┴───┴───┴───┴───┘
//! ```
//!
//! Chunks resident = `(2 * view_distance + 1)²`.

/// World units per chunk side.
pub const DEFAULT_CHUNK_SIZE: f64 = 50.0;

/// Chunk radius kept resident around the observer.
pub const DEFAULT_VIEW_DISTANCE: u32 = 3;

/// Milliseconds between streaming ticks.
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 500;

/// Grid cells per chunk side.
pub const DEFAULT_SUBDIVISIONS: u32 = 10;

pub const DEFAULT_HEIGHT_SCALE: f64 = 10.0;
pub const DEFAULT_HEIGHT_OCTAVES: u32 = 4;
pub const DEFAULT_HEIGHT_FREQUENCY: f64 = 0.01;

/// Largest accepted view distance, a window of 513 × 513 chunks.
pub const MAX_VIEW_DISTANCE: u32 = 256;

/// Upper bound on octaves. Past this the amplitude falls below f64 noise.
pub const MAX_HEIGHT_OCTAVES: u32 = 16;

pub const DEFAULT_TEXTURE_URL: &str = "textures/grass.png";

/// Hash noise constants: `fract(sin(x * K1 + z * K2) * K3)`.
pub const NOISE_K1: f64 = 12.9898;
pub const NOISE_K2: f64 = 78.233;
pub const NOISE_K3: f64 = 43758.5453;

/// Offset applied per seed unit so different seeds decorrelate.
pub const NOISE_SEED_STEP: f64 = 0.618_033_988_749_895;

/// Number of chunks in a window of the given radius.
#[inline]
///
/// Saturates at `usize::MAX` for radii no address space could hold.
pub const fn window_len(view_distance: u32) -> usize {
  let side = (view_distance as usize).saturating_mul(2).saturating_add(1);
  side.saturating_mul(side)
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
