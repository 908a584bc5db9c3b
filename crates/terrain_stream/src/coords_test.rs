use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;

#[test]
fn test_positive_positions() {
  let mapper = CoordinateMapper::new(50.0);
  assert_eq!(mapper.world_to_chunk(0.0, 0.0), ChunkCoord::new(0, 0));
  assert_eq!(mapper.world_to_chunk(49.999, 10.0), ChunkCoord::new(0, 0));
  assert_eq!(mapper.world_to_chunk(50.0, 100.0), ChunkCoord::new(1, 2));
  assert_eq!(mapper.world_to_chunk(260.0, 0.0), ChunkCoord::new(5, 0));
}

/// Truncation would map -0.1 to chunk 0; floor maps it to -1.
#[test]
fn test_negative_positions_use_floor() {
  let mapper = CoordinateMapper::new(50.0);
  assert_eq!(mapper.world_to_chunk(-0.1, -0.1), ChunkCoord::new(-1, -1));
  assert_eq!(mapper.world_to_chunk(-50.0, -49.9), ChunkCoord::new(-1, -1));
  assert_eq!(mapper.world_to_chunk(-50.1, 0.0), ChunkCoord::new(-2, 0));
}

#[test]
fn test_chunk_origin() {
  let mapper = CoordinateMapper::new(50.0);
  assert_eq!(mapper.chunk_origin(ChunkCoord::new(0, 0)), (0.0, 0.0));
  assert_eq!(mapper.chunk_origin(ChunkCoord::new(-2, 3)), (-100.0, 150.0));
}

#[test]
fn test_chunk_center_is_offset_by_half() {
  let mapper = CoordinateMapper::new(50.0);
  let center = mapper.chunk_center(ChunkCoord::new(1, -1));
  assert_eq!(center, DVec3::new(75.0, 0.0, -25.0));
}

/// origin(world_to_chunk(p)) <= p < origin + size on both axes.
#[test]
fn test_roundtrip_containment_random() {
  let mut rng = StdRng::seed_from_u64(0x7e44a1);

  for &size in &[1.0, 7.5, 50.0, 333.3] {
    let mapper = CoordinateMapper::new(size);
    for _ in 0..2_000 {
      let x: f64 = rng.random_range(-1.0e6..1.0e6);
      let z: f64 = rng.random_range(-1.0e6..1.0e6);
      let coord = mapper.world_to_chunk(x, z);
      let (ox, oz) = mapper.chunk_origin(coord);

      assert!(ox <= x && x < ox + size, "x={x} not in [{ox}, {})", ox + size);
      assert!(oz <= z && z < oz + size, "z={z} not in [{oz}, {})", oz + size);
    }
  }
}

#[test]
fn test_roundtrip_containment_on_boundaries() {
  let mapper = CoordinateMapper::new(50.0);
  for k in -5..=5 {
    let x = k as f64 * 50.0;
    let coord = mapper.world_to_chunk(x, x);
    assert_eq!(coord, ChunkCoord::new(k, k), "boundary {x} belongs to the chunk it starts");
  }
}

#[test]
fn test_chebyshev_distance() {
  let a = ChunkCoord::new(0, 0);
  assert_eq!(a.chebyshev_distance(ChunkCoord::new(3, -1)), 3);
  assert_eq!(a.chebyshev_distance(ChunkCoord::new(-2, 2)), 2);
  assert_eq!(a.chebyshev_distance(a), 0);
  assert_eq!(
    ChunkCoord::new(i32::MIN, 0).chebyshev_distance(ChunkCoord::new(i32::MAX, 0)),
    u32::MAX
  );
}

#[test]
fn test_window_size_and_membership() {
  let center = ChunkCoord::new(5, -3);
  for radius in 0..5u32 {
    let coords: HashSet<ChunkCoord> = window(center, radius).collect();
    assert_eq!(coords.len(), crate::constants::window_len(radius));
    assert!(coords.iter().all(|c| c.chebyshev_distance(center) <= radius));
  }
}

#[test]
fn test_window_radius_zero_is_center() {
  let coords: Vec<ChunkCoord> = window(ChunkCoord::new(2, 2), 0).collect();
  assert_eq!(coords, vec![ChunkCoord::new(2, 2)]);
}
