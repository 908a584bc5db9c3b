//! Streaming benchmarks.
//!
//! - **height**: fractal hash noise sampling, per octave count
//! - **geometry**: one tile grid, flat vs displaced, per subdivision
//! - **tick**: full window turnover after a teleport, per view distance

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::DVec3;
use terrain_stream::{
  ChunkCoord, ChunkFactory, CoordinateMapper, FixedObserver, HashNoiseField, HeadlessBackend,
  HeightConfig, HeightSampler, StreamingConfig, StreamingController, TileFlags,
};

const SAMPLES: usize = 4096;

// =============================================================================
// Height field
// =============================================================================

fn bench_height_octaves(c: &mut Criterion) {
  let mut group = c.benchmark_group("height_octaves");
  group.throughput(Throughput::Elements(SAMPLES as u64));

  for octaves in [1u32, 2, 4, 8] {
    let field = HashNoiseField::new(10.0, 0.01, octaves);

    group.bench_with_input(BenchmarkId::from_parameter(octaves), &octaves, |b, _| {
      b.iter(|| {
        let mut acc = 0.0;
        for i in 0..SAMPLES {
          let x = (i % 64) as f64 * 0.75;
          let z = (i / 64) as f64 * 0.75;
          acc += field.sample(black_box(x), black_box(z));
        }
        black_box(acc)
      })
    });
  }

  group.finish();
}

// =============================================================================
// Tile geometry
// =============================================================================

fn bench_tile_geometry(c: &mut Criterion) {
  let mut group = c.benchmark_group("tile_geometry");

  for subdivisions in [10u32, 32, 64] {
    let flat = ChunkFactory::new(CoordinateMapper::new(50.0), subdivisions, TileFlags::default());
    let mut hilly = ChunkFactory::new(CoordinateMapper::new(50.0), subdivisions, TileFlags::default());
    hilly.set_height(true, Box::new(HashNoiseField::new(10.0, 0.01, 4)));

    group.bench_with_input(BenchmarkId::new("flat", subdivisions), &subdivisions, |b, _| {
      b.iter(|| black_box(flat.build_geometry(black_box(ChunkCoord::new(3, -2)))))
    });
    group.bench_with_input(BenchmarkId::new("height", subdivisions), &subdivisions, |b, _| {
      b.iter(|| black_box(hilly.build_geometry(black_box(ChunkCoord::new(3, -2)))))
    });
  }

  group.finish();
}

// =============================================================================
// Tick
// =============================================================================

/// Teleport back and forth so every tick replaces the whole window.
fn bench_tick_teleport(c: &mut Criterion) {
  let mut group = c.benchmark_group("tick_teleport");
  group.sample_size(20);

  for view_distance in [1u32, 3, 6] {
    let config = StreamingConfig {
      height: HeightConfig {
        enabled: true,
        ..HeightConfig::default()
      },
      ..StreamingConfig::default()
    }
    .with_view_distance(view_distance);

    let mut controller =
      StreamingController::new(config, HeadlessBackend::new(), FixedObserver(DVec3::ZERO))
        .expect("valid config");
    controller.start().expect("observer available");

    let mut far = false;
    group.bench_with_input(
      BenchmarkId::from_parameter(view_distance),
      &view_distance,
      |b, _| {
        b.iter(|| {
          far = !far;
          let x = if far { 10_000.0 } else { 0.0 };
          black_box(controller.tick_at(DVec3::new(x, 0.0, 0.0), false))
        })
      },
    );
  }

  group.finish();
}

criterion_group!(benches, bench_height_octaves, bench_tile_geometry, bench_tick_teleport);
criterion_main!(benches);
