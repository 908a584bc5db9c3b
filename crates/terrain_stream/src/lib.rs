//! terrain_stream - Engine independent infinite terrain streaming
//!
//! Keeps a square window of terrain tiles resident around a moving observer
//! on an unbounded 2D grid. Tiles entering the window are built and uploaded
//! through a `RenderBackend`; tiles leaving it are disposed in the same tick.
//!
//! # Features
//!
//! - **Chebyshev window**: `(2 * view_distance + 1)²` chunks around the
//!   observer's chunk, recomputed from scratch each tick
//! - **Seamless height fields**: tiles sample elevation in absolute world
//!   coordinates, so shared edges always match
//! - **Creation budget**: optional per-tick cap on creations, nearest first;
//!   eviction is never deferred
//! - **Shared material**: one arena-held material referenced by every tile
//! - **Parallel geometry**: tile grids are built on rayon workers, backend
//!   calls stay on the controller's thread
//!
//! # Example
//!
//! ```ignore
//! use terrain_stream::{HeadlessBackend, SharedObserver, StreamingConfig, StreamingController};
//!
//! let observer = SharedObserver::at(glam::DVec3::ZERO);
//! let mut controller = StreamingController::new(
//!     StreamingConfig::default(),
//!     HeadlessBackend::new(),
//!     observer.clone(),
//! )?;
//! controller.start()?;
//!
//! // Host loop
//! observer.set(camera_position);
//! if let Some(report) = controller.update(frame_dt) {
//!     println!("+{} -{}", report.loaded.len(), report.unloaded.len());
//! }
//! ```

pub mod constants;
pub mod types;

pub use types::{MeshHandle, MinMaxAABB, TileFlags, TileGeometry, Vertex};

pub mod coords;
pub use coords::{window, ChunkCoord, CoordinateMapper};

// Procedural elevation
pub mod height;
pub use height::{noise2d, sampler_from_config, FlatField, HashNoiseField, HeightSampler};

pub mod material;
pub use material::{MaterialArena, MaterialDesc, MaterialHandle, SharedMaterial};

// Engine seam + in-memory implementation
pub mod backend;
pub use backend::{HeadlessBackend, HeadlessMesh, RenderBackend};

pub mod chunk;
pub use chunk::{Chunk, ChunkState};

pub mod active_set;
pub use active_set::ActiveChunkSet;

pub mod factory;
pub use factory::ChunkFactory;

pub mod budget;
pub use budget::StreamingBudget;

pub mod config;
pub use config::{HeightConfig, StreamingConfig};

pub mod error;
pub use error::{BackendError, ConfigError, MaterialError, StreamError, StreamResult};

pub mod events;
pub use events::{EventBus, StreamEvent};

pub mod metrics;
pub use metrics::StreamStats;

pub mod observer;
pub use observer::{FixedObserver, ObserverSource, SharedObserver};

pub mod timer;
pub use timer::TickTimer;

pub mod controller;
pub use controller::{Lifecycle, StreamingController, TickReport};
