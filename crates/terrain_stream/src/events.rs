//! Streaming events, broadcast to any number of subscribers.
//!
//! ```text
//! StreamingController ── emit ──► EventBus ──► Sender ──► Receiver (host A)
//!                                         └──► Sender ──► Receiver (host B)
//! ```
//!
//! Channels are unbounded; a subscriber that drops its receiver is pruned on
//! the next emit.

use crossbeam_channel::{self as channel, Receiver, Sender};

use crate::coords::ChunkCoord;

#[derive(Clone, Debug, PartialEq)]
pub enum StreamEvent {
  /// Controller started streaming.
  Ready { chunk_size: f64, view_distance: u32 },

  ChunkLoaded { coord: ChunkCoord },

  ChunkUnloaded { coord: ChunkCoord },

  /// Summary of one tick that changed the active set. Lists are sorted.
  ChunksUpdated {
    loaded: Vec<ChunkCoord>,
    unloaded: Vec<ChunkCoord>,
    active_count: usize,
    observer: ChunkCoord,
  },

  /// A coordinate could not be created this tick and will be retried.
  ChunkFailed { coord: ChunkCoord, reason: String },

  /// Every chunk and the shared material have been released.
  Shutdown,
}

#[derive(Default)]
pub struct EventBus {
  subscribers: Vec<Sender<StreamEvent>>,
}

impl EventBus {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn subscribe(&mut self) -> Receiver<StreamEvent> {
    let (sender, receiver) = channel::unbounded();
    self.subscribers.push(sender);
    receiver
  }

  pub fn subscriber_count(&self) -> usize {
    self.subscribers.len()
  }

  /// Send to every live subscriber.
  pub fn emit(&mut self, event: StreamEvent) {
    if self.subscribers.is_empty() {
      return;
    }
    // Send fails only when the receiver is gone.
    self
      .subscribers
      .retain(|sender| sender.send(event.clone()).is_ok());
  }
}
