//! Rate limiting configuration for chunk creation.
//!
//! Prevents frame spikes when the observer teleports or the view distance
//! grows by limiting how many chunks are created per tick. Evictions are
//! never limited: a chunk outside the window is always disposed in the tick
//! that notices it.

use serde::{Deserialize, Serialize};

/// Rate limiting configuration for streaming ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingBudget {
	/// Maximum chunk creations per tick (0 = unlimited).
	pub max_creates_per_tick: usize,
}

impl StreamingBudget {
	/// No limit; every missing chunk is created in the tick that needs it.
	pub const UNLIMITED: Self = Self {
		max_creates_per_tick: 0,
	};

	/// Budget suited to interactive hosts.
	pub const INTERACTIVE: Self = Self {
		max_creates_per_tick: 16,
	};

	pub fn with_max_creates(max_creates_per_tick: usize) -> Self {
		Self { max_creates_per_tick }
	}

	/// How many of `wanted` creations fit in one tick.
	#[inline]
	pub fn creations_allowed(&self, wanted: usize) -> usize {
		if self.max_creates_per_tick == 0 {
			wanted
		} else {
			wanted.min(self.max_creates_per_tick)
		}
	}

	#[inline]
	pub fn is_unlimited(&self) -> bool {
		self.max_creates_per_tick == 0
	}
}

impl Default for StreamingBudget {
	fn default() -> Self {
		Self::UNLIMITED
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_budget_is_unlimited() {
		let budget = StreamingBudget::default();
		assert!(budget.is_unlimited());
		assert_eq!(budget.creations_allowed(1_000_000), 1_000_000);
		assert_eq!(budget.creations_allowed(49), 49);
	}

	#[test]
	fn test_creations_allowed() {
		let budget = StreamingBudget::with_max_creates(8);
		assert_eq!(budget.creations_allowed(3), 3);
		assert_eq!(budget.creations_allowed(8), 8);
		assert_eq!(budget.creations_allowed(49), 8);
	}

	#[test]
	fn test_interactive_budget() {
		assert_eq!(StreamingBudget::INTERACTIVE.max_creates_per_tick, 16);
		assert!(!StreamingBudget::INTERACTIVE.is_unlimited());
	}
}
