//! Scripted observer paths.
//!
//! Stand-in for a fly camera: each path maps a step index to an observer
//! position on the XZ plane.

use clap::ValueEnum;
use glam::DVec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PathKind {
	/// Straight line along +X.
	Line,
	/// Circle around the origin.
	Circle,
	/// Jump between the origin and a far point every step.
	Teleport,
}

#[derive(Clone, Copy, Debug)]
pub struct ObserverPath {
	pub kind: PathKind,
	/// World units travelled per step.
	pub speed: f64,
}

impl ObserverPath {
	pub fn new(kind: PathKind, speed: f64) -> Self {
		Self { kind, speed }
	}

	pub fn position(&self, step: u32) -> DVec3 {
		let t = step as f64;
		match self.kind {
			PathKind::Line => DVec3::new(t * self.speed, 0.0, 0.0),
			PathKind::Circle => {
				let radius = self.speed * 8.0;
				// One lap every 2π·radius / speed steps.
				let angle = t * self.speed / radius;
				DVec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
			}
			PathKind::Teleport => {
				if step % 2 == 0 {
					DVec3::ZERO
				} else {
					DVec3::new(self.speed * 100.0, 0.0, -self.speed * 100.0)
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_line_moves_along_x() {
		let path = ObserverPath::new(PathKind::Line, 40.0);
		assert_eq!(path.position(0), DVec3::ZERO);
		assert_eq!(path.position(3), DVec3::new(120.0, 0.0, 0.0));
	}

	#[test]
	fn test_circle_keeps_radius() {
		let path = ObserverPath::new(PathKind::Circle, 10.0);
		for step in 0..50 {
			let p = path.position(step);
			assert!((p.length() - 80.0).abs() < 1e-9);
		}
	}

	#[test]
	fn test_teleport_alternates() {
		let path = ObserverPath::new(PathKind::Teleport, 50.0);
		assert_eq!(path.position(0), DVec3::ZERO);
		assert_eq!(path.position(1), DVec3::new(5000.0, 0.0, -5000.0));
		assert_eq!(path.position(2), DVec3::ZERO);
	}
}
