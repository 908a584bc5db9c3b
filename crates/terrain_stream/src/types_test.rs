use super::*;

#[test]
fn test_empty_aabb_is_invalid() {
  assert!(!MinMaxAABB::empty().is_valid());
}

#[test]
fn test_encapsulate() {
  let mut aabb = MinMaxAABB::empty();
  aabb.encapsulate([1.0, -2.0, 3.0]);
  assert!(aabb.is_valid());
  assert_eq!(aabb.min, [1.0, -2.0, 3.0]);
  assert_eq!(aabb.max, [1.0, -2.0, 3.0]);

  aabb.encapsulate([-1.0, 4.0, 0.0]);
  assert_eq!(aabb.min, [-1.0, -2.0, 0.0]);
  assert_eq!(aabb.max, [1.0, 4.0, 3.0]);
}

#[test]
fn test_default_vertex_points_up() {
  let v = Vertex::default();
  assert_eq!(v.normal, [0.0, 1.0, 0.0]);
}

#[test]
fn test_empty_geometry() {
  let geometry = TileGeometry::default();
  assert!(geometry.is_empty());
  assert_eq!(geometry.triangle_count(), 0);
  assert_eq!(geometry.row_len(), 1);
}
