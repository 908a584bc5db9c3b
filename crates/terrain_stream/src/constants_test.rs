use super::*;

#[test]
fn test_window_len() {
  assert_eq!(window_len(0), 1);
  assert_eq!(window_len(1), 9);
  assert_eq!(window_len(3), 49);
  assert_eq!(window_len(10), 441);
  assert_eq!(window_len(MAX_VIEW_DISTANCE), 513 * 513);
}

#[test]
fn test_window_len_saturates() {
  // (2·u32::MAX + 1)² does not fit in 64 bits.
  assert_eq!(window_len(u32::MAX), usize::MAX);
}

#[test]
fn test_defaults_are_sane() {
  assert!(DEFAULT_CHUNK_SIZE > 0.0);
  assert!(DEFAULT_SUBDIVISIONS >= 1);
  assert!(DEFAULT_HEIGHT_OCTAVES <= MAX_HEIGHT_OCTAVES);
  assert_eq!(DEFAULT_UPDATE_INTERVAL_MS, 500);
}
