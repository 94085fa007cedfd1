//! Tests for log subscriber setup.

use crate::logging::init_logging;
use tracing::Level;

#[test]
fn test_second_init_keeps_existing_subscriber() {
  init_logging(Level::DEBUG);
  assert!(!init_logging(Level::INFO));
}
