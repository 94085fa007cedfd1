//! Log subscriber setup.

use tracing::Level;

/// Installs a `fmt` subscriber writing at `level` and above.
///
/// Returns `false` if a global subscriber was already installed, in which case
/// the existing one is left in place.
pub fn init_logging(level: Level) -> bool {
  tracing_subscriber::fmt()
    .with_max_level(level)
    .with_target(true)
    .try_init()
    .is_ok()
}
