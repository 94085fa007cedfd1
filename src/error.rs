//! # Error Handling
//!
//! Error types for selection problems and the coordination store.
//!
//! ## Error Taxonomy
//!
//! - **Invariant**: the algorithm state is corrupted (empty partition, rank outside
//!   the candidate set, count mismatch). Never retried.
//! - **IterationLimit**: the round cap was exceeded.
//! - **Store**: the coordination store is unreachable or returned unusable data.
//! - **InvalidParameter**: malformed input rejected before any round starts.
//! - **Worker**: a per-partition task panicked or was cancelled.
//! - **Io**: a file-backed source or sink failed.
//!
//! None of these are retried internally. Retry policy, if any, belongs to the
//! caller or to the store backend.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SelectionError>;

/// Errors raised while solving a selection problem.
#[derive(Error, Debug)]
pub enum SelectionError {
  /// Internal state is inconsistent; indicates a logic or configuration bug.
  #[error("invariant violated: {0}")]
  Invariant(String),
  /// The iteration controller did not terminate within the round cap.
  #[error("selection did not terminate within {max} rounds")]
  IterationLimit {
    /// The configured round cap.
    max: u32,
  },
  /// Coordination store failure.
  #[error("coordination store error: {0}")]
  Store(#[from] StoreError),
  /// A caller-supplied parameter was rejected at the boundary.
  #[error("invalid parameter `{name}`: {reason}")]
  InvalidParameter {
    /// Parameter name as the caller spelled it.
    name: String,
    /// Why it was rejected.
    reason: String,
  },
  /// A per-partition worker task failed to complete.
  #[error("worker task failed: {0}")]
  Worker(String),
  /// I/O failure in a source or sink.
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

impl SelectionError {
  /// Shorthand for [`SelectionError::Invariant`].
  pub fn invariant(message: impl Into<String>) -> Self {
    SelectionError::Invariant(message.into())
  }

  /// Shorthand for [`SelectionError::InvalidParameter`].
  pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
    SelectionError::InvalidParameter {
      name: name.into(),
      reason: reason.into(),
    }
  }

  /// Returns true if this error indicates a bug rather than bad input or an
  /// unavailable collaborator.
  pub fn is_fatal_internal(&self) -> bool {
    matches!(
      self,
      SelectionError::Invariant(_) | SelectionError::IterationLimit { .. }
    )
  }
}

/// Errors raised by a [`CoordinationStore`](crate::store::CoordinationStore) backend.
#[derive(Error, Debug)]
pub enum StoreError {
  /// Could not open a connection to the backend.
  #[error("connection failed: {0}")]
  Connection(String),
  /// A key was read before it was ever written.
  #[error("key `{0}` is not set")]
  MissingKey(String),
  /// A stored value could not be parsed into the expected type.
  #[error("key `{key}` holds malformed value `{value}`")]
  Malformed {
    /// Fully qualified key.
    key: String,
    /// Raw stored value.
    value: String,
  },
  /// The store handle was used after `close`.
  #[error("store connection is closed")]
  Closed,
  /// Backend-specific failure.
  #[error("backend error: {0}")]
  Backend(String),
}

impl From<redis::RedisError> for StoreError {
  fn from(err: redis::RedisError) -> Self {
    if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error() {
      StoreError::Connection(err.to_string())
    } else {
      StoreError::Backend(err.to_string())
    }
  }
}
