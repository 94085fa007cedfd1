//! Configuration for selection problems.
//!
//! Defines how many partitions a round is split into, how partitions are
//! assigned, the round cap, the randomness seed and which coordination store
//! backend a solve connects to. Both types derive serde so callers can load them
//! from whatever format they already use.

use crate::error::{Result, SelectionError};
use crate::partitioner::PartitionStrategy;
use serde::{Deserialize, Serialize};

/// Default namespace for coordination store keys.
pub const DEFAULT_KEY_PREFIX: &str = "selectweave-";

/// Default cap on the number of exact-path rounds.
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;

/// Default number of partitions per round.
pub const DEFAULT_PARALLELISM: usize = 4;

/// Coordination store backend selection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreBackend {
  /// A fresh process-local store per connection.
  #[default]
  Memory,
  /// A Redis server.
  Redis {
    /// Connection URL, e.g. `redis://localhost:6379`.
    connection_url: String,
  },
}

/// Coordination store configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
  /// Which backend to connect to.
  pub backend: StoreBackend,
  /// Namespace prepended to every key.
  pub key_prefix: String,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      backend: StoreBackend::Memory,
      key_prefix: DEFAULT_KEY_PREFIX.to_string(),
    }
  }
}

impl StoreConfig {
  /// Uses a Redis server at the given URL.
  #[must_use]
  pub fn with_redis(mut self, connection_url: impl Into<String>) -> Self {
    self.backend = StoreBackend::Redis {
      connection_url: connection_url.into(),
    };
    self
  }

  /// Sets the key namespace.
  #[must_use]
  pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
    self.key_prefix = key_prefix.into();
    self
  }
}

/// Tuning shared by all selection problems.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
  /// Number of partitions each round is split into.
  pub parallelism: usize,
  /// Round cap for the exact path; exceeding it is fatal.
  pub max_iterations: u32,
  /// How values are assigned to partitions on the exact path.
  pub partitioning: PartitionStrategy,
  /// Seed for partition assignment and reservoir priorities. `None` draws from entropy.
  pub seed: Option<u64>,
  /// Coordination store settings.
  pub store: StoreConfig,
}

impl Default for SelectionConfig {
  fn default() -> Self {
    Self {
      parallelism: DEFAULT_PARALLELISM,
      max_iterations: DEFAULT_MAX_ITERATIONS,
      partitioning: PartitionStrategy::Random,
      seed: None,
      store: StoreConfig::default(),
    }
  }
}

impl SelectionConfig {
  /// Sets the number of partitions per round.
  #[must_use]
  pub fn with_parallelism(mut self, parallelism: usize) -> Self {
    self.parallelism = parallelism;
    self
  }

  /// Sets the round cap.
  #[must_use]
  pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
    self.max_iterations = max_iterations;
    self
  }

  /// Sets the exact-path partitioning strategy.
  #[must_use]
  pub fn with_partitioning(mut self, partitioning: PartitionStrategy) -> Self {
    self.partitioning = partitioning;
    self
  }

  /// Fixes the randomness seed.
  #[must_use]
  pub fn with_seed(mut self, seed: u64) -> Self {
    self.seed = Some(seed);
    self
  }

  /// Sets the coordination store configuration.
  #[must_use]
  pub fn with_store(mut self, store: StoreConfig) -> Self {
    self.store = store;
    self
  }

  /// Checks that the configuration can drive a solve.
  pub fn validate(&self) -> Result<()> {
    if self.parallelism == 0 {
      return Err(SelectionError::invalid_parameter(
        "parallelism",
        "must be at least 1",
      ));
    }
    if self.max_iterations == 0 {
      return Err(SelectionError::invalid_parameter(
        "max_iterations",
        "must be at least 1",
      ));
    }
    if let StoreBackend::Redis { connection_url } = &self.store.backend {
      if connection_url.is_empty() {
        return Err(SelectionError::invalid_parameter(
          "store.connection_url",
          "must not be empty",
        ));
      }
    }
    Ok(())
  }
}
