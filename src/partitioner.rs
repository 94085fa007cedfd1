//! Partitioning strategies for distributing values across workers.
//!
//! The exact path spreads values randomly so every shard's median is a fair
//! estimate of the whole; the approximate path hashes values so each shard's
//! reservoir sees a stable subset.

use crate::Value;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Partitioning strategy for distributing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionStrategy {
  /// Uniformly random assignment.
  #[default]
  Random,
  /// Assignment by hash of the value's bit pattern.
  Hash,
  /// Cyclic assignment in arrival order.
  RoundRobin,
}

/// Assigns values to partitions.
pub trait Partitioner: Send + Sync {
  /// Returns the partition index for the value, in `0..num_partitions`.
  ///
  /// `num_partitions` is never zero.
  fn partition(&self, value: Value, num_partitions: usize) -> usize;

  /// Returns the partitioning strategy used by this partitioner.
  fn strategy(&self) -> PartitionStrategy;
}

/// Builds the partitioner for a strategy.
///
/// The seed only affects [`PartitionStrategy::Random`].
pub fn partitioner_for(strategy: PartitionStrategy, seed: Option<u64>) -> Box<dyn Partitioner> {
  match strategy {
    PartitionStrategy::Random => Box::new(match seed {
      Some(seed) => RandomPartitioner::with_seed(seed),
      None => RandomPartitioner::new(),
    }),
    PartitionStrategy::Hash => Box::new(HashPartitioner::new()),
    PartitionStrategy::RoundRobin => Box::new(RoundRobinPartitioner::new()),
  }
}

/// Hash-based partitioner. Equal values always land in the same partition.
pub struct HashPartitioner;

impl HashPartitioner {
  /// Creates a new hash partitioner.
  #[must_use]
  pub fn new() -> Self {
    Self
  }

  fn hash_value(&self, value: Value) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    value.to_bits().hash(&mut hasher);
    hasher.finish()
  }
}

impl Default for HashPartitioner {
  fn default() -> Self {
    Self::new()
  }
}

impl Partitioner for HashPartitioner {
  fn partition(&self, value: Value, num_partitions: usize) -> usize {
    if num_partitions == 0 {
      return 0;
    }
    (self.hash_value(value) % num_partitions as u64) as usize
  }

  fn strategy(&self) -> PartitionStrategy {
    PartitionStrategy::Hash
  }
}

/// Round-robin partitioner.
pub struct RoundRobinPartitioner {
  counter: AtomicUsize,
}

impl RoundRobinPartitioner {
  /// Creates a new round-robin partitioner starting at partition 0.
  #[must_use]
  pub fn new() -> Self {
    Self {
      counter: AtomicUsize::new(0),
    }
  }
}

impl Default for RoundRobinPartitioner {
  fn default() -> Self {
    Self::new()
  }
}

impl Partitioner for RoundRobinPartitioner {
  fn partition(&self, _value: Value, num_partitions: usize) -> usize {
    if num_partitions == 0 {
      return 0;
    }
    self.counter.fetch_add(1, Ordering::Relaxed) % num_partitions
  }

  fn strategy(&self) -> PartitionStrategy {
    PartitionStrategy::RoundRobin
  }
}

/// Uniformly random partitioner.
pub struct RandomPartitioner {
  rng: Mutex<StdRng>,
}

impl RandomPartitioner {
  /// Creates a partitioner seeded from entropy.
  #[must_use]
  pub fn new() -> Self {
    Self {
      rng: Mutex::new(StdRng::from_entropy()),
    }
  }

  /// Creates a reproducible partitioner.
  #[must_use]
  pub fn with_seed(seed: u64) -> Self {
    Self {
      rng: Mutex::new(StdRng::seed_from_u64(seed)),
    }
  }
}

impl Default for RandomPartitioner {
  fn default() -> Self {
    Self::new()
  }
}

impl Partitioner for RandomPartitioner {
  fn partition(&self, _value: Value, num_partitions: usize) -> usize {
    if num_partitions == 0 {
      return 0;
    }
    // A poisoned lock still holds a usable generator.
    let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    rng.gen_range(0..num_partitions)
  }

  fn strategy(&self) -> PartitionStrategy {
    PartitionStrategy::Random
  }
}
