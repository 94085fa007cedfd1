//! Reservoir sampling via random-priority top-k.
//!
//! Every offered value draws a uniform `u64` priority independent of the value
//! itself; the sampler keeps the `capacity` highest priorities. Applied per
//! shard, so the combined sample is an approximation of a global reservoir.

use crate::Value;
use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeMap;

/// Bounded sample of a stream of values.
pub struct ReservoirSampler {
  capacity: usize,
  rng: StdRng,
  // (priority, arrival) keeps equal priorities distinct.
  entries: BTreeMap<(u64, u64), Value>,
  arrivals: u64,
}

impl ReservoirSampler {
  /// Creates a sampler keeping at most `capacity` values, seeded from entropy.
  pub fn new(capacity: usize) -> Self {
    Self::with_rng(capacity, StdRng::from_entropy())
  }

  /// Creates a reproducible sampler.
  pub fn with_seed(capacity: usize, seed: u64) -> Self {
    Self::with_rng(capacity, StdRng::seed_from_u64(seed))
  }

  fn with_rng(capacity: usize, rng: StdRng) -> Self {
    Self {
      capacity,
      rng,
      entries: BTreeMap::new(),
      arrivals: 0,
    }
  }

  /// Offers a value to the sample.
  pub fn offer(&mut self, value: Value) {
    let priority = self.rng.next_u64();
    self.offer_with_priority(value, priority);
  }

  /// Offers a value with an explicit priority. When the sample is full, the
  /// value replaces the lowest-priority entry only if its priority is larger.
  pub fn offer_with_priority(&mut self, value: Value, priority: u64) {
    let key = (priority, self.arrivals);
    self.arrivals += 1;

    if self.entries.len() < self.capacity {
      self.entries.insert(key, value);
      return;
    }

    let displaces = self
      .entries
      .first_key_value()
      .is_some_and(|(lowest, _)| lowest.0 < priority);
    if displaces {
      self.entries.pop_first();
      self.entries.insert(key, value);
    }
  }

  /// Number of values currently retained.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns true if nothing has been retained.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Consumes the sampler, returning the retained values in priority order.
  pub fn into_values(self) -> Vec<Value> {
    self.entries.into_values().collect()
  }
}

/// Samples one shard.
pub fn sample_partition(values: &[Value], capacity: usize, seed: Option<u64>) -> Vec<Value> {
  let mut sampler = match seed {
    Some(seed) => ReservoirSampler::with_seed(capacity, seed),
    None => ReservoirSampler::new(capacity),
  };
  for value in values {
    sampler.offer(*value);
  }
  sampler.into_values()
}
