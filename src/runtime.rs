//! # Local Data-Parallel Runtime
//!
//! A single-process stand-in for the data-parallel engine the selection
//! algorithms run on. It offers the primitives the core needs:
//!
//! - **partition**: split a candidate set into at most `parallelism` shards
//! - **map_partitions**: run the same per-shard function on every shard concurrently
//! - **reduce**: fold per-shard outputs into one value
//!
//! Broadcasting is plain capture: per-round values such as the pivot are `Copy`
//! and moved into the per-shard closures.
//!
//! Every `map_partitions` call is a full barrier: all shard outputs are
//! materialized before it returns, so no step of round N+1 can observe a
//! partially computed round N.

use crate::Value;
use crate::error::{Result, SelectionError};
use crate::partitioner::Partitioner;
use futures::future::join_all;
use std::sync::Arc;
use tracing::trace;

/// A shard of the candidate set, shared read-only between the steps of a round.
pub type Partition = Arc<Vec<Value>>;

/// Executes per-partition work on blocking tokio tasks.
pub struct LocalRuntime {
  parallelism: usize,
  partitioner: Box<dyn Partitioner>,
}

impl LocalRuntime {
  /// Creates a runtime splitting work into at most `parallelism` partitions.
  ///
  /// A parallelism of zero is treated as one.
  pub fn new(parallelism: usize, partitioner: Box<dyn Partitioner>) -> Self {
    Self {
      parallelism: parallelism.max(1),
      partitioner,
    }
  }

  /// Maximum number of partitions per step.
  pub fn parallelism(&self) -> usize {
    self.parallelism
  }

  /// Splits values into partitions. Only non-empty partitions are returned, so
  /// the result is empty exactly when `values` is.
  pub fn partition(&self, values: Vec<Value>) -> Vec<Partition> {
    let num_partitions = self.parallelism;
    let mut shards: Vec<Vec<Value>> = (0..num_partitions)
      .map(|_| Vec::with_capacity(values.len() / num_partitions + 1))
      .collect();

    for value in values {
      let index = self.partitioner.partition(value, num_partitions);
      shards[index.min(num_partitions - 1)].push(value);
    }

    let partitions: Vec<Partition> = shards
      .into_iter()
      .filter(|shard| !shard.is_empty())
      .map(Arc::new)
      .collect();
    trace!(
      strategy = ?self.partitioner.strategy(),
      partitions = partitions.len(),
      "partitioned candidate set"
    );
    partitions
  }

  /// Runs `f` on every partition concurrently and waits for all of them.
  ///
  /// Outputs are returned in partition order. A panicking task fails the whole
  /// step with [`SelectionError::Worker`].
  pub async fn map_partitions<R, F>(&self, partitions: &[Partition], f: F) -> Result<Vec<R>>
  where
    F: Fn(&[Value]) -> R + Send + Sync + 'static,
    R: Send + 'static,
  {
    self
      .map_partitions_indexed(partitions, move |_, values| f(values))
      .await
  }

  /// Like [`map_partitions`](Self::map_partitions), also passing each partition's index.
  pub async fn map_partitions_indexed<R, F>(
    &self,
    partitions: &[Partition],
    f: F,
  ) -> Result<Vec<R>>
  where
    F: Fn(usize, &[Value]) -> R + Send + Sync + 'static,
    R: Send + 'static,
  {
    let f = Arc::new(f);
    let tasks = partitions.iter().enumerate().map(|(index, partition)| {
      let f = Arc::clone(&f);
      let partition = Arc::clone(partition);
      tokio::task::spawn_blocking(move || f(index, partition.as_slice()))
    });

    join_all(tasks)
      .await
      .into_iter()
      .map(|joined| joined.map_err(|e| SelectionError::Worker(e.to_string())))
      .collect()
  }
}

/// Folds per-partition outputs into a single value. `None` if there are none.
pub fn reduce<R, F>(items: Vec<R>, f: F) -> Option<R>
where
  F: Fn(R, R) -> R,
{
  items.into_iter().reduce(f)
}
