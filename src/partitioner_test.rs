//! Tests for partitioners and the local runtime's use of them.

use crate::partitioner::{
  HashPartitioner, PartitionStrategy, Partitioner, RandomPartitioner, RoundRobinPartitioner,
  partitioner_for,
};
use crate::runtime::{LocalRuntime, reduce};

#[test]
fn test_hash_is_stable_for_equal_values() {
  let p = HashPartitioner::new();
  for v in [0.0, 1.5, -3.0, 1e9] {
    assert_eq!(p.partition(v, 7), p.partition(v, 7));
    assert!(p.partition(v, 7) < 7);
  }
}

#[test]
fn test_round_robin_cycles() {
  let p = RoundRobinPartitioner::new();
  let assigned: Vec<usize> = (0..6).map(|_| p.partition(1.0, 3)).collect();
  assert_eq!(assigned, vec![0, 1, 2, 0, 1, 2]);
}

#[test]
fn test_seeded_random_is_reproducible() {
  let a = RandomPartitioner::with_seed(11);
  let b = RandomPartitioner::with_seed(11);
  for _ in 0..50 {
    let pa = a.partition(0.0, 5);
    assert_eq!(pa, b.partition(0.0, 5));
    assert!(pa < 5);
  }
}

#[test]
fn test_zero_partitions() {
  assert_eq!(HashPartitioner::new().partition(1.0, 0), 0);
  assert_eq!(RoundRobinPartitioner::new().partition(1.0, 0), 0);
  assert_eq!(RandomPartitioner::new().partition(1.0, 0), 0);
}

#[test]
fn test_factory_strategy() {
  for strategy in [
    PartitionStrategy::Random,
    PartitionStrategy::Hash,
    PartitionStrategy::RoundRobin,
  ] {
    assert_eq!(partitioner_for(strategy, Some(1)).strategy(), strategy);
  }
}

#[test]
fn test_runtime_drops_empty_partitions() {
  let runtime = LocalRuntime::new(8, Box::new(RoundRobinPartitioner::new()));
  let partitions = runtime.partition(vec![1.0, 2.0, 3.0]);
  assert_eq!(partitions.len(), 3);
  assert!(partitions.iter().all(|p| !p.is_empty()));
  assert!(runtime.partition(vec![]).is_empty());
}

#[test]
fn test_runtime_zero_parallelism_is_one() {
  let runtime = LocalRuntime::new(0, Box::new(HashPartitioner::new()));
  assert_eq!(runtime.parallelism(), 1);
}

#[tokio::test]
async fn test_map_partitions_preserves_order() {
  let runtime = LocalRuntime::new(3, Box::new(RoundRobinPartitioner::new()));
  let partitions = runtime.partition((1..=9).map(|v| v as f64).collect());
  let sums = runtime
    .map_partitions(&partitions, |values| values.iter().sum::<f64>())
    .await
    .unwrap();
  assert_eq!(sums, vec![12.0, 15.0, 18.0]);

  let indices = runtime
    .map_partitions_indexed(&partitions, |index, _| index)
    .await
    .unwrap();
  assert_eq!(indices, vec![0, 1, 2]);
  assert_eq!(reduce(sums, |a, b| a + b), Some(45.0));
}

#[test]
fn test_reduce_empty() {
  assert_eq!(reduce(Vec::<u64>::new(), |a, b| a + b), None);
}
