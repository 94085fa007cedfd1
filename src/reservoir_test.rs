//! Tests for reservoir sampling.

use crate::reservoir::{ReservoirSampler, sample_partition};

#[test]
fn test_capacity_at_least_n_keeps_everything() {
  let values: Vec<f64> = (1..=50).map(|v| v as f64).collect();
  let mut sample = sample_partition(&values, 50, Some(3));
  sample.sort_by(|a, b| a.total_cmp(b));
  assert_eq!(sample, values);

  let mut sample = sample_partition(&values, 500, None);
  sample.sort_by(|a, b| a.total_cmp(b));
  assert_eq!(sample, values);
}

#[test]
fn test_sample_bounded_by_capacity() {
  let values: Vec<f64> = (0..1000).map(|v| v as f64).collect();
  let sample = sample_partition(&values, 10, Some(1));
  assert_eq!(sample.len(), 10);
  assert!(sample.iter().all(|v| values.contains(v)));
}

#[test]
fn test_seeded_samples_reproducible() {
  let values: Vec<f64> = (0..1000).map(|v| v as f64).collect();
  assert_eq!(
    sample_partition(&values, 20, Some(42)),
    sample_partition(&values, 20, Some(42))
  );
}

#[test]
fn test_highest_priorities_retained() {
  let mut sampler = ReservoirSampler::with_seed(2, 0);
  sampler.offer_with_priority(1.0, 10);
  sampler.offer_with_priority(2.0, 30);
  sampler.offer_with_priority(3.0, 20);
  sampler.offer_with_priority(4.0, 5);
  assert_eq!(sampler.len(), 2);
  assert_eq!(sampler.into_values(), vec![3.0, 2.0]);
}

#[test]
fn test_duplicate_values_kept_separately() {
  let mut sampler = ReservoirSampler::with_seed(3, 9);
  for _ in 0..3 {
    sampler.offer(7.0);
  }
  assert_eq!(sampler.into_values(), vec![7.0, 7.0, 7.0]);
}

#[test]
fn test_zero_capacity() {
  let sampler = ReservoirSampler::new(0);
  assert!(sampler.is_empty());
  assert!(sample_partition(&[1.0, 2.0], 0, Some(1)).is_empty());
}
