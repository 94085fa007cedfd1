//! Tests for value sources.

use crate::source::{
  AllEqualSource, ExponentialSource, FileSource, SortedDescSource, Source, UniformSource,
  VecSource, ValueStream, collect_values,
};
use futures::stream;
use std::io::Write;

#[tokio::test]
async fn test_vec_source() {
  let source = VecSource::from(vec![3.0, 1.0, 2.0]);
  assert_eq!(source.count(), 3);
  assert_eq!(collect_values(&source).await.unwrap(), vec![3.0, 1.0, 2.0]);
}

#[tokio::test]
async fn test_uniform_source_range_and_seed() {
  let source = UniformSource::new(500, 10.0, 20.0).unwrap().with_seed(4);
  let first = collect_values(&source).await.unwrap();
  assert_eq!(first.len(), 500);
  assert!(first.iter().all(|v| (10.0..20.0).contains(v)));
  assert_eq!(collect_values(&source).await.unwrap(), first);
}

#[test]
fn test_uniform_source_rejects_empty_range() {
  assert!(UniformSource::new(1, 5.0, 5.0).is_err());
  assert!(UniformSource::new(1, 0.0, f64::INFINITY).is_err());
}

#[tokio::test]
async fn test_exponential_source_non_negative() {
  let source = ExponentialSource::new(1000, 2.0).unwrap().with_seed(8);
  let values = collect_values(&source).await.unwrap();
  assert_eq!(values.len(), 1000);
  assert!(values.iter().all(|v| v.is_finite() && *v >= 0.0));
  let mean = values.iter().sum::<f64>() / values.len() as f64;
  assert!(mean > 0.3 && mean < 0.7, "mean {} far from 0.5", mean);
  assert!(ExponentialSource::new(1, 0.0).is_err());
}

#[tokio::test]
async fn test_sorted_desc_source() {
  let values = collect_values(&SortedDescSource::new(4)).await.unwrap();
  assert_eq!(values, vec![4.0, 3.0, 2.0, 1.0]);
}

#[tokio::test]
async fn test_all_equal_source() {
  let values = collect_values(&AllEqualSource::new(3, 1.5)).await.unwrap();
  assert_eq!(values, vec![1.5, 1.5, 1.5]);
}

#[tokio::test]
async fn test_file_source_skips_blank_lines() {
  let mut file = tempfile::NamedTempFile::new().unwrap();
  writeln!(file, "3.5\n\n  -1\n2e2").unwrap();
  let source = FileSource::open(file.path()).await.unwrap();
  assert_eq!(source.count(), 3);
  assert_eq!(collect_values(&source).await.unwrap(), vec![3.5, -1.0, 200.0]);
}

#[tokio::test]
async fn test_file_source_rejects_garbage() {
  let mut file = tempfile::NamedTempFile::new().unwrap();
  writeln!(file, "1.0\nnot-a-number").unwrap();
  assert!(FileSource::open(file.path()).await.is_err());
}

struct LyingSource;

impl Source for LyingSource {
  fn count(&self) -> u64 {
    5
  }

  fn produce(&self) -> ValueStream {
    Box::pin(stream::iter(vec![1.0, 2.0]))
  }
}

#[tokio::test]
async fn test_count_mismatch_detected() {
  assert!(collect_values(&LyingSource).await.is_err());
}
