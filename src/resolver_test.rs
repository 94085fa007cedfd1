//! Tests for the final serial resolver.

use crate::resolver::{RankSource, proportional_rank, resolve, select_sorted};
use crate::store::{CoordinationStore, MemoryStore};

#[test]
fn test_select_sorted() {
  assert_eq!(select_sorted(vec![5.0, 3.0, 1.0, 4.0, 2.0], 3).unwrap(), 3.0);
  assert_eq!(select_sorted(vec![5.0, 3.0, 1.0], 1).unwrap(), 1.0);
  assert_eq!(select_sorted(vec![5.0, 3.0, 1.0], 3).unwrap(), 5.0);
}

#[test]
fn test_select_sorted_out_of_range() {
  assert!(select_sorted(vec![], 1).is_err());
  assert!(select_sorted(vec![1.0], 0).is_err());
  assert!(select_sorted(vec![1.0], 2).is_err());
}

#[test]
fn test_proportional_rank_rounds_up() {
  // 3 of 30 remain, rank 20 of 30 -> ceil(2.0) = 2.
  assert_eq!(proportional_rank(3, 30, 20).unwrap(), 2);
  // ceil(3 * 21 / 30) = ceil(2.1) = 3.
  assert_eq!(proportional_rank(3, 30, 21).unwrap(), 3);
  assert_eq!(proportional_rank(100, 1000, 500).unwrap(), 50);
  assert!(proportional_rank(3, 0, 1).is_err());
}

#[tokio::test]
async fn test_resolve_proportional() {
  let value = resolve(vec![30.0, 10.0, 20.0], RankSource::Proportional { count: 30, k: 20 })
    .await
    .unwrap();
  assert_eq!(value, 20.0);
}

#[tokio::test]
async fn test_resolve_from_store_rank() {
  let store = MemoryStore::default();
  store.set_k(3).await.unwrap();
  store.set_result_found(false).await.unwrap();
  let value = resolve(vec![1.0, 2.0, 3.0, 4.0, 5.0], RankSource::Store(&store))
    .await
    .unwrap();
  assert_eq!(value, 3.0);
}

#[tokio::test]
async fn test_resolve_uses_stored_result_when_found() {
  let store = MemoryStore::default();
  store.set_result_found(true).await.unwrap();
  store.set_result(42.5).await.unwrap();
  let value = resolve(vec![], RankSource::Store(&store)).await.unwrap();
  assert_eq!(value, 42.5);
}
