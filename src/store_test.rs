//! Tests for the coordination store and its in-memory backend.

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::state::SelectionState;
use crate::store::{CoordinationStore, MemoryStore, StoreConnector, StoreKey};

#[tokio::test]
async fn test_typed_round_trip_of_scalars() {
  let store = MemoryStore::default();
  store.set_k(5).await.unwrap();
  store.set_n(100).await.unwrap();
  store.set_t(10).await.unwrap();
  store.set_number_of_iterations(3).await.unwrap();
  store.set_result_found(true).await.unwrap();
  store.set_result(-1.25).await.unwrap();

  let state = SelectionState::load(&store).await.unwrap();
  assert_eq!(
    state,
    SelectionState {
      k: 5,
      n: 100,
      t: 10,
      iterations: 3,
      result_found: true,
      result: Some(-1.25),
    }
  );
}

#[tokio::test]
async fn test_keys_are_prefixed() {
  let store = MemoryStore::new("job-7-");
  assert_eq!(store.qualify(StoreKey::K), "job-7-k");
  assert_eq!(store.qualify(StoreKey::ResultFound), "job-7-result-found");
  assert_eq!(
    store.qualify(StoreKey::NumberOfIterations),
    "job-7-number-of-iterations"
  );

  store.set_n(9).await.unwrap();
  assert_eq!(store.get_raw("job-7-n").await.unwrap(), Some("9".to_string()));
}

#[tokio::test]
async fn test_missing_key_is_error() {
  let store = MemoryStore::default();
  assert!(matches!(store.get_k().await, Err(StoreError::MissingKey(_))));
}

#[tokio::test]
async fn test_unset_result_found_reads_false() {
  let store = MemoryStore::default();
  assert!(!store.get_result_found().await.unwrap());
}

#[tokio::test]
async fn test_malformed_value_is_error() {
  let store = MemoryStore::default();
  let key = store.qualify(StoreKey::N);
  store.set_raw(&key, "many".to_string()).await.unwrap();
  match store.get_n().await {
    Err(StoreError::Malformed { key: k, value }) => {
      assert_eq!(k, key);
      assert_eq!(value, "many");
    }
    other => panic!("expected malformed error, got {:?}", other),
  }
}

#[tokio::test]
async fn test_ranks_keep_registration_order() {
  let store = MemoryStore::default();
  for k in [30, 10, 20] {
    store.add_k(k).await.unwrap();
  }
  assert_eq!(store.get_ks().await.unwrap(), vec![30, 10, 20]);
}

#[tokio::test]
async fn test_reset_clears_all_keys() {
  let store = MemoryStore::default();
  store.set_k(1).await.unwrap();
  store.add_k(1).await.unwrap();
  store.reset().await.unwrap();
  assert!(store.get_k().await.is_err());
  assert!(store.get_ks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_closed_store_rejects_calls() {
  let store = MemoryStore::default();
  store.close().await.unwrap();
  assert!(store.is_closed());
  assert!(matches!(store.set_k(1).await, Err(StoreError::Closed)));
  assert!(matches!(store.get_ks().await, Err(StoreError::Closed)));
}

#[tokio::test]
async fn test_session_shares_data_not_lifetime() {
  let store = MemoryStore::default();
  let session = store.connect().await.unwrap();
  session.set_k(4).await.unwrap();
  session.close().await.unwrap();

  assert!(!store.is_closed());
  assert_eq!(store.get_k().await.unwrap(), 4);
}

#[tokio::test]
async fn test_memory_config_connects() {
  let store = StoreConfig::default()
    .with_key_prefix("cfg-")
    .connect()
    .await
    .unwrap();
  assert_eq!(store.key_prefix(), "cfg-");
  store.set_t(2).await.unwrap();
  assert_eq!(store.get_t().await.unwrap(), 2);
}
