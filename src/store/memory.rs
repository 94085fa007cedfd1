//! Process-local coordination store.
//!
//! Satisfies the read-after-write contract with a shared map behind a mutex.
//! Cloning a [`MemoryStore`] shares the data; [`MemoryStore::session`] also shares
//! the data but gets its own open/closed state, which is how one solve's
//! connection is closed without invalidating the handle a test keeps.

use super::CoordinationStore;
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct MemoryState {
  values: HashMap<String, String>,
  lists: HashMap<String, Vec<String>>,
}

/// In-memory [`CoordinationStore`].
#[derive(Clone, Debug)]
pub struct MemoryStore {
  state: Arc<Mutex<MemoryState>>,
  closed: Arc<AtomicBool>,
  key_prefix: String,
}

impl MemoryStore {
  /// Creates an empty store using the given key namespace.
  pub fn new(key_prefix: impl Into<String>) -> Self {
    Self {
      state: Arc::new(Mutex::new(MemoryState::default())),
      closed: Arc::new(AtomicBool::new(false)),
      key_prefix: key_prefix.into(),
    }
  }

  /// Opens another connection onto the same data.
  pub fn session(&self) -> Self {
    Self {
      state: Arc::clone(&self.state),
      closed: Arc::new(AtomicBool::new(false)),
      key_prefix: self.key_prefix.clone(),
    }
  }

  /// Returns true once [`CoordinationStore::close`] was called on this handle.
  pub fn is_closed(&self) -> bool {
    self.closed.load(Ordering::Acquire)
  }

  fn ensure_open(&self) -> Result<(), StoreError> {
    if self.is_closed() {
      Err(StoreError::Closed)
    } else {
      Ok(())
    }
  }
}

impl Default for MemoryStore {
  fn default() -> Self {
    Self::new(crate::config::DEFAULT_KEY_PREFIX)
  }
}

#[async_trait]
impl CoordinationStore for MemoryStore {
  fn key_prefix(&self) -> &str {
    &self.key_prefix
  }

  async fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
    self.ensure_open()?;
    self.state.lock().await.values.insert(key.to_string(), value);
    Ok(())
  }

  async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
    self.ensure_open()?;
    Ok(self.state.lock().await.values.get(key).cloned())
  }

  async fn push_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
    self.ensure_open()?;
    self
      .state
      .lock()
      .await
      .lists
      .entry(key.to_string())
      .or_default()
      .push(value);
    Ok(())
  }

  async fn list_raw(&self, key: &str) -> Result<Vec<String>, StoreError> {
    self.ensure_open()?;
    Ok(
      self
        .state
        .lock()
        .await
        .lists
        .get(key)
        .cloned()
        .unwrap_or_default(),
    )
  }

  async fn delete(&self, keys: &[String]) -> Result<(), StoreError> {
    self.ensure_open()?;
    let mut state = self.state.lock().await;
    for key in keys {
      state.values.remove(key);
      state.lists.remove(key);
    }
    Ok(())
  }

  async fn close(&self) -> Result<(), StoreError> {
    self.closed.store(true, Ordering::Release);
    Ok(())
  }
}
