//! Redis-backed coordination store.
//!
//! Uses a multiplexed [`ConnectionManager`]. Connecting retries with exponential
//! backoff before giving up, so an unreachable server fails [`RedisStore::connect`]
//! with [`StoreError::Connection`] only after a few seconds. This store adds no
//! retry of its own.

use super::CoordinationStore;
use crate::error::StoreError;
use ::redis::{AsyncCommands, Client, aio::ConnectionManager};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

/// [`CoordinationStore`] over a Redis server.
pub struct RedisStore {
  connection: Mutex<Option<ConnectionManager>>,
  key_prefix: String,
}

impl RedisStore {
  /// Connects to the server at `connection_url` (e.g. `redis://localhost:6379`).
  pub async fn connect(
    connection_url: &str,
    key_prefix: impl Into<String>,
  ) -> Result<Self, StoreError> {
    let client =
      Client::open(connection_url).map_err(|e| StoreError::Connection(e.to_string()))?;
    let manager = client
      .get_connection_manager()
      .await
      .map_err(|e| StoreError::Connection(e.to_string()))?;
    debug!(url = %connection_url, "connected to redis coordination store");
    Ok(Self {
      connection: Mutex::new(Some(manager)),
      key_prefix: key_prefix.into(),
    })
  }

  async fn connection(&self) -> Result<ConnectionManager, StoreError> {
    self
      .connection
      .lock()
      .await
      .as_ref()
      .cloned()
      .ok_or(StoreError::Closed)
  }
}

#[async_trait]
impl CoordinationStore for RedisStore {
  fn key_prefix(&self) -> &str {
    &self.key_prefix
  }

  async fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
    let mut conn = self.connection().await?;
    let _: () = conn.set(key, value).await?;
    Ok(())
  }

  async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
    let mut conn = self.connection().await?;
    let value: Option<String> = conn.get(key).await?;
    Ok(value)
  }

  async fn push_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
    let mut conn = self.connection().await?;
    let _: i64 = conn.rpush(key, value).await?;
    Ok(())
  }

  async fn list_raw(&self, key: &str) -> Result<Vec<String>, StoreError> {
    let mut conn = self.connection().await?;
    let values: Vec<String> = conn.lrange(key, 0, -1).await?;
    Ok(values)
  }

  async fn delete(&self, keys: &[String]) -> Result<(), StoreError> {
    if keys.is_empty() {
      return Ok(());
    }
    let mut conn = self.connection().await?;
    let _: i64 = conn.del(keys).await?;
    Ok(())
  }

  async fn close(&self) -> Result<(), StoreError> {
    self.connection.lock().await.take();
    Ok(())
  }
}
