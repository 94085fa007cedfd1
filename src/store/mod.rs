//! # Coordination Store
//!
//! Cross-round scalar state for a selection solve.
//!
//! Every round of the exact path is executed by stateless worker tasks, so the
//! target rank, the candidate-set size and the resolution flags live in a shared
//! key-value store instead. The store only needs read-after-write consistency
//! between rounds; exactly one logical step (the decision step) writes per round.
//!
//! ## Key Schema
//!
//! All keys are namespaced with a configurable prefix (default `selectweave-`):
//!
//! | Key | Type | Meaning |
//! |---|---|---|
//! | `k` | integer | current target rank |
//! | `n` | integer | current candidate-set size |
//! | `t` | integer | serial-resolution threshold |
//! | `result-found` | boolean | whether the answer has been resolved |
//! | `result` | float | the resolved value |
//! | `number-of-iterations` | integer | round counter |
//! | `k-list` | list | ranks registered for multi-selection |
//!
//! Values are stored as strings so that any string key-value backend can hold them.
//! Backends implement the raw string operations; the typed accessors are provided.

mod memory;
mod redis_backend;

pub use self::memory::MemoryStore;
pub use self::redis_backend::RedisStore;

use crate::config::{StoreBackend, StoreConfig};
use crate::error::StoreError;
use async_trait::async_trait;
use std::str::FromStr;

/// Keys of the coordination store schema, without namespace prefix.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StoreKey {
  /// Current target rank.
  K,
  /// Current candidate-set size.
  N,
  /// Serial-resolution threshold.
  T,
  /// Whether the answer has been resolved.
  ResultFound,
  /// The resolved value.
  Result,
  /// Round counter.
  NumberOfIterations,
  /// Ranks registered by multi-selection.
  Ranks,
}

impl StoreKey {
  /// Every key of the schema, used by [`CoordinationStore::reset`].
  pub const ALL: [StoreKey; 7] = [
    StoreKey::K,
    StoreKey::N,
    StoreKey::T,
    StoreKey::ResultFound,
    StoreKey::Result,
    StoreKey::NumberOfIterations,
    StoreKey::Ranks,
  ];

  /// The un-prefixed key name.
  pub fn as_str(&self) -> &'static str {
    match self {
      StoreKey::K => "k",
      StoreKey::N => "n",
      StoreKey::T => "t",
      StoreKey::ResultFound => "result-found",
      StoreKey::Result => "result",
      StoreKey::NumberOfIterations => "number-of-iterations",
      StoreKey::Ranks => "k-list",
    }
  }
}

/// Access to the shared key-value store holding [`SelectionState`](crate::SelectionState).
///
/// Implementors provide string primitives; typed accessors parse on read and
/// fail with [`StoreError::MissingKey`] or [`StoreError::Malformed`] rather than
/// substituting defaults.
#[async_trait]
pub trait CoordinationStore: Send + Sync {
  /// Namespace prepended to every key.
  fn key_prefix(&self) -> &str;

  /// Stores a scalar value, overwriting any previous value.
  async fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError>;

  /// Reads a scalar value, `None` if never written.
  async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

  /// Appends to a list value.
  async fn push_raw(&self, key: &str, value: String) -> Result<(), StoreError>;

  /// Reads a whole list value, empty if never written.
  async fn list_raw(&self, key: &str) -> Result<Vec<String>, StoreError>;

  /// Removes the given keys. Missing keys are ignored.
  async fn delete(&self, keys: &[String]) -> Result<(), StoreError>;

  /// Releases the connection. Every later call fails with [`StoreError::Closed`].
  async fn close(&self) -> Result<(), StoreError>;

  /// Returns the fully qualified key.
  fn qualify(&self, key: StoreKey) -> String {
    format!("{}{}", self.key_prefix(), key.as_str())
  }

  /// Removes all schema keys so a new solve starts from a clean slate.
  async fn reset(&self) -> Result<(), StoreError> {
    let keys: Vec<String> = StoreKey::ALL.iter().map(|key| self.qualify(*key)).collect();
    self.delete(&keys).await
  }

  /// Sets the current target rank.
  async fn set_k(&self, k: u64) -> Result<(), StoreError> {
    self.set_raw(&self.qualify(StoreKey::K), k.to_string()).await
  }

  /// Reads the current target rank.
  async fn get_k(&self) -> Result<u64, StoreError> {
    read_parsed(self, StoreKey::K).await
  }

  /// Sets the current candidate-set size.
  async fn set_n(&self, n: u64) -> Result<(), StoreError> {
    self.set_raw(&self.qualify(StoreKey::N), n.to_string()).await
  }

  /// Reads the current candidate-set size.
  async fn get_n(&self) -> Result<u64, StoreError> {
    read_parsed(self, StoreKey::N).await
  }

  /// Sets the serial-resolution threshold.
  async fn set_t(&self, t: u64) -> Result<(), StoreError> {
    self.set_raw(&self.qualify(StoreKey::T), t.to_string()).await
  }

  /// Reads the serial-resolution threshold.
  async fn get_t(&self) -> Result<u64, StoreError> {
    read_parsed(self, StoreKey::T).await
  }

  /// Sets the result-found flag.
  async fn set_result_found(&self, found: bool) -> Result<(), StoreError> {
    self
      .set_raw(&self.qualify(StoreKey::ResultFound), found.to_string())
      .await
  }

  /// Reads the result-found flag. An unset flag reads as `false`.
  async fn get_result_found(&self) -> Result<bool, StoreError> {
    match self.get_raw(&self.qualify(StoreKey::ResultFound)).await? {
      Some(raw) => parse_value(&self.qualify(StoreKey::ResultFound), raw),
      None => Ok(false),
    }
  }

  /// Sets the resolved value.
  async fn set_result(&self, result: f64) -> Result<(), StoreError> {
    self
      .set_raw(&self.qualify(StoreKey::Result), result.to_string())
      .await
  }

  /// Reads the resolved value.
  async fn get_result(&self) -> Result<f64, StoreError> {
    read_parsed(self, StoreKey::Result).await
  }

  /// Sets the round counter.
  async fn set_number_of_iterations(&self, iterations: u32) -> Result<(), StoreError> {
    self
      .set_raw(
        &self.qualify(StoreKey::NumberOfIterations),
        iterations.to_string(),
      )
      .await
  }

  /// Reads the round counter.
  async fn get_number_of_iterations(&self) -> Result<u32, StoreError> {
    read_parsed(self, StoreKey::NumberOfIterations).await
  }

  /// Registers an additional rank for multi-selection.
  async fn add_k(&self, k: u64) -> Result<(), StoreError> {
    self
      .push_raw(&self.qualify(StoreKey::Ranks), k.to_string())
      .await
  }

  /// Reads every registered rank, in registration order.
  async fn get_ks(&self) -> Result<Vec<u64>, StoreError> {
    let key = self.qualify(StoreKey::Ranks);
    self
      .list_raw(&key)
      .await?
      .into_iter()
      .map(|raw| parse_value(&key, raw))
      .collect()
  }
}

async fn read_parsed<S, T>(store: &S, key: StoreKey) -> Result<T, StoreError>
where
  S: CoordinationStore + ?Sized,
  T: FromStr + Send,
{
  let key = store.qualify(key);
  match store.get_raw(&key).await? {
    Some(raw) => parse_value(&key, raw),
    None => Err(StoreError::MissingKey(key)),
  }
}

fn parse_value<T: FromStr>(key: &str, raw: String) -> Result<T, StoreError> {
  raw.parse::<T>().map_err(|_| StoreError::Malformed {
    key: key.to_string(),
    value: raw,
  })
}

/// Opens store connections for a solve.
///
/// A solve acquires one connection at start and closes it when done, so the
/// connector is what problem drivers hold on to.
#[async_trait]
pub trait StoreConnector: Send + Sync {
  /// Opens a new connection.
  async fn connect(&self) -> Result<Box<dyn CoordinationStore>, StoreError>;
}

#[async_trait]
impl StoreConnector for MemoryStore {
  async fn connect(&self) -> Result<Box<dyn CoordinationStore>, StoreError> {
    Ok(Box::new(self.session()))
  }
}

#[async_trait]
impl StoreConnector for StoreConfig {
  async fn connect(&self) -> Result<Box<dyn CoordinationStore>, StoreError> {
    match &self.backend {
      StoreBackend::Memory => Ok(Box::new(MemoryStore::new(self.key_prefix.clone()))),
      StoreBackend::Redis { connection_url } => {
        let store = RedisStore::connect(connection_url, self.key_prefix.clone()).await?;
        Ok(Box::new(store))
      }
    }
  }
}
