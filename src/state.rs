//! Snapshot of the cross-round selection state.

use crate::Value;
use crate::error::StoreError;
use crate::store::CoordinationStore;
use serde::{Deserialize, Serialize};

/// The scalar state a solve keeps in the coordination store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
  /// Target rank relative to the current candidate set.
  pub k: u64,
  /// Size of the current candidate set.
  pub n: u64,
  /// Serial-resolution threshold.
  pub t: u64,
  /// Rounds run so far.
  pub iterations: u32,
  /// Whether the answer has been resolved.
  pub result_found: bool,
  /// The resolved value; `Some` only if `result_found`.
  pub result: Option<Value>,
}

impl SelectionState {
  /// Reads the current state from the store.
  pub async fn load(store: &dyn CoordinationStore) -> Result<Self, StoreError> {
    let result_found = store.get_result_found().await?;
    let result = if result_found {
      Some(store.get_result().await?)
    } else {
      None
    };
    Ok(Self {
      k: store.get_k().await?,
      n: store.get_n().await?,
      t: store.get_t().await?,
      iterations: store.get_number_of_iterations().await?,
      result_found,
      result,
    })
  }
}
