//! Partition median reducer.
//!
//! Each shard contributes one [`PivotCandidate`]: its local median and its share
//! of the current candidate set.

use crate::Value;
use crate::error::{Result, SelectionError};
use serde::{Deserialize, Serialize};

/// A shard's median together with the shard's weight in the candidate set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PivotCandidate {
  /// Median of the shard.
  pub median: Value,
  /// `|shard| / N` for the round's current `N`.
  pub weight: f64,
}

/// Returns the lower median of `values`: the element at 0-based index
/// `(len - 1) / 2` of the sorted sequence.
///
/// Uses `select_nth_unstable_by`, so runs in expected linear time on a copy of
/// the input.
pub fn lower_median(values: &[Value]) -> Result<Value> {
  if values.is_empty() {
    return Err(SelectionError::invariant(
      "cannot take the median of an empty partition",
    ));
  }
  let mut scratch = values.to_vec();
  let middle = (scratch.len() - 1) / 2;
  let (_, median, _) = scratch.select_nth_unstable_by(middle, |a, b| a.total_cmp(b));
  Ok(*median)
}

/// Computes the pivot candidate of one partition.
///
/// `current_n` is the size of the whole candidate set at the start of the round,
/// not the size of the original input.
pub fn partition_median(values: &[Value], current_n: u64) -> Result<PivotCandidate> {
  if current_n == 0 {
    return Err(SelectionError::invariant(
      "partition median requested for an empty candidate set",
    ));
  }
  let median = lower_median(values)?;
  Ok(PivotCandidate {
    median,
    weight: values.len() as f64 / current_n as f64,
  })
}
