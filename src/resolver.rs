//! Final serial resolver.
//!
//! Once the candidate set is small, one worker sorts it and indexes into it.

use crate::Value;
use crate::error::{Result, SelectionError};
use crate::store::CoordinationStore;

/// Where the resolver takes its rank from.
pub enum RankSource<'a> {
  /// Exact path: the store's current k, or its stored result if already found.
  Store(&'a dyn CoordinationStore),
  /// Reduced sample: `k` of the original `count` values, rescaled to the
  /// remaining set's size.
  Proportional {
    /// Size of the original input.
    count: u64,
    /// Rank requested of the original input.
    k: u64,
  },
}

/// Rescales rank `k` of `count` values to a set of `remaining` values:
/// `ceil(remaining / count * k)`, computed in integers.
pub fn proportional_rank(remaining: usize, count: u64, k: u64) -> Result<u64> {
  if count == 0 {
    return Err(SelectionError::invariant(
      "cannot rescale a rank against an empty input",
    ));
  }
  let scaled = (remaining as u128 * k as u128).div_ceil(count as u128);
  Ok(scaled as u64)
}

/// Returns the element of 1-based rank `k` of `values` after sorting them.
pub fn select_sorted(mut values: Vec<Value>, k: u64) -> Result<Value> {
  if values.is_empty() {
    return Err(SelectionError::invariant(
      "the remaining candidate set is empty",
    ));
  }
  if k == 0 || k > values.len() as u64 {
    return Err(SelectionError::invariant(format!(
      "rank {} exceeds the {} remaining candidates",
      k,
      values.len()
    )));
  }
  values.sort_by(|a, b| a.total_cmp(b));
  Ok(values[(k - 1) as usize])
}

/// Resolves the answer from the remaining candidate set.
///
/// With a store that already reports the result as found, the stored result is
/// returned and `remaining` is not inspected.
pub async fn resolve(remaining: Vec<Value>, rank: RankSource<'_>) -> Result<Value> {
  let k = match rank {
    RankSource::Store(store) => {
      if store.get_result_found().await? {
        return Ok(store.get_result().await?);
      }
      store.get_k().await?
    }
    RankSource::Proportional { count, k } => proportional_rank(remaining.len(), count, k)?,
  };
  select_sorted(remaining, k)
}
