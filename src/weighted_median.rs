//! Weighted median aggregation of pivot candidates.
//!
//! Collected onto a single worker: the number of candidates is bounded by the
//! partition count, not by N.

use crate::Value;
use crate::error::{Result, SelectionError};
use crate::median::PivotCandidate;

/// Cumulative weight at which the weighted median is reached.
pub const WEIGHTED_MEDIAN_THRESHOLD: f64 = 0.5;

/// Returns the median of the first candidate, in ascending median order, whose
/// cumulative weight reaches one half.
///
/// If rounding leaves the total weight just short of one half, the largest
/// median is returned.
pub fn weighted_median(candidates: &[PivotCandidate]) -> Result<Value> {
  let mut sorted = candidates.to_vec();
  sorted.sort_by(|a, b| a.median.total_cmp(&b.median));

  let last = sorted.last().copied().ok_or_else(|| {
    SelectionError::invariant("weighted median requested for zero pivot candidates")
  })?;

  let mut cumulative = 0.0;
  for candidate in &sorted {
    cumulative += candidate.weight;
    if cumulative >= WEIGHTED_MEDIAN_THRESHOLD {
      return Ok(candidate.median);
    }
  }
  Ok(last.median)
}
