//! # Classifier & Decision Engine
//!
//! Counts how the candidate set splits around the round's pivot and decides
//! what survives into the next round.
//!
//! ## Decision Rule
//!
//! With `l`, `e`, `g` the less/equal/greater counts and `k` the 1-based target rank:
//!
//! - `l < k <= l + e`: the pivot is the answer
//! - `k <= l`: keep values below the pivot, `k` unchanged
//! - `k > l + e`: keep values above the pivot, `k -= l + e`
//!
//! The chosen [`RoundContext`] is the only thing the filter step looks at, so the
//! filter can never disagree with the decision that was written to the store.

use crate::Value;
use crate::error::{Result, SelectionError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::Add;

/// Less/equal/greater counts of a candidate set relative to a pivot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationCounts {
  /// Values strictly below the pivot.
  pub less: u64,
  /// Values equal to the pivot.
  pub equal: u64,
  /// Values strictly above the pivot.
  pub greater: u64,
}

impl ClassificationCounts {
  /// Total number of classified values.
  pub fn total(&self) -> u64 {
    self.less + self.equal + self.greater
  }
}

impl Add for ClassificationCounts {
  type Output = ClassificationCounts;

  fn add(self, other: ClassificationCounts) -> ClassificationCounts {
    ClassificationCounts {
      less: self.less + other.less,
      equal: self.equal + other.equal,
      greater: self.greater + other.greater,
    }
  }
}

/// Classifies one partition against the pivot.
pub fn classify(values: &[Value], pivot: Value) -> ClassificationCounts {
  values
    .iter()
    .fold(ClassificationCounts::default(), |mut counts, value| {
      match value.total_cmp(&pivot) {
        Ordering::Less => counts.less += 1,
        Ordering::Equal => counts.equal += 1,
        Ordering::Greater => counts.greater += 1,
      }
      counts
    })
}

/// Outcome of one round's decision step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
  /// The pivot is the k-th smallest value.
  Found {
    /// The resolved value.
    result: Value,
  },
  /// Only values below the pivot can hold rank `k`.
  KeepLess {
    /// Size of the next candidate set.
    n: u64,
    /// Unchanged target rank.
    k: u64,
  },
  /// Only values above the pivot can hold rank `k`.
  KeepGreater {
    /// Size of the next candidate set.
    n: u64,
    /// Target rank relative to the next candidate set.
    k: u64,
  },
}

impl Decision {
  /// Returns true if the round resolved the answer.
  pub fn is_found(&self) -> bool {
    matches!(self, Decision::Found { .. })
  }

  /// Size of the candidate set after this decision.
  pub fn next_n(&self, counts: &ClassificationCounts) -> u64 {
    match self {
      Decision::Found { .. } => counts.equal,
      Decision::KeepLess { n, .. } | Decision::KeepGreater { n, .. } => *n,
    }
  }
}

/// Checks that rank `k` addresses an element of a candidate set of size `n`.
pub fn check_rank(k: u64, n: u64) -> Result<()> {
  if k == 0 || k > n {
    return Err(SelectionError::invariant(format!(
      "rank {} is outside the candidate set [1, {}]",
      k, n
    )));
  }
  Ok(())
}

/// Applies the decision rule for target rank `k` in a candidate set of size `n`.
pub fn decide(counts: ClassificationCounts, pivot: Value, k: u64, n: u64) -> Result<Decision> {
  check_rank(k, n)?;
  if counts.total() != n {
    return Err(SelectionError::invariant(format!(
      "classification counts {:?} do not sum to candidate set size {}",
      counts, n
    )));
  }

  let below_or_equal = counts.less + counts.equal;
  if k > counts.less && k <= below_or_equal {
    Ok(Decision::Found { result: pivot })
  } else if k <= counts.less {
    Ok(Decision::KeepLess { n: counts.less, k })
  } else {
    Ok(Decision::KeepGreater {
      n: counts.greater,
      k: k - below_or_equal,
    })
  }
}

/// The pivot and decision of one round, computed once and handed to the filter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundContext {
  /// The round's pivot.
  pub pivot: Value,
  /// The round's decision.
  pub decision: Decision,
}

impl RoundContext {
  /// Returns true if `value` belongs to the next round's candidate set.
  ///
  /// After a `Found` decision the values equal to the pivot are kept, so the
  /// remaining set stays non-empty for the final resolver.
  pub fn retains(&self, value: Value) -> bool {
    let ordering = value.total_cmp(&self.pivot);
    match self.decision {
      Decision::Found { .. } => ordering == Ordering::Equal,
      Decision::KeepLess { .. } => ordering == Ordering::Less,
      Decision::KeepGreater { .. } => ordering == Ordering::Greater,
    }
  }

  /// Filters one partition.
  pub fn filter(&self, values: &[Value]) -> Vec<Value> {
    values.iter().copied().filter(|v| self.retains(*v)).collect()
  }
}
