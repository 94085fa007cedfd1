//! Selection results handed to sinks.

use crate::Value;
use serde::{Deserialize, Serialize};

/// How a result was computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
  /// Iterative distributed quickselect; the value is the exact order statistic.
  Exact,
  /// Reservoir sample; the value approximates the order statistic.
  Approximate,
}

/// The answer for one requested rank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
  /// Requested 1-based rank in the original input.
  pub k: u64,
  /// Serial threshold, or the sample size on the approximate path.
  pub t: u64,
  /// Requested percentile, if the rank was derived from one.
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub p: Option<u8>,
  /// The selected value.
  pub value: Value,
  /// Exact-path rounds run; zero on the approximate path.
  pub iterations: u32,
  /// How the value was computed.
  pub method: SelectionMethod,
}

impl SelectionResult {
  /// Records the percentile this rank was derived from.
  #[must_use]
  pub fn with_percentile(mut self, p: u8) -> Self {
    self.p = Some(p);
    self
  }
}
