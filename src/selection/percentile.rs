use super::{ApproximateSelectionProblem, SelectionProblem};
use crate::config::SelectionConfig;
use crate::error::{Result, SelectionError};
use crate::result::SelectionResult;
use crate::sink::Sink;
use crate::source::Source;
use crate::store::StoreConnector;
use std::sync::Arc;

/// Rank of the p-th percentile of `n` values: `ceil(n / 100 * p)`.
///
/// # Errors
///
/// Fails unless `p` is in `1..=100` and `n` is non-zero.
pub fn percentile_rank(n: u64, p: u8) -> Result<u64> {
  if !(1..=100).contains(&p) {
    return Err(SelectionError::invalid_parameter(
      "p",
      format!("percentile {} is outside [1, 100]", p),
    ));
  }
  if n == 0 {
    return Err(SelectionError::invalid_parameter(
      "source",
      "the input holds no values",
    ));
  }
  Ok((n as u128 * p as u128).div_ceil(100) as u64)
}

/// Exact percentile: a [`SelectionProblem`] for the percentile's rank.
pub struct Percentile {
  problem: SelectionProblem,
  sink: Arc<dyn Sink>,
  p: u8,
}

impl Percentile {
  /// Creates a problem for the p-th percentile with serial threshold `t`.
  ///
  /// # Errors
  ///
  /// Fails if `p` is outside `1..=100` or the source is empty.
  pub fn new(source: Arc<dyn Source>, sink: Arc<dyn Sink>, p: u8, t: u64) -> Result<Self> {
    let k = percentile_rank(source.count(), p)?;
    Ok(Self {
      problem: SelectionProblem::new(source, Arc::clone(&sink), k, t).without_sink(),
      sink,
      p,
    })
  }

  /// Replaces the configuration.
  #[must_use]
  pub fn with_config(mut self, config: SelectionConfig) -> Self {
    self.problem = self.problem.with_config(config);
    self
  }

  /// Uses the given store connector instead of the configured backend.
  #[must_use]
  pub fn with_store(mut self, connector: Arc<dyn StoreConnector>) -> Self {
    self.problem = self.problem.with_store(connector);
    self
  }

  /// Rank the percentile maps to.
  pub fn k(&self) -> u64 {
    self.problem.k()
  }

  /// Solves the problem and hands the result to the sink.
  pub async fn solve(&self) -> Result<SelectionResult> {
    let result = self.problem.solve().await?.with_percentile(self.p);
    self.sink.process_result(&result).await?;
    Ok(result)
  }
}

/// Approximate percentile: an [`ApproximateSelectionProblem`] for the
/// percentile's rank.
pub struct ApproximatePercentile {
  problem: ApproximateSelectionProblem,
  sink: Arc<dyn Sink>,
  p: u8,
  k: u64,
}

impl ApproximatePercentile {
  /// Creates a problem for the p-th percentile sampling `sample_size` values
  /// per partition.
  ///
  /// # Errors
  ///
  /// Fails if `p` is outside `1..=100` or the source is empty.
  pub fn new(
    source: Arc<dyn Source>,
    sink: Arc<dyn Sink>,
    p: u8,
    sample_size: u64,
  ) -> Result<Self> {
    let k = percentile_rank(source.count(), p)?;
    Ok(Self {
      problem: ApproximateSelectionProblem::new(source, Arc::clone(&sink), k, sample_size)
        .without_sink(),
      sink,
      p,
      k,
    })
  }

  /// Replaces the configuration.
  #[must_use]
  pub fn with_config(mut self, config: SelectionConfig) -> Self {
    self.problem = self.problem.with_config(config);
    self
  }

  /// Rank the percentile maps to.
  pub fn k(&self) -> u64 {
    self.k
  }

  /// Solves the problem and hands the result to the sink.
  pub async fn solve(&self) -> Result<SelectionResult> {
    let result = self.problem.solve().await?.with_percentile(self.p);
    self.sink.process_result(&result).await?;
    Ok(result)
  }
}
