use super::validate_rank;
use crate::config::SelectionConfig;
use crate::error::{Result, SelectionError};
use crate::partitioner::HashPartitioner;
use crate::reservoir::sample_partition;
use crate::resolver::{RankSource, resolve};
use crate::result::{SelectionMethod, SelectionResult};
use crate::runtime::LocalRuntime;
use crate::sink::Sink;
use crate::source::{Source, collect_values};
use std::sync::Arc;
use tracing::{debug, info};

/// Approximate selection over a reservoir sample.
///
/// Each hash partition keeps at most `sample_size` values; the combined sample
/// is sorted and indexed at the same rank fraction that `k` is of the input.
/// Never touches the coordination store.
pub struct ApproximateSelectionProblem {
  source: Arc<dyn Source>,
  sink: Arc<dyn Sink>,
  k: u64,
  sample_size: u64,
  use_sink: bool,
  config: SelectionConfig,
}

impl ApproximateSelectionProblem {
  /// Creates a problem for rank `k` sampling `sample_size` values per partition.
  pub fn new(source: Arc<dyn Source>, sink: Arc<dyn Sink>, k: u64, sample_size: u64) -> Self {
    Self {
      source,
      sink,
      k,
      sample_size,
      use_sink: true,
      config: SelectionConfig::default(),
    }
  }

  /// Replaces the configuration.
  #[must_use]
  pub fn with_config(mut self, config: SelectionConfig) -> Self {
    self.config = config;
    self
  }

  /// Returns the result without handing it to the sink.
  #[must_use]
  pub fn without_sink(mut self) -> Self {
    self.use_sink = false;
    self
  }

  /// Solves the problem.
  ///
  /// # Errors
  ///
  /// Fails if `k` is outside `[1, N]` or the sample size is zero.
  pub async fn solve(&self) -> Result<SelectionResult> {
    self.config.validate()?;
    if self.sample_size == 0 {
      return Err(SelectionError::invalid_parameter(
        "sample-size",
        "must be at least 1",
      ));
    }
    let n = self.source.count();
    validate_rank(self.k, n)?;
    info!(
      k = self.k,
      n,
      sample_size = self.sample_size,
      "solving approximate selection"
    );

    let values = collect_values(self.source.as_ref()).await?;
    let runtime = LocalRuntime::new(self.config.parallelism, Box::new(HashPartitioner::new()));
    let partitions = runtime.partition(values);

    let capacity = usize::try_from(self.sample_size).unwrap_or(usize::MAX);
    let seed = self.config.seed;
    let sample: Vec<_> = runtime
      .map_partitions_indexed(&partitions, move |index, values| {
        sample_partition(values, capacity, seed.map(|s| s.wrapping_add(index as u64)))
      })
      .await?
      .into_iter()
      .flatten()
      .collect();
    debug!(sample = sample.len(), "reservoir sample collected");

    let value = resolve(sample, RankSource::Proportional { count: n, k: self.k }).await?;
    let result = SelectionResult {
      k: self.k,
      t: self.sample_size,
      p: None,
      value,
      iterations: 0,
      method: SelectionMethod::Approximate,
    };

    if self.use_sink {
      self.sink.process_result(&result).await?;
    }
    Ok(result)
  }
}
