use super::{close_store, connector_for, exact_runtime, validate_rank};
use crate::config::SelectionConfig;
use crate::error::Result;
use crate::iteration::{IterationController, seed_state};
use crate::resolver::{RankSource, resolve};
use crate::result::{SelectionMethod, SelectionResult};
use crate::sink::Sink;
use crate::source::{Source, collect_values};
use crate::store::{CoordinationStore, StoreConnector};
use std::sync::Arc;
use tracing::info;

/// Exact selection: finds the k-th smallest value of the source.
///
/// Rounds of distributed quickselect shrink the candidate set until the pivot
/// is the answer or at most `t` candidates remain, which are then sorted locally.
///
/// # Example
///
/// ```rust,no_run
/// use selectweave::selection::SelectionProblem;
/// use selectweave::sink::CollectSink;
/// use selectweave::source::VecSource;
/// use std::sync::Arc;
///
/// # async fn example() -> selectweave::error::Result<()> {
/// let source = Arc::new(VecSource::new(vec![5.0, 1.0, 4.0, 2.0, 3.0]));
/// let sink = Arc::new(CollectSink::new());
/// let result = SelectionProblem::new(source, sink, 2, 1).solve().await?;
/// assert_eq!(result.value, 2.0);
/// # Ok(())
/// # }
/// ```
pub struct SelectionProblem {
  source: Arc<dyn Source>,
  sink: Arc<dyn Sink>,
  k: u64,
  t: u64,
  use_sink: bool,
  config: SelectionConfig,
  connector: Option<Arc<dyn StoreConnector>>,
}

impl SelectionProblem {
  /// Creates a problem for rank `k` with serial threshold `t`.
  pub fn new(source: Arc<dyn Source>, sink: Arc<dyn Sink>, k: u64, t: u64) -> Self {
    Self {
      source,
      sink,
      k,
      t,
      use_sink: true,
      config: SelectionConfig::default(),
      connector: None,
    }
  }

  /// Replaces the configuration.
  #[must_use]
  pub fn with_config(mut self, config: SelectionConfig) -> Self {
    self.config = config;
    self
  }

  /// Uses the given store connector instead of the configured backend.
  #[must_use]
  pub fn with_store(mut self, connector: Arc<dyn StoreConnector>) -> Self {
    self.connector = Some(connector);
    self
  }

  /// Returns the result without handing it to the sink.
  #[must_use]
  pub fn without_sink(mut self) -> Self {
    self.use_sink = false;
    self
  }

  /// Target rank.
  pub fn k(&self) -> u64 {
    self.k
  }

  /// Serial threshold.
  pub fn t(&self) -> u64 {
    self.t
  }

  /// Solves the problem.
  ///
  /// # Errors
  ///
  /// Fails if `k` is outside `[1, N]`, the store is unavailable, or an internal
  /// invariant is violated.
  pub async fn solve(&self) -> Result<SelectionResult> {
    self.config.validate()?;
    let n = self.source.count();
    validate_rank(self.k, n)?;
    info!(k = self.k, n, t = self.t, "solving exact selection");

    let store = connector_for(&self.connector, &self.config)
      .connect()
      .await?;
    let outcome = self.solve_with_store(store.as_ref(), n).await;
    close_store(store.as_ref()).await;
    let result = outcome?;

    info!(
      k = result.k,
      value = result.value,
      iterations = result.iterations,
      "exact selection solved"
    );
    if self.use_sink {
      self.sink.process_result(&result).await?;
    }
    Ok(result)
  }

  async fn solve_with_store(
    &self,
    store: &dyn CoordinationStore,
    n: u64,
  ) -> Result<SelectionResult> {
    store.reset().await?;
    seed_state(store, self.k, n, self.t).await?;

    let values = collect_values(self.source.as_ref()).await?;
    let runtime = exact_runtime(&self.config);
    let outcome = IterationController::new(&runtime, store, self.config.max_iterations)
      .run(values)
      .await?;
    let value = resolve(outcome.remaining, RankSource::Store(store)).await?;

    Ok(SelectionResult {
      k: self.k,
      t: self.t,
      p: None,
      value,
      iterations: outcome.iterations,
      method: SelectionMethod::Exact,
    })
  }
}
