use super::{close_store, connector_for, exact_runtime, validate_rank};
use crate::Value;
use crate::classify::{Decision, RoundContext};
use crate::config::SelectionConfig;
use crate::error::{Result, SelectionError};
use crate::iteration::{IterationController, seed_state};
use crate::resolver::{RankSource, resolve};
use crate::result::{SelectionMethod, SelectionResult};
use crate::sink::Sink;
use crate::source::{Source, collect_values};
use crate::store::{CoordinationStore, StoreConnector};
use std::sync::Arc;
use tracing::{debug, info};

/// Candidate set shared by every rank after the common reduction rounds.
struct SharedReduction {
  candidates: Vec<Value>,
  /// Number of discarded values below the candidate set.
  offset: u64,
  rounds: u32,
}

/// Solves several ranks over one input.
///
/// Reduction rounds are shared while every pending rank falls on the same side
/// of the pivot. Once the ranks straddle a pivot, or the shared set fits the
/// serial threshold, each rank is finished on its own copy of the reduced set.
pub struct MultiSelectionProblem {
  source: Arc<dyn Source>,
  sink: Arc<dyn Sink>,
  ks: Vec<u64>,
  t: u64,
  config: SelectionConfig,
  connector: Option<Arc<dyn StoreConnector>>,
}

impl MultiSelectionProblem {
  /// Creates a problem for ranks `ks` with serial threshold `t`.
  pub fn new(source: Arc<dyn Source>, sink: Arc<dyn Sink>, ks: Vec<u64>, t: u64) -> Self {
    Self {
      source,
      sink,
      ks,
      t,
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

  /// Solves every rank, returning results in the order the ranks were given.
  ///
  /// # Errors
  ///
  /// Fails if no rank is given, any rank is outside `[1, N]`, or the store is
  /// unavailable.
  pub async fn solve(&self) -> Result<Vec<SelectionResult>> {
    self.config.validate()?;
    if self.ks.is_empty() {
      return Err(SelectionError::invalid_parameter("k", "no ranks given"));
    }
    let n = self.source.count();
    for k in &self.ks {
      validate_rank(*k, n)?;
    }
    info!(ks = ?self.ks, n, t = self.t, "solving multi-selection");

    let store = connector_for(&self.connector, &self.config)
      .connect()
      .await?;
    let outcome = self.solve_with_store(store.as_ref(), n).await;
    close_store(store.as_ref()).await;
    let results = outcome?;

    for result in &results {
      self.sink.process_result(result).await?;
    }
    Ok(results)
  }

  async fn solve_with_store(
    &self,
    store: &dyn CoordinationStore,
    n: u64,
  ) -> Result<Vec<SelectionResult>> {
    store.reset().await?;
    for k in &self.ks {
      store.add_k(*k).await?;
    }
    store.set_n(n).await?;
    store.set_t(self.t).await?;

    let values = collect_values(self.source.as_ref()).await?;
    let shared = self.reduce_shared(store, values).await?;
    debug!(
      remaining = shared.candidates.len(),
      offset = shared.offset,
      rounds = shared.rounds,
      "shared reduction complete"
    );

    let ks = store.get_ks().await?;
    let remaining = shared.candidates.len() as u64;
    let mut results = Vec::with_capacity(ks.len());

    if remaining <= self.t {
      let mut sorted = shared.candidates;
      sorted.sort_by(|a, b| a.total_cmp(b));
      for k in ks {
        let index = (k - shared.offset)
          .checked_sub(1)
          .and_then(|i| usize::try_from(i).ok());
        let value = index
          .and_then(|i| sorted.get(i).copied())
          .ok_or_else(|| {
            SelectionError::invariant(format!(
              "rank {} is outside the {} shared candidates at offset {}",
              k,
              sorted.len(),
              shared.offset
            ))
          })?;
        results.push(self.result(k, value, shared.rounds));
      }
      return Ok(results);
    }

    let runtime = exact_runtime(&self.config);
    let controller = IterationController::new(&runtime, store, self.config.max_iterations);
    for k in ks {
      seed_state(store, k - shared.offset, remaining, self.t).await?;
      let outcome = controller.run(shared.candidates.clone()).await?;
      let value = resolve(outcome.remaining, RankSource::Store(store)).await?;
      results.push(self.result(k, value, shared.rounds + outcome.iterations));
    }
    Ok(results)
  }

  /// Runs rounds that discard one side of the pivot while every registered rank
  /// lies on the other side.
  async fn reduce_shared(
    &self,
    store: &dyn CoordinationStore,
    values: Vec<Value>,
  ) -> Result<SharedReduction> {
    let runtime = exact_runtime(&self.config);
    let controller = IterationController::new(&runtime, store, self.config.max_iterations);
    let ks = store.get_ks().await?;
    let mut reduction = SharedReduction {
      candidates: values,
      offset: 0,
      rounds: 0,
    };

    loop {
      let n = store.get_n().await?;
      if n <= self.t {
        break;
      }
      if reduction.rounds >= self.config.max_iterations {
        return Err(SelectionError::IterationLimit {
          max: self.config.max_iterations,
        });
      }

      let partitions = runtime.partition(std::mem::take(&mut reduction.candidates));
      let (pivot, counts) = controller.pivot_and_counts(&partitions, n).await?;
      let relative: Vec<u64> = ks.iter().map(|k| k - reduction.offset).collect();
      let below_or_equal = counts.less + counts.equal;

      let decision = if relative.iter().all(|k| *k <= counts.less) {
        Decision::KeepLess {
          n: counts.less,
          k: relative.iter().copied().min().unwrap_or_default(),
        }
      } else if relative.iter().all(|k| *k > below_or_equal) {
        Decision::KeepGreater {
          n: counts.greater,
          k: relative.iter().copied().min().unwrap_or_default() - below_or_equal,
        }
      } else {
        reduction.candidates = partitions
          .iter()
          .flat_map(|partition| partition.iter().copied())
          .collect();
        break;
      };

      reduction.rounds += 1;
      reduction.candidates = controller
        .filter(&partitions, RoundContext { pivot, decision })
        .await?;
      if let Decision::KeepGreater { .. } = decision {
        reduction.offset += below_or_equal;
      }
      store.set_n(decision.next_n(&counts)).await?;
      store
        .set_number_of_iterations(reduction.rounds)
        .await?;
      debug!(
        round = reduction.rounds,
        n,
        pivot,
        decision = ?decision,
        "shared reduction round complete"
      );
    }
    Ok(reduction)
  }

  fn result(&self, k: u64, value: Value, iterations: u32) -> SelectionResult {
    SelectionResult {
      k,
      t: self.t,
      p: None,
      value,
      iterations,
      method: SelectionMethod::Exact,
    }
  }
}
