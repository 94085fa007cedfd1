//! # Iteration Controller
//!
//! Drives rounds of distributed quickselect over a shrinking candidate set:
//!
//! ```text
//! partition -> median per partition -> weighted median pivot
//!           -> classify -> decide -> write store -> filter
//! ```
//!
//! ## States
//!
//! - **Init**: the store holds the seeded k, N, t; no round has run.
//! - **Round**: one round runs against the current candidate set.
//! - **Terminated**: the pivot was the answer, or N dropped to the serial
//!   threshold and the caller resolves the remainder locally.
//!
//! The store is the only place k and N live between rounds. Exactly one writer,
//! this controller, mutates it, and only after the per-partition counts were
//! reduced to a single triple.

use crate::Value;
use crate::classify::{ClassificationCounts, Decision, RoundContext, check_rank, classify, decide};
use crate::error::{Result, SelectionError};
use crate::median::partition_median;
use crate::runtime::{LocalRuntime, Partition, reduce};
use crate::store::CoordinationStore;
use crate::weighted_median::weighted_median;
use tracing::debug;

/// State of the iteration state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IterationState {
  /// Seeded, no round run yet.
  Init,
  /// Another round is due.
  Round,
  /// No further rounds.
  Terminated,
}

/// What happened in one round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundReport {
  /// 1-based round number.
  pub iteration: u32,
  /// Candidate-set size at the start of the round.
  pub n: u64,
  /// Target rank at the start of the round.
  pub k: u64,
  /// The round's pivot and decision.
  pub context: RoundContext,
  /// Less/equal/greater counts against the pivot.
  pub counts: ClassificationCounts,
}

/// Result of driving the controller to termination.
#[derive(Clone, Debug)]
pub struct IterationOutcome {
  /// Candidate set left after the last round.
  pub remaining: Vec<Value>,
  /// Total rounds recorded in the store.
  pub iterations: u32,
  /// Whether a round resolved the answer.
  pub result_found: bool,
  /// Per-round reports, in order.
  pub rounds: Vec<RoundReport>,
}

/// Seeds the store for a new solve: target rank, candidate-set size, serial
/// threshold, zero rounds, no result.
pub async fn seed_state(store: &dyn CoordinationStore, k: u64, n: u64, t: u64) -> Result<()> {
  store.set_k(k).await?;
  store.set_n(n).await?;
  store.set_t(t).await?;
  store.set_number_of_iterations(0).await?;
  store.set_result_found(false).await?;
  Ok(())
}

/// Runs exact-path rounds until termination.
pub struct IterationController<'a> {
  runtime: &'a LocalRuntime,
  store: &'a dyn CoordinationStore,
  max_iterations: u32,
}

impl<'a> IterationController<'a> {
  /// Creates a controller over a seeded store.
  pub fn new(
    runtime: &'a LocalRuntime,
    store: &'a dyn CoordinationStore,
    max_iterations: u32,
  ) -> Self {
    Self {
      runtime,
      store,
      max_iterations,
    }
  }

  /// Runs rounds against `candidates` until the answer is found or the
  /// candidate set is no larger than the serial threshold.
  pub async fn run(&self, candidates: Vec<Value>) -> Result<IterationOutcome> {
    let t = self.store.get_t().await?;
    let mut iterations = self.store.get_number_of_iterations().await?;
    let mut candidates = candidates;
    let mut rounds = Vec::new();
    let mut result_found = self.store.get_result_found().await?;
    let mut state = IterationState::Init;

    loop {
      state = match state {
        IterationState::Init => {
          let n = self.store.get_n().await?;
          if result_found || n <= t {
            IterationState::Terminated
          } else {
            IterationState::Round
          }
        }
        IterationState::Round => {
          if iterations >= self.max_iterations {
            return Err(SelectionError::IterationLimit {
              max: self.max_iterations,
            });
          }
          iterations += 1;
          let (next, report) = self.round(candidates, iterations).await?;
          self.store.set_number_of_iterations(iterations).await?;
          candidates = next;
          result_found = report.context.decision.is_found();
          rounds.push(report);

          if result_found || (candidates.len() as u64) <= t {
            IterationState::Terminated
          } else {
            IterationState::Round
          }
        }
        IterationState::Terminated => break,
      };
    }

    debug!(
      iterations,
      result_found,
      remaining = candidates.len(),
      "iteration terminated"
    );
    Ok(IterationOutcome {
      remaining: candidates,
      iterations,
      result_found,
      rounds,
    })
  }

  /// Runs a single round and records its decision in the store.
  ///
  /// Returns the next candidate set, filtered with the same [`RoundContext`]
  /// that was written to the store.
  pub async fn round(
    &self,
    candidates: Vec<Value>,
    iteration: u32,
  ) -> Result<(Vec<Value>, RoundReport)> {
    let k = self.store.get_k().await?;
    let n = self.store.get_n().await?;
    check_rank(k, n)?;
    if candidates.len() as u64 != n {
      return Err(SelectionError::invariant(format!(
        "candidate set holds {} values but the store records n = {}",
        candidates.len(),
        n
      )));
    }

    let partitions = self.runtime.partition(candidates);
    let (pivot, counts) = self.pivot_and_counts(&partitions, n).await?;

    let decision = decide(counts, pivot, k, n)?;
    self.record(decision).await?;

    let context = RoundContext { pivot, decision };
    let next = self.filter(&partitions, context).await?;

    debug!(
      iteration,
      n,
      k,
      pivot,
      less = counts.less,
      equal = counts.equal,
      greater = counts.greater,
      decision = ?decision,
      "selection round complete"
    );

    Ok((
      next,
      RoundReport {
        iteration,
        n,
        k,
        context,
        counts,
      },
    ))
  }

  /// Computes the round's pivot from per-partition medians and classifies every
  /// partition against it. `n` is the size of the whole candidate set.
  pub async fn pivot_and_counts(
    &self,
    partitions: &[Partition],
    n: u64,
  ) -> Result<(Value, ClassificationCounts)> {
    let pivot_candidates = self
      .runtime
      .map_partitions(partitions, move |values| partition_median(values, n))
      .await?
      .into_iter()
      .collect::<Result<Vec<_>>>()?;
    let pivot = weighted_median(&pivot_candidates)?;

    let per_partition = self
      .runtime
      .map_partitions(partitions, move |values| classify(values, pivot))
      .await?;
    let counts = reduce(per_partition, |a, b| a + b).unwrap_or_default();
    if counts.total() != n {
      return Err(SelectionError::invariant(format!(
        "classification counts {:?} do not sum to candidate set size {}",
        counts, n
      )));
    }
    Ok((pivot, counts))
  }

  /// Produces the next candidate set from the round's context.
  pub async fn filter(
    &self,
    partitions: &[Partition],
    context: RoundContext,
  ) -> Result<Vec<Value>> {
    Ok(
      self
        .runtime
        .map_partitions(partitions, move |values| context.filter(values))
        .await?
        .into_iter()
        .flatten()
        .collect(),
    )
  }

  async fn record(&self, decision: Decision) -> Result<()> {
    match decision {
      Decision::Found { result } => {
        self.store.set_result(result).await?;
        self.store.set_result_found(true).await?;
      }
      Decision::KeepLess { n, .. } => {
        self.store.set_n(n).await?;
      }
      Decision::KeepGreater { n, k } => {
        self.store.set_n(n).await?;
        self.store.set_k(k).await?;
      }
    }
    Ok(())
  }
}
