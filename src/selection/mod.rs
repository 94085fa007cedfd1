//! # Selection Problems
//!
//! Drivers that tie a [`Source`], the selection core and a [`Sink`] together.
//!
//! - [`SelectionProblem`]: exact k-th smallest value via iterative rounds
//! - [`ApproximateSelectionProblem`]: k-th smallest value of a reservoir sample
//! - [`MultiSelectionProblem`]: many ranks against one shared reduced set
//! - [`Percentile`] / [`ApproximatePercentile`]: the same, addressed by percentile
//!
//! [`solve`] dispatches a [`Target`] to the right driver.
//!
//! ## Store Lifetime
//!
//! Drivers that use the coordination store connect once at the start of a solve
//! and close the connection when the solve ends, whether it succeeded or not.

mod approximate;
mod exact;
mod multi;
mod percentile;

pub use self::approximate::ApproximateSelectionProblem;
pub use self::exact::SelectionProblem;
pub use self::multi::MultiSelectionProblem;
pub use self::percentile::{ApproximatePercentile, Percentile, percentile_rank};

use crate::config::SelectionConfig;
use crate::error::{Result, SelectionError};
use crate::partitioner::partitioner_for;
use crate::result::SelectionResult;
use crate::runtime::LocalRuntime;
use crate::sink::Sink;
use crate::source::Source;
use crate::store::{CoordinationStore, StoreConnector};
use std::sync::Arc;
use tracing::warn;

/// What a solve is asked to find.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
  /// The k-th smallest value, 1-based.
  Rank(u64),
  /// Several ranks solved together.
  Ranks(Vec<u64>),
  /// The p-th percentile, `1..=100`.
  Percentile(u8),
}

/// Solves `target` over `source` and hands every result to `sink`.
///
/// With a `sample_size` the approximate path is used; it is not available for
/// [`Target::Ranks`]. `t` is the serial threshold of the exact path.
pub async fn solve(
  source: Arc<dyn Source>,
  sink: Arc<dyn Sink>,
  target: Target,
  t: u64,
  sample_size: Option<u64>,
  config: SelectionConfig,
) -> Result<Vec<SelectionResult>> {
  let result = match (target, sample_size) {
    (Target::Rank(k), None) => {
      SelectionProblem::new(source, sink, k, t)
        .with_config(config)
        .solve()
        .await?
    }
    (Target::Rank(k), Some(sample_size)) => {
      ApproximateSelectionProblem::new(source, sink, k, sample_size)
        .with_config(config)
        .solve()
        .await?
    }
    (Target::Percentile(p), None) => {
      Percentile::new(source, sink, p, t)?
        .with_config(config)
        .solve()
        .await?
    }
    (Target::Percentile(p), Some(sample_size)) => {
      ApproximatePercentile::new(source, sink, p, sample_size)?
        .with_config(config)
        .solve()
        .await?
    }
    (Target::Ranks(ks), None) => {
      return MultiSelectionProblem::new(source, sink, ks, t)
        .with_config(config)
        .solve()
        .await;
    }
    (Target::Ranks(_), Some(_)) => {
      return Err(SelectionError::invalid_parameter(
        "sample-size",
        "the approximate path solves a single rank or percentile",
      ));
    }
  };
  Ok(vec![result])
}

/// Checks that rank `k` addresses an element of an input of `n` values.
pub(crate) fn validate_rank(k: u64, n: u64) -> Result<()> {
  if n == 0 {
    return Err(SelectionError::invalid_parameter(
      "source",
      "the input holds no values",
    ));
  }
  if k == 0 || k > n {
    return Err(SelectionError::invalid_parameter(
      "k",
      format!("rank {} is outside [1, {}]", k, n),
    ));
  }
  Ok(())
}

/// The connector a driver uses: an explicit one if set, else the configured backend.
pub(crate) fn connector_for(
  explicit: &Option<Arc<dyn StoreConnector>>,
  config: &SelectionConfig,
) -> Arc<dyn StoreConnector> {
  match explicit {
    Some(connector) => Arc::clone(connector),
    None => Arc::new(config.store.clone()),
  }
}

/// Runtime for exact-path rounds, partitioned as configured.
pub(crate) fn exact_runtime(config: &SelectionConfig) -> LocalRuntime {
  LocalRuntime::new(
    config.parallelism,
    partitioner_for(config.partitioning, config.seed),
  )
}

/// Closes a store connection, logging instead of failing: the solve outcome
/// has already been decided.
pub(crate) async fn close_store(store: &dyn CoordinationStore) {
  if let Err(e) = store.close().await {
    warn!(error = %e, "failed to close coordination store connection");
  }
}
