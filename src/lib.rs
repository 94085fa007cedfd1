//! # SelectWeave
//!
//! Distributed k-th order statistic and percentile selection over partitioned
//! numeric data.
//!
//! SelectWeave finds the k-th smallest value of a large multiset without sorting
//! it. The exact path runs rounds of distributed quickselect: every partition
//! reports its lower median, a weighted median of those becomes the round's
//! pivot, and only the side of the pivot that can hold rank k survives. Once the
//! candidate set is small enough it is sorted locally. The approximate path
//! keeps a reservoir sample per shard and indexes the sorted sample instead.
//!
//! ## Key Features
//!
//! - **Exact selection**: any rank or percentile, bounded number of rounds
//! - **Multi-selection**: several ranks share reduction rounds
//! - **Approximate selection**: one pass over the data with bounded memory
//! - **Pluggable coordination store**: in-memory or Redis
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use selectweave::selection::{Target, solve};
//! use selectweave::config::SelectionConfig;
//! use selectweave::sink::TracingSink;
//! use selectweave::source::UniformSource;
//! use std::sync::Arc;
//!
//! # async fn example() -> selectweave::error::Result<()> {
//! let source = Arc::new(UniformSource::new(1_000_000, 0.0, 1.0)?.with_seed(7));
//! let results = solve(
//!   source,
//!   Arc::new(TracingSink),
//!   Target::Percentile(99),
//!   10_000,
//!   None,
//!   SelectionConfig::default(),
//! )
//! .await?;
//! println!("p99 = {}", results[0].value);
//! # Ok(())
//! # }
//! ```

// Documentation enforcement - treat missing docs as errors
#![deny(missing_docs)]

/// A value of the multiset. Ordered with [`f64::total_cmp`].
pub type Value = f64;

/// Less/equal/greater classification and the per-round decision rule.
pub mod classify;
/// Solve configuration and store backend selection.
pub mod config;
/// Error types.
pub mod error;
/// Round-by-round driver of the exact path.
pub mod iteration;
/// Log subscriber setup.
pub mod logging;
/// Per-partition lower median.
pub mod median;
/// Boundary parameter parsing.
pub mod params;
/// Partitioning strategies for spreading values over workers.
pub mod partitioner;
/// Shard-local reservoir sampling.
pub mod reservoir;
/// Final serial resolution of a small candidate set.
pub mod resolver;
/// Selection results.
pub mod result;
/// Local data-parallel runtime.
pub mod runtime;
/// Selection problem drivers.
pub mod selection;
/// Result sinks.
pub mod sink;
/// Value sources.
pub mod source;
/// Snapshot of the cross-round selection state.
pub mod state;
/// Coordination store for cross-round scalar state.
pub mod store;
/// Weighted median of pivot candidates.
pub mod weighted_median;

pub use config::{SelectionConfig, StoreBackend, StoreConfig};
pub use error::{Result, SelectionError, StoreError};
pub use result::{SelectionMethod, SelectionResult};
pub use selection::{
  ApproximatePercentile, ApproximateSelectionProblem, MultiSelectionProblem, Percentile,
  SelectionProblem, Target, solve,
};
pub use state::SelectionState;

#[cfg(test)]
mod classify_test;
#[cfg(test)]
mod logging_test;
#[cfg(test)]
mod partitioner_test;
#[cfg(test)]
mod reservoir_test;
#[cfg(test)]
mod resolver_test;
#[cfg(test)]
mod sink_test;
#[cfg(test)]
mod source_test;
#[cfg(test)]
mod store_test;
#[cfg(test)]
mod weighted_median_test;
