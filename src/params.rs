//! Boundary parameter parsing.
//!
//! Arguments follow the usual long-flag syntax, `--key value` or `--key=value`:
//!
//! - `--k <rank>` or `--k a,b,c` for several ranks
//! - `--p <percentile>` in `1..=100`
//! - `--t <threshold>`, defaulting to a caller-supplied value
//! - `--sample-size <n>` selecting the approximate path
//!
//! Exactly one of `k` and `p` is required. Every rejection, including a request
//! for `--help`, surfaces as [`SelectionError::InvalidParameter`] carrying the
//! rendered message.

use crate::error::{Result, SelectionError};
use crate::selection::Target;
use clap::Parser;
use clap::error::{ContextKind, ContextValue};

/// Command-line surface of a selection solve.
#[derive(Parser, Debug)]
#[command(name = "selectweave")]
#[command(about = "Select the k-th smallest value or a percentile of a numeric input")]
struct Args {
  /// Rank to select, 1-based, or a comma-separated list of ranks
  #[arg(long, conflicts_with = "p", required_unless_present = "p")]
  k: Option<String>,

  /// Percentile to select
  #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
  p: Option<u8>,

  /// Candidate-set size at or below which the exact path sorts locally
  #[arg(long)]
  t: Option<u64>,

  /// Values kept per shard; selects the approximate path
  #[arg(long = "sample-size", value_parser = clap::value_parser!(u64).range(1..))]
  sample_size: Option<u64>,
}

/// Validated solve parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Params {
  /// What to select.
  pub target: Target,
  /// Serial threshold of the exact path.
  pub t: u64,
  /// Reservoir size per shard; selects the approximate path when set.
  pub sample_size: Option<u64>,
}

impl Params {
  /// Parses long-flag arguments, without a leading program name. `default_t` is
  /// used when `--t` is absent.
  ///
  /// # Errors
  ///
  /// Returns [`SelectionError::InvalidParameter`] for malformed, unknown,
  /// duplicated, missing or conflicting parameters.
  pub fn parse<I, S>(args: I, default_t: u64) -> Result<Self>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let argv = std::iter::once("selectweave".to_string())
      .chain(args.into_iter().map(|arg| arg.as_ref().to_string()));
    let args = Args::try_parse_from(argv).map_err(invalid_from_clap)?;

    let target = match (args.k, args.p) {
      (Some(k), _) => parse_ranks(&k)?,
      (None, Some(p)) => Target::Percentile(p),
      (None, None) => {
        return Err(SelectionError::invalid_parameter(
          "k",
          "one of k or p is required",
        ));
      }
    };

    Ok(Self {
      target,
      t: args.t.unwrap_or(default_t),
      sample_size: args.sample_size,
    })
  }
}

/// Maps a clap rejection onto the offending parameter's name.
fn invalid_from_clap(err: clap::Error) -> SelectionError {
  let name = match err.get(ContextKind::InvalidArg) {
    Some(ContextValue::String(arg)) => arg_name(arg),
    Some(ContextValue::Strings(args)) => args
      .first()
      .map(|arg| arg_name(arg))
      .unwrap_or_else(|| "arguments".to_string()),
    _ => "arguments".to_string(),
  };
  SelectionError::invalid_parameter(name, err.render().to_string())
}

// "--sample-size <SAMPLE_SIZE>" -> "sample-size"
fn arg_name(rendered: &str) -> String {
  rendered
    .split_whitespace()
    .next()
    .unwrap_or(rendered)
    .trim_start_matches('-')
    .to_string()
}

fn parse_ranks(raw: &str) -> Result<Target> {
  let ks = raw
    .split(',')
    .map(|k| {
      let k = k.trim();
      let rank: u64 = k.parse().map_err(|_| {
        SelectionError::invalid_parameter("k", format!("'{}' is not a valid rank", k))
      })?;
      if rank == 0 {
        return Err(SelectionError::invalid_parameter("k", "ranks are 1-based"));
      }
      Ok(rank)
    })
    .collect::<Result<Vec<_>>>()?;

  match ks.as_slice() {
    [k] => Ok(Target::Rank(*k)),
    _ => Ok(Target::Ranks(ks)),
  }
}
