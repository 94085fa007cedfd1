//! # Data Sources
//!
//! Producers of the values a selection problem runs over. Every source knows its
//! element count up front; selection needs N before the first round starts.
//!
//! ## Sources
//!
//! - [`VecSource`]: values already in memory
//! - [`UniformSource`]: uniformly distributed random values
//! - [`ExponentialSource`]: exponentially distributed random values
//! - [`SortedDescSource`]: `n, n - 1, ..., 1`
//! - [`AllEqualSource`]: one value repeated `n` times
//! - [`FileSource`]: newline-delimited numbers read from a file

use crate::Value;
use crate::error::{Result, SelectionError};
use futures::{Stream, StreamExt, stream};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::pin::Pin;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;

/// Stream of values produced by a [`Source`].
pub type ValueStream = Pin<Box<dyn Stream<Item = Value> + Send>>;

/// A producer of values with a known count.
pub trait Source: Send + Sync {
  /// Number of values [`produce`](Source::produce) yields.
  fn count(&self) -> u64;

  /// Produces the values. Each call starts a fresh stream.
  fn produce(&self) -> ValueStream;
}

/// Drains a source into memory, checking it yields exactly the count it reports.
pub async fn collect_values(source: &dyn Source) -> Result<Vec<Value>> {
  let values: Vec<Value> = source.produce().collect().await;
  if values.len() as u64 != source.count() {
    return Err(SelectionError::invariant(format!(
      "source reported {} values but produced {}",
      source.count(),
      values.len()
    )));
  }
  Ok(values)
}

fn rng_for(seed: Option<u64>) -> StdRng {
  match seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_entropy(),
  }
}

/// Values already held in memory.
#[derive(Clone, Debug, Default)]
pub struct VecSource {
  values: Vec<Value>,
}

impl VecSource {
  /// Wraps the given values.
  pub fn new(values: Vec<Value>) -> Self {
    Self { values }
  }
}

impl From<Vec<Value>> for VecSource {
  fn from(values: Vec<Value>) -> Self {
    Self::new(values)
  }
}

impl Source for VecSource {
  fn count(&self) -> u64 {
    self.values.len() as u64
  }

  fn produce(&self) -> ValueStream {
    Box::pin(stream::iter(self.values.clone()))
  }
}

/// Uniformly distributed values in `[low, high)`.
#[derive(Clone, Debug)]
pub struct UniformSource {
  n: u64,
  low: Value,
  high: Value,
  seed: Option<u64>,
}

impl UniformSource {
  /// Creates a source of `n` values in `[low, high)`.
  ///
  /// # Errors
  ///
  /// Returns an error unless `low < high` and both are finite.
  pub fn new(n: u64, low: Value, high: Value) -> Result<Self> {
    if !(low.is_finite() && high.is_finite() && low < high) {
      return Err(SelectionError::invalid_parameter(
        "range",
        format!("[{}, {}) is not a non-empty finite range", low, high),
      ));
    }
    Ok(Self {
      n,
      low,
      high,
      seed: None,
    })
  }

  /// Makes the produced values reproducible.
  #[must_use]
  pub fn with_seed(mut self, seed: u64) -> Self {
    self.seed = Some(seed);
    self
  }
}

impl Source for UniformSource {
  fn count(&self) -> u64 {
    self.n
  }

  fn produce(&self) -> ValueStream {
    let Self { n, low, high, seed } = self.clone();
    Box::pin(async_stream::stream! {
      let mut rng = rng_for(seed);
      for _ in 0..n {
        yield rng.gen_range(low..high);
      }
    })
  }
}

/// Exponentially distributed values with rate `lambda`.
#[derive(Clone, Debug)]
pub struct ExponentialSource {
  n: u64,
  lambda: f64,
  seed: Option<u64>,
}

impl ExponentialSource {
  /// Creates a source of `n` values with rate `lambda`.
  ///
  /// # Errors
  ///
  /// Returns an error unless `lambda` is finite and positive.
  pub fn new(n: u64, lambda: f64) -> Result<Self> {
    if !(lambda.is_finite() && lambda > 0.0) {
      return Err(SelectionError::invalid_parameter(
        "lambda",
        format!("{} is not a positive rate", lambda),
      ));
    }
    Ok(Self {
      n,
      lambda,
      seed: None,
    })
  }

  /// Makes the produced values reproducible.
  #[must_use]
  pub fn with_seed(mut self, seed: u64) -> Self {
    self.seed = Some(seed);
    self
  }
}

impl Source for ExponentialSource {
  fn count(&self) -> u64 {
    self.n
  }

  fn produce(&self) -> ValueStream {
    let Self { n, lambda, seed } = self.clone();
    Box::pin(async_stream::stream! {
      let mut rng = rng_for(seed);
      for _ in 0..n {
        // Inverse transform; 1 - u lies in (0, 1] so the logarithm is finite.
        let u: f64 = rng.gen_range(0.0..1.0);
        yield -(1.0 - u).ln() / lambda;
      }
    })
  }
}

/// The values `n, n - 1, ..., 1` in descending order.
#[derive(Clone, Copy, Debug)]
pub struct SortedDescSource {
  n: u64,
}

impl SortedDescSource {
  /// Creates a source of `n` descending values.
  pub fn new(n: u64) -> Self {
    Self { n }
  }
}

impl Source for SortedDescSource {
  fn count(&self) -> u64 {
    self.n
  }

  fn produce(&self) -> ValueStream {
    Box::pin(stream::iter((1..=self.n).rev().map(|v| v as Value)))
  }
}

/// One value repeated `n` times.
#[derive(Clone, Copy, Debug)]
pub struct AllEqualSource {
  n: u64,
  value: Value,
}

impl AllEqualSource {
  /// Creates a source of `n` copies of `value`.
  pub fn new(n: u64, value: Value) -> Self {
    Self { n, value }
  }
}

impl Source for AllEqualSource {
  fn count(&self) -> u64 {
    self.n
  }

  fn produce(&self) -> ValueStream {
    Box::pin(stream::iter(std::iter::repeat_n(self.value, self.n as usize)))
  }
}

/// Newline-delimited numbers read from a file. Blank lines are skipped.
///
/// The file is read once on [`open`](FileSource::open) so that the count is known
/// and parse errors surface before any selection starts.
#[derive(Clone, Debug)]
pub struct FileSource {
  values: Vec<Value>,
}

impl FileSource {
  /// Reads and parses the file at `path`.
  ///
  /// # Errors
  ///
  /// Returns [`SelectionError::Io`] if the file cannot be read or a line is not a number.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let file = tokio::fs::File::open(path.as_ref()).await?;
    let mut lines = LinesStream::new(BufReader::new(file).lines());
    let mut values = Vec::new();
    let mut line_number = 0usize;

    while let Some(line) = lines.next().await {
      let line = line?;
      line_number += 1;
      let trimmed = line.trim();
      if trimmed.is_empty() {
        continue;
      }
      let value = trimmed.parse::<Value>().map_err(|e| {
        std::io::Error::new(
          std::io::ErrorKind::InvalidData,
          format!("line {}: `{}` is not a number: {}", line_number, trimmed, e),
        )
      })?;
      values.push(value);
    }

    Ok(Self { values })
  }
}

impl Source for FileSource {
  fn count(&self) -> u64 {
    self.values.len() as u64
  }

  fn produce(&self) -> ValueStream {
    Box::pin(stream::iter(self.values.clone()))
  }
}
