//! # Result Sinks
//!
//! Consumers of [`SelectionResult`]s. Sinks are shared behind `Arc`, so
//! implementations use interior mutability.
//!
//! - [`CollectSink`]: keeps results in memory
//! - [`TracingSink`]: logs each result
//! - [`JsonLinesSink`]: appends each result as a JSON line to a file

use crate::error::Result;
use crate::result::SelectionResult;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

/// A consumer of selection results.
#[async_trait]
pub trait Sink: Send + Sync {
  /// Handles one result.
  async fn process_result(&self, result: &SelectionResult) -> Result<()>;
}

/// Collects results in memory. Clones share the same collection.
#[derive(Clone, Debug, Default)]
pub struct CollectSink {
  results: Arc<Mutex<Vec<SelectionResult>>>,
}

impl CollectSink {
  /// Creates an empty sink.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns a copy of everything collected so far.
  pub async fn results(&self) -> Vec<SelectionResult> {
    self.results.lock().await.clone()
  }
}

#[async_trait]
impl Sink for CollectSink {
  async fn process_result(&self, result: &SelectionResult) -> Result<()> {
    self.results.lock().await.push(result.clone());
    Ok(())
  }
}

/// Logs every result at `info` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

#[async_trait]
impl Sink for TracingSink {
  async fn process_result(&self, result: &SelectionResult) -> Result<()> {
    info!(
      k = result.k,
      t = result.t,
      p = ?result.p,
      value = result.value,
      iterations = result.iterations,
      method = ?result.method,
      "selection result"
    );
    Ok(())
  }
}

/// Appends results to a file, one JSON object per line.
#[derive(Clone, Debug)]
pub struct JsonLinesSink {
  path: PathBuf,
  lock: Arc<Mutex<()>>,
}

impl JsonLinesSink {
  /// Creates a sink appending to `path`. The file is created on first write.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      lock: Arc::new(Mutex::new(())),
    }
  }
}

#[async_trait]
impl Sink for JsonLinesSink {
  async fn process_result(&self, result: &SelectionResult) -> Result<()> {
    let mut line = serde_json::to_vec(result).map_err(std::io::Error::from)?;
    line.push(b'\n');

    let _guard = self.lock.lock().await;
    let mut file = tokio::fs::OpenOptions::new()
      .create(true)
      .append(true)
      .open(&self.path)
      .await?;
    file.write_all(&line).await?;
    file.flush().await?;
    Ok(())
  }
}
