//! Tests for result sinks.

use crate::result::{SelectionMethod, SelectionResult};
use crate::sink::{CollectSink, JsonLinesSink, Sink, TracingSink};

fn result(k: u64, value: f64) -> SelectionResult {
  SelectionResult {
    k,
    t: 10,
    p: None,
    value,
    iterations: 2,
    method: SelectionMethod::Exact,
  }
}

#[tokio::test]
async fn test_collect_sink_shared_between_clones() {
  let sink = CollectSink::new();
  let clone = sink.clone();
  clone.process_result(&result(1, 1.0)).await.unwrap();
  sink.process_result(&result(2, 2.0)).await.unwrap();
  let collected = sink.results().await;
  assert_eq!(collected.len(), 2);
  assert_eq!(collected[1].value, 2.0);
}

#[tokio::test]
async fn test_tracing_sink_accepts_results() {
  assert!(TracingSink.process_result(&result(1, 1.0)).await.is_ok());
}

#[tokio::test]
async fn test_json_lines_sink_appends() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("results.jsonl");
  let sink = JsonLinesSink::new(path.clone());
  sink.process_result(&result(1, 1.0)).await.unwrap();
  sink
    .process_result(&result(50, 7.5).with_percentile(50))
    .await
    .unwrap();

  let contents = std::fs::read_to_string(&path).unwrap();
  let lines: Vec<SelectionResult> = contents
    .lines()
    .map(|line| serde_json::from_str(line).unwrap())
    .collect();
  assert_eq!(lines.len(), 2);
  assert_eq!(lines[0], result(1, 1.0));
  assert_eq!(lines[1].p, Some(50));
  assert!(!contents.lines().next().unwrap().contains("\"p\""));
}
