//! Tests for classification and the decision rule.

use crate::classify::{ClassificationCounts, Decision, RoundContext, classify, decide};
use crate::error::SelectionError;

fn counts(less: u64, equal: u64, greater: u64) -> ClassificationCounts {
  ClassificationCounts {
    less,
    equal,
    greater,
  }
}

#[test]
fn test_classify_counts() {
  let c = classify(&[1.0, 5.0, 3.0, 3.0, 2.0, 9.0], 3.0);
  assert_eq!(c, counts(2, 2, 2));
  assert_eq!(c.total(), 6);
}

#[test]
fn test_counts_add() {
  assert_eq!(counts(1, 2, 3) + counts(4, 0, 1), counts(5, 2, 4));
}

#[test]
fn test_found_when_rank_hits_equal_band() {
  let d = decide(counts(2, 2, 2), 3.0, 3, 6).unwrap();
  assert_eq!(d, Decision::Found { result: 3.0 });
  let d = decide(counts(2, 2, 2), 3.0, 4, 6).unwrap();
  assert!(d.is_found());
}

#[test]
fn test_keep_less() {
  let d = decide(counts(2, 2, 2), 3.0, 2, 6).unwrap();
  assert_eq!(d, Decision::KeepLess { n: 2, k: 2 });
}

#[test]
fn test_keep_greater_rebases_rank() {
  let d = decide(counts(2, 2, 2), 3.0, 6, 6).unwrap();
  assert_eq!(d, Decision::KeepGreater { n: 2, k: 2 });
}

#[test]
fn test_all_equal_is_found() {
  let d = decide(counts(0, 10, 0), 1.0, 7, 10).unwrap();
  assert_eq!(d, Decision::Found { result: 1.0 });
}

#[test]
fn test_rank_out_of_range() {
  assert!(matches!(
    decide(counts(1, 1, 1), 1.0, 0, 3),
    Err(SelectionError::Invariant(_))
  ));
  assert!(matches!(
    decide(counts(1, 1, 1), 1.0, 4, 3),
    Err(SelectionError::Invariant(_))
  ));
}

#[test]
fn test_count_mismatch() {
  assert!(decide(counts(1, 1, 1), 1.0, 1, 4).is_err());
}

#[test]
fn test_filter_follows_decision() {
  let values = [1.0, 5.0, 3.0, 3.0, 2.0, 9.0];
  let less = RoundContext {
    pivot: 3.0,
    decision: Decision::KeepLess { n: 2, k: 1 },
  };
  assert_eq!(less.filter(&values), vec![1.0, 2.0]);

  let greater = RoundContext {
    pivot: 3.0,
    decision: Decision::KeepGreater { n: 2, k: 1 },
  };
  assert_eq!(greater.filter(&values), vec![5.0, 9.0]);

  let found = RoundContext {
    pivot: 3.0,
    decision: Decision::Found { result: 3.0 },
  };
  assert_eq!(found.filter(&values), vec![3.0, 3.0]);
}

#[test]
fn test_next_n() {
  let c = counts(2, 3, 4);
  assert_eq!(Decision::Found { result: 0.0 }.next_n(&c), 3);
  assert_eq!(Decision::KeepGreater { n: 4, k: 1 }.next_n(&c), 4);
}
