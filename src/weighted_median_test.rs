//! Tests for weighted median aggregation.

use crate::median::PivotCandidate;
use crate::weighted_median::weighted_median;

fn candidate(median: f64, weight: f64) -> PivotCandidate {
  PivotCandidate { median, weight }
}

#[test]
fn test_equal_weights_cross_at_half() {
  // Four candidates at 0.25 each: cumulative 0.25, 0.5 -> second smallest.
  let candidates = [
    candidate(40.0, 0.25),
    candidate(10.0, 0.25),
    candidate(30.0, 0.25),
    candidate(20.0, 0.25),
  ];
  assert_eq!(weighted_median(&candidates).unwrap(), 20.0);
}

#[test]
fn test_odd_count_equal_weights() {
  let third = 1.0 / 3.0;
  let candidates = [
    candidate(3.0, third),
    candidate(1.0, third),
    candidate(2.0, third),
  ];
  assert_eq!(weighted_median(&candidates).unwrap(), 2.0);
}

#[test]
fn test_heavy_candidate_dominates() {
  let candidates = [
    candidate(1.0, 0.1),
    candidate(2.0, 0.1),
    candidate(100.0, 0.8),
  ];
  assert_eq!(weighted_median(&candidates).unwrap(), 100.0);
}

#[test]
fn test_heavy_first_candidate() {
  let candidates = [candidate(5.0, 0.6), candidate(9.0, 0.4)];
  assert_eq!(weighted_median(&candidates).unwrap(), 5.0);
}

#[test]
fn test_single_candidate() {
  assert_eq!(weighted_median(&[candidate(4.0, 1.0)]).unwrap(), 4.0);
}

#[test]
fn test_short_total_weight_falls_back_to_largest() {
  let candidates = [candidate(1.0, 0.2), candidate(2.0, 0.2)];
  assert_eq!(weighted_median(&candidates).unwrap(), 2.0);
}

#[test]
fn test_no_candidates() {
  assert!(weighted_median(&[]).is_err());
}
