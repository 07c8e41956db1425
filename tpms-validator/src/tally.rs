//! Result aggregation
//!
//! A [`Tally`] counts passed, failed and skipped checks and keeps every failure
//! message in the order it was recorded. Counters only grow. Tallies are plain
//! values: each unit of work returns its own and the caller merges them, so
//! sources can be validated independently and combined afterwards.

use crate::outcome::{ValidationOutcome, Verdict};
use serde::Serialize;

/// Aggregated pass/fail/skip counts and failure diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    passed: usize,
    failed: usize,
    skipped: usize,
    failures: Vec<String>,
}

impl Tally {
    /// Create an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one outcome
    pub fn record(&mut self, outcome: ValidationOutcome) {
        match outcome.verdict {
            Verdict::Pass => {
                log::debug!("{}", outcome.message);
                self.passed += 1;
            }
            Verdict::Fail => {
                log::warn!("{}", outcome.message);
                self.failed += 1;
                self.failures.push(outcome.message);
            }
            Verdict::Skip => {
                log::debug!("skip: {}", outcome.message);
                self.skipped += 1;
            }
        }
    }

    /// Count a batch of outcomes in order
    pub fn extend<I>(&mut self, outcomes: I)
    where
        I: IntoIterator<Item = ValidationOutcome>,
    {
        for outcome in outcomes {
            self.record(outcome);
        }
    }

    /// Fold another tally into this one; its failures follow ours
    pub fn merge(&mut self, other: Tally) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.failures.extend(other.failures);
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Failure messages in recording order
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Total number of counted checks
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    /// True when no check failed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl FromIterator<ValidationOutcome> for Tally {
    fn from_iter<I: IntoIterator<Item = ValidationOutcome>>(iter: I) -> Self {
        let mut tally = Tally::new();
        tally.extend(iter);
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tally_is_success() {
        let tally = Tally::new();
        assert!(tally.is_success());
        assert_eq!(tally.total(), 0);
    }

    #[test]
    fn test_record_counts_and_keeps_failures() {
        let tally: Tally = vec![
            ValidationOutcome::pass("a"),
            ValidationOutcome::fail("first"),
            ValidationOutcome::skip("b"),
            ValidationOutcome::fail("second"),
        ]
        .into_iter()
        .collect();

        assert_eq!(tally.passed(), 1);
        assert_eq!(tally.failed(), 2);
        assert_eq!(tally.skipped(), 1);
        assert_eq!(tally.failures(), &["first".to_string(), "second".to_string()]);
        assert!(!tally.is_success());
    }

    #[test]
    fn test_merge_appends() {
        let mut left: Tally = vec![ValidationOutcome::fail("left")].into_iter().collect();
        let right: Tally = vec![ValidationOutcome::pass("ok"), ValidationOutcome::fail("right")]
            .into_iter()
            .collect();

        left.merge(right);

        assert_eq!(left.passed(), 1);
        assert_eq!(left.failed(), 2);
        assert_eq!(left.failures(), &["left".to_string(), "right".to_string()]);
    }

    #[test]
    fn test_merge_is_order_insensitive_for_counts() {
        let a: Tally = vec![ValidationOutcome::pass("x"), ValidationOutcome::skip("y")]
            .into_iter()
            .collect();
        let b: Tally = vec![ValidationOutcome::fail("z")].into_iter().collect();

        let mut ab = a.clone();
        ab.merge(b.clone());
        let mut ba = b;
        ba.merge(a);

        assert_eq!(
            (ab.passed(), ab.failed(), ab.skipped()),
            (ba.passed(), ba.failed(), ba.skipped())
        );
    }
}
