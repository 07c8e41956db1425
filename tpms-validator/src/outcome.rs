//! Validation outcomes
//!
//! Every check the validator performs produces exactly one outcome: a verdict
//! plus a human-readable message. Outcomes are plain values, created once and
//! handed to a [`Tally`](crate::tally::Tally).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tri-state verdict of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
    Skip,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
            Verdict::Skip => write!(f, "SKIP"),
        }
    }
}

/// Result of one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub verdict: Verdict,
    pub message: String,
}

impl ValidationOutcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Pass,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Fail,
            message: message.into(),
        }
    }

    pub fn skip(message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Skip,
            message: message.into(),
        }
    }

    pub fn is_pass(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    pub fn is_fail(&self) -> bool {
        self.verdict == Verdict::Fail
    }

    pub fn is_skip(&self) -> bool {
        self.verdict == Verdict::Skip
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.verdict, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_constructors() {
        assert!(ValidationOutcome::pass("ok").is_pass());
        assert!(ValidationOutcome::fail("bad").is_fail());
        assert!(ValidationOutcome::skip("n/a").is_skip());
    }

    #[test]
    fn test_outcome_display() {
        let outcome = ValidationOutcome::fail("Ford pressure mismatch");
        assert_eq!(outcome.to_string(), "FAIL: Ford pressure mismatch");
    }
}
