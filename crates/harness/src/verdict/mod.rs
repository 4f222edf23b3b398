//! Outcome scoring.
//!
//! Turns one captured simulator run into a [`TestOutcome`]. The
//! classification hierarchy matters for diagnosis and is never collapsed:
//! 1. **Timeout** — the run was killed; partial output is not scored.
//! 2. **Parse error** — output arrived but no result marker was found; the
//!    simulator crashed or hung, which is a different root cause than a
//!    wrong answer, so the raw output tail is kept for diagnostics.
//! 3. **Value mismatch** — the simulator ran and answered wrongly; both
//!    values are retained.
//! 4. **Pass** — the reported value equals the expectation.
//!
//! Branch-prediction accuracy is computed independently of pass/fail when
//! both counters are present.

pub mod markers;

use serde::Deserialize;

pub use markers::{Markers, ResultMarker, Signedness};

use crate::corpus::TestCase;
use crate::driver::RunCapture;

/// Branch accuracy policy when the reported branch total is zero.
///
/// Both conventions are in live use: the benchmark table prints `N/A` and
/// leaves the test out of the mean, while the regression flow gives a
/// branchless program full credit. Never a division by zero either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ZeroTotalPolicy {
    /// Accuracy is not applicable; the test is omitted from the mean.
    #[default]
    NotApplicable,
    /// A zero-total test counts as 100% accurate.
    FullCredit,
}

/// Classified result of one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestStatus {
    /// The reported value matched the expectation.
    Passed {
        /// The value the simulator reported.
        actual: i64,
    },
    /// The simulator ran but reported the wrong value.
    ValueMismatch {
        /// The value the test case demands.
        expected: i64,
        /// The value the simulator reported.
        actual: i64,
    },
    /// No result marker was found in the output.
    ParseError {
        /// Tail of the raw output, for diagnostics.
        tail: String,
    },
    /// The run exceeded its wall-clock timeout and was killed.
    Timeout,
    /// The image description could not be synthesized (strict policy).
    ConversionFailed {
        /// Why synthesis failed.
        reason: String,
    },
}

/// One test case's outcome; immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TestOutcome {
    /// Test case name.
    pub name: String,
    /// Classified status.
    pub status: TestStatus,
    /// Conditional branches executed, when reported.
    pub total_branches: Option<u64>,
    /// Conditional branches predicted correctly, when reported.
    pub correct_branches: Option<u64>,
    /// Branch prediction accuracy in percent, per the zero-total policy.
    pub accuracy: Option<f64>,
}

impl TestOutcome {
    /// True iff the status is [`TestStatus::Passed`].
    pub fn passed(&self) -> bool {
        matches!(self.status, TestStatus::Passed { .. })
    }

    /// Builds an outcome for a test that never reached the simulator.
    pub fn conversion_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::ConversionFailed {
                reason: reason.into(),
            },
            total_branches: None,
            correct_branches: None,
            accuracy: None,
        }
    }
}

/// Scores one captured run against its test case.
///
/// A timed-out capture short-circuits: whatever partial output exists is
/// not inspected.
pub fn score(
    capture: &RunCapture,
    case: &TestCase,
    zero_total: ZeroTotalPolicy,
    tail_lines: usize,
) -> TestOutcome {
    let RunCapture::Completed { stdout, .. } = capture else {
        return TestOutcome {
            name: case.name.clone(),
            status: TestStatus::Timeout,
            total_branches: None,
            correct_branches: None,
            accuracy: None,
        };
    };

    let markers = Markers::extract(stdout);

    let status = match &markers.result {
        None => TestStatus::ParseError {
            tail: output_tail(stdout, tail_lines),
        },
        Some(marker) if marker.value == case.expected => TestStatus::Passed {
            actual: marker.value,
        },
        Some(marker) => TestStatus::ValueMismatch {
            expected: case.expected,
            actual: marker.value,
        },
    };

    let accuracy = markers.branch_counts().and_then(|(total, correct)| {
        if total > 0 {
            Some((correct as f64 / total as f64) * 100.0)
        } else {
            match zero_total {
                ZeroTotalPolicy::NotApplicable => None,
                ZeroTotalPolicy::FullCredit => Some(100.0),
            }
        }
    });

    TestOutcome {
        name: case.name.clone(),
        status,
        total_branches: markers.total_branch,
        correct_branches: markers.correct_branch,
        accuracy,
    }
}

/// Last `lines` lines of `output`, joined with newlines.
fn output_tail(output: &str, lines: usize) -> String {
    let all: Vec<&str> = output.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}
