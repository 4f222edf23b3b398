//! Run summary derivation and verdict formatting.
//!
//! The summary is derived, never stored: pass count over outcome count plus
//! the arithmetic mean of branch accuracy over the tests that reported a
//! counter pair. Formatting mirrors the aligned counter table the benchmark
//! flow has always printed.

use std::fmt::Write as _;

use crate::verdict::{TestOutcome, TestStatus};

/// Aggregate view over one batch's outcomes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Number of outcomes collected.
    pub total: usize,
    /// Number of passing outcomes.
    pub passed: usize,
    /// Mean accuracy over tests with an applicable accuracy, if any.
    pub mean_accuracy: Option<f64>,
}

impl RunSummary {
    /// Derives the summary from collected outcomes.
    pub fn from_outcomes(outcomes: &[TestOutcome]) -> Self {
        let passed = outcomes.iter().filter(|o| o.passed()).count();
        let scored: Vec<f64> = outcomes.iter().filter_map(|o| o.accuracy).collect();
        let mean_accuracy = if scored.is_empty() {
            None
        } else {
            Some(scored.iter().sum::<f64>() / scored.len() as f64)
        };
        Self {
            total: outcomes.len(),
            passed,
            mean_accuracy,
        }
    }

    /// True iff every collected outcome passed.
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// Single-line verdict for one test case.
pub fn verdict_line(outcome: &TestOutcome) -> String {
    let acc = outcome
        .accuracy
        .map(|a| format!(" (branch acc: {a:.1}%)"))
        .unwrap_or_default();

    match &outcome.status {
        TestStatus::Passed { actual } => {
            format!("PASS: {} (result: {actual}){acc}", outcome.name)
        }
        TestStatus::ValueMismatch { expected, actual } => {
            format!(
                "FAIL: {} (expected: {expected}, got: {actual}){acc}",
                outcome.name
            )
        }
        TestStatus::ParseError { tail } => {
            let mut line = format!("FAIL: {} - no result marker in output", outcome.name);
            if !tail.is_empty() {
                let _ = write!(line, "\n--- output tail ---\n{tail}\n-------------------");
            }
            line
        }
        TestStatus::Timeout => format!("TIMEOUT: {}", outcome.name),
        TestStatus::ConversionFailed { reason } => {
            format!("ERROR: {} - image synthesis failed: {reason}", outcome.name)
        }
    }
}

/// Aligned branch-counter table over all outcomes.
pub fn counter_table(outcomes: &[TestOutcome]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} | {:<10} | {:<10} | {:<10}",
        "Test Case", "Total", "Correct", "Accuracy"
    );
    let _ = writeln!(out, "{}", "-".repeat(60));
    for o in outcomes {
        let total = o.total_branches.map_or_else(|| "-".to_string(), |t| t.to_string());
        let correct = o
            .correct_branches
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        let acc = o
            .accuracy
            .map_or_else(|| "N/A".to_string(), |a| format!("{a:.2}%"));
        let _ = writeln!(out, "{:<20} | {total:<10} | {correct:<10} | {acc:<10}", o.name);
    }
    out
}

/// Aggregate footer: pass count and, when applicable, mean accuracy.
pub fn summary_line(summary: &RunSummary) -> String {
    let mut line = format!("Passed {}/{} tests", summary.passed, summary.total);
    if let Some(mean) = summary.mean_accuracy {
        let _ = write!(line, ", average branch accuracy {mean:.2}%");
    }
    line
}
