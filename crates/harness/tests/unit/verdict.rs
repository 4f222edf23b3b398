//! Outcome scoring tests.

use pretty_assertions::assert_eq;

use rvcheck_core::corpus::TestCase;
use rvcheck_core::driver::RunCapture;
use rvcheck_core::verdict::{TestStatus, ZeroTotalPolicy, score};

fn completed(stdout: &str) -> RunCapture {
    RunCapture::Completed {
        stdout: stdout.to_string(),
        stderr: String::new(),
        code: Some(0),
    }
}

fn case(expected: i64) -> TestCase {
    TestCase::new("sum", expected)
}

#[test]
fn matching_result_passes() {
    let capture = completed("Result in x1 (Signed): 5050\n");
    let outcome = score(&capture, &case(5050), ZeroTotalPolicy::NotApplicable, 20);
    assert_eq!(outcome.status, TestStatus::Passed { actual: 5050 });
    assert!(outcome.passed());
}

#[test]
fn wrong_value_is_a_mismatch_with_both_values() {
    let capture = completed("Result in x1 (Signed): 4949\n");
    let outcome = score(&capture, &case(5050), ZeroTotalPolicy::NotApplicable, 20);
    assert_eq!(
        outcome.status,
        TestStatus::ValueMismatch {
            expected: 5050,
            actual: 4949,
        }
    );
}

#[test]
fn missing_marker_is_a_parse_error_not_a_mismatch() {
    let capture = completed("simulation ran to completion\n");
    let outcome = score(&capture, &case(5050), ZeroTotalPolicy::NotApplicable, 20);
    assert!(matches!(outcome.status, TestStatus::ParseError { .. }));
}

#[test]
fn parse_error_keeps_bounded_output_tail() {
    let stdout: String = (0..100).map(|i| format!("line {i}\n")).collect();
    let capture = completed(&stdout);
    let outcome = score(&capture, &case(0), ZeroTotalPolicy::NotApplicable, 3);
    let TestStatus::ParseError { tail } = outcome.status else {
        panic!("expected parse error");
    };
    assert_eq!(tail, "line 97\nline 98\nline 99");
}

#[test]
fn timeout_short_circuits_even_with_partial_markers() {
    // A killed run may have flushed a result line already; it must not count.
    let outcome = score(
        &RunCapture::TimedOut,
        &case(5050),
        ZeroTotalPolicy::NotApplicable,
        20,
    );
    assert_eq!(outcome.status, TestStatus::Timeout);
    assert_eq!(outcome.accuracy, None);
}

#[test]
fn accuracy_is_correct_over_total() {
    let capture = completed(
        "Result in x1 (Unsigned): 0\nTOTAL_BRANCH: 10\nCORRECT_BRANCH: 7\n",
    );
    let outcome = score(&capture, &case(0), ZeroTotalPolicy::NotApplicable, 20);
    assert_eq!(outcome.total_branches, Some(10));
    assert_eq!(outcome.correct_branches, Some(7));
    assert_eq!(outcome.accuracy, Some(70.0));
}

#[test]
fn zero_total_not_applicable_omits_accuracy() {
    let capture =
        completed("Result in x1 (Unsigned): 0\nTOTAL_BRANCH: 0\nCORRECT_BRANCH: 0\n");
    let outcome = score(&capture, &case(0), ZeroTotalPolicy::NotApplicable, 20);
    assert_eq!(outcome.accuracy, None);
}

#[test]
fn zero_total_full_credit_scores_one_hundred() {
    let capture =
        completed("Result in x1 (Unsigned): 0\nTOTAL_BRANCH: 0\nCORRECT_BRANCH: 0\n");
    let outcome = score(&capture, &case(0), ZeroTotalPolicy::FullCredit, 20);
    assert_eq!(outcome.accuracy, Some(100.0));
}

#[test]
fn accuracy_is_independent_of_pass_fail() {
    let capture = completed(
        "Result in x1 (Unsigned): 9\nTOTAL_BRANCH: 4\nCORRECT_BRANCH: 2\n",
    );
    let outcome = score(&capture, &case(5050), ZeroTotalPolicy::NotApplicable, 20);
    assert!(!outcome.passed());
    assert_eq!(outcome.accuracy, Some(50.0));
}

#[test]
fn counters_without_result_marker_still_recorded() {
    let capture = completed("TOTAL_BRANCH: 8\nCORRECT_BRANCH: 8\n");
    let outcome = score(&capture, &case(0), ZeroTotalPolicy::NotApplicable, 20);
    assert!(matches!(outcome.status, TestStatus::ParseError { .. }));
    assert_eq!(outcome.accuracy, Some(100.0));
}
