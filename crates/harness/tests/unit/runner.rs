//! End-to-end batch tests against fake shell-script simulators (Unix only).

use std::sync::atomic::Ordering;

use pretty_assertions::assert_eq;

use rvcheck_core::corpus::TestCase;
use rvcheck_core::driver::DeliveryMode;
use rvcheck_core::error::HarnessError;
use rvcheck_core::image::TokenPolicy;
use rvcheck_core::runner::Runner;
use rvcheck_core::verdict::TestStatus;

use crate::common::{self, FakeSim};

#[test]
fn batch_scores_pass_and_mismatch() {
    let fake = FakeSim::new();
    fake.write_script(common::ECHO_STAGED_WORD);
    fake.write_case("fortytwo", "2A\n");
    fake.write_case("wrong", "07\n");

    let runner = Runner::new(fake.config());
    let batch = runner
        .run(&[TestCase::new("fortytwo", 42), TestCase::new("wrong", 9)])
        .unwrap();

    assert_eq!(batch.outcomes.len(), 2);
    assert_eq!(batch.outcomes[0].status, TestStatus::Passed { actual: 42 });
    assert_eq!(
        batch.outcomes[1].status,
        TestStatus::ValueMismatch {
            expected: 9,
            actual: 7,
        }
    );
    assert_eq!(batch.summary.passed, 1);
    assert!(!batch.cancelled);
}

#[test]
fn failed_build_aborts_with_zero_outcomes() {
    let fake = FakeSim::new();
    let mut config = fake.config();
    config.build.force = true;
    config.build.program = "sh".to_string();
    config.build.args = vec!["-c".to_string(), "echo boom >&2; exit 3".to_string()];

    let err = Runner::new(config)
        .run(&[TestCase::new("fortytwo", 42)])
        .unwrap_err();

    let HarnessError::BuildFailed { code, stderr } = err else {
        panic!("expected a fatal build failure");
    };
    assert_eq!(code, Some(3));
    assert_eq!(stderr, "boom\n");
}

#[test]
fn forced_rebuild_runs_the_build_tool() {
    let fake = FakeSim::new();
    fake.write_script(common::ECHO_STAGED_WORD);
    fake.write_case("fortytwo", "2A\n");

    let mut config = fake.config();
    config.build.force = true;
    config.build.program = "sh".to_string();
    config.build.args = vec!["-c".to_string(), "touch rebuilt".to_string()];

    let batch = Runner::new(config)
        .run(&[TestCase::new("fortytwo", 42)])
        .unwrap();
    assert!(batch.summary.all_passed());
    assert!(fake.sim_dir().join("rebuilt").exists());
}

#[test]
fn timed_out_test_does_not_poison_the_batch() {
    let fake = FakeSim::new();
    // Path-argument delivery: the script sleeps when handed the deadbeef
    // image and otherwise echoes the word back.
    fake.write_script(
        r#"word=$(head -n1 "$1")
if [ "$word" = "deadbeef" ]; then sleep 30; fi
echo "Result in x1 (Unsigned): $(printf %d "0x$word")"
"#,
    );
    fake.write_case("slow", "@00 EF BE AD DE\n");
    fake.write_case("fast", "2A\n");

    let mut config = fake.config();
    config.run.delivery = DeliveryMode::PathArg;
    config.run.timeout_secs = 1;

    let batch = Runner::new(config)
        .run(&[TestCase::new("slow", 0), TestCase::new("fast", 42)])
        .unwrap();

    assert_eq!(batch.outcomes[0].status, TestStatus::Timeout);
    assert_eq!(batch.outcomes[1].status, TestStatus::Passed { actual: 42 });
    assert_eq!(batch.summary.passed, 1);
}

#[test]
fn path_arg_images_do_not_accumulate_in_the_workdir() {
    let fake = FakeSim::new();
    fake.write_script(
        r#"word=$(head -n1 "$1")
echo "Result in x1 (Unsigned): $(printf %d "0x$word")"
"#,
    );
    fake.write_case("fortytwo", "2A\n");

    let mut config = fake.config();
    config.run.delivery = DeliveryMode::PathArg;

    let batch = Runner::new(config)
        .run(&[TestCase::new("fortytwo", 42)])
        .unwrap();
    assert!(batch.summary.all_passed());
    // The per-test image was consumed by the run and then removed.
    assert!(!fake.sim_dir().join("fortytwo.hex").exists());
}

#[test]
fn output_without_marker_is_a_parse_error_outcome() {
    let fake = FakeSim::new();
    fake.write_script("echo 'simulation exploded'\n");
    fake.write_case("fortytwo", "2A\n");

    let batch = Runner::new(fake.config())
        .run(&[TestCase::new("fortytwo", 42)])
        .unwrap();
    assert!(matches!(
        batch.outcomes[0].status,
        TestStatus::ParseError { .. }
    ));
}

#[test]
fn strict_conversion_failure_is_isolated_to_its_test() {
    let fake = FakeSim::new();
    fake.write_script(common::ECHO_STAGED_WORD);
    fake.write_case("broken", "zz zz\n");
    fake.write_case("fortytwo", "2A\n");

    let mut config = fake.config();
    config.scoring.tokens = TokenPolicy::Strict;

    let batch = Runner::new(config)
        .run(&[TestCase::new("broken", 0), TestCase::new("fortytwo", 42)])
        .unwrap();

    assert!(matches!(
        batch.outcomes[0].status,
        TestStatus::ConversionFailed { .. }
    ));
    assert_eq!(batch.outcomes[1].status, TestStatus::Passed { actual: 42 });
}

#[test]
fn huge_address_directive_is_isolated_to_its_test() {
    let fake = FakeSim::new();
    fake.write_script(common::ECHO_STAGED_WORD);
    fake.write_case("corrupt", "@ffffffffffff0000 01\n");
    fake.write_case("fortytwo", "2A\n");

    let batch = Runner::new(fake.config())
        .run(&[TestCase::new("corrupt", 0), TestCase::new("fortytwo", 42)])
        .unwrap();

    assert!(matches!(
        batch.outcomes[0].status,
        TestStatus::ConversionFailed { .. }
    ));
    assert_eq!(batch.outcomes[1].status, TestStatus::Passed { actual: 42 });
}

#[test]
fn missing_description_is_isolated_to_its_test() {
    let fake = FakeSim::new();
    fake.write_script(common::ECHO_STAGED_WORD);
    fake.write_case("fortytwo", "2A\n");

    let batch = Runner::new(fake.config())
        .run(&[TestCase::new("ghost", 0), TestCase::new("fortytwo", 42)])
        .unwrap();

    assert!(matches!(
        batch.outcomes[0].status,
        TestStatus::ConversionFailed { .. }
    ));
    assert!(batch.outcomes[1].passed());
}

#[test]
fn pre_cancelled_batch_collects_nothing_but_stays_ok() {
    let fake = FakeSim::new();
    fake.write_script(common::ECHO_STAGED_WORD);
    fake.write_case("fortytwo", "2A\n");

    let runner = Runner::new(fake.config());
    runner.cancel_flag().store(true, Ordering::Relaxed);

    let batch = runner.run(&[TestCase::new("fortytwo", 42)]).unwrap();
    assert!(batch.cancelled);
    assert!(batch.outcomes.is_empty());
}

#[test]
fn lenient_batch_survives_garbage_tokens() {
    let fake = FakeSim::new();
    fake.write_script(common::ECHO_STAGED_WORD);
    fake.write_case("messy", "zz 2A zz\n");

    let batch = Runner::new(fake.config())
        .run(&[TestCase::new("messy", 42)])
        .unwrap();
    assert!(batch.summary.all_passed());
}
