//! Subprocess invocation and image delivery tests (Unix only: they spawn
//! `sh`, `echo`, and `sleep`).

use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use rvcheck_core::config::RunConfig;
use rvcheck_core::driver::stage::{self, DeliveryMode};
use rvcheck_core::driver::{Invocation, RunCapture};
use rvcheck_core::error::HarnessError;
use rvcheck_core::image::{TokenPolicy, synthesize};

use crate::common;

fn no_cancel() -> AtomicBool {
    AtomicBool::new(false)
}

#[test]
fn captures_stdout_and_exit_code() {
    let capture = Invocation::new("echo", Duration::from_secs(5))
        .arg("hello")
        .execute(&no_cancel())
        .unwrap();
    assert_eq!(
        capture,
        RunCapture::Completed {
            stdout: "hello\n".to_string(),
            stderr: String::new(),
            code: Some(0),
        }
    );
    assert!(capture.success());
}

#[test]
fn captures_stderr_separately() {
    let capture = Invocation::new("sh", Duration::from_secs(5))
        .args(["-c", "echo out; echo err >&2; exit 3"])
        .execute(&no_cancel())
        .unwrap();
    let RunCapture::Completed {
        stdout,
        stderr,
        code,
    } = capture
    else {
        panic!("expected completion");
    };
    assert_eq!(stdout, "out\n");
    assert_eq!(stderr, "err\n");
    assert_eq!(code, Some(3));
}

#[test]
fn runs_in_the_given_working_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("probe"), "here").unwrap();

    let capture = Invocation::new("sh", Duration::from_secs(5))
        .args(["-c", "cat probe"])
        .current_dir(dir.path())
        .execute(&no_cancel())
        .unwrap();
    let RunCapture::Completed { stdout, .. } = capture else {
        panic!("expected completion");
    };
    assert_eq!(stdout, "here");
}

#[test]
fn timeout_kills_the_child_and_is_not_an_error() {
    let start = Instant::now();
    let capture = Invocation::new("sleep", Duration::from_millis(200))
        .arg("30")
        .execute(&no_cancel())
        .unwrap();
    assert_eq!(capture, RunCapture::TimedOut);
    // The 30-second child must not have been waited on to completion.
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[test]
fn cancellation_kills_the_child() {
    let cancel = AtomicBool::new(true);
    let err = Invocation::new("sleep", Duration::from_secs(30))
        .arg("30")
        .execute(&cancel)
        .unwrap_err();
    assert!(matches!(err, HarnessError::Cancelled));
}

#[test]
fn missing_program_is_a_spawn_error() {
    let err = Invocation::new("rvcheck-no-such-binary", Duration::from_secs(1))
        .execute(&no_cancel())
        .unwrap_err();
    assert!(matches!(err, HarnessError::Spawn { .. }));
}

#[test]
fn staging_fully_rewrites_the_well_known_path() {
    let fake = common::FakeSim::new();
    let mut run = RunConfig::default();
    run.workdir = fake.sim_dir();
    run.delivery = DeliveryMode::Stage;

    let long = synthesize("@00 01 02 03 04 05 06 07 08", TokenPolicy::Lenient).unwrap();
    let short = synthesize("@00 2A", TokenPolicy::Lenient).unwrap();

    assert_eq!(stage::deliver(&long, &run, "first").unwrap(), None);
    assert_eq!(stage::deliver(&short, &run, "second").unwrap(), None);

    // No residue of the first (longer) image may survive the rewrite.
    assert_eq!(common::read(&fake.staging_path()), "0000002a\n");
}

#[test]
fn build_args_expand_trailing_source_globs() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    std::fs::create_dir(&src).unwrap();
    std::fs::write(src.join("b.v"), "").unwrap();
    std::fs::write(src.join("a.v"), "").unwrap();
    std::fs::write(src.join("notes.md"), "").unwrap();
    let work = dir.path().join("sim");
    std::fs::create_dir(&work).unwrap();

    let args: Vec<String> = ["-o", "testbench.vvp", "testbench.v", "../src/*.v"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let expanded = rvcheck_core::driver::builder::expand_globs(&args, &work);
    assert_eq!(
        expanded,
        ["-o", "testbench.vvp", "testbench.v", "../src/a.v", "../src/b.v"]
    );
}

#[test]
fn unmatched_globs_pass_through_literally() {
    let dir = TempDir::new().unwrap();
    let args = vec!["../missing/*.v".to_string()];
    let expanded = rvcheck_core::driver::builder::expand_globs(&args, dir.path());
    assert_eq!(expanded, ["../missing/*.v"]);
}

#[test]
fn path_arg_mode_writes_a_private_per_test_file() {
    let fake = common::FakeSim::new();
    let mut run = RunConfig::default();
    run.workdir = fake.sim_dir();
    run.delivery = DeliveryMode::PathArg;

    let image = synthesize("@00 AA BB", TokenPolicy::Lenient).unwrap();
    let arg = stage::deliver(&image, &run, "gcd").unwrap().unwrap();

    assert_eq!(arg.to_str(), Some("gcd.hex"));
    assert_eq!(common::read(&fake.sim_dir().join("gcd.hex")), "0000bbaa\n");
    // The shared staging file is untouched in this mode.
    assert!(!fake.staging_path().exists());
}
