//! One-shot simulator build.

use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use tracing::info;

use crate::config::{BuildConfig, RunConfig};
use crate::driver::invoke::{Invocation, RunCapture};
use crate::error::HarnessError;

/// Builds the simulator executable, at most once per batch.
///
/// The build is skipped when the artifact already exists and `force` is not
/// set. A non-zero exit, a spawn failure, or timeout expiry is fatal: the
/// batch aborts before any test case runs, with the build tool's error
/// stream surfaced verbatim.
///
/// # Errors
///
/// [`HarnessError::BuildFailed`], [`HarnessError::BuildTimedOut`], or
/// [`HarnessError::Spawn`].
pub fn build_simulator(
    build: &BuildConfig,
    run: &RunConfig,
    cancel: &AtomicBool,
) -> Result<(), HarnessError> {
    let artifact = run.workdir.join(&build.output);
    if !build.force && artifact.exists() {
        info!(artifact = %artifact.display(), "simulator already built, skipping");
        return Ok(());
    }

    info!(program = %build.program, "building simulator");
    let args = expand_globs(&build.args, &run.workdir);
    let capture = Invocation::new(&build.program, Duration::from_secs(build.timeout_secs))
        .args(args)
        .current_dir(&run.workdir)
        .execute(cancel)?;

    match capture {
        RunCapture::Completed { code: Some(0), .. } => Ok(()),
        RunCapture::Completed { code, stderr, .. } => {
            Err(HarnessError::BuildFailed { code, stderr })
        }
        RunCapture::TimedOut => Err(HarnessError::BuildTimedOut {
            seconds: build.timeout_secs,
        }),
    }
}

/// Expands `dir/*.ext`-shaped arguments against `workdir`, sorted.
///
/// The build argument vector is not shell-interpreted, but Verilog source
/// lists are conventionally written as `../src/*.v`. Only a trailing
/// `*.ext` component is expanded; an argument with no matches, or any
/// other `*` placement, passes through literally so the build tool can
/// complain about it.
pub fn expand_globs(args: &[String], workdir: &Path) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        match expand_one(arg, workdir) {
            Some(matches) if !matches.is_empty() => out.extend(matches),
            _ => out.push(arg.clone()),
        }
    }
    out
}

fn expand_one(arg: &str, workdir: &Path) -> Option<Vec<String>> {
    let (prefix, pattern) = match arg.rfind('/') {
        Some(pos) => (&arg[..=pos], &arg[pos + 1..]),
        None => ("", arg),
    };
    let ext = pattern.strip_prefix("*.")?;
    if ext.contains('*') {
        return None;
    }

    let dir = workdir.join(if prefix.is_empty() { "." } else { prefix });
    let entries = fs::read_dir(dir).ok()?;
    let mut matches: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            name.ends_with(&format!(".{ext}"))
                .then(|| format!("{prefix}{name}"))
        })
        .collect();
    matches.sort();
    Some(matches)
}
