//! Configuration system for the verification harness.
//!
//! This module defines all configuration structures used to parameterize a
//! batch run. It provides:
//! 1. **Defaults:** Baseline constants (tool names, timeouts, staging paths).
//! 2. **Structures:** Hierarchical config for build, run, and scoring concerns.
//! 3. **Loading:** JSON deserialization for config files, or `HarnessConfig::default()`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::driver::stage::DeliveryMode;
use crate::error::HarnessError;
use crate::image::TokenPolicy;
use crate::verdict::ZeroTotalPolicy;

/// Default configuration constants for the harness.
mod defaults {
    /// Compiler driving the simulator build.
    pub const BUILD_PROGRAM: &str = "iverilog";

    /// Arguments for the simulator build, relative to the sim directory.
    /// The trailing source glob is expanded by the driver, not a shell.
    pub const BUILD_ARGS: &[&str] = &[
        "-g2012",
        "-I",
        "../src",
        "-o",
        "testbench.vvp",
        "testbench.v",
        "../src/*.v",
    ];

    /// Artifact the build produces; its presence lets a rebuild be skipped.
    pub const BUILD_OUTPUT: &str = "testbench.vvp";

    /// Build timeout in seconds. Short and fatal on expiry: a wedged build
    /// means nothing downstream can run.
    pub const BUILD_TIMEOUT_SECS: u64 = 60;

    /// Runtime executing the built simulator.
    pub const RUN_PROGRAM: &str = "vvp";

    /// Per-test run timeout in seconds. Long, and recoverable on expiry.
    pub const RUN_TIMEOUT_SECS: u64 = 300;

    /// Directory the simulator is built and run in.
    pub const SIM_DIR: &str = "sim";

    /// Well-known file the simulator `$readmemh`s when no path argument
    /// is supported. Fully rewritten before every test.
    pub const STAGING_FILE: &str = "inst_rom.data";

    /// Directory scanned for `.data` test descriptions.
    pub const CORPUS_DIR: &str = "testcases";

    /// Lines of raw output kept for parse-error diagnostics.
    pub const TAIL_LINES: usize = 20;

    /// Largest byte address a synthesized write may land at.
    pub const MAX_IMAGE_BYTES: u64 = crate::image::DEFAULT_MAX_IMAGE_BYTES;
}

/// Simulator build configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build tool executable.
    pub program: String,
    /// Build tool argument vector (no shell interpretation).
    pub args: Vec<String>,
    /// Artifact path, relative to [`RunConfig::workdir`]; if it already
    /// exists the build is skipped unless a rebuild is forced.
    pub output: PathBuf,
    /// Wall-clock build timeout in seconds; expiry is fatal.
    pub timeout_secs: u64,
    /// Build even when the artifact is already present.
    pub force: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: defaults::BUILD_PROGRAM.to_string(),
            args: defaults::BUILD_ARGS.iter().map(ToString::to_string).collect(),
            output: PathBuf::from(defaults::BUILD_OUTPUT),
            timeout_secs: defaults::BUILD_TIMEOUT_SECS,
            force: false,
        }
    }
}

/// Per-test simulator run configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Run tool executable (the simulation runtime).
    pub program: String,
    /// Arguments preceding any delivery-mode path argument.
    pub args: Vec<String>,
    /// Working directory for both build and run; owns the staging file.
    pub workdir: PathBuf,
    /// Wall-clock per-test timeout in seconds; expiry yields a `Timeout`
    /// outcome and the batch continues.
    pub timeout_secs: u64,
    /// How the synthesized image reaches the simulator.
    pub delivery: DeliveryMode,
    /// Staging file name inside `workdir` (used by [`DeliveryMode::Stage`]).
    pub staging_file: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            program: defaults::RUN_PROGRAM.to_string(),
            args: vec![defaults::BUILD_OUTPUT.to_string()],
            workdir: PathBuf::from(defaults::SIM_DIR),
            timeout_secs: defaults::RUN_TIMEOUT_SECS,
            delivery: DeliveryMode::default(),
            staging_file: PathBuf::from(defaults::STAGING_FILE),
        }
    }
}

/// Output scoring configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Malformed-token policy for image synthesis.
    pub tokens: TokenPolicy,
    /// Branch accuracy policy when the reported total is zero.
    pub zero_total: ZeroTotalPolicy,
    /// Lines of raw output retained when no result marker is found.
    pub tail_lines: usize,
    /// Largest byte address a synthesized write may land at; a write
    /// beyond it fails that test's conversion.
    pub max_image_bytes: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tokens: TokenPolicy::default(),
            zero_total: ZeroTotalPolicy::default(),
            tail_lines: defaults::TAIL_LINES,
            max_image_bytes: defaults::MAX_IMAGE_BYTES,
        }
    }
}

/// Root configuration for one batch.
///
/// Deserialize from JSON for scripted sweeps, or use
/// `HarnessConfig::default()` for the conventional repository layout
/// (`sim/` next to `testcases/`).
///
/// # Examples
///
/// ```
/// use rvcheck_core::config::HarnessConfig;
///
/// let config = HarnessConfig::default();
/// assert_eq!(config.build.program, "iverilog");
/// assert_eq!(config.run.timeout_secs, 300);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Simulator build settings.
    pub build: BuildConfig,
    /// Per-test run settings.
    pub run: RunConfig,
    /// Scoring and conversion policies.
    pub scoring: ScoringConfig,
    /// Directory holding `.data` test descriptions.
    pub corpus_dir: PathBuf,
}

impl HarnessConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// Missing sections and fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Io`] if the file cannot be read,
    /// [`HarnessError::Config`] if it is not valid config JSON.
    pub fn from_json_file(path: &Path) -> Result<Self, HarnessError> {
        let text = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| HarnessError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            run: RunConfig::default(),
            scoring: ScoringConfig::default(),
            corpus_dir: PathBuf::from(defaults::CORPUS_DIR),
        }
    }
}
