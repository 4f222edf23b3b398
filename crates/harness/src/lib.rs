//! Regression-verification harness for cycle-accurate RISC-V simulators.
//!
//! This crate drives build/run cycles of a hardware simulator under test and
//! scores its textual output. It provides:
//! 1. **Image synthesis:** deterministic conversion of sparse, address-tagged
//!    byte dumps into the contiguous word-hex images the simulator loads.
//! 2. **Driving:** one simulator build per batch (fatal on failure) and one
//!    bounded-time subprocess per test case, with staged or path-argument
//!    image delivery.
//! 3. **Scoring:** marker extraction (`Result in …`, `TOTAL_BRANCH`,
//!    `CORRECT_BRANCH`), outcome classification, and run summaries.

/// Harness configuration (defaults, hierarchical structures, JSON loading).
pub mod config;
/// Test-case model, built-in suite, and corpus discovery.
pub mod corpus;
/// Simulator build, bounded subprocess invocation, and image delivery.
pub mod driver;
/// Error taxonomy for fatal and per-test failures.
pub mod error;
/// Memory-image synthesis (description scan, byte image, word packing).
pub mod image;
/// Run summary derivation and verdict formatting.
pub mod report;
/// Batch orchestration.
pub mod runner;
/// Marker extraction and outcome scoring.
pub mod verdict;

/// Root configuration type; use `HarnessConfig::default()` or deserialize from JSON.
pub use crate::config::HarnessConfig;
/// One named test case with its expected result value.
pub use crate::corpus::TestCase;
/// Top-level harness error.
pub use crate::error::HarnessError;
/// Synthesizes a word image from an image description.
pub use crate::image::synthesize;
/// Batch runner; construct with `Runner::new`.
pub use crate::runner::Runner;
