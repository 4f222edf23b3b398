//! Harness error taxonomy.
//!
//! This module defines the error types for the verification harness. It provides:
//! 1. **Fatal errors:** Simulator build failures that abort the whole batch.
//! 2. **Per-test errors:** Conversion failures isolated to a single test case.
//! 3. **Infrastructure errors:** I/O and configuration failures with path context.
//!
//! Recoverable per-test conditions (timeout, missing result marker, wrong value)
//! are *not* errors; they are [`TestStatus`](crate::verdict::TestStatus) variants,
//! because the batch must keep running and report them in the summary.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while synthesizing a word image from an image description.
///
/// Only raised under the strict token policy, with one exception: a malformed
/// address directive fails synthesis under *both* policies, since silently
/// skipping a cursor move would relocate every byte that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// A value token was not a valid hexadecimal byte (00..FF).
    #[error("malformed byte token '{token}' (token #{index})")]
    BadByteToken {
        /// The offending token text.
        token: String,
        /// Zero-based position of the token in the description.
        index: usize,
    },

    /// An `@`-prefixed token did not carry a valid hexadecimal address.
    #[error("malformed address directive '{token}' (token #{index})")]
    BadDirective {
        /// The offending token text.
        token: String,
        /// Zero-based position of the token in the description.
        index: usize,
    },

    /// A byte write landed at or beyond the configured image size limit.
    ///
    /// Raised under *both* policies: a directive pointing gigabytes past
    /// the start is a corrupt dump, not a big program, and packing it
    /// would materialize a word for every address up to the write.
    #[error("byte write at address 0x{address:x} exceeds the image limit of 0x{limit:x} bytes")]
    AddressBeyondLimit {
        /// Address the write would have landed at.
        address: u64,
        /// The configured limit, in bytes.
        limit: u64,
    },
}

/// Top-level harness error.
///
/// `BuildFailed` and `BuildTimedOut` abort the batch before any test runs;
/// `Cancelled` ends the batch early but leaves already-collected outcomes
/// valid. Everything else carries enough context to be reported verbatim.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The simulator build exited with a non-zero status.
    ///
    /// The captured error stream is surfaced verbatim; no test cases execute.
    #[error("simulator build failed (exit {code:?}):\n{stderr}")]
    BuildFailed {
        /// Exit code of the build tool, if it exited normally.
        code: Option<i32>,
        /// The build tool's stderr, untouched.
        stderr: String,
    },

    /// The simulator build exceeded its (short) timeout.
    #[error("simulator build timed out after {seconds} s")]
    BuildTimedOut {
        /// The configured build timeout.
        seconds: u64,
    },

    /// A subprocess could not be spawned at all.
    #[error("could not spawn '{program}': {source}")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The batch was cancelled while a test was in flight.
    #[error("batch cancelled")]
    Cancelled,

    /// An I/O operation failed; the path names the file involved.
    #[error("{}: {source}", .path.display())]
    Io {
        /// File the operation touched.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be deserialized.
    #[error("{}: {source}", .path.display())]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// The deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Strict-mode image synthesis failed.
    #[error(transparent)]
    Image(#[from] ImageError),
}

impl HarnessError {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
