//! Image delivery to the simulator.
//!
//! Two modes, both reproducible:
//! 1. [`DeliveryMode::Stage`] — fully rewrite the well-known staging file
//!    the simulator `$readmemh`s unconditionally. The file is a single
//!    mutable resource owned by the driver for the duration of one run; it
//!    is never merged with prior content, so a failed or timed-out test
//!    leaves nothing behind for the next one to observe.
//! 2. [`DeliveryMode::PathArg`] — write a per-test image file and pass its
//!    path as a simulator argument. Preferred when the simulator supports
//!    it: no shared staging file, so concurrent cases cannot clobber each
//!    other.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::config::RunConfig;
use crate::error::HarnessError;
use crate::image::WordImage;

/// How a synthesized image reaches the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DeliveryMode {
    /// Rewrite the well-known staging file before every run.
    #[default]
    Stage,
    /// Write a per-test file and append its path to the simulator argv.
    PathArg,
}

/// Writes `image` where the simulator will find it for this run.
///
/// Returns the extra argument to append to the simulator invocation:
/// `None` for staging mode, the per-test image path for path-argument mode.
///
/// # Errors
///
/// [`HarnessError::Io`] if the image file cannot be written.
pub fn deliver(
    image: &WordImage,
    run: &RunConfig,
    test_name: &str,
) -> Result<Option<PathBuf>, HarnessError> {
    match run.delivery {
        DeliveryMode::Stage => {
            let path = run.workdir.join(&run.staging_file);
            write_image(image, &path)?;
            Ok(None)
        }
        DeliveryMode::PathArg => {
            // The simulator runs with `workdir` as its cwd, so the argv
            // value is the bare file name, not the harness-relative path.
            let file = PathBuf::from(format!("{test_name}.hex"));
            write_image(image, &run.workdir.join(&file))?;
            Ok(Some(file))
        }
    }
}

/// Renders `image` and replaces `path` with it (full rewrite, never merged).
pub fn write_image(image: &WordImage, path: &Path) -> Result<(), HarnessError> {
    debug!(path = %path.display(), words = image.len(), "writing word image");
    fs::write(path, image.render()).map_err(|e| HarnessError::io(path, e))
}
