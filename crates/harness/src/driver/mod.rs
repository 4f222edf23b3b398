//! Simulator driver.
//!
//! Treats the simulator under test as an external collaborator with exactly
//! two entry points:
//! 1. **Build** — one compiler invocation per batch, fatal on failure.
//! 2. **Run** — one bounded-time subprocess per test case, with the
//!    synthesized image delivered by staging or path argument beforehand.
//!
//! Runs are independent of each other: the image is re-delivered from
//! scratch for every case, so a timeout or failure in one test cannot leak
//! state into the next.

pub mod builder;
pub mod invoke;
pub mod stage;

use std::fs;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

pub use builder::build_simulator;
pub use invoke::{Invocation, RunCapture};
pub use stage::DeliveryMode;

use crate::config::{BuildConfig, RunConfig};
use crate::error::HarnessError;
use crate::image::WordImage;

/// Drives build and per-test runs of the simulator under test.
#[derive(Debug)]
pub struct SimulatorDriver {
    build: BuildConfig,
    run: RunConfig,
    built: bool,
}

impl SimulatorDriver {
    /// Creates a driver over the given build and run configuration.
    pub fn new(build: BuildConfig, run: RunConfig) -> Self {
        Self {
            build,
            run,
            built: false,
        }
    }

    /// Builds the simulator if this driver has not built it yet.
    ///
    /// # Errors
    ///
    /// Fatal build errors; see [`build_simulator`].
    pub fn ensure_built(&mut self, cancel: &AtomicBool) -> Result<(), HarnessError> {
        if !self.built {
            build_simulator(&self.build, &self.run, cancel)?;
            self.built = true;
        }
        Ok(())
    }

    /// Delivers `image` and runs the simulator once for `test_name`.
    ///
    /// A per-test image file written by [`DeliveryMode::PathArg`] is
    /// removed once the run finishes, whatever the run's fate, so the
    /// working directory does not accumulate one file per test.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Io`] if delivery fails, [`HarnessError::Spawn`] if
    /// the run program cannot start, [`HarnessError::Cancelled`] on
    /// cancellation. A timed-out run is a normal [`RunCapture::TimedOut`].
    pub fn run_case(
        &self,
        test_name: &str,
        image: &WordImage,
        cancel: &AtomicBool,
    ) -> Result<RunCapture, HarnessError> {
        let extra_arg = stage::deliver(image, &self.run, test_name)?;

        let mut invocation =
            Invocation::new(&self.run.program, Duration::from_secs(self.run.timeout_secs))
                .args(self.run.args.iter().cloned())
                .current_dir(&self.run.workdir);
        if let Some(path) = &extra_arg {
            invocation = invocation.arg(path.display().to_string());
        }

        let result = invocation.execute(cancel);
        if let Some(path) = extra_arg {
            let _ = fs::remove_file(self.run.workdir.join(path));
        }
        result
    }
}
