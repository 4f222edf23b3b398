//! Batch orchestration.
//!
//! One batch: build the simulator once (fatal on failure), then for each
//! selected test case synthesize its image, deliver it, run the simulator
//! under the per-test timeout, and score the captured output. Every error
//! after a successful build is isolated to its test case; the batch always
//! completes and reports a summary, even if every test failed.

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, info_span, warn};

use crate::config::HarnessConfig;
use crate::corpus::TestCase;
use crate::driver::SimulatorDriver;
use crate::error::HarnessError;
use crate::image;
use crate::report::RunSummary;
use crate::verdict::{self, TestOutcome};

/// Result of one completed (possibly cancelled) batch.
#[derive(Debug)]
pub struct BatchResult {
    /// Per-test outcomes, in submission order.
    pub outcomes: Vec<TestOutcome>,
    /// Derived aggregate.
    pub summary: RunSummary,
    /// True if the batch was cut short by cancellation.
    pub cancelled: bool,
}

/// Runs batches of test cases against one built simulator.
#[derive(Debug)]
pub struct Runner {
    config: HarnessConfig,
    cancel: Arc<AtomicBool>,
}

impl Runner {
    /// Creates a runner over the given configuration.
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that cancels the batch when set; safe to share with a signal
    /// handler. The in-flight subprocess is killed; outcomes already
    /// collected stay in the summary.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// The configuration this runner was built with.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Runs `cases` sequentially and collects their outcomes.
    ///
    /// Per-test verdict lines are printed as they are produced, so a long
    /// batch reports progress.
    ///
    /// # Errors
    ///
    /// Only fatal pre-run failures: [`HarnessError::BuildFailed`],
    /// [`HarnessError::BuildTimedOut`], or a spawn failure during the
    /// build. Everything later is an outcome, not an error.
    pub fn run(&self, cases: &[TestCase]) -> Result<BatchResult, HarnessError> {
        let mut driver =
            SimulatorDriver::new(self.config.build.clone(), self.config.run.clone());
        driver.ensure_built(&self.cancel)?;

        let mut outcomes = Vec::with_capacity(cases.len());
        let mut cancelled = false;

        for case in cases {
            if self.cancel.load(Ordering::Relaxed) {
                cancelled = true;
                break;
            }

            let span = info_span!("test", name = %case.name);
            let _guard = span.enter();

            let outcome = match self.run_one(&driver, case) {
                Ok(outcome) => outcome,
                Err(HarnessError::Cancelled) => {
                    cancelled = true;
                    break;
                }
                // Per-test infrastructure failures (unreadable description,
                // staging write, run-program spawn) stay isolated.
                Err(err) => TestOutcome::conversion_failed(&case.name, err.to_string()),
            };

            println!("{}", crate::report::verdict_line(&outcome));
            outcomes.push(outcome);
        }

        let summary = RunSummary::from_outcomes(&outcomes);
        if cancelled {
            warn!(collected = outcomes.len(), "batch cancelled");
        }
        info!(passed = summary.passed, total = summary.total, "batch finished");

        Ok(BatchResult {
            outcomes,
            summary,
            cancelled,
        })
    }

    /// Synthesize, deliver, run, score — one test case end to end.
    fn run_one(
        &self,
        driver: &SimulatorDriver,
        case: &TestCase,
    ) -> Result<TestOutcome, HarnessError> {
        let description = case.description_path(&self.config.corpus_dir);
        let text =
            fs::read_to_string(&description).map_err(|e| HarnessError::io(&description, e))?;

        let word_image = match image::synthesize_bounded(
            &text,
            self.config.scoring.tokens,
            self.config.scoring.max_image_bytes,
        ) {
            Ok(img) => img,
            Err(err) => {
                return Ok(TestOutcome::conversion_failed(&case.name, err.to_string()));
            }
        };

        let capture = driver.run_case(&case.name, &word_image, &self.cancel)?;
        Ok(verdict::score(
            &capture,
            case,
            self.config.scoring.zero_total,
            self.config.scoring.tail_lines,
        ))
    }
}
