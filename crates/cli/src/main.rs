//! Verification harness CLI.
//!
//! This binary selects test cases, configures the harness, and runs one
//! batch against the simulator under test. It performs:
//! 1. **Selection:** named tests (skip list bypassed), `--all` corpus
//!    discovery, or the built-in smoke suite.
//! 2. **Configuration:** a JSON config file plus targeted flag overrides.
//! 3. **Reporting:** per-test verdicts, a branch-counter table when any
//!    test reported counters, and the aggregate pass/accuracy footer.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use rvcheck_core::config::HarnessConfig;
use rvcheck_core::corpus;
use rvcheck_core::driver::DeliveryMode;
use rvcheck_core::image::TokenPolicy;
use rvcheck_core::report;
use rvcheck_core::runner::Runner;
use rvcheck_core::verdict::ZeroTotalPolicy;

#[derive(Parser, Debug)]
#[command(
    name = "rvcheck",
    version,
    about = "Regression-verification harness for cycle-accurate RISC-V simulators",
    long_about = "Builds the simulator under test once, then runs each selected test case \
under a timeout, scoring 'Result in <reg> (...)' markers and branch counters out of its stdout.\n\n\
Examples:\n  rvcheck                          run the built-in smoke suite\n  \
rvcheck sum gcd                  run named tests (skip list bypassed)\n  \
rvcheck --all --corpus testcases run every .data case in a directory\n  \
rvcheck --all --strict --zero-total full-credit"
)]
struct Cli {
    /// Specific test names to run (a trailing .data or .c is tolerated).
    tests: Vec<String>,

    /// Run all tests discovered in the corpus directory.
    #[arg(long)]
    all: bool,

    /// Corpus directory holding .data image descriptions.
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Force a simulator rebuild even if the executable is present.
    #[arg(long)]
    rebuild: bool,

    /// Fail a test's image synthesis on the first malformed token.
    #[arg(long)]
    strict: bool,

    /// Accuracy policy for tests reporting a zero branch total.
    #[arg(long, value_parser = parse_zero_total)]
    zero_total: Option<ZeroTotalPolicy>,

    /// Per-test run timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// How the synthesized image reaches the simulator.
    #[arg(long, value_parser = parse_delivery)]
    deliver: Option<DeliveryMode>,

    /// JSON harness configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_zero_total(s: &str) -> Result<ZeroTotalPolicy, String> {
    match s {
        "not-applicable" => Ok(ZeroTotalPolicy::NotApplicable),
        "full-credit" => Ok(ZeroTotalPolicy::FullCredit),
        other => Err(format!(
            "unknown zero-total policy '{other}' (expected 'not-applicable' or 'full-credit')"
        )),
    }
}

fn parse_delivery(s: &str) -> Result<DeliveryMode, String> {
    match s {
        "stage" => Ok(DeliveryMode::Stage),
        "path-arg" => Ok(DeliveryMode::PathArg),
        other => Err(format!(
            "unknown delivery mode '{other}' (expected 'stage' or 'path-arg')"
        )),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match HarnessConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config: {e}");
                process::exit(2);
            }
        },
        None => HarnessConfig::default(),
    };

    if let Some(dir) = cli.corpus {
        config.corpus_dir = dir;
    }
    if cli.rebuild {
        config.build.force = true;
    }
    if cli.strict {
        config.scoring.tokens = TokenPolicy::Strict;
    }
    if let Some(policy) = cli.zero_total {
        config.scoring.zero_total = policy;
    }
    if let Some(secs) = cli.timeout {
        config.run.timeout_secs = secs;
    }
    if let Some(mode) = cli.deliver {
        config.run.delivery = mode;
    }

    let cases = if !cli.tests.is_empty() {
        corpus::from_names(&cli.tests)
    } else if cli.all {
        match corpus::discover(&config.corpus_dir, corpus::DEFAULT_SKIP) {
            Ok(cases) => cases,
            Err(e) => {
                eprintln!("Error discovering corpus: {e}");
                process::exit(2);
            }
        }
    } else {
        corpus::default_suite()
    };

    if cases.is_empty() {
        eprintln!("No test cases selected.");
        process::exit(2);
    }

    println!("Starting CPU verification ({} tests)...", cases.len());

    let runner = Runner::new(config);
    let batch = match runner.run(&cases) {
        Ok(batch) => batch,
        Err(e) => {
            error!("batch aborted");
            eprintln!("{e}");
            process::exit(1);
        }
    };

    if batch.outcomes.iter().any(|o| o.total_branches.is_some()) {
        println!();
        print!("{}", report::counter_table(&batch.outcomes));
    }

    println!();
    println!("{}", report::summary_line(&batch.summary));
    if batch.cancelled {
        println!("(batch cancelled before all tests ran)");
    }

    process::exit(i32::from(!batch.summary.all_passed()));
}
