//! Bounded-time subprocess invocation.
//!
//! Replaces the ad hoc shell strings the original toolflow used with a
//! structured description: program, argument vector, working directory,
//! wall-clock timeout. No shell is involved, so paths containing separators
//! or spaces pass through as single arguments.
//!
//! Stream capture runs on dedicated threads while the waiter polls the child
//! against its deadline; on expiry the child is killed and reaped and the
//! caller gets a distinguished [`RunCapture::TimedOut`] instead of an error,
//! so one wedged test cannot abort the batch.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::HarnessError;

/// Poll interval while waiting on a child process.
const WAIT_POLL: Duration = Duration::from_millis(10);

/// A fully described subprocess invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    workdir: Option<PathBuf>,
    timeout: Duration,
}

/// Outcome of one bounded subprocess run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunCapture {
    /// The child exited on its own within the timeout.
    Completed {
        /// Captured stdout — the only source of result markers.
        stdout: String,
        /// Captured stderr, kept separate for diagnostics.
        stderr: String,
        /// Exit code, if the child exited normally.
        code: Option<i32>,
    },
    /// The wall-clock timeout expired; the child was killed and reaped.
    TimedOut,
}

impl RunCapture {
    /// True for a normal exit with code 0.
    pub fn success(&self) -> bool {
        matches!(self, Self::Completed { code: Some(0), .. })
    }
}

impl Invocation {
    /// Starts describing an invocation of `program` with the given timeout.
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            workdir: None,
            timeout,
        }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends every argument in `args`.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// The program this invocation runs.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Runs the child to completion, timeout, or cancellation.
    ///
    /// `cancel` is checked on every poll; when it becomes true the child is
    /// killed and [`HarnessError::Cancelled`] is returned.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Spawn`] if the program cannot be started at all, and
    /// [`HarnessError::Cancelled`] on cancellation. A timeout is *not* an
    /// error; it is [`RunCapture::TimedOut`].
    pub fn execute(&self, cancel: &AtomicBool) -> Result<RunCapture, HarnessError> {
        debug!(program = %self.program, args = ?self.args, "spawning");

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| HarnessError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let stdout = drain_thread(child.stdout.take());
        let stderr = drain_thread(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait().map_err(|source| HarnessError::Spawn {
                program: self.program.clone(),
                source,
            })? {
                return Ok(RunCapture::Completed {
                    stdout: join_drain(stdout),
                    stderr: join_drain(stderr),
                    code: status.code(),
                });
            }

            if cancel.load(Ordering::Relaxed) {
                kill_and_reap(&mut child);
                let _ = join_drain(stdout);
                let _ = join_drain(stderr);
                return Err(HarnessError::Cancelled);
            }

            if Instant::now() >= deadline {
                warn!(program = %self.program, timeout = ?self.timeout, "timed out, killing");
                kill_and_reap(&mut child);
                let _ = join_drain(stdout);
                let _ = join_drain(stderr);
                return Ok(RunCapture::TimedOut);
            }

            thread::sleep(WAIT_POLL);
        }
    }
}

fn drain_thread<R: Read + Send + 'static>(stream: Option<R>) -> Option<JoinHandle<String>> {
    stream.map(|mut r| {
        thread::spawn(move || {
            let mut buf = String::new();
            // A read error mid-stream (e.g. the child was killed) leaves us
            // with whatever arrived before it, which is what diagnostics want.
            let _ = r.read_to_string(&mut buf);
            buf
        })
    })
}

fn join_drain(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
