//! Test-case model and corpus discovery.
//!
//! A test case names a program the cross toolchain has already turned into a
//! `.data` image description, together with the value the simulator must
//! leave in its result register. Cases come from three places:
//! 1. **The built-in suite:** the four hand-written smoke programs.
//! 2. **Explicit names:** selected on the command line, skip list bypassed.
//! 3. **Corpus discovery:** every `.data` file in the corpus directory, in
//!    sorted order, minus the default skip list of known long runners.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::HarnessError;

/// One test case: a named program and its expected result value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestCase {
    /// Program name, without extension.
    pub name: String,
    /// Value the simulator must report in its result register.
    pub expected: i64,
    /// ISA the program was compiled for, when it matters (e.g. `rv32im`).
    #[serde(default)]
    pub arch: Option<String>,
}

impl TestCase {
    /// Creates a case with no architecture annotation.
    pub fn new(name: impl Into<String>, expected: i64) -> Self {
        Self {
            name: name.into(),
            expected,
            arch: None,
        }
    }

    /// Path of this case's image description inside `corpus_dir`.
    pub fn description_path(&self, corpus_dir: &Path) -> PathBuf {
        corpus_dir.join(format!("{}.data", self.name))
    }
}

/// Expected result values for the benchmark corpus.
///
/// Programs not listed here are expected to report 0 (plain success).
const EXPECTED: &[(&str, i64)] = &[
    ("array_test1", 123),
    ("array_test2", 43),
    ("basicopt1", 88),
    ("bulgarian", 159),
    ("div_test", 0),
    ("expr", 58),
    ("gcd", 178),
    ("hanoi", 20),
    ("lvalue2", 175),
    ("magic", 106),
    ("manyarguments", 40),
    ("mul_test", 0),
    ("multiarray", 115),
    ("naive", 94),
    ("pi", 137),
    ("qsort", 105),
    ("queens", 171),
    ("statement_test", 50),
    ("superloop", 134),
    ("tak", 186),
];

/// Cases excluded from corpus discovery by default: they run long enough to
/// stall the whole batch. Explicit name selection still runs them.
pub const DEFAULT_SKIP: &[&str] = &["pi", "basicopt1", "qsort", "superloop"];

/// Expected result value for a named program (0 when unlisted).
pub fn expected_for(name: &str) -> i64 {
    EXPECTED
        .iter()
        .find(|(n, _)| *n == name)
        .map_or(0, |(_, v)| *v)
}

/// The built-in smoke suite.
pub fn default_suite() -> Vec<TestCase> {
    vec![
        TestCase::new("sum", 5050),
        TestCase::new("vector_add", 100),
        TestCase::new("vector_mul", 100),
        TestCase {
            name: "m_extension_test".to_string(),
            expected: 4660,
            arch: Some("rv32im".to_string()),
        },
    ]
}

/// Builds cases from explicitly selected names.
///
/// A trailing `.data` or `.c` extension is tolerated and stripped. The skip
/// list does not apply: naming a test means you want it to run.
pub fn from_names<I, S>(names: I) -> Vec<TestCase>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|raw| {
            let name = raw
                .as_ref()
                .trim_end_matches(".data")
                .trim_end_matches(".c");
            TestCase::new(name, expected_for(name))
        })
        .collect()
}

/// Discovers every `.data` case in `dir`, sorted by name, skip list applied.
///
/// # Errors
///
/// [`HarnessError::Io`] if the directory cannot be read.
pub fn discover(dir: &Path, skip: &[&str]) -> Result<Vec<TestCase>, HarnessError> {
    let entries = fs::read_dir(dir).map_err(|e| HarnessError::io(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| HarnessError::io(dir, e))?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "data") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if !skip.contains(&stem) {
                    names.push(stem.to_string());
                }
            }
        }
    }
    names.sort();

    Ok(names
        .into_iter()
        .map(|name| {
            let expected = expected_for(&name);
            TestCase::new(name, expected)
        })
        .collect())
}
