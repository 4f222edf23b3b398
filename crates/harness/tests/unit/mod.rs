//! Unit tests for the harness components.

pub mod verdict;

#[cfg(unix)]
pub mod driver;
#[cfg(unix)]
pub mod runner;
