//! Marker extraction from simulator stdout.
//!
//! The textual contract with the simulator is three fixed marker forms,
//! each on its own line, in any order, anywhere in otherwise free-form
//! output:
//!
//! ```text
//! Result in x1 (Unsigned): 5050
//! TOTAL_BRANCH: 128
//! CORRECT_BRANCH: 97
//! ```
//!
//! Keywords are case-sensitive; integers are decimal; whitespace around the
//! colon is tolerated. Only the first occurrence of each marker counts.

/// Signedness annotation on a result marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signedness {
    /// `(Signed)` — the value was printed as a signed integer.
    Signed,
    /// `(Unsigned)` — the value was printed as an unsigned integer.
    Unsigned,
}

/// A parsed `Result in <register> (<Signed|Unsigned>): <integer>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultMarker {
    /// Register named by the simulator (e.g. `x1`).
    pub register: String,
    /// How the simulator printed the value.
    pub signedness: Signedness,
    /// The reported value.
    pub value: i64,
}

/// All markers recognized in one capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markers {
    /// The program's final observable value, if reported.
    pub result: Option<ResultMarker>,
    /// Conditional branches executed, if reported.
    pub total_branch: Option<u64>,
    /// Conditional branches predicted correctly, if reported.
    pub correct_branch: Option<u64>,
}

impl Markers {
    /// Scans `stdout` line by line for recognized markers.
    pub fn extract(stdout: &str) -> Self {
        let mut markers = Self::default();
        for line in stdout.lines() {
            let line = line.trim();
            if markers.result.is_none() {
                if let Some(result) = parse_result(line) {
                    markers.result = Some(result);
                    continue;
                }
            }
            if markers.total_branch.is_none() {
                if let Some(n) = parse_counter(line, "TOTAL_BRANCH") {
                    markers.total_branch = Some(n);
                    continue;
                }
            }
            if markers.correct_branch.is_none() {
                if let Some(n) = parse_counter(line, "CORRECT_BRANCH") {
                    markers.correct_branch = Some(n);
                }
            }
        }
        markers
    }

    /// The branch counter pair, when both were reported.
    pub fn branch_counts(&self) -> Option<(u64, u64)> {
        Some((self.total_branch?, self.correct_branch?))
    }
}

/// Parses `Result in <register> (<Signed|Unsigned>)<ws>:<ws><integer>`.
fn parse_result(line: &str) -> Option<ResultMarker> {
    let rest = line.strip_prefix("Result in ")?;
    let open = rest.find('(')?;
    let close = rest[open..].find(')')? + open;

    let register = rest[..open].trim();
    if register.is_empty() {
        return None;
    }
    let signedness = match &rest[open + 1..close] {
        "Signed" => Signedness::Signed,
        "Unsigned" => Signedness::Unsigned,
        _ => return None,
    };

    let after = rest[close + 1..].trim_start();
    let value = parse_colon_integer(after)?;

    Some(ResultMarker {
        register: register.to_string(),
        signedness,
        value,
    })
}

/// Parses `<KEYWORD><ws>:<ws><integer>` counter lines.
fn parse_counter(line: &str, keyword: &str) -> Option<u64> {
    let rest = line.strip_prefix(keyword)?;
    let value = parse_colon_integer(rest.trim_start())?;
    u64::try_from(value).ok()
}

/// Parses `:<ws><integer>`, taking only the first whitespace-separated token
/// after the colon so trailing commentary on the line is ignored.
fn parse_colon_integer(text: &str) -> Option<i64> {
    let after_colon = text.strip_prefix(':')?.trim_start();
    let token = after_colon.split_whitespace().next()?;
    token.parse().ok()
}
