//! Line-oriented region stripping.
//!
//! A region is a run of lines between two exact marker lines:
//!
//! ```text
//! // #region graphql
//! ...variant-owned code...
//! // #endregion graphql
//! ```
//!
//! Stripping is a two-state scan. Lines inside a region of the removed
//! variant are dropped together with its markers; markers of the kept
//! variant are dropped while their content survives.
//!
//! Before anything is mutated, [`validate`] checks that markers pair up.
//! Regions of different names may nest, but a name may not be reopened
//! while open, spans may not cross, and every span must be closed.

use std::path::Path;

use crate::domain::DomainError;

/// Start marker line for `name`.
pub fn start_marker(name: &str) -> String {
    format!("// #region {name}")
}

/// End marker line for `name`.
pub fn end_marker(name: &str) -> String {
    format!("// #endregion {name}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Keeping,
    Removing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Start,
    End,
}

/// Marker lines of a set of region names, matched on trimmed text.
struct MarkerSet<'a> {
    names: Vec<&'a str>,
    starts: Vec<String>,
    ends: Vec<String>,
}

impl<'a> MarkerSet<'a> {
    fn new(names: &[&'a str]) -> Self {
        Self {
            names: names.to_vec(),
            starts: names.iter().map(|n| start_marker(n)).collect(),
            ends: names.iter().map(|n| end_marker(n)).collect(),
        }
    }

    fn classify(&self, line: &str) -> Option<(MarkerKind, &'a str)> {
        let trimmed = line.trim();
        if let Some(i) = self.starts.iter().position(|m| m == trimmed) {
            return Some((MarkerKind::Start, self.names[i]));
        }
        self.ends
            .iter()
            .position(|m| m == trimmed)
            .map(|i| (MarkerKind::End, self.names[i]))
    }
}

/// Reject marker layouts whose stripped output would be ambiguous.
///
/// Only markers whose name is in `names` are considered; other
/// `#region` comments (editor folding) pass through untouched.
pub fn validate(path: &Path, content: &str, names: &[&str]) -> Result<(), DomainError> {
    let markers = MarkerSet::new(names);
    let mut open: Vec<(&str, usize)> = Vec::new();

    let fail = |line: usize, reason: String| DomainError::MalformedRegions {
        path: path.to_path_buf(),
        line,
        reason,
    };

    for (idx, line) in content.split('\n').enumerate() {
        let lineno = idx + 1;
        match markers.classify(line) {
            Some((MarkerKind::Start, name)) => {
                if let Some((_, at)) = open.iter().find(|(n, _)| *n == name) {
                    return Err(fail(
                        lineno,
                        format!("region '{name}' reopened while still open from line {at}"),
                    ));
                }
                open.push((name, lineno));
            }
            Some((MarkerKind::End, name)) => match open.last().copied() {
                None => {
                    return Err(fail(
                        lineno,
                        format!("'#endregion {name}' has no open region"),
                    ));
                }
                Some((top, _)) if top == name => {
                    open.pop();
                }
                Some((top, at)) => {
                    return Err(fail(
                        lineno,
                        format!(
                            "'#endregion {name}' crosses region '{top}' opened at line {at}"
                        ),
                    ));
                }
            },
            None => {}
        }
    }

    match open.last() {
        Some((name, at)) => Err(fail(*at, format!("region '{name}' is never closed"))),
        None => Ok(()),
    }
}

/// Drop the `removed` variant's regions and the `kept` variant's markers.
///
/// Blank-line runs are collapsed afterwards.
pub fn strip(content: &str, removed: &str, kept: &str) -> String {
    let removed_start = start_marker(removed);
    let removed_end = end_marker(removed);
    let kept_start = start_marker(kept);
    let kept_end = end_marker(kept);

    let mut state = ScanState::Keeping;
    let mut out: Vec<&str> = Vec::new();

    for line in content.split('\n') {
        let trimmed = line.trim();
        state = match state {
            ScanState::Removing if trimmed == removed_end => ScanState::Keeping,
            ScanState::Removing => ScanState::Removing,
            ScanState::Keeping if trimmed == removed_start => ScanState::Removing,
            ScanState::Keeping => {
                if trimmed != removed_end && trimmed != kept_start && trimmed != kept_end {
                    out.push(line);
                }
                ScanState::Keeping
            }
        };
    }

    collapse_blank_lines(&out.join("\n"))
}

/// Drop every marker line of `names`, keeping all code between them.
pub fn strip_markers(content: &str, names: &[&str]) -> String {
    let markers = MarkerSet::new(names);
    let kept: Vec<&str> = content
        .split('\n')
        .filter(|line| markers.classify(line).is_none())
        .collect();
    collapse_blank_lines(&kept.join("\n"))
}

/// Does `content` carry any marker line of `names`?
pub fn has_markers(content: &str, names: &[&str]) -> bool {
    let markers = MarkerSet::new(names);
    content.split('\n').any(|line| markers.classify(line).is_some())
}

/// Collapse every run of three or more line breaks into exactly two.
///
/// A `\r\n` pair counts as one line break.
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        let newline = match ch {
            '\n' => "\n",
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                "\r\n"
            }
            _ => {
                run = 0;
                out.push(ch);
                continue;
            }
        };
        run += 1;
        if run <= 2 {
            out.push_str(newline);
        }
    }
    out
}
