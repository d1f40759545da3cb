use std::fmt::{self, Display, Formatter};

use log::debug;

use super::lcs::lcs;
use super::line_sequence::LineSequence;

/// One emitted diff line. Lines common to both inputs are never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit<'a> {
    /// Present in A only.
    Remove(&'a str),
    /// Present in B only.
    Add(&'a str),
}

impl Display for Edit<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Edit::Remove(line) => write!(f, "- {}", line),
            Edit::Add(line) => write!(f, "+ {}", line),
        }
    }
}

/// Walk both sequences along their common subsequence with the most chars (not the most
/// lines). Before each common line, the lines of A that precede it are removals and then
/// the lines of B that precede it are additions. Leftover lines of A, then of B, close
/// the list.
pub fn edits<'a>(a: &'a LineSequence, b: &'a LineSequence) -> Vec<Edit<'a>> {
    let (xs, ys) = (a.lines(), b.lines());
    let common = lcs(xs, ys, |line| line.chars().count());
    debug!(
        "Common subsequence holds {} of {} / {} lines",
        common.len(),
        xs.len(),
        ys.len()
    );

    let mut out = Vec::with_capacity(xs.len() + ys.len() - 2 * common.len());
    let (mut i, mut j) = (0, 0);
    for line in common {
        while i < xs.len() && xs[i] != *line {
            out.push(Edit::Remove(&xs[i]));
            i += 1;
        }
        while j < ys.len() && ys[j] != *line {
            out.push(Edit::Add(&ys[j]));
            j += 1;
        }
        i += 1;
        j += 1;
    }
    out.extend(xs.get(i..).unwrap_or_default().iter().map(|l| Edit::Remove(l)));
    out.extend(ys.get(j..).unwrap_or_default().iter().map(|l| Edit::Add(l)));
    out
}

/// Render the add/remove diff of two line sequences as a single text blob.
pub fn diff(a: &LineSequence, b: &LineSequence) -> String {
    edits(a, b).iter().map(ToString::to_string).collect()
}
