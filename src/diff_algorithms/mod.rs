//! Line-level diffing.
//!
//! - `line_sequence`: the lines of an input file, terminators included.
//! - `lcs`: longest common subsequence over a DP table.
//! - `line_diff`: the `- `/`+ ` diff text derived from the LCS.
//!
//! Only removed and added lines are emitted; common lines are consumed silently, so the
//! diff text is not a patch that can be applied on its own.

pub mod lcs;
pub mod line_diff;
pub mod line_sequence;

pub use line_diff::{diff, edits, Edit};
pub use line_sequence::LineSequence;
