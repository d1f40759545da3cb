use std::io::{self, Write};

use super::cli::DiffOpts;
use crate::compression::CompressionRun;

/// Print the outcome of a compress run: optional diff and bits, the verification status
/// and the size statistics.
pub fn report<W: Write>(out: &mut W, run: &CompressionRun, opts: &DiffOpts) -> io::Result<()> {
    if opts.print_diff {
        writeln!(out, "=== Difference ===")?;
        write!(out, "{}", run.diff_text)?;
        if !run.diff_text.is_empty() && !run.diff_text.ends_with('\n') {
            writeln!(out)?;
        }
    }
    if opts.print_bits {
        writeln!(out, "=== Encoded Bits ===")?;
        writeln!(out, "{}", run.encoded.bits)?;
    }
    writeln!(out, "=== Decompression ===")?;
    writeln!(out, "{}", if run.verified { "Success" } else { "Failed" })?;
    writeln!(out, "=== File Size Stats ===")?;
    write!(out, "{}", run.stats)
}
