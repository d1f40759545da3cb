use std::fmt::{self, Display, Formatter};

use super::compress::{Artifacts, Encoded};

/// Size report for one pipeline run. Built once, never changed.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionStats {
    /// Size of file A on disk, in bytes.
    pub file_a_size: u64,
    /// Size of file B on disk, in bytes.
    pub file_b_size: u64,
    /// UTF-8 length of the diff text.
    pub diff_size: usize,
    /// Length of the packed payload.
    pub compressed_size: usize,
    /// Exact number of payload bits before padding.
    pub bit_length: usize,
    /// compressed_size / diff_size × 100, or 0 for an empty diff.
    pub compression_ratio: f64,
    /// Where the artifacts went, if they were written.
    pub artifacts: Option<Artifacts>,
}

impl CompressionStats {
    pub fn new(
        file_a_size: u64,
        file_b_size: u64,
        diff_size: usize,
        encoded: &Encoded,
        artifacts: Option<Artifacts>,
    ) -> Self {
        Self {
            file_a_size,
            file_b_size,
            diff_size,
            compressed_size: encoded.packed.len(),
            bit_length: encoded.bits.len(),
            compression_ratio: compression_ratio(encoded.packed.len(), diff_size),
            artifacts,
        }
    }
}

/// Percentage of the diff size that the payload takes up. An empty diff rates 0.
pub fn compression_ratio(compressed_size: usize, diff_size: usize) -> f64 {
    if diff_size == 0 {
        return 0.0;
    }
    compressed_size as f64 / diff_size as f64 * 100.0
}

impl Display for CompressionStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "File A Size: {} bytes", self.file_a_size)?;
        writeln!(f, "File B Size: {} bytes", self.file_b_size)?;
        writeln!(f, "Diff Size: {} bytes", self.diff_size)?;
        writeln!(
            f,
            "Compressed Size: {} bytes ({} bits)",
            self.compressed_size, self.bit_length
        )?;
        writeln!(f, "Compression Ratio: {:.2}%", self.compression_ratio)?;
        if let Some(artifacts) = &self.artifacts {
            writeln!(f, "Saved: {}", artifacts)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::compression_ratio;

    #[test]
    fn ratio_of_empty_diff_is_zero() {
        assert_eq!(compression_ratio(0, 0), 0.0);
    }

    #[test]
    fn ratio_is_a_percentage() {
        assert_eq!(compression_ratio(3, 8), 37.5);
        assert_eq!(compression_ratio(8, 8), 100.0);
    }
}
