use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::{info, warn};

use crate::bitstream::unpack_exact;
use crate::error::{Error, Result};
use crate::huffman_coding::{decode, TreeArtifact};
use crate::tools::cli::DiffOpts;

/// Turn a packed payload back into diff text using its tree artifact.
///
/// Only the recorded number of bits is decoded, so byte padding is never read as data.
/// The decoded text must hold exactly the recorded number of chars.
pub fn decode_payload(packed: &[u8], artifact: &TreeArtifact) -> Result<String> {
    let bit_len = usize::try_from(artifact.bit_len).unwrap_or(usize::MAX);
    let bits = unpack_exact(packed, bit_len)?;
    if packed.len() > bit_len.div_ceil(8) {
        warn!(
            "Payload has {} bytes past the recorded bit length, ignoring them.",
            packed.len() - bit_len.div_ceil(8)
        );
    }

    let text = match &artifact.tree {
        Some(tree) => decode(&bits, tree)?,
        None if bits.is_empty() => String::new(),
        None => return Err(Error::DecodeMismatch),
    };

    if text.chars().count() as u64 != artifact.symbol_count {
        return Err(Error::DecodeMismatch);
    }
    Ok(text)
}

/// Read a `.bin` payload and its tree artifact and decode them.
pub fn decompress_artifacts(bin_file: &Path, tree_file: &Path) -> Result<String> {
    let packed = fs::read(bin_file).map_err(|e| Error::io(bin_file, e))?;
    let raw_tree = fs::read(tree_file).map_err(|e| Error::io(tree_file, e))?;
    let artifact = TreeArtifact::from_bytes(&raw_tree)?;
    info!(
        "Loaded {} ({} bytes) with a tree for {} symbols.",
        bin_file.display(),
        packed.len(),
        artifact.symbol_count
    );
    decode_payload(&packed, &artifact)
}

/// Decompress the payload and tree named in opts <DiffOpts>, writing the diff text to
/// the output file or to stdout.
pub fn decompress(opts: &DiffOpts) -> Result<()> {
    let text = decompress_artifacts(&opts.file_a, &opts.file_b)?;
    match &opts.output {
        Some(path) => {
            fs::write(path, &text).map_err(|e| Error::io(path, e))?;
            info!("Wrote {} bytes of diff to {}", text.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| Error::io("<stdout>", e))?;
        }
    }
    Ok(())
}
