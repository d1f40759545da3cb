use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info};

use super::stats::CompressionStats;
use crate::bitstream::{pack, unpack_exact, BitString};
use crate::diff_algorithms::{diff, LineSequence};
use crate::error::{Error, Result};
use crate::huffman_coding::{build_codes, build_tree, decode, encode, HuffmanNode, TreeArtifact};
use crate::tools::cli::DiffOpts;

/// The three files a run leaves behind, named after file A.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// `<base>_compressed.bin`: the packed payload.
    pub bin_file: PathBuf,
    /// `<base>_tree.huf`: the decode key (see `huffman_coding::tree_store`).
    pub tree_file: PathBuf,
    /// `<base>_compressed_bits.txt`: the payload bits as '0'/'1' text.
    pub txt_file: PathBuf,
}

impl Artifacts {
    /// Artifact paths in `out_dir` derived from the stem of `file_a`.
    pub fn for_input(file_a: &Path, out_dir: &Path) -> Self {
        let base = file_a
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "diff".to_string());
        Self {
            bin_file: out_dir.join(format!("{}_compressed.bin", base)),
            tree_file: out_dir.join(format!("{}_tree.huf", base)),
            txt_file: out_dir.join(format!("{}_compressed_bits.txt", base)),
        }
    }

    /// Write the payload, tree and bit text. The output directory is created if needed.
    pub fn write(&self, encoded: &Encoded) -> Result<()> {
        if let Some(dir) = self.bin_file.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
            }
        }
        fs::write(&self.bin_file, &encoded.packed).map_err(|e| Error::io(&self.bin_file, e))?;
        fs::write(&self.tree_file, encoded.tree_artifact().to_bytes())
            .map_err(|e| Error::io(&self.tree_file, e))?;
        fs::write(&self.txt_file, encoded.bits.to_string())
            .map_err(|e| Error::io(&self.txt_file, e))?;
        info!("Saved {}", self);
        Ok(())
    }
}

impl Display for Artifacts {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            self.bin_file.display(),
            self.tree_file.display(),
            self.txt_file.display()
        )
    }
}

/// The coded form of one diff text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// None for an empty diff, which is stored as zero bits and no tree.
    pub tree: Option<HuffmanNode>,
    pub bits: BitString,
    pub packed: Vec<u8>,
    /// Chars in the encoded text.
    pub symbol_count: usize,
}

impl Encoded {
    /// The decode key for `packed`.
    pub fn tree_artifact(&self) -> TreeArtifact {
        TreeArtifact::new(self.tree.clone(), self.symbol_count, self.bits.len())
    }
}

/// Build the tree and code map for `diff_text`, encode it and pack the bits. An empty diff
/// skips tree building and encodes to nothing.
pub fn encode_diff(diff_text: &str) -> Result<Encoded> {
    if diff_text.is_empty() {
        info!("Inputs have no differences, nothing to encode.");
        return Ok(Encoded {
            tree: None,
            bits: BitString::new(),
            packed: Vec::new(),
            symbol_count: 0,
        });
    }

    let tree = build_tree(diff_text)?;
    let codes = build_codes(&tree);
    let bits = encode(diff_text, &codes)?;
    let packed = pack(&bits);
    info!(
        "Encoded {} symbols with {} codes into {} bits ({} bytes).",
        tree.weight(),
        codes.len(),
        bits.len(),
        packed.len()
    );
    Ok(Encoded {
        symbol_count: diff_text.chars().count(),
        tree: Some(tree),
        bits,
        packed,
    })
}

/// Decode both the in-memory bits and the packed bytes (cut back to the exact bit length)
/// and check each gives `diff_text` again. Failures are logged, not returned.
pub fn verify(diff_text: &str, encoded: &Encoded) -> bool {
    let Some(tree) = &encoded.tree else {
        let ok = diff_text.is_empty() && encoded.bits.is_empty() && encoded.packed.is_empty();
        if !ok {
            error!("Verification failed: payload present without a tree.");
        }
        return ok;
    };

    let in_memory = decode(&encoded.bits, tree);
    let from_bytes =
        unpack_exact(&encoded.packed, encoded.bits.len()).and_then(|bits| decode(&bits, tree));

    let mut verified = true;
    for (source, decoded) in [("bit string", in_memory), ("packed bytes", from_bytes)] {
        match decoded {
            Ok(text) if text == diff_text => debug!("Round trip from {} matches.", source),
            Ok(_) => {
                error!("Verification failed: the {} decoded to different text.", source);
                verified = false;
            }
            Err(e) => {
                error!("Verification failed decoding the {}: {}", source, e);
                verified = false;
            }
        }
    }
    verified
}

/// Result of one diff-and-compress run.
#[derive(Debug, Clone)]
pub struct CompressionRun {
    pub diff_text: String,
    pub encoded: Encoded,
    /// True only when both the bit string and the packed bytes decode back to `diff_text`.
    pub verified: bool,
    pub stats: CompressionStats,
}

/// Diff `file_a` against `file_b`, compress the diff and verify it. Artifacts are written
/// to `out_dir` when one is given.
pub fn run(file_a: &Path, file_b: &Path, out_dir: Option<&Path>) -> Result<CompressionRun> {
    let a = LineSequence::read(file_a)?;
    let b = LineSequence::read(file_b)?;

    let diff_text = diff(&a, &b);
    info!(
        "Diff of {} and {} is {} bytes.",
        file_a.display(),
        file_b.display(),
        diff_text.len()
    );

    let encoded = encode_diff(&diff_text)?;
    let verified = verify(&diff_text, &encoded);

    let artifacts = match out_dir {
        Some(dir) => {
            let artifacts = Artifacts::for_input(file_a, dir);
            artifacts.write(&encoded)?;
            Some(artifacts)
        }
        None => None,
    };

    let stats = CompressionStats::new(
        file_size(file_a)?,
        file_size(file_b)?,
        diff_text.len(),
        &encoded,
        artifacts,
    );
    debug!("Compression ratio is {:.2}%", stats.compression_ratio);

    Ok(CompressionRun {
        diff_text,
        encoded,
        verified,
        stats,
    })
}

/// Compress the pair of files named in opts <DiffOpts>.
pub fn compress(opts: &DiffOpts) -> Result<CompressionRun> {
    let out_dir = opts.write_artifacts.then_some(opts.out_dir.as_path());
    run(&opts.file_a, &opts.file_b, out_dir)
}

fn file_size(path: &Path) -> Result<u64> {
    fs::metadata(path)
        .map(|meta| meta.len())
        .map_err(|e| Error::io(path, e))
}
