//! The compression module drives the whole pipeline.
//!
//! Compression happens in the following steps:
//! - Read both inputs as line sequences.
//! - Diff them along their longest common subsequence.
//! - Build a Huffman tree over the chars of the diff text and encode it.
//! - Pack the bits into bytes.
//! - Verify: decode the bit string, and the packed bytes cut back to the exact bit
//!   length, and compare both with the diff text.
//! - Report sizes and write the artifacts.
//!
//! Decompression is the reload path. It reads the payload and the tree artifact, unpacks
//! exactly the recorded number of bits and decodes them.
//!

pub mod compress;
pub mod decompress;
pub mod stats;

pub use compress::{compress, encode_diff, run, verify, Artifacts, CompressionRun, Encoded};
pub use decompress::{decode_payload, decompress, decompress_artifacts};
pub use stats::CompressionStats;
