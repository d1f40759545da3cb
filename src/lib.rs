//! Line diff of two text files, compressed with a Huffman code.
//!
//! Version 0.1.0
//!
//! The lines removed from the first file and added in the second (taken along their
//! longest common subsequence) form a diff text. That text is Huffman-encoded, the bits
//! are packed into bytes, and a decode of both the bits and the packed bytes is checked
//! against the diff before any sizes are reported.
//!
//! Basic usage to compress the difference between two files is as follows:
//!
//! `$> huffdiff compress old.txt new.txt`
//!
//! This creates old_compressed.bin, old_tree.huf and old_compressed_bits.txt.
//!
//! `$> huffdiff decompress old_compressed.bin old_tree.huf`
//!
//! prints the diff text again.
//!
pub mod bitstream;
pub mod compression;
pub mod diff_algorithms;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use error::{Error, Result};
