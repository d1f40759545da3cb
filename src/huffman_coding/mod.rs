//! The huffman module turns diff text into a variable-length bit code and back.
//!
//! A single tree is built per text with the standard greedy merge over char frequencies.
//! There is no canonical-code step: the tree itself is the decode key, so it is stored
//! next to the payload (see `tree_store`).
//!
//! Code building, decoding and tree (de)serialization all walk the tree with an explicit
//! stack, so deep trees cannot overflow the call stack.
//!

pub mod huffman;
pub mod tree_store;

pub use huffman::{build_codes, build_tree, decode, encode, Code, CodeMap, HuffmanNode};
pub use tree_store::TreeArtifact;
