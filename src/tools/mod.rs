//! The tools module provides the helpers around the pipeline.
//!
//! The tools are:
//! - cli: Command line interface and the run options.
//! - freq_count: Char frequency count feeding the Huffman tree.
//! - report: The text report printed after a compress run.
//!
pub mod cli;
pub mod freq_count;
pub mod report;
