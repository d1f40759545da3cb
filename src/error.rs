//! Error type shared by every stage of the diff/compress pipeline.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Everything that can go wrong while diffing, coding or persisting.
#[derive(Debug, Error)]
pub enum Error {
    /// An input could not be read or an artifact could not be written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A Huffman tree was requested for text with no symbols.
    #[error("cannot build a Huffman tree from empty input")]
    EmptyInput,

    /// The text holds a symbol the code map knows nothing about.
    #[error("symbol {0:?} has no code in the code map")]
    UnknownSymbol(char),

    /// Decoded text disagrees with what the artifacts say it should be.
    #[error("decoded text does not match the original diff")]
    DecodeMismatch,

    /// The bit stream ran out part-way through a code.
    #[error("bit stream ends inside a code ({dangling} dangling bits)")]
    IncompleteCode { dangling: usize },

    /// The serialized tree could not be parsed.
    #[error("invalid tree artifact: {0}")]
    InvalidTree(String),

    /// More bits were requested than the packed buffer holds.
    #[error("bit length {bits} exceeds the {available} bits available")]
    BitLength { bits: usize, available: usize },

    /// A textual bit string held something other than '0' or '1'.
    #[error("invalid bit character {0:?}")]
    InvalidBit(char),
}

impl Error {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
