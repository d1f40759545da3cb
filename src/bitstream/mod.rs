//! The bitstream module is the I/O subsystem between the Huffman coder and the bytes on disk.
//!
//! Codes are variable length, so the encoder produces a `BitString` rather than bytes. The
//! `BitPacker` turns that into bytes (8 bits per byte, most significant bit first, last byte
//! zero-padded) and the `BitReader` walks packed bytes back out one bit at a time.
//!
//! Padding is not self-describing. Anything that unpacks a payload must know the original
//! bit length; `unpack_exact` takes it explicitly.
//!
pub mod bitpacker;
pub mod bitreader;
pub mod bitstring;

pub use bitpacker::{pack, BitPacker};
pub use bitreader::{unpack, unpack_exact, BitReader};
pub use bitstring::BitString;
