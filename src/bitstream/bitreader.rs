//! BitReader: reads an MSB-first packed bitstream.
//!
//! NOTE: This module can read from any I/O source that supports the read() call. Reads
//! that fail are logged and treated as the end of the data.
//!

use log::error;

use super::bitstring::BitString;
use crate::error::{Error, Result};

const BUFFER_SIZE: usize = 64 * 1024;
const BIT_MASK: u8 = 0xff;

/// Reads a packed bitstream.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    cursor: usize,
    bit_index: usize,
    source: R,
}

impl<R: std::io::Read> BitReader<R> {
    /// Creates a new BitReader (with a 64k buffer).
    pub fn new(source: R) -> Self {
        Self {
            buffer: vec![0; BUFFER_SIZE],
            cursor: BUFFER_SIZE,
            bit_index: 0,
            source,
        }
    }

    /// Check (and refill) buffer. Returns true if we have data, false if there is no more
    fn have_data(&mut self) -> bool {
        // Only try to read more data when the buffer length is equal to the buffer cursor location
        if self.cursor == self.buffer.len() {
            self.buffer.resize(BUFFER_SIZE, 0);
            let size = match self.source.read(&mut self.buffer) {
                Ok(size) => size,
                Err(e) => {
                    error!("Unable to read source data: {}", e);
                    0
                }
            };
            // If nothing came back from our read attempt, then we have no more data.
            if size == 0 {
                self.buffer.clear();
                self.cursor = 0;
                return false;
            }
            // Adjust the buffer if we read less than the buffer size
            self.buffer.truncate(size);
            // Reset the cursor and bit index
            self.cursor = 0;
            self.bit_index = 0;
        }
        true
    }

    /// Return bit as Option<usize> (1 or 0), or None if there is no more data to read
    pub fn bit(&mut self) -> Option<usize> {
        // If bit_index is == 0, check if we have a byte to read. Return None if we have no data
        if self.bit_index == 0 && !self.have_data() {
            return None;
        }
        // Otherwise return the bit as an Some(usize)
        let bit = (self.buffer[self.cursor] & BIT_MASK >> self.bit_index) >> (7 - self.bit_index);
        self.bit_index += 1;
        self.bit_index %= 8;
        if self.bit_index == 0 {
            self.cursor += 1;
        }
        Some(bit as usize)
    }

    /// Return Option<Bool> *true* if the next bit is 1, *false* if 0, consuming the bit,
    /// or None if there is no more data to read
    pub fn bool_bit(&mut self) -> Option<bool> {
        self.bit().map(|bit| bit == 1)
    }

    /// Return Option<usize> of the next n bits (n <= 32), or None if there is no more data to read.
    pub fn bint(&mut self, n: usize) -> Option<usize> {
        let mut result = 0_usize;
        for _ in 0..n {
            result = result << 1 | self.bit()?;
        }
        Some(result)
    }

    /// Returns the next 64 bits, written as two 32 bit words with the high word first.
    pub fn bint64(&mut self) -> Option<u64> {
        let high = self.bint(32)? as u64;
        let low = self.bint(32)? as u64;
        Some(high << 32 | low)
    }

    /// Returns a byte as an Option<u8>, or None if there is no more data to read. This is
    /// a convenience function, and calls bint(8).
    pub fn byte(&mut self) -> Option<u8> {
        self.bint(8).map(|byte| byte as u8)
    }

    /// Returns an Option<Vec<u8>> of n bytes, or None if the data runs out first.
    pub fn bytes(&mut self, n: usize) -> Option<Vec<u8>> {
        (0..n).map(|_| self.byte()).collect()
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}

/// Expand every byte into exactly 8 bits, MSB first. Padding bits are kept.
pub fn unpack(bytes: &[u8]) -> BitString {
    let mut br = BitReader::new(bytes);
    let mut bits = BitString::with_capacity(bytes.len() * 8);
    while let Some(bit) = br.bool_bit() {
        bits.push(bit);
    }
    bits
}

/// Expand a packed buffer and cut it back to the `bit_len` bits that were packed.
pub fn unpack_exact(bytes: &[u8], bit_len: usize) -> Result<BitString> {
    let available = bytes.len() * 8;
    if bit_len > available {
        return Err(Error::BitLength {
            bits: bit_len,
            available,
        });
    }
    let mut bits = unpack(bytes);
    bits.truncate(bit_len);
    Ok(bits)
}

#[cfg(test)]
mod test {
    use super::{unpack, unpack_exact, BitReader};

    #[test]
    fn basic_test() {
        let x = [0b10000001_u8].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.bit(), Some(1));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(1));
        assert_eq!(br.bit(), None);
    }

    #[test]
    fn bint_test() {
        let x = [0b00011011].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.bint(5), Some(3));
        assert_eq!(br.bint(1), Some(0));
        assert_eq!(br.bint(2), Some(3));
        assert_eq!(br.bint(1), None);
    }

    #[test]
    fn bint64_test() {
        let x = [1_u8, 2, 3, 4, 5, 6, 7, 8];
        let mut br = BitReader::new(x.as_slice());
        assert_eq!(br.bint64(), Some(0x0102_0304_0506_0708));
    }

    #[test]
    fn bytes_test() {
        let x = "Hello, world!".as_bytes();
        let mut br = BitReader::new(x);
        assert_eq!(br.bytes(5), Some("Hello".as_bytes().to_vec()));
        assert_eq!(br.bytes(20), None);
    }

    #[test]
    fn loc_test() {
        let x = "Hello, world!".as_bytes();
        let mut br = BitReader::new(x);
        br.bytes(5);
        br.bit();
        assert_eq!(br.loc(), "[5.1]");
    }

    #[test]
    fn bool_bit_test() {
        let x = [0b01010000].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.bool_bit(), Some(false));
        assert_eq!(br.bool_bit(), Some(true));
        assert_eq!(br.bool_bit(), Some(false));
        assert_eq!(br.bool_bit(), Some(true));
        assert_eq!(br.bool_bit(), Some(false));
        assert_eq!(br.bool_bit(), Some(false));
        assert_eq!(br.bool_bit(), Some(false));
        assert_eq!(br.bool_bit(), Some(false));
        assert_eq!(br.bool_bit(), None);
    }

    #[test]
    fn unpack_keeps_leading_zeros() {
        assert_eq!(unpack(&[0b0000_0101]).to_string(), "00000101");
    }

    #[test]
    fn unpack_exact_strips_padding() {
        let bits = unpack_exact(&[0b1011_0000], 4).unwrap();
        assert_eq!(bits.to_string(), "1011");
    }

    #[test]
    fn unpack_exact_rejects_overlong_length() {
        assert!(unpack_exact(&[0xff], 9).is_err());
    }
}
